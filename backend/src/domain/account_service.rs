//! Account domain service: signup and login.
//!
//! Implements [`AccountsCommand`] over the user repository, the password
//! hasher and the token service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::error;

use crate::domain::ports::{
    AccessToken, AccountsCommand, PasswordHashError, PasswordHasher, TokenError, TokenService,
    UserPersistenceError, UserRepository,
};
use crate::domain::{Error, LoginCredentials, SignupDetails, User, UserId};

/// Message for every rejected login, whatever the cause.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Account service implementing the signup/login driving port.
#[derive(Clone)]
pub struct AccountService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: Arc<dyn TokenService>,
    clock: Arc<dyn Clock>,
}

impl<U, H> AccountService<U, H> {
    /// Create a new service with the given collaborators.
    pub fn new(
        users: Arc<U>,
        hasher: Arc<H>,
        tokens: Arc<dyn TokenService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            clock,
        }
    }
}

impl<U, H> AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    fn map_user_error(err: UserPersistenceError) -> Error {
        match err {
            UserPersistenceError::DuplicateEmail => Error::duplicate_email(),
            UserPersistenceError::DuplicateUsername => Error::duplicate_username(),
            other => {
                error!(error = %other, "user repository failure");
                Error::internal(format!("user repository error: {other}"))
            }
        }
    }

    fn map_hash_error(err: PasswordHashError) -> Error {
        error!(error = %err, "password hashing failure");
        Error::internal(format!("password hashing error: {err}"))
    }

    fn issue_token(&self, user_id: &UserId) -> Result<AccessToken, Error> {
        self.tokens.issue(user_id).map_err(|err: TokenError| {
            error!(error = %err, user_id = %user_id, "token issuance failure");
            Error::internal(format!("token issuance error: {err}"))
        })
    }

    async fn ensure_available(&self, details: &SignupDetails) -> Result<(), Error> {
        let by_email = self
            .users
            .find_by_email(details.email().as_ref())
            .await
            .map_err(Self::map_user_error)?;
        if by_email.is_some() {
            return Err(Error::duplicate_email());
        }

        let by_username = self
            .users
            .find_by_username(details.username())
            .await
            .map_err(Self::map_user_error)?;
        if by_username.is_some() {
            return Err(Error::duplicate_username());
        }
        Ok(())
    }
}

#[async_trait]
impl<U, H> AccountsCommand for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn signup(&self, details: &SignupDetails) -> Result<AccessToken, Error> {
        self.ensure_available(details).await?;

        let password_hash = self
            .hasher
            .hash(details.password())
            .await
            .map_err(Self::map_hash_error)?;
        let now = self.clock.utc();
        let user = User {
            id: UserId::random(),
            name: details.name().clone(),
            username: details.username().clone(),
            email: details.email().clone(),
            password_hash,
            created_at: now,
            updated_at: now,
        };

        // The unique constraints decide concurrent races the lookups missed.
        self.users
            .insert(&user)
            .await
            .map_err(Self::map_user_error)?;
        self.issue_token(&user.id)
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<AccessToken, Error> {
        let Some(user) = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(Self::map_user_error)?
        else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let matches = self
            .hasher
            .verify(credentials.password(), &user.password_hash)
            .await
            .map_err(Self::map_hash_error)?;
        if !matches {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        self.issue_token(&user.id)
    }
}
