//! bcrypt-backed [`PasswordHasher`] adapter.
//!
//! bcrypt is CPU-bound, so both operations run on Tokio's blocking pool to
//! keep the request workers responsive.

use async_trait::async_trait;
use tokio::task;
use zeroize::Zeroizing;

use crate::domain::ports::{PasswordHashError, PasswordHasher};
use crate::domain::{Password, PasswordHash};

/// bcrypt work factor used in production.
pub const DEFAULT_COST: u32 = 10;

/// bcrypt password hasher with a fixed work factor.
///
/// # Examples
/// ```
/// use car_listings::outbound::security::BcryptPasswordHasher;
///
/// let hasher = BcryptPasswordHasher::default();
/// assert_eq!(hasher.cost(), 10);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

impl BcryptPasswordHasher {
    /// Build a hasher with a custom work factor.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

fn algorithm_error(err: impl std::fmt::Display) -> PasswordHashError {
    PasswordHashError::algorithm(err.to_string())
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHashError> {
        let plaintext = Zeroizing::new(password.expose().to_owned());
        let cost = self.cost;
        let encoded = task::spawn_blocking(move || bcrypt::hash(plaintext.as_bytes(), cost))
            .await
            .map_err(algorithm_error)?
            .map_err(algorithm_error)?;
        Ok(PasswordHash::new(encoded))
    }

    async fn verify(
        &self,
        password: &Password,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHashError> {
        let plaintext = Zeroizing::new(password.expose().to_owned());
        let encoded = hash.as_ref().to_owned();
        task::spawn_blocking(move || bcrypt::verify(plaintext.as_bytes(), &encoded))
            .await
            .map_err(algorithm_error)?
            .map_err(algorithm_error)
    }
}
