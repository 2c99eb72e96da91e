//! Driving port for signup and login.
//!
//! Inbound adapters call this port to register identities and exchange
//! credentials for tokens without importing persistence or crypto adapters.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, SignupDetails};

use super::AccessToken;

/// Domain use-case port for account management.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountsCommand: Send + Sync {
    /// Register a new identity and issue its first token.
    async fn signup(&self, details: &SignupDetails) -> Result<AccessToken, Error>;

    /// Exchange valid credentials for a token.
    async fn login(&self, credentials: &LoginCredentials) -> Result<AccessToken, Error>;
}
