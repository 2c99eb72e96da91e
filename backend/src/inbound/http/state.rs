//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AccountsCommand, CarsCommand, CarsQuery, TokenService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountsCommand>,
    pub cars: Arc<dyn CarsCommand>,
    pub cars_query: Arc<dyn CarsQuery>,
    /// Verifier consulted by the [`super::auth::AuthenticatedUser`] extractor.
    pub tokens: Arc<dyn TokenService>,
}

impl HttpState {
    /// Construct state from explicit port implementations.
    pub fn new(
        accounts: Arc<dyn AccountsCommand>,
        cars: Arc<dyn CarsCommand>,
        cars_query: Arc<dyn CarsQuery>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            accounts,
            cars,
            cars_query,
            tokens,
        }
    }
}
