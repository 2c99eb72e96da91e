//! Port abstraction for listing persistence.

use async_trait::async_trait;

use crate::domain::{Car, CarId, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by car repository adapters.
    pub enum CarPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "car repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "car repository query failed: {message}",
    }
}

/// Storage for listings.
///
/// Ownership checks belong to the domain; adapters store and return rows
/// verbatim. `list_by_owner` orders by creation time, then id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CarRepository: Send + Sync {
    /// Insert a new listing.
    async fn insert(&self, car: &Car) -> Result<(), CarPersistenceError>;

    /// Fetch a listing by id regardless of owner.
    async fn find_by_id(&self, id: &CarId) -> Result<Option<Car>, CarPersistenceError>;

    /// Every listing owned by `owner`, oldest first.
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Car>, CarPersistenceError>;

    /// Persist title, description, tags and `updated_at` of an existing
    /// listing. Returns `false` when no row matched.
    async fn update(&self, car: &Car) -> Result<bool, CarPersistenceError>;

    /// Remove a listing. Returns `false` when no row matched.
    async fn delete(&self, id: &CarId) -> Result<bool, CarPersistenceError>;
}
