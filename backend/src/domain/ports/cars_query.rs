//! Driving port for owner-scoped listing reads.

use async_trait::async_trait;

use crate::domain::{Car, CarSearch, Error, UserId};

/// Domain use-case port for listing and searching the caller's cars.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CarsQuery: Send + Sync {
    /// All listings owned by `caller`, oldest first.
    async fn list_owned(&self, caller: &UserId) -> Result<Vec<Car>, Error>;

    /// Owned listings matching `search`, in `list_owned` order.
    async fn search(&self, caller: &UserId, search: &CarSearch) -> Result<Vec<Car>, Error>;
}
