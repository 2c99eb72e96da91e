//! Driving port for listing mutations.

use async_trait::async_trait;

use crate::domain::{Car, CarDraft, CarId, CarPatch, Error, UserId};

/// Domain use-case port for creating, updating and deleting listings.
///
/// Every operation is scoped to `caller`: update and delete fail with
/// [`crate::domain::ErrorCode::Forbidden`] when the listing belongs to
/// someone else.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CarsCommand: Send + Sync {
    /// Store the draft's images and persist the listing owned by `caller`.
    async fn create(&self, caller: &UserId, draft: CarDraft) -> Result<Car, Error>;

    /// Apply the present fields of `patch`.
    async fn update(&self, caller: &UserId, id: &CarId, patch: &CarPatch) -> Result<Car, Error>;

    /// Delete a listing, releasing its images best-effort.
    async fn delete(&self, caller: &UserId, id: &CarId) -> Result<(), Error>;
}
