//! Port for storing and releasing listing images.

use async_trait::async_trait;

use crate::domain::{ImageLocator, ImageUpload};

use super::define_port_error;

define_port_error! {
    /// Errors raised by image storage adapters.
    pub enum ImageStoreError {
        /// Writing the image failed.
        Write { message: String } => "image write failed: {message}",
        /// Removing the image failed.
        Release { locator: String, message: String } =>
            "image release failed for {locator}: {message}",
    }
}

/// Blob storage for uploaded images.
///
/// Each call is independent: a failed `store` leaves earlier stored images in
/// place, and `release` of one locator never affects another.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist `upload` and return its public locator.
    async fn store(&self, upload: &ImageUpload) -> Result<ImageLocator, ImageStoreError>;

    /// Remove the image behind `locator`.
    async fn release(&self, locator: &ImageLocator) -> Result<(), ImageStoreError>;
}
