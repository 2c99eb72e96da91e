//! Filesystem-backed [`ImageStore`] rooted at the configured upload directory.
//!
//! All access goes through a capability handle on the upload directory, so a
//! locator can never address a file outside it. Filesystem calls run on the
//! blocking pool.

use std::io;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tokio::task;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{ImageStore, ImageStoreError};
use crate::domain::{ImageLocator, ImageUpload};

/// Stores each upload as `<uuid>[.<ext>]` inside one directory.
#[derive(Clone)]
pub struct LocalImageStore {
    dir: Arc<Dir>,
}

impl LocalImageStore {
    /// Open (creating if needed) the upload directory.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        Dir::create_ambient_dir_all(path, ambient_authority())?;
        let dir = Dir::open_ambient_dir(path, ambient_authority())?;
        Ok(Self { dir: Arc::new(dir) })
    }

    fn file_name_for(upload: &ImageUpload) -> String {
        let stem = Uuid::new_v4().simple().to_string();
        match upload.extension() {
            Some(ext) => format!("{stem}.{ext}"),
            None => stem,
        }
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn store(&self, upload: &ImageUpload) -> Result<ImageLocator, ImageStoreError> {
        let file_name = Self::file_name_for(upload);
        let locator = ImageLocator::for_file_name(&file_name)
            .map_err(|err| ImageStoreError::write(err.to_string()))?;

        let dir = Arc::clone(&self.dir);
        let bytes = upload.bytes().to_vec();
        task::spawn_blocking(move || dir.write(&file_name, bytes))
            .await
            .map_err(|err| ImageStoreError::write(err.to_string()))?
            .map_err(|err| ImageStoreError::write(err.to_string()))?;

        debug!(locator = %locator, "stored image");
        Ok(locator)
    }

    async fn release(&self, locator: &ImageLocator) -> Result<(), ImageStoreError> {
        let dir = Arc::clone(&self.dir);
        let file_name = locator.file_name().to_owned();
        let release_error = |message: String| ImageStoreError::release(locator.to_string(), message);

        task::spawn_blocking(move || dir.remove_file(&file_name))
            .await
            .map_err(|err| release_error(err.to_string()))?
            .map_err(|err| release_error(err.to_string()))?;

        debug!(locator = %locator, "released image");
        Ok(())
    }
}
