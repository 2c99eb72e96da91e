//! `multipart/form-data` intake for listing creation.
//!
//! Recognised parts: `title`, `description`, `tags` (or `tags[]`, repeatable)
//! and `images` (file parts). Unknown parts are drained and ignored. Field
//! presence and image count are left to [`CarDraft::try_new`] so multipart
//! and JSON clients see identical validation errors. Each part is capped by
//! [`PartLimits`] while it streams, so an oversized part is rejected before it
//! is buffered in full.

use actix_multipart::{Field, Multipart};
use futures_util::TryStreamExt;
use tracing::debug;

use crate::domain::{CarDraft, CarValidationError, Error, ImageUpload, MAX_IMAGES, TagsInput};

use super::validation::{
    car_error, invalid_text_error, malformed_multipart_error, part_too_large_error,
};

const TITLE: &str = "title";
const DESCRIPTION: &str = "description";
const TAGS: &str = "tags";
const TAGS_ARRAY: &str = "tags[]";
const IMAGES: &str = "images";

/// Largest accepted text part (title, description, tags or unknown parts).
pub const MAX_TEXT_BYTES: usize = 64 * 1024;
/// Largest accepted single image part.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Per-part byte caps applied while a form streams in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartLimits {
    pub text: usize,
    pub image: usize,
}

impl Default for PartLimits {
    fn default() -> Self {
        Self {
            text: MAX_TEXT_BYTES,
            image: MAX_IMAGE_BYTES,
        }
    }
}

/// Raw listing form as received, before validation.
#[derive(Debug, Default)]
pub struct CarForm {
    title: String,
    description: String,
    tags: Vec<String>,
    images: Vec<ImageUpload>,
}

impl CarForm {
    /// Tags as sent: one part is treated as a comma-delimited value, several
    /// parts as a list.
    fn tags_input(&self) -> TagsInput {
        match self.tags.as_slice() {
            [single] => TagsInput::Delimited(single.clone()),
            many => TagsInput::List(many.to_vec()),
        }
    }

    /// Validate the form into a creation draft.
    pub fn into_draft(self) -> Result<CarDraft, Error> {
        let tags = self.tags_input();
        CarDraft::try_new(&self.title, &self.description, &tags, self.images)
            .map_err(|err| car_error(&err))
    }
}

async fn read_bytes(field: &mut Field, name: &str, limit: usize) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(|err| {
        debug!(error = %err, "multipart field could not be read");
        malformed_multipart_error()
    })? {
        if bytes.len() + chunk.len() > limit {
            debug!(field = name, limit, "multipart part exceeds its size limit");
            return Err(part_too_large_error(name, limit));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

async fn read_text(field: &mut Field, name: &str, limit: usize) -> Result<String, Error> {
    let bytes = read_bytes(field, name, limit).await?;
    String::from_utf8(bytes).map_err(|_| invalid_text_error(name))
}

/// Read every part of `payload` into a [`CarForm`] using the default
/// [`PartLimits`].
pub async fn read_car_form(payload: Multipart) -> Result<CarForm, Error> {
    read_car_form_with_limits(payload, PartLimits::default()).await
}

/// Read every part of `payload` into a [`CarForm`].
///
/// Fails fast once more than [`MAX_IMAGES`] image parts arrive, or once any
/// part outgrows its cap in `limits`.
pub async fn read_car_form_with_limits(
    mut payload: Multipart,
    limits: PartLimits,
) -> Result<CarForm, Error> {
    let mut form = CarForm::default();
    while let Some(mut field) = payload.try_next().await.map_err(|err| {
        debug!(error = %err, "multipart body could not be parsed");
        malformed_multipart_error()
    })? {
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            TITLE => form.title = read_text(&mut field, TITLE, limits.text).await?,
            DESCRIPTION => {
                form.description = read_text(&mut field, DESCRIPTION, limits.text).await?;
            }
            TAGS | TAGS_ARRAY => {
                form.tags.push(read_text(&mut field, TAGS, limits.text).await?);
            }
            IMAGES => {
                let file_name = field
                    .content_disposition()
                    .and_then(|disposition| disposition.get_filename())
                    .map(str::to_owned);
                let bytes = read_bytes(&mut field, IMAGES, limits.image).await?;
                // Browsers submit an empty, unnamed part for an untouched file input.
                if bytes.is_empty() && file_name.as_deref().is_none_or(str::is_empty) {
                    continue;
                }
                if form.images.len() == MAX_IMAGES {
                    return Err(car_error(&CarValidationError::TooManyImages {
                        max: MAX_IMAGES,
                    }));
                }
                form.images.push(ImageUpload::new(file_name, bytes));
            }
            other => {
                read_bytes(&mut field, other, limits.text).await?;
            }
        }
    }
    Ok(form)
}
