//! Car listing aggregate and the value types used to create, patch and
//! search listings.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use super::UserId;

/// Maximum number of images accepted when creating a listing.
pub const MAX_IMAGES: usize = 10;

/// Public path prefix under which stored images are served.
pub const UPLOADS_PREFIX: &str = "/uploads/";

/// Validation errors raised while building or patching a listing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CarValidationError {
    #[error("car id must be a valid UUID")]
    InvalidId,
    #[error("title is required")]
    EmptyTitle,
    #[error("description is required")]
    EmptyDescription,
    #[error("at least one tag is required")]
    NoTags,
    #[error("at least one image is required")]
    NoImages,
    #[error("at most {max} images may be attached")]
    TooManyImages { max: usize },
    #[error("invalid image locator")]
    InvalidLocator,
}

/// Stable listing identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CarId(Uuid);

impl CarId {
    /// Generate a new random [`CarId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for CarId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl FromStr for CarId {
    type Err = CarValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| CarValidationError::InvalidId)
    }
}

impl fmt::Display for CarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Public path of a stored image, e.g. `/uploads/<uuid>.jpg`.
///
/// ## Invariants
/// - Starts with [`UPLOADS_PREFIX`].
/// - The file name is a single path segment without separators or dots
///   leading it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageLocator(String);

impl ImageLocator {
    /// Build the locator for a file stored in the upload directory.
    pub fn for_file_name(file_name: &str) -> Result<Self, CarValidationError> {
        if !is_plain_file_name(file_name) {
            return Err(CarValidationError::InvalidLocator);
        }
        Ok(Self(format!("{UPLOADS_PREFIX}{file_name}")))
    }

    /// Parse a locator previously produced by [`ImageLocator::for_file_name`].
    pub fn parse(raw: &str) -> Result<Self, CarValidationError> {
        let file_name = raw
            .strip_prefix(UPLOADS_PREFIX)
            .ok_or(CarValidationError::InvalidLocator)?;
        Self::for_file_name(file_name)
    }

    /// File name relative to the upload directory.
    pub fn file_name(&self) -> &str {
        self.0.get(UPLOADS_PREFIX.len()..).unwrap_or_default()
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

impl AsRef<str> for ImageLocator {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ImageLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Image file received from a client, not yet stored.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    original_name: Option<String>,
    bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(original_name: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            original_name,
            bytes,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Lower-cased extension of the client file name, if it is a short
    /// alphanumeric suffix.
    pub fn extension(&self) -> Option<String> {
        let name = self.original_name.as_deref()?;
        let (stem, ext) = name.rsplit_once('.')?;
        let usable = !stem.is_empty()
            && (1..=8).contains(&ext.len())
            && ext.chars().all(|c| c.is_ascii_alphanumeric());
        usable.then(|| ext.to_ascii_lowercase())
    }
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("original_name", &self.original_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Tags as clients send them: a list, or one comma-delimited string.
///
/// # Examples
/// ```
/// use car_listings::domain::TagsInput;
///
/// let tags = TagsInput::Delimited("toyota, suv,,".into());
/// assert_eq!(tags.normalise(), vec!["toyota".to_owned(), "suv".to_owned()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TagsInput {
    List(Vec<String>),
    Delimited(String),
}

impl TagsInput {
    /// Ordered, trimmed, non-empty tags.
    pub fn normalise(&self) -> Vec<String> {
        fn clean<'a>(parts: impl Iterator<Item = &'a str>) -> Vec<String> {
            parts
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(str::to_owned)
                .collect()
        }

        match self {
            Self::List(items) => clean(items.iter().map(String::as_str)),
            Self::Delimited(raw) => clean(raw.split(',')),
        }
    }
}

fn required_text(raw: &str, err: CarValidationError) -> Result<String, CarValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(err);
    }
    Ok(trimmed.to_owned())
}

fn required_tags(input: &TagsInput) -> Result<Vec<String>, CarValidationError> {
    let tags = input.normalise();
    if tags.is_empty() {
        return Err(CarValidationError::NoTags);
    }
    Ok(tags)
}

/// Validated creation request awaiting image storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarDraft {
    title: String,
    description: String,
    tags: Vec<String>,
    images: Vec<ImageUpload>,
}

impl CarDraft {
    /// Validate every field before anything is persisted.
    pub fn try_new(
        title: &str,
        description: &str,
        tags: &TagsInput,
        images: Vec<ImageUpload>,
    ) -> Result<Self, CarValidationError> {
        let title = required_text(title, CarValidationError::EmptyTitle)?;
        let description = required_text(description, CarValidationError::EmptyDescription)?;
        let tags = required_tags(tags)?;
        if images.is_empty() {
            return Err(CarValidationError::NoImages);
        }
        if images.len() > MAX_IMAGES {
            return Err(CarValidationError::TooManyImages { max: MAX_IMAGES });
        }
        Ok(Self {
            title,
            description,
            tags,
            images,
        })
    }

    pub fn images(&self) -> &[ImageUpload] {
        &self.images
    }

    /// Build the listing once every image has a locator.
    pub fn into_car(
        self,
        owner: UserId,
        images: Vec<ImageLocator>,
        now: DateTime<Utc>,
    ) -> Car {
        Car {
            id: CarId::random(),
            owner,
            title: self.title,
            description: Some(self.description),
            tags: self.tags,
            images,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Raw partial update. `None` means the field was absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<TagsInput>,
}

/// Partial update whose present fields satisfy the creation rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedCarPatch {
    title: Option<String>,
    description: Option<String>,
    tags: Option<Vec<String>>,
}

impl CarPatch {
    pub fn validate(&self) -> Result<ValidatedCarPatch, CarValidationError> {
        Ok(ValidatedCarPatch {
            title: self
                .title
                .as_deref()
                .map(|t| required_text(t, CarValidationError::EmptyTitle))
                .transpose()?,
            description: self
                .description
                .as_deref()
                .map(|d| required_text(d, CarValidationError::EmptyDescription))
                .transpose()?,
            tags: self.tags.as_ref().map(required_tags).transpose()?,
        })
    }
}

/// Persisted listing.
///
/// ## Invariants
/// - `owner` never changes after creation.
/// - `images` is set at creation and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Car {
    pub id: CarId,
    pub owner: UserId,
    pub title: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub images: Vec<ImageLocator>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Car {
    /// Whether `caller` may mutate this listing.
    pub fn is_owned_by(&self, caller: &UserId) -> bool {
        &self.owner == caller
    }

    /// Apply present fields and refresh `updated_at`.
    pub fn apply(&mut self, patch: ValidatedCarPatch, now: DateTime<Utc>) {
        let ValidatedCarPatch {
            title,
            description,
            tags,
        } = patch;
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = description {
            self.description = Some(description);
        }
        if let Some(tags) = tags {
            self.tags = tags;
        }
        self.updated_at = now;
    }
}

/// Case-insensitive substring filter over title, description and tags.
///
/// The keyword is matched as given; only an empty or absent keyword matches
/// every listing.
///
/// # Examples
/// ```
/// use car_listings::domain::CarSearch;
///
/// assert_eq!(CarSearch::new(Some("")), CarSearch::new(None));
/// assert_ne!(CarSearch::new(Some("  ")), CarSearch::new(None));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarSearch {
    needle: Option<String>,
}

impl CarSearch {
    pub fn new(keyword: Option<&str>) -> Self {
        let needle = keyword
            .filter(|k| !k.is_empty())
            .map(str::to_lowercase);
        Self { needle }
    }

    pub fn matches(&self, car: &Car) -> bool {
        let Some(needle) = self.needle.as_deref() else {
            return true;
        };
        let hit = |text: &str| text.to_lowercase().contains(needle);
        hit(&car.title)
            || car.description.as_deref().is_some_and(hit)
            || car.tags.iter().any(|tag| hit(tag))
    }
}
