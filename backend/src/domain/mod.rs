//! Domain primitives, services and ports.
//!
//! Purpose: define strongly typed entities and the use-cases that the HTTP
//! adapter drives. Nothing in here imports actix, Diesel or the filesystem;
//! infrastructure reaches the domain through [`ports`].
//!
//! Public surface:
//! - Error (alias to `error::DomainError`): transport agnostic failure payload.
//! - User, Car and their validated field types.
//! - AccountService and CarService: the driving-port implementations.

pub mod account_service;
pub mod auth;
pub mod car;
pub mod car_service;
pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::account_service::{AccountService, INVALID_CREDENTIALS};
pub use self::auth::{
    CredentialValidationError, LoginCredentials, PASSWORD_MIN_LENGTH, Password, SignupDetails,
};
pub use self::car::{
    Car, CarDraft, CarId, CarPatch, CarSearch, CarValidationError, ImageLocator, ImageUpload,
    MAX_IMAGES, TagsInput, UPLOADS_PREFIX, ValidatedCarPatch,
};
pub use self::car_service::CarService;
pub use self::error::{DomainError as Error, ErrorCode, ErrorValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EmailAddress, PasswordHash, PersonName, User, UserId, UserValidationError, Username,
};

/// Convenient result alias for driving ports.
///
/// # Examples
/// ```
/// use car_listings::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
