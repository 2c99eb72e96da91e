//! Shared validation helpers for inbound HTTP adapters.
//!
//! Domain validation errors carry no notion of request fields; these helpers
//! attach `{ "field", "code" }` details so clients can highlight the
//! offending input.

use serde_json::json;

use crate::domain::{
    CarId, CarValidationError, CredentialValidationError, Error, UserValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    EmptyName,
    EmptyUsername,
    EmptyEmail,
    InvalidEmail,
    EmptyPassword,
    PasswordTooShort,
    InvalidUuid,
    EmptyTitle,
    EmptyDescription,
    NoTags,
    NoImages,
    TooManyImages,
    InvalidImage,
    InvalidText,
    MalformedMultipart,
    PartTooLarge,
    MalformedBody,
    MalformedQuery,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::EmptyName => "empty_name",
            ErrorCode::EmptyUsername => "empty_username",
            ErrorCode::EmptyEmail => "empty_email",
            ErrorCode::InvalidEmail => "invalid_email",
            ErrorCode::EmptyPassword => "empty_password",
            ErrorCode::PasswordTooShort => "password_too_short",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::EmptyTitle => "empty_title",
            ErrorCode::EmptyDescription => "empty_description",
            ErrorCode::NoTags => "no_tags",
            ErrorCode::NoImages => "no_images",
            ErrorCode::TooManyImages => "too_many_images",
            ErrorCode::InvalidImage => "invalid_image",
            ErrorCode::InvalidText => "invalid_text",
            ErrorCode::MalformedMultipart => "malformed_multipart",
            ErrorCode::PartTooLarge => "part_too_large",
            ErrorCode::MalformedBody => "malformed_body",
            ErrorCode::MalformedQuery => "malformed_query",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

const ID: FieldName = FieldName::new("id");
const NAME: FieldName = FieldName::new("name");
const USERNAME: FieldName = FieldName::new("username");
const EMAIL: FieldName = FieldName::new("email");
const PASSWORD: FieldName = FieldName::new("password");
const TITLE: FieldName = FieldName::new("title");
const DESCRIPTION: FieldName = FieldName::new("description");
const TAGS: FieldName = FieldName::new("tags");
const IMAGES: FieldName = FieldName::new("images");

fn field_error(field: FieldName, code: ErrorCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

pub(crate) fn user_field_error(err: &UserValidationError) -> Error {
    let (field, code) = match err {
        UserValidationError::EmptyId | UserValidationError::InvalidId => {
            (ID, ErrorCode::InvalidUuid)
        }
        UserValidationError::EmptyName => (NAME, ErrorCode::EmptyName),
        UserValidationError::EmptyUsername => (USERNAME, ErrorCode::EmptyUsername),
        UserValidationError::EmptyEmail => (EMAIL, ErrorCode::EmptyEmail),
        UserValidationError::InvalidEmail => (EMAIL, ErrorCode::InvalidEmail),
    };
    field_error(field, code, err.to_string())
}

pub(crate) fn credential_error(err: &CredentialValidationError) -> Error {
    match err {
        CredentialValidationError::Field(inner) => user_field_error(inner),
        CredentialValidationError::EmptyPassword => {
            field_error(PASSWORD, ErrorCode::EmptyPassword, err.to_string())
        }
        CredentialValidationError::PasswordTooShort { min } => Error::invalid_request(
            err.to_string(),
        )
        .with_details(json!({
            "field": PASSWORD.as_str(),
            "code": ErrorCode::PasswordTooShort.as_str(),
            "min": min,
        })),
    }
}

pub(crate) fn car_error(err: &CarValidationError) -> Error {
    let (field, code) = match err {
        CarValidationError::InvalidId => (ID, ErrorCode::InvalidUuid),
        CarValidationError::EmptyTitle => (TITLE, ErrorCode::EmptyTitle),
        CarValidationError::EmptyDescription => (DESCRIPTION, ErrorCode::EmptyDescription),
        CarValidationError::NoTags => (TAGS, ErrorCode::NoTags),
        CarValidationError::NoImages => (IMAGES, ErrorCode::NoImages),
        CarValidationError::TooManyImages { .. } => (IMAGES, ErrorCode::TooManyImages),
        CarValidationError::InvalidLocator => (IMAGES, ErrorCode::InvalidImage),
    };
    field_error(field, code, err.to_string())
}

pub(crate) fn parse_car_id(raw: &str) -> Result<CarId, Error> {
    raw.parse::<CarId>().map_err(|err| car_error(&err))
}

pub(crate) fn invalid_text_error(field: &str) -> Error {
    Error::invalid_request(format!("{field} must be valid UTF-8 text")).with_details(json!({
        "field": field,
        "code": ErrorCode::InvalidText.as_str(),
    }))
}

pub(crate) fn malformed_multipart_error() -> Error {
    Error::invalid_request("request body is not valid multipart/form-data")
        .with_details(json!({ "code": ErrorCode::MalformedMultipart.as_str() }))
}

pub(crate) fn part_too_large_error(field: &str, limit: usize) -> Error {
    Error::invalid_request(format!("{field} exceeds the {limit} byte limit")).with_details(json!({
        "field": field,
        "code": ErrorCode::PartTooLarge.as_str(),
        "limit": limit,
    }))
}

/// Error for a JSON body that cannot be parsed into the expected shape.
pub(crate) fn malformed_body_error() -> Error {
    Error::invalid_request("request body is not valid JSON for this endpoint")
        .with_details(json!({ "code": ErrorCode::MalformedBody.as_str() }))
}

pub(crate) fn malformed_query_error() -> Error {
    Error::invalid_request("query string could not be parsed")
        .with_details(json!({ "code": ErrorCode::MalformedQuery.as_str() }))
}
