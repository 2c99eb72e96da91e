//! Account API handlers.
//!
//! ```text
//! POST /api/auth/signup {"name":"John","username":"john12","email":"john@example.com","password":"password123"}
//! POST /api/auth/login {"email":"john@example.com","password":"password123"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::AccessToken;
use tracing::debug;

use crate::domain::{
    CredentialValidationError, Error, INVALID_CREDENTIALS, LoginCredentials, SignupDetails,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::credential_error;

/// Signup request body for `POST /api/auth/signup`.
///
/// Missing fields deserialise as empty strings and are reported as
/// validation failures naming the field.
#[derive(Deserialize, Serialize, utoipa::ToSchema, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SignupRequest {
    #[schema(example = "John")]
    pub name: String,
    #[schema(example = "john12")]
    pub username: String,
    #[schema(example = "john@example.com")]
    pub email: String,
    #[schema(example = "password123")]
    pub password: String,
}

impl TryFrom<SignupRequest> for SignupDetails {
    type Error = CredentialValidationError;

    fn try_from(value: SignupRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.name, &value.username, &value.email, &value.password)
    }
}

/// Login request body for `POST /api/auth/login`.
#[derive(Deserialize, Serialize, utoipa::ToSchema, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginRequest {
    #[schema(example = "john@example.com")]
    pub email: String,
    #[schema(example = "password123")]
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = CredentialValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// Bearer token issued on signup and login.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
pub struct TokenResponse {
    /// Signed token to send as `Authorization: Bearer <token>`.
    pub token: String,
}

impl From<AccessToken> for TokenResponse {
    fn from(value: AccessToken) -> Self {
        Self {
            token: value.into(),
        }
    }
}

/// Register a new account and return its first token.
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = TokenResponse),
        (status = 400, description = "Invalid input, or username/email already taken", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "signup",
    security([])
)]
#[post("/auth/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    payload: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let details =
        SignupDetails::try_from(payload.into_inner()).map_err(|err| credential_error(&err))?;
    let token = state.accounts.signup(&details).await?;
    Ok(HttpResponse::Created().json(TokenResponse::from(token)))
}

/// Exchange an email and password for a token.
///
/// A blank email or password fails like any other unknown credential pair.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = TokenResponse),
        (status = 400, description = "Request body is not valid JSON", body = ErrorSchema),
        (status = 401, description = "Invalid credentials, including a blank email or password", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<TokenResponse>> {
    let credentials = LoginCredentials::try_from(payload.into_inner()).map_err(|err| {
        debug!(error = %err, "login rejected before lookup");
        Error::unauthorized(INVALID_CREDENTIALS)
    })?;
    let token = state.accounts.login(&credentials).await?;
    Ok(web::Json(TokenResponse::from(token)))
}
