//! Bearer-token guard for listing endpoints.
//!
//! [`AuthenticatedUser`] is an Actix extractor: a handler that takes it as an
//! argument only runs once the `Authorization` header carries a token the
//! configured [`TokenService`](crate::domain::ports::TokenService) accepts.
//! Every other request is answered with `401 Unauthorized` before the handler
//! body is reached.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use futures_util::future::{Ready, ready};
use tracing::{debug, error};

use crate::domain::{Error, UserId};

use super::state::HttpState;

const BEARER_SCHEME: &str = "bearer";

/// Identity proven by a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(UserId);

impl AuthenticatedUser {
    pub fn user_id(&self) -> &UserId {
        &self.0
    }

    pub fn into_inner(self) -> UserId {
        self.0
    }
}

/// Token part of `Authorization: Bearer <token>`.
///
/// The scheme is matched case-insensitively and the token must be non-empty.
fn bearer_token(req: &HttpRequest) -> Option<&str> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case(BEARER_SCHEME) && !token.is_empty()).then_some(token)
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
    let Some(state) = req.app_data::<web::Data<HttpState>>() else {
        error!("HttpState missing from app data; cannot verify bearer tokens");
        return Err(Error::internal("token verification is not configured"));
    };
    let token =
        bearer_token(req).ok_or_else(|| Error::unauthorized("Authentication required"))?;
    state.tokens.verify(token).map(AuthenticatedUser).map_err(|err| {
        debug!(error = %err, "bearer token rejected");
        Error::unauthorized("Invalid or expired token")
    })
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
