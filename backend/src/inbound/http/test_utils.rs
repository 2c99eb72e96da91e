//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::http::header::{self, HeaderName};
use actix_web::web;

use crate::domain::UserId;
use crate::domain::ports::{
    MockAccountsCommand, MockCarsCommand, MockCarsQuery, MockTokenService, TokenError,
};

use super::state::HttpState;

/// The only token [`accepting_tokens`] verifies.
pub const VALID_TOKEN: &str = "valid-token";
/// Identity [`VALID_TOKEN`] resolves to.
pub const OWNER_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

pub fn owner_id() -> UserId {
    UserId::new(OWNER_ID).expect("fixture user id")
}

/// `Authorization` header carrying [`VALID_TOKEN`].
pub fn bearer() -> (HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {VALID_TOKEN}"))
}

/// Token verifier accepting only [`VALID_TOKEN`].
pub fn accepting_tokens() -> MockTokenService {
    let mut tokens = MockTokenService::new();
    tokens.expect_verify().returning(|token| {
        if token == VALID_TOKEN {
            Ok(owner_id())
        } else {
            Err(TokenError::invalid("unknown token"))
        }
    });
    tokens
}

/// Mock ports awaiting expectations; tokens already accept [`VALID_TOKEN`].
pub struct MockState {
    pub accounts: MockAccountsCommand,
    pub cars: MockCarsCommand,
    pub cars_query: MockCarsQuery,
    pub tokens: MockTokenService,
}

pub fn mock_state() -> MockState {
    MockState {
        accounts: MockAccountsCommand::new(),
        cars: MockCarsCommand::new(),
        cars_query: MockCarsQuery::new(),
        tokens: accepting_tokens(),
    }
}

impl MockState {
    pub fn build(self) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(
            Arc::new(self.accounts),
            Arc::new(self.cars),
            Arc::new(self.cars_query),
            Arc::new(self.tokens),
        ))
    }
}
