//! Credential hashing and bearer token adapters.

mod bcrypt_password_hasher;
mod jwt_token_service;

pub use bcrypt_password_hasher::{BcryptPasswordHasher, DEFAULT_COST};
pub use jwt_token_service::{JwtTokenService, SigningSecret, SigningSecretError, TOKEN_TTL_SECONDS};
