//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`AccountsCommand`, `CarsCommand`, `CarsQuery`) are called
//! by the HTTP adapter. Driven ports (repositories, hasher, token service,
//! image store) are implemented under `crate::outbound`.

mod macros;
pub(crate) use macros::define_port_error;

mod accounts_command;
mod car_repository;
mod cars_command;
mod cars_query;
mod image_store;
mod password_hasher;
mod token_service;
mod user_repository;

#[cfg(test)]
pub use accounts_command::MockAccountsCommand;
pub use accounts_command::AccountsCommand;
#[cfg(test)]
pub use car_repository::MockCarRepository;
pub use car_repository::{CarPersistenceError, CarRepository};
#[cfg(test)]
pub use cars_command::MockCarsCommand;
pub use cars_command::CarsCommand;
#[cfg(test)]
pub use cars_query::MockCarsQuery;
pub use cars_query::CarsQuery;
#[cfg(test)]
pub use image_store::MockImageStore;
pub use image_store::{ImageStore, ImageStoreError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{AccessToken, TokenError, TokenService};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
