//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories only translate between Diesel rows and domain types; the
//! row structs (`models.rs`) and schema (`schema.rs`) never leave this
//! module. Connections come from a `bb8` pool through `diesel-async`.
//!
//! # Example
//!
//! ```no_run
//! use car_listings::outbound::persistence::{DbPool, DieselCarRepository, PoolConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/cars")).await?;
//! let _cars = DieselCarRepository::new(pool);
//! # Ok(())
//! # }
//! ```

mod diesel_car_repository;
mod diesel_user_repository;
pub(crate) mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_car_repository::DieselCarRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DEFAULT_MAX_CONNECTIONS, DbPool, PoolConfig, PoolError};
