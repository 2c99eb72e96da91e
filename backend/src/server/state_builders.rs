//! Builds the HTTP state from the configured adapters.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use car_listings::domain::ports::{CarsCommand, CarsQuery, TokenService};
use car_listings::domain::{AccountService, CarService};
use car_listings::inbound::http::state::HttpState;
use car_listings::outbound::persistence::{DieselCarRepository, DieselUserRepository};
use car_listings::outbound::security::{BcryptPasswordHasher, JwtTokenService};

use super::ServerConfig;

/// Wire repositories, credential adapters and the image store into the
/// account and listing services.
pub(crate) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let tokens: Arc<dyn TokenService> =
        Arc::new(JwtTokenService::new(&config.signing_secret, clock.clone()));

    let accounts = AccountService::new(
        Arc::new(DieselUserRepository::new(config.db_pool.clone())),
        Arc::new(BcryptPasswordHasher::default()),
        tokens.clone(),
        clock.clone(),
    );
    let cars = Arc::new(CarService::new(
        Arc::new(DieselCarRepository::new(config.db_pool.clone())),
        Arc::new(config.image_store.clone()),
        clock,
    ));
    let cars_command: Arc<dyn CarsCommand> = cars.clone();
    let cars_query: Arc<dyn CarsQuery> = cars;

    web::Data::new(HttpState::new(
        Arc::new(accounts),
        cars_command,
        cars_query,
        tokens,
    ))
}
