//! HTTP inbound adapter exposing REST endpoints.
//!
//! Every route is registered relative to the `/api` scope the server mounts
//! it under; see [`configure`].

use actix_web::web;
use tracing::debug;

pub mod accounts;
pub mod auth;
pub mod cars;
pub mod error;
pub mod health;
pub mod multipart;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;

/// Register the account, listing and health endpoints on `cfg`.
///
/// `/cars/search` is registered ahead of `/cars/{id}` so the literal segment
/// wins. JSON body and query string extraction failures are reported as
/// `invalid_request` error payloads rather than Actix's plain-text defaults.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use car_listings::inbound::http::configure;
///
/// let app = App::new().service(web::scope("/api").configure(configure));
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        debug!(error = %err, "json body rejected");
        validation::malformed_body_error().into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        debug!(error = %err, "query string rejected");
        validation::malformed_query_error().into()
    }))
    .service(accounts::signup)
        .service(accounts::login)
        .service(cars::create_car)
        .service(cars::list_cars)
        .service(cars::search_cars)
        .service(cars::update_car)
        .service(cars::delete_car)
        .service(health::health)
        .service(health::ready);
}
