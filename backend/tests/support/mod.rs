//! Shared helpers for the listing flow integration tests.
//!
//! Integration tests compile as a separate crate, so the unit-test mocks are
//! not available here. These in-memory adapters implement the driven ports
//! with the same uniqueness and ownership rules the PostgreSQL schema
//! enforces, which lets the whole HTTP stack run without a database.

use std::sync::{Arc, Mutex, MutexGuard};

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header::{AUTHORIZATION, CONTENT_TYPE, HeaderName};
use actix_web::{App, test, web};
use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use serde_json::Value;
use tempfile::TempDir;

use car_listings::Trace;
use car_listings::domain::ports::{
    CarPersistenceError, CarRepository, CarsCommand, CarsQuery, TokenService,
    UserPersistenceError, UserRepository,
};
use car_listings::domain::{AccountService, Car, CarId, CarService, User, UserId, Username};
use car_listings::inbound::http::configure;
use car_listings::inbound::http::health::HealthState;
use car_listings::inbound::http::state::HttpState;
use car_listings::outbound::security::{BcryptPasswordHasher, JwtTokenService, SigningSecret};
use car_listings::outbound::storage::LocalImageStore;

const BOUNDARY: &str = "listing-flow-boundary";

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Clock pinned to one instant.
pub struct FixedClock(DateTime<Utc>);

impl Default for FixedClock {
    fn default() -> Self {
        Self(
            Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0)
                .single()
                .expect("timestamp"),
        )
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Users held in memory; email and username are unique.
#[derive(Default)]
pub struct InMemoryUsers {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = lock(&self.users);
        if users.iter().any(|existing| existing.email == user.email) {
            return Err(UserPersistenceError::duplicate_email());
        }
        if users.iter().any(|existing| existing.username == user.username) {
            return Err(UserPersistenceError::duplicate_username());
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError> {
        Ok(lock(&self.users)
            .iter()
            .find(|user| user.email.as_ref() == email)
            .cloned())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(lock(&self.users)
            .iter()
            .find(|user| &user.username == username)
            .cloned())
    }
}

/// Listings held in memory in insertion order.
#[derive(Default)]
pub struct InMemoryCars {
    cars: Mutex<Vec<Car>>,
}

impl InMemoryCars {
    pub fn count(&self) -> usize {
        lock(&self.cars).len()
    }
}

#[async_trait]
impl CarRepository for InMemoryCars {
    async fn insert(&self, car: &Car) -> Result<(), CarPersistenceError> {
        lock(&self.cars).push(car.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &CarId) -> Result<Option<Car>, CarPersistenceError> {
        Ok(lock(&self.cars).iter().find(|car| &car.id == id).cloned())
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Car>, CarPersistenceError> {
        Ok(lock(&self.cars)
            .iter()
            .filter(|car| car.is_owned_by(owner))
            .cloned()
            .collect())
    }

    async fn update(&self, car: &Car) -> Result<bool, CarPersistenceError> {
        let mut cars = lock(&self.cars);
        match cars.iter_mut().find(|existing| existing.id == car.id) {
            Some(slot) => {
                *slot = car.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &CarId) -> Result<bool, CarPersistenceError> {
        let mut cars = lock(&self.cars);
        let before = cars.len();
        cars.retain(|car| &car.id != id);
        Ok(cars.len() < before)
    }
}

/// Fully wired application state over in-memory adapters.
pub struct World {
    pub uploads: TempDir,
    pub cars: Arc<InMemoryCars>,
    pub http_state: web::Data<HttpState>,
}

impl World {
    pub fn new() -> Self {
        let uploads = TempDir::new().expect("temp dir");
        let clock: Arc<dyn Clock> = Arc::new(FixedClock::default());
        let secret = SigningSecret::new("integration-secret").expect("secret");
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(&secret, clock.clone()));

        let accounts = AccountService::new(
            Arc::new(InMemoryUsers::default()),
            Arc::new(BcryptPasswordHasher::with_cost(4)),
            tokens.clone(),
            clock.clone(),
        );
        let cars = Arc::new(InMemoryCars::default());
        let store = LocalImageStore::open(uploads.path()).expect("upload dir");
        let service = Arc::new(CarService::new(cars.clone(), Arc::new(store), clock));
        let cars_command: Arc<dyn CarsCommand> = service.clone();
        let cars_query: Arc<dyn CarsQuery> = service;

        let http_state = web::Data::new(HttpState::new(
            Arc::new(accounts),
            cars_command,
            cars_query,
            tokens,
        ));
        Self {
            uploads,
            cars,
            http_state,
        }
    }

    /// Number of files currently in the upload directory.
    pub fn stored_files(&self) -> usize {
        std::fs::read_dir(self.uploads.path())
            .expect("read uploads")
            .count()
    }

    pub async fn service(
        &self,
    ) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
        test::init_service(
            App::new()
                .app_data(self.http_state.clone())
                .app_data(web::Data::new(HealthState::new()))
                .wrap(Trace)
                .service(web::scope("/api").configure(configure)),
        )
        .await
    }
}

/// Call the service and decode the JSON body.
pub async fn send<S>(app: &S, request: test::TestRequest) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let response = test::call_service(app, request.to_request()).await;
    let status = response.status();
    let body = test::read_body(response).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

pub fn bearer(token: &str) -> (HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {token}"))
}

/// Multipart body for a listing with `image_count` image parts.
pub fn listing_form(title: &str, tags: &str, image_count: usize) -> (HeaderName, String, Vec<u8>) {
    let mut body = Vec::new();
    for (name, value) in [("title", title), ("description", "Family car"), ("tags", tags)] {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    for index in 0..image_count {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"images\"; filename=\"photo{index}.jpg\"\r\nContent-Type: image/jpeg\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"jpeg-bytes");
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    (
        CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
        body,
    )
}
