//! Listing API handlers.
//!
//! ```text
//! POST   /api/cars            multipart: title, description, tags, images
//! GET    /api/cars
//! GET    /api/cars/search?keyword=toyota
//! PUT    /api/cars/{id}       {"title":"...","description":"...","tags":["..."]}
//! DELETE /api/cars/{id}
//! ```
//!
//! Every handler takes [`AuthenticatedUser`] as its first argument, so the
//! bearer token is verified before the body is read.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::{Car, CarPatch, CarSearch, TagsInput};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::multipart::read_car_form;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_car_id;

const CREATED: &str = "Car created successfully";
const RETRIEVED: &str = "Cars retrieved successfully";
const UPDATED: &str = "Car updated successfully";
const REMOVED: &str = "Car removed successfully";

/// Listing as returned to its owner.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CarResponse {
    pub id: Uuid,
    pub owner: Uuid,
    #[schema(example = "SUV Deal")]
    pub title: String,
    pub description: Option<String>,
    #[schema(example = json!(["toyota", "suv"]))]
    pub tags: Vec<String>,
    /// Public paths of the stored images, e.g. `/uploads/<id>.jpg`.
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Car> for CarResponse {
    fn from(car: Car) -> Self {
        Self {
            id: *car.id.as_uuid(),
            owner: *car.owner.as_uuid(),
            title: car.title,
            description: car.description,
            tags: car.tags,
            images: car.images.iter().map(ToString::to_string).collect(),
            created_at: car.created_at,
            updated_at: car.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CarEnvelope {
    pub message: String,
    pub car: CarResponse,
}

impl CarEnvelope {
    fn new(message: &str, car: Car) -> Self {
        Self {
            message: message.to_owned(),
            car: car.into(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CarsEnvelope {
    pub message: String,
    pub cars: Vec<CarResponse>,
}

impl From<Vec<Car>> for CarsEnvelope {
    fn from(cars: Vec<Car>) -> Self {
        Self {
            message: RETRIEVED.to_owned(),
            cars: cars.into_iter().map(CarResponse::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Multipart body of `POST /api/cars`, documented for OpenAPI only.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct CarUploadForm {
    title: String,
    description: String,
    /// Repeat the part (or use `tags[]`) or send one comma-delimited value.
    tags: Vec<String>,
    /// One to ten binary image files.
    #[schema(value_type = Vec<String>)]
    images: Vec<Vec<u8>>,
}

/// Partial update body for `PUT /api/cars/{id}`. Absent fields are kept.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCarRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    /// A list, or one comma-delimited string.
    #[schema(value_type = Option<Vec<String>>)]
    pub tags: Option<TagsInput>,
}

impl From<UpdateCarRequest> for CarPatch {
    fn from(value: UpdateCarRequest) -> Self {
        Self {
            title: value.title,
            description: value.description,
            tags: value.tags,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive substring of the title, description or a tag.
    /// Empty or absent matches every listing.
    pub keyword: Option<String>,
}

/// Create a listing owned by the caller.
#[utoipa::path(
    post,
    path = "/api/cars",
    request_body(content = CarUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Listing created", body = CarEnvelope),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["cars"],
    operation_id = "createCar",
    security(("BearerToken" = []))
)]
#[post("/cars")]
pub async fn create_car(
    user: AuthenticatedUser,
    state: web::Data<HttpState>,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    let draft = read_car_form(payload).await?.into_draft()?;
    let car = state.cars.create(user.user_id(), draft).await?;
    Ok(HttpResponse::Created().json(CarEnvelope::new(CREATED, car)))
}

/// List the caller's listings, oldest first.
#[utoipa::path(
    get,
    path = "/api/cars",
    responses(
        (status = 200, description = "Owned listings", body = CarsEnvelope),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["cars"],
    operation_id = "listCars",
    security(("BearerToken" = []))
)]
#[get("/cars")]
pub async fn list_cars(
    user: AuthenticatedUser,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<CarsEnvelope>> {
    let cars = state.cars_query.list_owned(user.user_id()).await?;
    Ok(web::Json(cars.into()))
}

/// Search the caller's listings by keyword.
#[utoipa::path(
    get,
    path = "/api/cars/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching owned listings", body = CarsEnvelope),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["cars"],
    operation_id = "searchCars",
    security(("BearerToken" = []))
)]
#[get("/cars/search")]
pub async fn search_cars(
    user: AuthenticatedUser,
    state: web::Data<HttpState>,
    query: web::Query<SearchQuery>,
) -> ApiResult<web::Json<CarsEnvelope>> {
    let search = CarSearch::new(query.keyword.as_deref());
    let cars = state.cars_query.search(user.user_id(), &search).await?;
    Ok(web::Json(cars.into()))
}

/// Update title, description or tags of an owned listing.
#[utoipa::path(
    put,
    path = "/api/cars/{id}",
    params(("id" = String, Path, description = "Listing identifier")),
    request_body = UpdateCarRequest,
    responses(
        (status = 200, description = "Listing updated", body = CarEnvelope),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Listing belongs to someone else", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["cars"],
    operation_id = "updateCar",
    security(("BearerToken" = []))
)]
#[put("/cars/{id}")]
pub async fn update_car(
    user: AuthenticatedUser,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateCarRequest>,
) -> ApiResult<web::Json<CarEnvelope>> {
    let id = parse_car_id(&path.into_inner())?;
    let patch = CarPatch::from(payload.into_inner());
    let car = state.cars.update(user.user_id(), &id, &patch).await?;
    Ok(web::Json(CarEnvelope::new(UPDATED, car)))
}

/// Delete an owned listing and release its images.
#[utoipa::path(
    delete,
    path = "/api/cars/{id}",
    params(("id" = String, Path, description = "Listing identifier")),
    responses(
        (status = 200, description = "Listing removed", body = MessageResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Listing belongs to someone else", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["cars"],
    operation_id = "deleteCar",
    security(("BearerToken" = []))
)]
#[delete("/cars/{id}")]
pub async fn delete_car(
    user: AuthenticatedUser,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id = parse_car_id(&path.into_inner())?;
    state.cars.delete(user.user_id(), &id).await?;
    Ok(web::Json(MessageResponse {
        message: REMOVED.to_owned(),
    }))
}

#[cfg(test)]
#[path = "cars_tests.rs"]
mod tests;
