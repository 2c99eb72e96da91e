//! PostgreSQL-backed `CarRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CarPersistenceError, CarRepository};
use crate::domain::{Car, CarId, ImageLocator, UserId};

use super::error_mapping::{DieselFailure, classify_diesel_error, pool_error_message};
use super::models::{CarRow, CarUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::cars;

/// Diesel-backed implementation of the [`CarRepository`] port.
#[derive(Clone)]
pub struct DieselCarRepository {
    pool: DbPool,
}

impl DieselCarRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CarPersistenceError {
    CarPersistenceError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> CarPersistenceError {
    match classify_diesel_error(&error) {
        DieselFailure::Connection(message) => CarPersistenceError::connection(message),
        DieselFailure::Query(message) => CarPersistenceError::query(message),
        DieselFailure::UniqueViolation(_) => CarPersistenceError::query("duplicate listing id"),
    }
}

fn row_to_car(row: CarRow) -> Result<Car, CarPersistenceError> {
    let images = row
        .images
        .iter()
        .map(|raw| ImageLocator::parse(raw))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| CarPersistenceError::query(format!("invalid image in database: {err}")))?;
    Ok(Car {
        id: CarId::from(row.id),
        owner: UserId::from(row.owner_id),
        title: row.title,
        description: row.description,
        tags: row.tags,
        images,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn car_to_row(car: &Car) -> CarRow {
    CarRow {
        id: *car.id.as_uuid(),
        owner_id: *car.owner.as_uuid(),
        title: car.title.clone(),
        description: car.description.clone(),
        tags: car.tags.clone(),
        images: car.images.iter().map(ToString::to_string).collect(),
        created_at: car.created_at,
        updated_at: car.updated_at,
    }
}

fn rows_to_cars(rows: Vec<CarRow>) -> Result<Vec<Car>, CarPersistenceError> {
    rows.into_iter().map(row_to_car).collect()
}

#[async_trait]
impl CarRepository for DieselCarRepository {
    async fn insert(&self, car: &Car) -> Result<(), CarPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(cars::table)
            .values(car_to_row(car))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &CarId) -> Result<Option<Car>, CarPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CarRow> = cars::table
            .find(id.as_uuid())
            .select(CarRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_car).transpose()
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Car>, CarPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CarRow> = cars::table
            .filter(cars::owner_id.eq(owner.as_uuid()))
            .order_by((cars::created_at.asc(), cars::id.asc()))
            .select(CarRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_cars(rows)
    }

    async fn update(&self, car: &Car) -> Result<bool, CarPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = CarUpdate {
            title: &car.title,
            description: car.description.as_deref(),
            tags: &car.tags,
            updated_at: car.updated_at,
        };
        let updated = diesel::update(cars::table.find(car.id.as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: &CarId) -> Result<bool, CarPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(cars::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    fn row(images: Vec<&str>) -> CarRow {
        let now = Utc::now();
        CarRow {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            title: "SUV Deal".to_owned(),
            description: None,
            tags: vec!["toyota".to_owned()],
            images: images.into_iter().map(str::to_owned).collect(),
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    fn row_conversion_preserves_fields() {
        let original = row(vec!["/uploads/a.jpg", "/uploads/b.png"]);
        let car = row_to_car(original.clone()).expect("valid row");
        assert_eq!(car.images.len(), 2);
        assert_eq!(car.owner.as_uuid(), &original.owner_id);
        assert_eq!(car_to_row(&car).images, original.images);
    }

    #[rstest]
    fn unparseable_image_is_reported() {
        let err = row_to_car(row(vec!["../secret"])).expect_err("corrupt row");
        assert!(matches!(err, CarPersistenceError::Query { .. }));
    }

    #[rstest]
    fn not_found_maps_to_query_error() {
        let err = map_diesel_error(diesel::result::Error::NotFound);
        assert!(err.to_string().contains("record not found"));
    }
}
