//! Listing domain service.
//!
//! Implements [`CarsCommand`] and [`CarsQuery`] over the car repository and
//! the image store. Every mutation goes through [`CarService::authorize`]
//! after the lookup; reads are filtered to the caller's listings in the
//! repository query itself.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::join_all;
use mockable::Clock;
use tracing::{error, warn};

use crate::domain::ports::{
    CarPersistenceError, CarRepository, CarsCommand, CarsQuery, ImageStore, ImageStoreError,
};
use crate::domain::{
    Car, CarDraft, CarId, CarPatch, CarSearch, CarValidationError, Error, ImageLocator, UserId,
};

/// Listing service implementing the listing driving ports.
#[derive(Clone)]
pub struct CarService<R, S> {
    cars: Arc<R>,
    images: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<R, S> CarService<R, S> {
    /// Create a new service with the given collaborators.
    pub fn new(cars: Arc<R>, images: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            cars,
            images,
            clock,
        }
    }

    /// Capability check shared by update and delete.
    pub fn authorize(car: &Car, caller: &UserId) -> Result<(), Error> {
        if car.is_owned_by(caller) {
            Ok(())
        } else {
            Err(Error::forbidden("Not authorized"))
        }
    }
}

impl<R, S> CarService<R, S>
where
    R: CarRepository,
    S: ImageStore,
{
    fn map_car_error(err: CarPersistenceError) -> Error {
        error!(error = %err, "car repository failure");
        Error::internal(format!("car repository error: {err}"))
    }

    fn map_image_error(err: ImageStoreError) -> Error {
        error!(error = %err, "image store failure");
        Error::internal(format!("image store error: {err}"))
    }

    fn map_validation_error(err: &CarValidationError) -> Error {
        Error::invalid_request(err.to_string())
    }

    async fn load_authorized(&self, caller: &UserId, id: &CarId) -> Result<Car, Error> {
        let car = self
            .cars
            .find_by_id(id)
            .await
            .map_err(Self::map_car_error)?
            .ok_or_else(|| Error::not_found("Car not found"))?;
        Self::authorize(&car, caller)?;
        Ok(car)
    }

    /// Release every locator concurrently. Failures are logged and dropped.
    pub async fn release_images(&self, locators: &[ImageLocator]) {
        let releases = locators.iter().map(|locator| async move {
            if let Err(err) = self.images.release(locator).await {
                warn!(error = %err, locator = %locator, "failed to release image");
            }
        });
        join_all(releases).await;
    }
}

#[async_trait]
impl<R, S> CarsCommand for CarService<R, S>
where
    R: CarRepository,
    S: ImageStore,
{
    async fn create(&self, caller: &UserId, draft: CarDraft) -> Result<Car, Error> {
        let mut locators = Vec::with_capacity(draft.images().len());
        for upload in draft.images() {
            let locator = self
                .images
                .store(upload)
                .await
                .map_err(Self::map_image_error)?;
            locators.push(locator);
        }

        let car = draft.into_car(caller.clone(), locators, self.clock.utc());
        if let Err(err) = self.cars.insert(&car).await {
            self.release_images(&car.images).await;
            return Err(Self::map_car_error(err));
        }
        Ok(car)
    }

    async fn update(&self, caller: &UserId, id: &CarId, patch: &CarPatch) -> Result<Car, Error> {
        let mut car = self.load_authorized(caller, id).await?;
        let patch = patch
            .validate()
            .map_err(|err| Self::map_validation_error(&err))?;
        car.apply(patch, self.clock.utc());

        let updated = self
            .cars
            .update(&car)
            .await
            .map_err(Self::map_car_error)?;
        if !updated {
            return Err(Error::not_found("Car not found"));
        }
        Ok(car)
    }

    async fn delete(&self, caller: &UserId, id: &CarId) -> Result<(), Error> {
        let car = self.load_authorized(caller, id).await?;
        self.release_images(&car.images).await;
        let deleted = self
            .cars
            .delete(id)
            .await
            .map_err(Self::map_car_error)?;
        if !deleted {
            return Err(Error::not_found("Car not found"));
        }
        Ok(())
    }
}

#[async_trait]
impl<R, S> CarsQuery for CarService<R, S>
where
    R: CarRepository,
    S: ImageStore,
{
    async fn list_owned(&self, caller: &UserId) -> Result<Vec<Car>, Error> {
        self.cars
            .list_by_owner(caller)
            .await
            .map_err(Self::map_car_error)
    }

    async fn search(&self, caller: &UserId, search: &CarSearch) -> Result<Vec<Car>, Error> {
        let owned = self.list_owned(caller).await?;
        Ok(owned.into_iter().filter(|car| search.matches(car)).collect())
    }
}

#[cfg(test)]
#[path = "car_service_tests.rs"]
mod tests;
