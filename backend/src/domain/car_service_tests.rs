//! Tests for the listing service.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{MockCarRepository, MockImageStore};
use crate::domain::{ErrorCode, ImageUpload, TagsInput};
use crate::test_support::MutableClock;

type Service = CarService<MockCarRepository, MockImageStore>;

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0)
        .single()
        .expect("timestamp")
}

fn make_service(cars: MockCarRepository, images: MockImageStore) -> Service {
    CarService::new(
        Arc::new(cars),
        Arc::new(images),
        Arc::new(MutableClock::new(epoch())),
    )
}

fn draft(image_count: usize) -> CarDraft {
    let uploads = (0..image_count)
        .map(|i| ImageUpload::new(Some(format!("{i}.jpg")), vec![0xFF, 0xD8]))
        .collect();
    CarDraft::try_new(
        "SUV Deal",
        "Family car",
        &TagsInput::Delimited("toyota,suv".into()),
        uploads,
    )
    .expect("valid draft")
}

fn locator(name: &str) -> ImageLocator {
    ImageLocator::for_file_name(name).expect("locator")
}

fn counting_store(counter: Arc<AtomicUsize>) -> MockImageStore {
    let mut images = MockImageStore::new();
    images.expect_store().returning(move |_| {
        let n = counter.fetch_add(1, Ordering::SeqCst);
        Ok(locator(&format!("stored-{n}.jpg")))
    });
    images
}

#[fixture]
fn owner() -> UserId {
    UserId::random()
}

fn owned_car(owner: &UserId, title: &str, tags: &[&str]) -> Car {
    Car {
        id: CarId::random(),
        owner: owner.clone(),
        title: title.to_owned(),
        description: Some("desc".to_owned()),
        tags: tags.iter().map(|t| (*t).to_owned()).collect(),
        images: vec![locator("a.jpg"), locator("b.jpg")],
        created_at: epoch(),
        updated_at: epoch(),
    }
}

#[rstest]
#[tokio::test]
async fn create_stores_each_image_and_persists_owner(owner: UserId) {
    let stored = Arc::new(AtomicUsize::new(0));
    let images = counting_store(Arc::clone(&stored));
    let mut cars = MockCarRepository::new();
    let expected_owner = owner.clone();
    cars.expect_insert()
        .withf(move |car| car.owner == expected_owner && car.images.len() == 2)
        .times(1)
        .return_once(|_| Ok(()));

    let service = make_service(cars, images);
    let car = service.create(&owner, draft(2)).await.expect("create succeeds");

    assert_eq!(stored.load(Ordering::SeqCst), 2);
    assert_eq!(car.owner, owner);
    assert_eq!(car.tags, vec!["toyota", "suv"]);
    assert_eq!(car.created_at, epoch());
    assert_eq!(car.images.first().map(ToString::to_string).as_deref(), Some("/uploads/stored-0.jpg"));
}

#[rstest]
#[tokio::test]
async fn create_single_image_yields_single_locator(owner: UserId) {
    let images = counting_store(Arc::new(AtomicUsize::new(0)));
    let mut cars = MockCarRepository::new();
    cars.expect_insert().return_once(|_| Ok(()));

    let service = make_service(cars, images);
    let car = service.create(&owner, draft(1)).await.expect("create succeeds");
    assert_eq!(car.images.len(), 1);
}

#[rstest]
#[tokio::test]
async fn create_releases_stored_images_when_insert_fails(owner: UserId) {
    let mut images = counting_store(Arc::new(AtomicUsize::new(0)));
    images.expect_release().times(3).returning(|_| Ok(()));
    let mut cars = MockCarRepository::new();
    cars.expect_insert()
        .return_once(|_| Err(CarPersistenceError::connection("down")));

    let service = make_service(cars, images);
    let err = service.create(&owner, draft(3)).await.expect_err("insert fails");
    assert_eq!(err.code(), ErrorCode::InternalError);
}

#[rstest]
#[tokio::test]
async fn create_stops_on_store_failure_without_inserting(owner: UserId) {
    let mut images = MockImageStore::new();
    images
        .expect_store()
        .return_once(|_| Err(ImageStoreError::write("disk full")));
    let mut cars = MockCarRepository::new();
    cars.expect_insert().never();

    let service = make_service(cars, images);
    let err = service.create(&owner, draft(2)).await.expect_err("store fails");
    assert_eq!(err.code(), ErrorCode::InternalError);
}

#[rstest]
#[tokio::test]
async fn update_rejects_other_owner(owner: UserId) {
    let car = owned_car(&owner, "Sedan", &["honda"]);
    let id = car.id;
    let mut cars = MockCarRepository::new();
    cars.expect_find_by_id().return_once(move |_| Ok(Some(car)));
    cars.expect_update().never();

    let service = make_service(cars, MockImageStore::new());
    let patch = CarPatch {
        title: Some("Mine now".into()),
        ..CarPatch::default()
    };
    let err = service
        .update(&UserId::random(), &id, &patch)
        .await
        .expect_err("forbidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn update_reports_missing_listing(owner: UserId) {
    let mut cars = MockCarRepository::new();
    cars.expect_find_by_id().return_once(|_| Ok(None));

    let service = make_service(cars, MockImageStore::new());
    let err = service
        .update(&owner, &CarId::random(), &CarPatch::default())
        .await
        .expect_err("not found");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn update_applies_present_fields_and_keeps_images(owner: UserId) {
    let car = owned_car(&owner, "Sedan", &["honda"]);
    let id = car.id;
    let images_before = car.images.clone();
    let mut cars = MockCarRepository::new();
    cars.expect_find_by_id().return_once(move |_| Ok(Some(car)));
    cars.expect_update()
        .withf(|car| car.title == "Sedan" && car.tags == ["civic", "used"])
        .return_once(|_| Ok(true));

    let service = make_service(cars, MockImageStore::new());
    let patch = CarPatch {
        tags: Some(TagsInput::List(vec!["civic".into(), " used ".into()])),
        ..CarPatch::default()
    };
    let updated = service.update(&owner, &id, &patch).await.expect("update succeeds");
    assert_eq!(updated.images, images_before);
    assert_eq!(updated.description.as_deref(), Some("desc"));
}

#[rstest]
#[tokio::test]
async fn update_rejects_cleared_title(owner: UserId) {
    let car = owned_car(&owner, "Sedan", &["honda"]);
    let id = car.id;
    let mut cars = MockCarRepository::new();
    cars.expect_find_by_id().return_once(move |_| Ok(Some(car)));
    cars.expect_update().never();

    let service = make_service(cars, MockImageStore::new());
    let patch = CarPatch {
        title: Some("  ".into()),
        ..CarPatch::default()
    };
    let err = service.update(&owner, &id, &patch).await.expect_err("invalid");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn delete_succeeds_even_when_every_release_fails(owner: UserId) {
    let car = owned_car(&owner, "Sedan", &["honda"]);
    let id = car.id;
    let mut images = MockImageStore::new();
    images
        .expect_release()
        .times(2)
        .returning(|l| Err(ImageStoreError::release(l.to_string(), "gone")));
    let mut cars = MockCarRepository::new();
    cars.expect_find_by_id().return_once(move |_| Ok(Some(car)));
    cars.expect_delete().times(1).return_once(|_| Ok(true));

    let service = make_service(cars, images);
    service.delete(&owner, &id).await.expect("delete succeeds");
}

#[rstest]
#[tokio::test]
async fn delete_rejects_other_owner_without_releasing(owner: UserId) {
    let car = owned_car(&owner, "Sedan", &["honda"]);
    let id = car.id;
    let mut images = MockImageStore::new();
    images.expect_release().never();
    let mut cars = MockCarRepository::new();
    cars.expect_find_by_id().return_once(move |_| Ok(Some(car)));
    cars.expect_delete().never();

    let service = make_service(cars, images);
    let err = service
        .delete(&UserId::random(), &id)
        .await
        .expect_err("forbidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[case(None, 3)]
#[case(Some(""), 3)]
#[case(Some("TOYOTA"), 2)]
#[case(Some("civic"), 1)]
#[case(Some("tesla"), 0)]
#[case(Some("  "), 0)]
#[tokio::test]
async fn search_filters_owned_listings(
    owner: UserId,
    #[case] keyword: Option<&str>,
    #[case] expected: usize,
) {
    let listings = vec![
        owned_car(&owner, "Toyota Corolla", &["sedan"]),
        owned_car(&owner, "SUV Deal", &["toyota", "suv"]),
        owned_car(&owner, "Honda", &["civic"]),
    ];
    let mut cars = MockCarRepository::new();
    cars.expect_list_by_owner()
        .return_once(move |_| Ok(listings));

    let service = make_service(cars, MockImageStore::new());
    let found = service
        .search(&owner, &CarSearch::new(keyword))
        .await
        .expect("search succeeds");
    assert_eq!(found.len(), expected);
}

#[rstest]
#[tokio::test]
async fn list_maps_repository_failures_to_internal(owner: UserId) {
    let mut cars = MockCarRepository::new();
    cars.expect_list_by_owner()
        .return_once(|_| Err(CarPersistenceError::query("syntax")));

    let service = make_service(cars, MockImageStore::new());
    let err = service.list_owned(&owner).await.expect_err("fails");
    assert_eq!(err.code(), ErrorCode::InternalError);
}
