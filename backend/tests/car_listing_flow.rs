//! End-to-end listing flows through the HTTP stack over in-memory adapters.

mod support;

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use support::{World, bearer, listing_form, send};

#[fixture]
fn world() -> World {
    World::new()
}

fn signup_request(username: &str, email: &str) -> TestRequest {
    TestRequest::post().uri("/api/auth/signup").set_json(json!({
        "name": "John",
        "username": username,
        "email": email,
        "password": "secret12",
    }))
}

fn create_request(token: &str, title: &str, tags: &str, images: usize) -> TestRequest {
    let (header, content_type, body) = listing_form(title, tags, images);
    TestRequest::post()
        .uri("/api/cars")
        .insert_header(bearer(token))
        .insert_header((header, content_type))
        .set_payload(body)
}

fn token_of(payload: &Value) -> String {
    payload["token"]
        .as_str()
        .expect("token in response")
        .to_owned()
}

#[rstest]
#[actix_web::test]
async fn owner_signs_up_lists_searches_and_deletes(world: World) {
    let app = world.service().await;

    let (status, _) = send(&app, signup_request("john12", "john@example.com")).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, payload) = send(
        &app,
        TestRequest::post().uri("/api/auth/login").set_json(json!({
            "email": "John@Example.com",
            "password": "secret12",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = token_of(&payload);

    let (status, payload) = send(&app, create_request(&token, "SUV Deal", "toyota, suv", 2)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(payload["message"], "Car created successfully");
    assert_eq!(payload["car"]["tags"], json!(["toyota", "suv"]));
    assert_eq!(payload["car"]["images"].as_array().map(Vec::len), Some(2));
    assert_eq!(world.stored_files(), 2);
    let car_id = payload["car"]["id"].as_str().expect("car id").to_owned();

    let (status, payload) = send(
        &app,
        TestRequest::get()
            .uri("/api/cars/search?keyword=TOYOTA")
            .insert_header(bearer(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["cars"][0]["id"], car_id);

    let (status, payload) = send(
        &app,
        TestRequest::put()
            .uri(&format!("/api/cars/{car_id}"))
            .insert_header(bearer(&token))
            .set_json(json!({ "title": "SUV Deal (reduced)" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["car"]["title"], "SUV Deal (reduced)");
    assert_eq!(payload["car"]["tags"], json!(["toyota", "suv"]));

    let (status, payload) = send(
        &app,
        TestRequest::delete()
            .uri(&format!("/api/cars/{car_id}"))
            .insert_header(bearer(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["message"], "Car removed successfully");
    assert_eq!(world.stored_files(), 0);

    let (status, payload) = send(
        &app,
        TestRequest::get().uri("/api/cars").insert_header(bearer(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["cars"], json!([]));
}

#[rstest]
#[actix_web::test]
async fn concurrent_signups_with_one_email_admit_exactly_one(world: World) {
    let app = world.service().await;

    let ((first, first_body), (second, second_body)) = futures::join!(
        send(&app, signup_request("john12", "john@example.com")),
        send(&app, signup_request("johnny", "john@example.com")),
    );

    let mut statuses = [first, second];
    statuses.sort_by_key(|status| status.as_u16());
    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::BAD_REQUEST]);
    let rejected = if first == StatusCode::BAD_REQUEST {
        first_body
    } else {
        second_body
    };
    assert_eq!(rejected["code"], "duplicate_email");
}

#[rstest]
#[actix_web::test]
async fn other_users_cannot_see_or_change_a_listing(world: World) {
    let app = world.service().await;
    let (_, owner) = send(&app, signup_request("john12", "john@example.com")).await;
    let (_, intruder) = send(&app, signup_request("mallory", "mallory@example.com")).await;
    let owner_token = token_of(&owner);
    let intruder_token = token_of(&intruder);

    let (_, created) = send(&app, create_request(&owner_token, "SUV Deal", "toyota", 1)).await;
    let car_id = created["car"]["id"].as_str().expect("car id").to_owned();

    let (status, payload) = send(
        &app,
        TestRequest::put()
            .uri(&format!("/api/cars/{car_id}"))
            .insert_header(bearer(&intruder_token))
            .set_json(json!({ "title": "Mine now" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(payload["code"], "forbidden");

    let (status, _) = send(
        &app,
        TestRequest::delete()
            .uri(&format!("/api/cars/{car_id}"))
            .insert_header(bearer(&intruder_token)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(world.cars.count(), 1);
    assert_eq!(world.stored_files(), 1);

    for uri in ["/api/cars", "/api/cars/search?keyword=suv"] {
        let (status, payload) = send(
            &app,
            TestRequest::get()
                .uri(uri)
                .insert_header(bearer(&intruder_token)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["cars"], json!([]), "{uri} leaks another owner's listing");
    }
}

#[rstest]
#[actix_web::test]
async fn listing_without_images_is_rejected(world: World) {
    let app = world.service().await;
    let (_, account) = send(&app, signup_request("john12", "john@example.com")).await;

    let (status, payload) = send(&app, create_request(&token_of(&account), "SUV Deal", "toyota", 0)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payload["code"], "invalid_request");
    assert_eq!(world.cars.count(), 0);
    assert_eq!(world.stored_files(), 0);
}

#[rstest]
#[case(None)]
#[case(Some("Bearer not-a-token"))]
#[case(Some("Basic am9objpzZWNyZXQ="))]
#[actix_web::test]
async fn listing_routes_require_a_valid_token(world: World, #[case] authorization: Option<&str>) {
    let app = world.service().await;
    let mut request = TestRequest::get().uri("/api/cars");
    if let Some(value) = authorization {
        request = request.insert_header(("Authorization", value));
    }

    let (status, payload) = send(&app, request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(payload["code"], "unauthorized");
    assert!(payload["traceId"].is_string());
}

#[rstest]
#[actix_web::test]
async fn login_with_wrong_password_is_unauthorized(world: World) {
    let app = world.service().await;
    send(&app, signup_request("john12", "john@example.com")).await;

    let (status, payload) = send(
        &app,
        TestRequest::post().uri("/api/auth/login").set_json(json!({
            "email": "john@example.com",
            "password": "wrong-password",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(payload["message"], "Invalid credentials");
}

#[rstest]
#[actix_web::test]
async fn malformed_json_body_is_a_traced_error_payload(world: World) {
    let app = world.service().await;

    let (status, payload) = send(
        &app,
        TestRequest::post()
            .uri("/api/auth/signup")
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{\"name\": \"John\","),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payload["code"], "invalid_request");
    assert_eq!(payload["details"]["code"], "malformed_body");
    assert!(payload["traceId"].is_string());
}
