mod helpers;

use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderValue, StatusCode};
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use helpers::*;
use mydi_backend::router;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

fn server(pool: PgPool) -> TestServer {
    TestServer::new(router(test_state(pool))).expect("test server")
}

/// Server whose pool never connects; only for routes that fail before touching the database
fn offline_server() -> TestServer {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgresql://localhost:1/unreachable")
        .expect("lazy pool");
    server(pool)
}

fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", token)).expect("header value")
}

async fn register(server: &TestServer, username: &str) -> (i32, String) {
    let response = server
        .post("/auth/register")
        .json(&json!({
            "email": format!("{}@example.com", username),
            "password": TEST_PASSWORD,
            "username": username,
            "firstname": "Test",
            "lastname": "User",
            "birthdate": "1997-03-02"
        }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    let id = body["data"]["user"]["id"].as_i64().expect("user id") as i32;
    let token = body["data"]["token"].as_str().expect("token").to_string();
    (id, token)
}

// ============================================================================
// Routes that never reach the database
// ============================================================================

#[tokio::test]
async fn test_root_and_health() {
    let server = offline_server();

    let body: Value = server.get("/").await.json();
    assert_eq!(body, json!({ "hello": "world" }));

    let body: Value = server.get("/health").await.json();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_non_numeric_ids_are_bad_requests() {
    let server = offline_server();

    for path in ["/events/abc", "/products/1x", "/bookings/-", "/users/me/bookings", "/tickets/x/pass"] {
        let response = server.get(path).await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "validation");
    }

    server
        .put("/tickets/abc/used")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_protected_routes_need_a_bearer_token() {
    let server = offline_server();

    let response = server.get("/auth/me").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["message"], "Missing authorization header");

    server
        .get("/auth/me")
        .add_header(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    server
        .post("/auth/logout")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_json_is_a_bad_request() {
    let server = offline_server();

    let response = server
        .post("/bookings")
        .json(&json!({ "event_id": 1 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["success"], false);
}

#[tokio::test]
async fn test_users_lookup_requires_email() {
    offline_server()
        .get("/users")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

// ============================================================================
// Accounts
// ============================================================================

#[sqlx::test]
async fn test_register_login_me_logout(pool: PgPool) {
    let server = server(pool);
    let (user_id, token) = register(&server, "camille").await;
    assert!(token.starts_with("oat_"));

    let me: Value = server
        .get("/auth/me")
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .json();
    assert_eq!(me["data"]["id"], user_id);
    assert!(me["data"].get("password").is_none());

    let response = server
        .post("/auth/login")
        .json(&json!({ "email": "camille@example.com", "password": TEST_PASSWORD }))
        .await;
    response.assert_status_ok();
    let second_token = response.json::<Value>()["data"]["token"]
        .as_str()
        .unwrap()
        .to_string();
    assert_ne!(second_token, token);

    server
        .post("/auth/logout")
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status_ok();

    server
        .get("/auth/me")
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    server
        .get("/auth/me")
        .add_header(AUTHORIZATION, bearer(&second_token))
        .await
        .assert_status_ok();
}

#[sqlx::test]
async fn test_register_and_login_failures(pool: PgPool) {
    let server = server(pool);
    register(&server, "camille").await;

    let duplicate = server
        .post("/auth/register")
        .json(&json!({
            "email": "camille@example.com",
            "password": TEST_PASSWORD,
            "username": "camille2",
            "firstname": "Camille",
            "lastname": "Again",
            "birthdate": "1997-03-02"
        }))
        .await;
    duplicate.assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .post("/auth/login")
        .json(&json!({ "email": "camille@example.com", "password": "wrong password" }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["message"], "Invalid credentials");

    server
        .post("/auth/login")
        .json(&json!({ "email": "nobody@example.com", "password": TEST_PASSWORD }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[sqlx::test]
async fn test_profile_picture_upload(pool: PgPool) {
    let server = server(pool);
    let (user_id, token) = register(&server, "camille").await;

    let png = Part::bytes(vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A])
        .file_name("avatar.PNG")
        .mime_type("image/png");
    let response = server
        .put("/profile/picture")
        .add_header(AUTHORIZATION, bearer(&token))
        .multipart(MultipartForm::new().add_part("image", png))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["data"]["id"], user_id);
    let link = body["data"]["image"]["link"].as_str().unwrap().to_string();
    assert!(link.starts_with("/uploads/") && link.ends_with(".png"));

    // the stored file is served back
    server.get(&link).await.assert_status_ok();

    let gif = Part::bytes(b"GIF89a".to_vec()).file_name("avatar.gif");
    server
        .put("/profile/picture")
        .add_header(AUTHORIZATION, bearer(&token))
        .multipart(MultipartForm::new().add_part("image", gif))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

// ============================================================================
// Catalog
// ============================================================================

#[sqlx::test]
async fn test_event_crud_over_http(pool: PgPool) {
    let server = server(pool);

    let response = server
        .post("/events")
        .json(&json!({
            "startDatetime": "2026-11-20T23:00:00",
            "endDatetime": "2026-11-21T05:00:00",
            "name": "Techno Friday",
            "description": "All night long",
            "artist": "Amelie Lens"
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let created: Value = response.json();
    let id = created["data"]["id"].as_i64().unwrap();
    assert_eq!(created["data"]["max_ticket"], 250);
    assert_eq!(created["data"]["images"], json!([]));

    let listed: Value = server.get("/events").await.json();
    assert_eq!(listed["data"].as_array().unwrap().len(), 4);

    let updated: Value = server
        .put(&format!("/events/{}", id))
        .json(&json!({ "max_ticket": 80 }))
        .await
        .json();
    assert_eq!(updated["data"]["max_ticket"], 80);

    server
        .put(&format!("/events/{}", id))
        .json(&json!({ "endDatetime": "2026-11-20T22:00:00" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    server.delete(&format!("/events/{}", id)).await.assert_status_ok();
    server
        .get(&format!("/events/{}", id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[sqlx::test]
async fn test_products_are_listed_with_images(pool: PgPool) {
    let server = server(pool);

    let body: Value = server.get("/products").await.json();
    let products = body["data"].as_array().unwrap();
    assert_eq!(products.len(), 2);
    assert!(products.iter().all(|p| p["images"].as_array().map_or(false, |i| i.len() == 2)));
    assert_eq!(products[0]["price"], "8.50");

    server
        .post("/products")
        .json(&json!({ "name": "", "description": "", "price": "3.00", "category": "Soft" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

// ============================================================================
// Bookings, tickets, messages
// ============================================================================

#[sqlx::test]
async fn test_booking_flow_over_http(pool: PgPool) {
    let db = TestDatabase::from_pool(pool.clone()).await;
    let fixtures = TestFixtures::create(&db).await;
    let server = server(pool);

    let quote: Value = server
        .post("/booking-quotes")
        .json(&json!({ "parties": [{ "purchases": [{ "product_id": fixtures.mojito.id }] }, {}] }))
        .await
        .json();
    assert_eq!(quote["data"]["total"], "39.00");

    let response = server
        .post("/bookings")
        .json(&json!({
            "user_id": fixtures.host.id,
            "event_id": fixtures.event.id,
            "guest_emails": [fixtures.guest1.email],
            "purchases": [{ "product_id": fixtures.mojito.id }]
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let created: Value = response.json();
    assert_eq!(created["data"]["total"], "39.00");
    assert_eq!(created["data"]["tickets_created"], 2);

    let booking_id = created["data"]["booking"]["id"].as_i64().unwrap();
    let ticket_id = created["data"]["booking"]["tickets"][0]["id"].as_i64().unwrap();

    let view: Value = server
        .get(&format!("/users/{}/bookings/{}/tickets", fixtures.guest1.id, booking_id))
        .await
        .json();
    assert_eq!(view["data"]["is_booking_owner"], false);
    assert_eq!(view["data"]["tickets"].as_array().unwrap().len(), 1);

    let used: Value = server
        .put(&format!("/tickets/{}/used", ticket_id))
        .await
        .json();
    assert_eq!(used["data"]["status"]["name"], "Used");

    let pass: Value = server.get(&format!("/tickets/{}/pass", ticket_id)).await.json();
    assert_eq!(pass["data"]["status"], "Used");
    assert_eq!(pass["data"]["booking_id"], booking_id);

    server
        .post("/bookings")
        .json(&json!({ "user_id": fixtures.host.id, "event_id": fixtures.event.id }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    server
        .post("/bookings")
        .json(&json!({ "user_id": fixtures.guest2.id, "event_id": 99_999 }))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    server
        .delete(&format!("/bookings/{}", booking_id))
        .await
        .assert_status_ok();
    server
        .get(&format!("/tickets/{}", ticket_id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[sqlx::test]
async fn test_messages(pool: PgPool) {
    let db = TestDatabase::from_pool(pool.clone()).await;
    let user = create_test_user(&db, "camille").await;
    let server = server(pool);

    let response = server
        .post("/messages")
        .json(&json!({ "subject": " Table ", "body": " For six on Friday ", "userId": user.id }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let created: Value = response.json();
    assert_eq!(created["data"]["subject"], "Table");
    assert_eq!(created["data"]["user"]["id"], user.id);

    server
        .post("/messages")
        .json(&json!({ "subject": "Hi", "body": "Second", "userId": user.id }))
        .await
        .assert_status(StatusCode::CREATED);

    let listed: Value = server
        .get("/messages")
        .add_query_param("userId", user.id)
        .await
        .json();
    let subjects: Vec<&str> = listed["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["subject"].as_str().unwrap())
        .collect();
    assert_eq!(subjects, vec!["Hi", "Table"]);

    server
        .post("/messages")
        .json(&json!({ "subject": "  ", "body": "x", "userId": user.id }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    server
        .post("/messages")
        .json(&json!({ "subject": "Hi", "body": "x", "userId": 99_999 }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
