//! User endpoint tests against PostgreSQL (skipped without TEST_DATABASE_URL).

mod common;

use axum::http::{Method, StatusCode};
use fake::faker::name::en::Name;
use fake::Fake;
use serde_json::json;

use common::{create_test_app, empty_request, json_request, send, test_pool, unique_test_email};

#[tokio::test]
async fn test_user_crud() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let app = create_test_app(pool);

    let name: String = Name().fake();
    let email = unique_test_email();
    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/users",
            json!({ "name": name, "email": email.to_uppercase() }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "User created successfully");
    assert_eq!(body["data"]["email"], email);
    let user_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, empty_request(Method::GET, &format!("/api/users/{user_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], name);

    let (status, body) = send(&app, empty_request(Method::GET, "/api/users")).await;
    assert_eq!(status, StatusCode::OK);
    let listed = body["data"].as_array().unwrap();
    assert_eq!(body["count"], listed.len());
    assert!(listed.iter().any(|u| u["id"] == user_id.as_str()));

    let new_email = unique_test_email();
    let (status, body) = send(
        &app,
        json_request(
            Method::PUT,
            &format!("/api/users/{user_id}"),
            json!({ "name": "Renamed", "email": new_email }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Renamed");
    assert_eq!(body["data"]["email"], new_email);

    let (status, body) = send(&app, empty_request(Method::DELETE, &format!("/api/users/{user_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User deleted successfully");

    let (status, body) = send(&app, empty_request(Method::GET, &format!("/api/users/{user_id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");
}

#[tokio::test]
async fn test_duplicate_email_conflict() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let app = create_test_app(pool);
    let email = unique_test_email();

    let request = || {
        json_request(
            Method::POST,
            "/api/users",
            json!({ "name": "Twin", "email": email }),
        )
    };

    let (status, _) = send(&app, request()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, request()).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Email already in use");
}

#[tokio::test]
async fn test_delete_unknown_user() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let app = create_test_app(pool);

    let uri = format!("/api/users/{}", uuid::Uuid::new_v4());
    let (status, body) = send(&app, empty_request(Method::DELETE, &uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");
}
