use axum::{http::StatusCode, Router};
use chrono::Utc;
use hrdesk_backend::models::employee::{Employee, Role};
use serde_json::{json, Value};

mod support;

use support::{
    body_json, create_test_token, integration_guard, json_request, migrated_pool, seed_employee,
    send, test_app,
};

const DUE_ON: &str = "2099-12-31";

async fn create_resource(app: &Router, token: &str, quantity: i32) -> Value {
    let response = send(
        app,
        json_request(
            "POST",
            "/api/admin/resources",
            Some(token),
            Some(json!({"name": "Laptop", "kind": "hardware", "quantity": quantity})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

async fn allocate(
    app: &Router,
    token: &str,
    resource_id: &str,
    employee: &Employee,
    quantity: i32,
) -> (StatusCode, Value) {
    let response = send(
        app,
        json_request(
            "POST",
            &format!("/api/admin/resources/{}/allocations", resource_id),
            Some(token),
            Some(json!({"emp_id": employee.emp_id, "quantity": quantity, "due_on": DUE_ON})),
        ),
    )
    .await;
    let status = response.status();
    (status, body_json(response).await)
}

async fn available_of(app: &Router, token: &str, resource_id: &str) -> i64 {
    let response = send(app, json_request("GET", "/api/resources", Some(token), None)).await;
    body_json(response)
        .await
        .as_array()
        .expect("array")
        .iter()
        .find(|r| r["id"] == resource_id)
        .and_then(|r| r["available_quantity"].as_i64())
        .expect("resource listed")
}

#[tokio::test]
async fn allocation_reduces_stock_and_rejects_overdraw() {
    let _guard = integration_guard().await;
    let pool = migrated_pool().await;
    let hr = seed_employee(&pool, Role::Hr).await;
    let employee = seed_employee(&pool, Role::Employee).await;
    let token = create_test_token(&hr);
    let app = test_app(pool);

    let resource = create_resource(&app, &token, 3).await;
    let resource_id = resource["id"].as_str().unwrap();
    assert_eq!(resource["available_quantity"], 3);

    let (status, allocation) = allocate(&app, &token, resource_id, &employee, 2).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(allocation["status"], "not_returned");
    assert_eq!(allocation["allocated_by"], hr.emp_id);
    assert_eq!(allocation["due_on"], DUE_ON);
    assert_eq!(available_of(&app, &token, resource_id).await, 1);

    let (status, _) = allocate(&app, &token, resource_id, &employee, 2).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(available_of(&app, &token, resource_id).await, 1);

    let response = send(
        &app,
        json_request(
            "GET",
            "/api/resources/allocations/me",
            Some(&create_test_token(&employee)),
            None,
        ),
    )
    .await;
    let mine = body_json(response).await;
    assert_eq!(mine.as_array().unwrap().len(), 1);
    assert_eq!(mine[0]["resource_name"], "Laptop");
    assert_eq!(mine[0]["due_on"], DUE_ON);
}

#[tokio::test]
async fn concurrent_allocations_of_last_unit_only_one_wins() {
    let _guard = integration_guard().await;
    let pool = migrated_pool().await;
    let hr = seed_employee(&pool, Role::Hr).await;
    let first = seed_employee(&pool, Role::Employee).await;
    let second = seed_employee(&pool, Role::Employee).await;
    let token = create_test_token(&hr);
    let app = test_app(pool);

    let resource = create_resource(&app, &token, 1).await;
    let resource_id = resource["id"].as_str().unwrap();

    let (a, b) = tokio::join!(
        allocate(&app, &token, resource_id, &first, 1),
        allocate(&app, &token, resource_id, &second, 1)
    );
    let mut statuses = vec![a.0, b.0];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::OK, StatusCode::CONFLICT]);
    assert_eq!(available_of(&app, &token, resource_id).await, 0);
}

#[tokio::test]
async fn return_restores_stock_once() {
    let _guard = integration_guard().await;
    let pool = migrated_pool().await;
    let hr = seed_employee(&pool, Role::Hr).await;
    let employee = seed_employee(&pool, Role::Employee).await;
    let token = create_test_token(&hr);
    let app = test_app(pool);

    let resource = create_resource(&app, &token, 4).await;
    let resource_id = resource["id"].as_str().unwrap();
    let (_, allocation) = allocate(&app, &token, resource_id, &employee, 3).await;
    let allocation_id = allocation["id"].as_str().unwrap();
    let return_uri = format!("/api/admin/allocations/{}/return", allocation_id);

    let response = send(&app, json_request("PUT", &return_uri, Some(&token), None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let outcome = body_json(response).await;
    assert_eq!(outcome["previous_available"], 1);
    assert_eq!(outcome["available_quantity"], 4);
    assert_eq!(outcome["allocation"]["status"], "returned");
    assert!(outcome["allocation"]["returned_at"].is_string());

    let response = send(&app, json_request("PUT", &return_uri, Some(&token), None)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(available_of(&app, &token, resource_id).await, 4);
}

#[tokio::test]
async fn total_quantity_cannot_drop_below_outstanding() {
    let _guard = integration_guard().await;
    let pool = migrated_pool().await;
    let hr = seed_employee(&pool, Role::Hr).await;
    let employee = seed_employee(&pool, Role::Employee).await;
    let token = create_test_token(&hr);
    let app = test_app(pool);

    let resource = create_resource(&app, &token, 5).await;
    let resource_id = resource["id"].as_str().unwrap();
    allocate(&app, &token, resource_id, &employee, 3).await;
    let quantity_uri = format!("/api/admin/resources/{}/quantity", resource_id);

    let response = send(
        &app,
        json_request("PUT", &quantity_uri, Some(&token), Some(json!({"total_quantity": 2}))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = send(
        &app,
        json_request("PUT", &quantity_uri, Some(&token), Some(json!({"total_quantity": 10}))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["total_quantity"], 10);
    assert_eq!(updated["available_quantity"], 7);
}

#[tokio::test]
async fn unknown_employee_or_resource_is_not_found() {
    let _guard = integration_guard().await;
    let pool = migrated_pool().await;
    let hr = seed_employee(&pool, Role::Hr).await;
    let token = create_test_token(&hr);
    let app = test_app(pool);

    let resource = create_resource(&app, &token, 2).await;
    let response = send(
        &app,
        json_request(
            "POST",
            &format!("/api/admin/resources/{}/allocations", resource["id"].as_str().unwrap()),
            Some(&token),
            Some(json!({"emp_id": "GHOST-1", "quantity": 1, "due_on": DUE_ON})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(
        &app,
        json_request(
            "POST",
            &format!("/api/admin/resources/{}/allocations", uuid::Uuid::new_v4()),
            Some(&token),
            Some(json!({"emp_id": hr.emp_id, "quantity": 1, "due_on": DUE_ON})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn alert_shows_in_feed_until_returned() {
    let _guard = integration_guard().await;
    let pool = migrated_pool().await;
    let hr = seed_employee(&pool, Role::Hr).await;
    let employee = seed_employee(&pool, Role::Employee).await;
    let token = create_test_token(&hr);
    let employee_token = create_test_token(&employee);
    let app = test_app(pool);

    let resource = create_resource(&app, &token, 2).await;
    let (_, allocation) =
        allocate(&app, &token, resource["id"].as_str().unwrap(), &employee, 1).await;
    let allocation_id = allocation["id"].as_str().unwrap();

    let response = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/admin/allocations/{}/alert", allocation_id),
            Some(&token),
            Some(json!({"alert": true})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["alert"], true);

    let response = send(
        &app,
        json_request("GET", "/api/notifications/me", Some(&employee_token), None),
    )
    .await;
    let feed = body_json(response).await;
    assert_eq!(feed["allocation_alerts"].as_array().unwrap().len(), 1);
    assert_eq!(feed["allocation_alerts"][0]["allocation_id"], allocation_id);
    assert_eq!(feed["allocation_alerts"][0]["due_on"], DUE_ON);

    let response = send(
        &app,
        json_request("GET", "/api/admin/allocations?limit=500", Some(&token), None),
    )
    .await;
    let outstanding = body_json(response).await;
    assert!(outstanding["data"]
        .as_array()
        .unwrap()
        .iter()
        .any(|a| a["id"] == allocation_id && a["employee_name"] == "Test Employee"));

    send(
        &app,
        json_request(
            "PUT",
            &format!("/api/admin/allocations/{}/return", allocation_id),
            Some(&token),
            None,
        ),
    )
    .await;
    let response = send(
        &app,
        json_request("GET", "/api/notifications/me", Some(&employee_token), None),
    )
    .await;
    let feed = body_json(response).await;
    assert!(feed["allocation_alerts"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn due_date_in_the_past_is_rejected() {
    let _guard = integration_guard().await;
    let pool = migrated_pool().await;
    let hr = seed_employee(&pool, Role::Hr).await;
    let employee = seed_employee(&pool, Role::Employee).await;
    let token = create_test_token(&hr);
    let app = test_app(pool);

    let resource = create_resource(&app, &token, 2).await;
    let resource_id = resource["id"].as_str().unwrap();
    let allocations_uri = format!("/api/admin/resources/{}/allocations", resource_id);

    let response = send(
        &app,
        json_request(
            "POST",
            &allocations_uri,
            Some(&token),
            Some(json!({"emp_id": employee.emp_id, "quantity": 1, "due_on": "2000-01-01"})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
    assert_eq!(available_of(&app, &token, resource_id).await, 2);

    let today = Utc::now().date_naive().to_string();
    let response = send(
        &app,
        json_request(
            "POST",
            &allocations_uri,
            Some(&token),
            Some(json!({"emp_id": employee.emp_id, "quantity": 1, "due_on": today})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["due_on"], today);
}

#[tokio::test]
async fn concurrent_returns_restore_stock_exactly_once() {
    let _guard = integration_guard().await;
    let pool = migrated_pool().await;
    let hr = seed_employee(&pool, Role::Hr).await;
    let employee = seed_employee(&pool, Role::Employee).await;
    let token = create_test_token(&hr);
    let app = test_app(pool);

    let resource = create_resource(&app, &token, 5).await;
    let resource_id = resource["id"].as_str().unwrap();
    let (_, allocation) = allocate(&app, &token, resource_id, &employee, 2).await;
    let (_, other) = allocate(&app, &token, resource_id, &employee, 1).await;
    assert_eq!(available_of(&app, &token, resource_id).await, 2);
    let return_uri = format!(
        "/api/admin/allocations/{}/return",
        allocation["id"].as_str().unwrap()
    );

    let (first, second) = tokio::join!(
        send(&app, json_request("PUT", &return_uri, Some(&token), None)),
        send(&app, json_request("PUT", &return_uri, Some(&token), None)),
    );
    let mut statuses = vec![first.status(), second.status()];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::OK, StatusCode::CONFLICT]);
    assert_eq!(available_of(&app, &token, resource_id).await, 4);

    let response = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/admin/allocations/{}/return", other["id"].as_str().unwrap()),
            Some(&token),
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(available_of(&app, &token, resource_id).await, 5);
}
