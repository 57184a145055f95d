use axum::{http::StatusCode, Router};
use hrdesk_backend::models::employee::Role;
use serde_json::{json, Value};

mod support;

use support::{
    body_json, create_test_token, integration_guard, json_request, migrated_pool, seed_employee,
    send, test_app,
};

async fn create_training(app: &Router, token: &str, name: &str, weight: i32) -> Value {
    let response = send(
        app,
        json_request(
            "POST",
            "/api/admin/trainings",
            Some(token),
            Some(json!({"name": name, "weight": weight, "duration_days": 3})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

async fn assign(app: &Router, token: &str, training_id: &str, emp_id: &str, finish_by: &str) -> Value {
    let response = send(
        app,
        json_request(
            "POST",
            &format!("/api/admin/trainings/{}/allocations", training_id),
            Some(token),
            Some(json!({"emp_id": emp_id, "finish_by": finish_by})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

#[tokio::test]
async fn own_trainings_are_ordered_by_weight() {
    let _guard = integration_guard().await;
    let pool = migrated_pool().await;
    let hr = seed_employee(&pool, Role::Hr).await;
    let employee = seed_employee(&pool, Role::Employee).await;
    let token = create_test_token(&hr);
    let app = test_app(pool);

    let light = create_training(&app, &token, "Fire safety", 1).await;
    let heavy = create_training(&app, &token, "Leadership", 9).await;
    assign(&app, &token, light["id"].as_str().unwrap(), &employee.emp_id, "2024-12-01").await;
    assign(&app, &token, heavy["id"].as_str().unwrap(), &employee.emp_id, "2024-12-20").await;

    let response = send(
        &app,
        json_request(
            "GET",
            "/api/trainings/allocations/me",
            Some(&create_test_token(&employee)),
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let mine = body_json(response).await;
    let names: Vec<&str> = mine
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|a| a["training_name"].as_str())
        .collect();
    assert_eq!(names, vec!["Leadership", "Fire safety"]);
    assert_eq!(mine[0]["status"], "pending");
}

#[tokio::test]
async fn completion_is_final() {
    let _guard = integration_guard().await;
    let pool = migrated_pool().await;
    let hr = seed_employee(&pool, Role::Hr).await;
    let employee = seed_employee(&pool, Role::Employee).await;
    let token = create_test_token(&hr);
    let app = test_app(pool);

    let training = create_training(&app, &token, "Compliance", 5).await;
    let allocation = assign(
        &app,
        &token,
        training["id"].as_str().unwrap(),
        &employee.emp_id,
        "2025-01-31",
    )
    .await;
    let status_uri = format!(
        "/api/admin/training-allocations/{}/status",
        allocation["id"].as_str().unwrap()
    );

    let response = send(
        &app,
        json_request("PUT", &status_uri, Some(&token), Some(json!({"status": "completed"}))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let completed = body_json(response).await;
    assert_eq!(completed["status"], "completed");
    assert!(completed["completed_at"].is_string());

    let response = send(
        &app,
        json_request("PUT", &status_uri, Some(&token), Some(json!({"status": "pending"}))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn reminder_flag_reaches_the_feed_while_pending() {
    let _guard = integration_guard().await;
    let pool = migrated_pool().await;
    let hr = seed_employee(&pool, Role::Hr).await;
    let employee = seed_employee(&pool, Role::Employee).await;
    let token = create_test_token(&hr);
    let employee_token = create_test_token(&employee);
    let app = test_app(pool);

    let training = create_training(&app, &token, "Security awareness", 4).await;
    let allocation = assign(
        &app,
        &token,
        training["id"].as_str().unwrap(),
        &employee.emp_id,
        "2025-02-28",
    )
    .await;
    let allocation_id = allocation["id"].as_str().unwrap();

    let response = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/admin/training-allocations/{}/reminder", allocation_id),
            Some(&token),
            Some(json!({"reminder": true})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(
        &app,
        json_request("GET", "/api/notifications/me", Some(&employee_token), None),
    )
    .await;
    let feed = body_json(response).await;
    assert_eq!(feed["training_reminders"][0]["training_name"], "Security awareness");
    assert_eq!(feed["training_reminders"][0]["finish_by"], "2025-02-28");

    send(
        &app,
        json_request(
            "PUT",
            &format!("/api/admin/training-allocations/{}/status", allocation_id),
            Some(&token),
            Some(json!({"status": "completed"})),
        ),
    )
    .await;
    let response = send(
        &app,
        json_request("GET", "/api/notifications/me", Some(&employee_token), None),
    )
    .await;
    assert!(body_json(response).await["training_reminders"]
        .as_array()
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn assigning_unknown_training_or_employee_is_not_found() {
    let _guard = integration_guard().await;
    let pool = migrated_pool().await;
    let hr = seed_employee(&pool, Role::Hr).await;
    let token = create_test_token(&hr);
    let app = test_app(pool);

    let response = send(
        &app,
        json_request(
            "POST",
            &format!("/api/admin/trainings/{}/allocations", uuid::Uuid::new_v4()),
            Some(&token),
            Some(json!({"emp_id": hr.emp_id, "finish_by": "2025-01-01"})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let training = create_training(&app, &token, "Onboarding", 2).await;
    let response = send(
        &app,
        json_request(
            "POST",
            &format!(
                "/api/admin/trainings/{}/allocations",
                training["id"].as_str().unwrap()
            ),
            Some(&token),
            Some(json!({"emp_id": "GHOST-2", "finish_by": "2025-01-01"})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
