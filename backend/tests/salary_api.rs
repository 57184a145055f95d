use axum::http::StatusCode;
use hrdesk_backend::models::employee::Role;
use serde_json::json;

mod support;

use support::{
    body_json, create_test_token, integration_guard, json_request, migrated_pool, seed_employee,
    send, test_app,
};

#[tokio::test]
async fn payslip_round_trips_with_totals() {
    let _guard = integration_guard().await;
    let pool = migrated_pool().await;
    let employee = seed_employee(&pool, Role::Employee).await;
    let hr = seed_employee(&pool, Role::Hr).await;
    let hr_token = create_test_token(&hr);
    let app = test_app(pool);

    let response = send(
        &app,
        json_request(
            "POST",
            &format!("/api/admin/salaries/{}", employee.emp_id),
            Some(&hr_token),
            Some(json!({
                "pay_date": "2024-05-31",
                "total_days_worked": 22,
                "total_hours_worked": 176.5,
                "earnings": {"basic": 3000.0, "overtime": 150.25},
                "deductions": {"tax": 450.1}
            })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let created = body_json(response).await;
    assert_eq!(created["total_earnings"], 3150.25);
    assert_eq!(created["total_deductions"], 450.1);
    assert_eq!(created["net_pay"], 2700.15);

    let response = send(
        &app,
        json_request(
            "GET",
            "/api/salaries/me",
            Some(&create_test_token(&employee)),
            None,
        ),
    )
    .await;
    let slips = body_json(response).await;
    assert_eq!(slips.as_array().unwrap().len(), 1);
    assert_eq!(slips[0]["pay_date"], "2024-05-31");
    assert_eq!(slips[0]["total_days_worked"], 22);
    assert_eq!(slips[0]["earnings"]["overtime"], 150.25);
    assert_eq!(slips[0]["deductions"]["tax"], 450.1);
}

#[tokio::test]
async fn adjustments_touch_only_the_latest_payslip() {
    let _guard = integration_guard().await;
    let pool = migrated_pool().await;
    let employee = seed_employee(&pool, Role::Employee).await;
    let hr = seed_employee(&pool, Role::Hr).await;
    let hr_token = create_test_token(&hr);
    let app = test_app(pool);
    let base = format!("/api/admin/salaries/{}", employee.emp_id);

    for pay_date in ["2024-04-30", "2024-05-31"] {
        send(
            &app,
            json_request(
                "POST",
                &base,
                Some(&hr_token),
                Some(json!({"pay_date": pay_date, "earnings": {"basic": 2000.0}})),
            ),
        )
        .await;
    }

    let response = send(
        &app,
        json_request(
            "PUT",
            &format!("{}/earnings", base),
            Some(&hr_token),
            Some(json!({"bonus": 500.0})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["pay_date"], "2024-05-31");
    assert_eq!(updated["earnings"]["bonus"], 500.0);
    assert_eq!(updated["earnings"]["basic"], 2000.0);
    assert_eq!(updated["total_earnings"], 2500.0);

    let response = send(
        &app,
        json_request(
            "PUT",
            &format!("{}/deductions", base),
            Some(&hr_token),
            Some(json!({"loan": 100.0, "leave": 40.0})),
        ),
    )
    .await;
    let updated = body_json(response).await;
    assert_eq!(updated["net_pay"], 2360.0);

    let response = send(&app, json_request("GET", &base, Some(&hr_token), None)).await;
    let slips = body_json(response).await;
    assert_eq!(slips[1]["pay_date"], "2024-04-30");
    assert!(slips[1]["earnings"].get("bonus").is_none());
}

#[tokio::test]
async fn adjustments_need_an_existing_payslip_and_amounts() {
    let _guard = integration_guard().await;
    let pool = migrated_pool().await;
    let employee = seed_employee(&pool, Role::Employee).await;
    let hr = seed_employee(&pool, Role::Hr).await;
    let hr_token = create_test_token(&hr);
    let app = test_app(pool);
    let earnings_uri = format!("/api/admin/salaries/{}/earnings", employee.emp_id);

    let response = send(
        &app,
        json_request("PUT", &earnings_uri, Some(&hr_token), Some(json!({"bonus": 10.0}))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(
        &app,
        json_request("PUT", &earnings_uri, Some(&hr_token), Some(json!({}))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/admin/salaries/GHOST-3",
            Some(&hr_token),
            Some(json!({"pay_date": "2024-05-31"})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
