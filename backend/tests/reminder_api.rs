use axum::http::StatusCode;
use chrono::Utc;
use hrdesk_backend::models::employee::Role;
use serde_json::json;

mod support;

use support::{
    body_json, create_test_token, integration_guard, json_request, migrated_pool, seed_employee,
    send, test_app,
};

#[tokio::test]
async fn reminders_default_to_today_and_filter_by_subject() {
    let _guard = integration_guard().await;
    let pool = migrated_pool().await;
    let employee = seed_employee(&pool, Role::Employee).await;
    let token = create_test_token(&employee);
    let app = test_app(pool);
    let today = Utc::now().date_naive().to_string();

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/reminders",
            Some(&token),
            Some(json!({"subject": "Quarterly review", "body": "Prepare slides"})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let created = body_json(response).await;
    assert_eq!(created["remind_on"], today);

    send(
        &app,
        json_request(
            "POST",
            "/api/reminders",
            Some(&token),
            Some(json!({"subject": "Dentist", "body": "4pm"})),
        ),
    )
    .await;
    send(
        &app,
        json_request(
            "POST",
            "/api/reminders",
            Some(&token),
            Some(json!({"remind_on": "2030-01-15", "subject": "Renew passport", "body": "-"})),
        ),
    )
    .await;

    let response = send(&app, json_request("GET", "/api/reminders/me", Some(&token), None)).await;
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 2);

    let response = send(
        &app,
        json_request("GET", "/api/reminders/me?subject=review", Some(&token), None),
    )
    .await;
    let filtered = body_json(response).await;
    assert_eq!(filtered.as_array().unwrap().len(), 1);
    assert_eq!(filtered[0]["subject"], "Quarterly review");

    let response = send(
        &app,
        json_request("GET", "/api/reminders/me?date=2030-01-15", Some(&token), None),
    )
    .await;
    let later = body_json(response).await;
    assert_eq!(later[0]["subject"], "Renew passport");
}

#[tokio::test]
async fn blank_subject_is_rejected() {
    let _guard = integration_guard().await;
    let pool = migrated_pool().await;
    let employee = seed_employee(&pool, Role::Employee).await;
    let app = test_app(pool);

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/reminders",
            Some(&create_test_token(&employee)),
            Some(json!({"subject": "", "body": "nothing"})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn feed_total_counts_todays_reminders() {
    let _guard = integration_guard().await;
    let pool = migrated_pool().await;
    let employee = seed_employee(&pool, Role::Employee).await;
    let token = create_test_token(&employee);
    let app = test_app(pool);

    let response = send(
        &app,
        json_request("GET", "/api/notifications/me", Some(&token), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["total"], 0);

    send(
        &app,
        json_request(
            "POST",
            "/api/reminders",
            Some(&token),
            Some(json!({"subject": "Standup", "body": "10:00"})),
        ),
    )
    .await;
    let response = send(
        &app,
        json_request("GET", "/api/notifications/me", Some(&token), None),
    )
    .await;
    let feed = body_json(response).await;
    assert_eq!(feed["total"], 1);
    assert_eq!(feed["reminders"][0]["subject"], "Standup");
}

#[tokio::test]
async fn subject_filter_treats_wildcards_literally() {
    let _guard = integration_guard().await;
    let pool = migrated_pool().await;
    let employee = seed_employee(&pool, Role::Employee).await;
    let token = create_test_token(&employee);
    let app = test_app(pool);

    for subject in ["Hit 100% of targets", "Team lunch"] {
        let response = send(
            &app,
            json_request(
                "POST",
                "/api/reminders",
                Some(&token),
                Some(json!({"remind_on": "2031-05-05", "subject": subject, "body": "-"})),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let subjects = |body: serde_json::Value| -> Vec<String> {
        body.as_array()
            .unwrap()
            .iter()
            .map(|r| r["subject"].as_str().unwrap().to_string())
            .collect()
    };

    let response = send(
        &app,
        json_request(
            "GET",
            "/api/reminders/me?date=2031-05-05&subject=%25",
            Some(&token),
            None,
        ),
    )
    .await;
    assert_eq!(subjects(body_json(response).await), vec!["Hit 100% of targets"]);

    let response = send(
        &app,
        json_request(
            "GET",
            "/api/reminders/me?date=2031-05-05&subject=_",
            Some(&token),
            None,
        ),
    )
    .await;
    assert!(subjects(body_json(response).await).is_empty());

    let response = send(
        &app,
        json_request(
            "GET",
            "/api/reminders/me?date=2031-05-05&subject=LUNCH",
            Some(&token),
            None,
        ),
    )
    .await;
    assert_eq!(subjects(body_json(response).await), vec!["Team lunch"]);
}
