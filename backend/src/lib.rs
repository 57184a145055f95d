pub mod config;
pub mod db;
pub mod docs;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod services;
pub mod state;
pub mod types;
pub mod utils;
pub mod validation;

use axum::{
    http::{
        header::{HeaderName, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::Config, state::AppState};

/// Builds the full HTTP surface. Serve it with
/// `into_make_service_with_connect_info::<SocketAddr>()` so the login limiter
/// can key on the peer address.
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let login_routes = Router::new()
        .route("/api/auth/login", post(handlers::auth::login))
        .layer(middleware::create_login_rate_limiter(&state.config)?);

    let public_routes = Router::new().route("/api/health", get(handlers::health::health));

    let employee_routes = Router::new()
        .route("/api/auth/me", get(handlers::auth::me))
        .route(
            "/api/employees/me/reports",
            get(handlers::employees::my_reports),
        )
        .route("/api/leaves", post(handlers::leaves::create_leave))
        .route("/api/leaves/me", get(handlers::leaves::my_leaves))
        .route(
            "/api/leaves/me/analysis",
            get(handlers::leaves::my_leave_analysis),
        )
        .route(
            "/api/leaves/{id}",
            axum::routing::delete(handlers::leaves::delete_leave),
        )
        .route("/api/resources", get(handlers::resources::list_resources))
        .route(
            "/api/resources/allocations/me",
            get(handlers::resources::my_allocations),
        )
        .route("/api/trainings", get(handlers::trainings::list_trainings))
        .route(
            "/api/trainings/allocations/me",
            get(handlers::trainings::my_training_allocations),
        )
        .route(
            "/api/financial-requests",
            post(handlers::financial_requests::create_financial_request),
        )
        .route(
            "/api/financial-requests/me",
            get(handlers::financial_requests::my_financial_requests),
        )
        .route(
            "/api/financial-requests/{id}",
            put(handlers::financial_requests::update_financial_request),
        )
        .route(
            "/api/medical-claims",
            post(handlers::medical_claims::create_medical_claim),
        )
        .route(
            "/api/medical-claims/me",
            get(handlers::medical_claims::my_medical_claims),
        )
        .route(
            "/api/medical-claims/me/summary",
            get(handlers::medical_claims::my_claim_summary),
        )
        .route("/api/salaries/me", get(handlers::salaries::my_salaries))
        .route("/api/reminders", post(handlers::reminders::create_reminder))
        .route("/api/reminders/me", get(handlers::reminders::my_reminders))
        .route(
            "/api/notifications/me",
            get(handlers::reminders::my_notifications),
        )
        .route("/api/attendance/punch", post(handlers::attendance::punch))
        .route(
            "/api/attendance/me",
            get(handlers::attendance::my_attendance),
        )
        .route(
            "/api/attendance/me/today",
            get(handlers::attendance::my_attendance_today),
        )
        .route(
            "/api/attendance/me/analysis",
            get(handlers::attendance::my_attendance_analysis),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth,
        ));

    let approver_routes = Router::new()
        .route(
            "/api/admin/employees",
            get(handlers::admin::list_employees).post(handlers::admin::create_employee),
        )
        .route("/api/admin/leaves", get(handlers::admin::list_leaves))
        .route(
            "/api/admin/leaves/{id}/status",
            put(handlers::admin::update_leave_status),
        )
        .route(
            "/api/admin/resources",
            post(handlers::admin::create_resource),
        )
        .route(
            "/api/admin/resources/{id}/quantity",
            put(handlers::admin::update_resource_quantity),
        )
        .route(
            "/api/admin/resources/{id}/allocations",
            post(handlers::admin::allocate_resource),
        )
        .route(
            "/api/admin/allocations",
            get(handlers::admin::list_allocations),
        )
        .route(
            "/api/admin/allocations/{id}/return",
            put(handlers::admin::return_allocation),
        )
        .route(
            "/api/admin/allocations/{id}/alert",
            put(handlers::admin::set_allocation_alert),
        )
        .route(
            "/api/admin/trainings",
            post(handlers::admin::create_training),
        )
        .route(
            "/api/admin/trainings/{id}/allocations",
            post(handlers::admin::allocate_training),
        )
        .route(
            "/api/admin/training-allocations",
            get(handlers::admin::list_training_allocations),
        )
        .route(
            "/api/admin/training-allocations/{id}/status",
            put(handlers::admin::update_training_status),
        )
        .route(
            "/api/admin/training-allocations/{id}/reminder",
            put(handlers::admin::set_training_reminder),
        )
        .route(
            "/api/admin/financial-requests",
            get(handlers::admin::list_financial_requests),
        )
        .route(
            "/api/admin/financial-requests/{id}/status",
            put(handlers::admin::update_financial_request_status),
        )
        .route(
            "/api/admin/medical-claims",
            get(handlers::admin::list_pending_claims),
        )
        .route(
            "/api/admin/medical-claims/limit",
            put(handlers::admin::set_claim_limit),
        )
        .route(
            "/api/admin/medical-claims/summary",
            get(handlers::admin::claim_overview),
        )
        .route(
            "/api/admin/medical-claims/{id}/status",
            put(handlers::admin::update_claim_status),
        )
        .route(
            "/api/admin/salaries/{emp_id}",
            get(handlers::admin::employee_salaries).post(handlers::admin::create_salary),
        )
        .route(
            "/api/admin/salaries/{emp_id}/earnings",
            put(handlers::admin::update_earnings),
        )
        .route(
            "/api/admin/salaries/{emp_id}/deductions",
            put(handlers::admin::update_deductions),
        )
        .route(
            "/api/admin/attendance/{emp_id}",
            get(handlers::admin::employee_attendance),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth_approver,
        ));

    let cors = cors_layer(&state.config)?;

    Ok(Router::new()
        .merge(login_routes)
        .merge(public_routes)
        .merge(employee_routes)
        .merge(approver_routes)
        .merge(SwaggerUi::new("/api/docs").url("/api-doc/openapi.json", docs::ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn(middleware::request_id))
                .layer(axum_middleware::from_fn(middleware::log_error_responses))
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state))
}

fn cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
        .max_age(Duration::from_secs(24 * 60 * 60));

    if config.cors_allows_any_origin() {
        return Ok(layer.allow_origin(Any));
    }

    let origins = config
        .cors_allow_origins
        .iter()
        .map(|origin| HeaderValue::from_str(origin))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(layer.allow_origin(AllowOrigin::list(origins)))
}
