use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::{
    error::AppError,
    models::employee::Employee,
    repositories::employee::{EmployeeRepository, EmployeeRepositoryTrait},
    state::AppState,
    utils::jwt::{verify_access_token, Claims},
};

pub async fn auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = extract_auth_header(request.headers());
    let (claims, employee) = authenticate_request(auth_header.as_deref(), &state).await?;

    request.extensions_mut().insert(claims);
    request.extensions_mut().insert(employee);
    Ok(next.run(request).await)
}

// Auth + require a role that may decide on requests
pub async fn auth_approver(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = extract_auth_header(request.headers());
    let (claims, employee) = authenticate_request(auth_header.as_deref(), &state).await?;
    if !employee.can_approve() {
        tracing::warn!(
            emp_id = %employee.emp_id,
            role = employee.role.as_str(),
            "approver route refused"
        );
        return Err(AppError::Forbidden(
            "This action requires an approver role".into(),
        ));
    }

    request.extensions_mut().insert(claims);
    request.extensions_mut().insert(employee);
    Ok(next.run(request).await)
}

fn parse_bearer_token(header: &str) -> Option<&str> {
    if let Some(rest) = header.strip_prefix("Bearer ") {
        return Some(rest);
    }
    if let Some(rest) = header.strip_prefix("bearer ") {
        return Some(rest);
    }
    if let Some(space_idx) = header.find(' ') {
        let (scheme, rest) = header.split_at(space_idx);
        if scheme.eq_ignore_ascii_case("bearer") {
            return Some(rest.trim_start());
        }
    }
    None
}

async fn authenticate_request(
    auth_header: Option<&str>,
    state: &AppState,
) -> Result<(Claims, Employee), AppError> {
    let token = auth_header
        .and_then(parse_bearer_token)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Missing bearer token".into()))?;

    let claims = verify_access_token(token, &state.config.jwt_secret)
        .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))?;

    let employee = EmployeeRepository::new()
        .find_by_emp_id(&state.pool, &claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Account no longer exists".into()))?;

    Ok((claims, employee))
}

fn extract_auth_header(headers: &axum::http::HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bearer_token_accepts_any_scheme_case() {
        assert_eq!(parse_bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(parse_bearer_token("bearer abc"), Some("abc"));
        assert_eq!(parse_bearer_token("BEARER   abc"), Some("abc"));
    }

    #[test]
    fn parse_bearer_token_rejects_other_schemes() {
        assert_eq!(parse_bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(parse_bearer_token("token-without-scheme"), None);
    }
}
