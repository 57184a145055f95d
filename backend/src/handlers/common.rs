use std::str::FromStr;

use crate::error::AppError;

/// Parses a typed id taken from the request path.
pub fn parse_id<T: FromStr>(raw: &str, label: &str) -> Result<T, AppError> {
    T::from_str(raw.trim()).map_err(|_| AppError::BadRequest(format!("Invalid {} ID", label)))
}

/// Treats a missing, blank, or `all` filter value as "no filter".
pub fn normalize_filter(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty() && !value.eq_ignore_ascii_case("all"))
}
