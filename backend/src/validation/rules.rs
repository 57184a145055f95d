//! Common validation rules shared across request payloads.

use validator::ValidationError;

/// Upper bound on attachments accepted with a single medical claim.
pub const MAX_CLAIM_ATTACHMENTS: usize = 10;

/// Validates employee number format.
///
/// Requirements:
/// - Only alphanumeric characters, dashes and underscores
/// - 1-32 characters in length
pub fn validate_emp_id(emp_id: &str) -> Result<(), ValidationError> {
    if emp_id.is_empty() || emp_id.len() > 32 {
        return Err(ValidationError::new("emp_id_invalid_length"));
    }

    if !emp_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ValidationError::new("emp_id_invalid_characters"));
    }

    Ok(())
}

/// Attachments are stored as links to an external blob store.
pub fn validate_attachment_url(url: &str) -> Result<(), ValidationError> {
    let url = url.trim();
    let has_scheme = url.starts_with("https://") || url.starts_with("http://");
    if !has_scheme || url.len() > 2048 || url.chars().any(char::is_whitespace) {
        return Err(ValidationError::new("attachment_url_invalid"));
    }
    Ok(())
}

pub fn validate_claim_attachments(urls: &[String]) -> Result<(), ValidationError> {
    if urls.is_empty() {
        return Err(ValidationError::new("attachments_required"));
    }
    if urls.len() > MAX_CLAIM_ATTACHMENTS {
        return Err(ValidationError::new("attachments_too_many"));
    }
    urls.iter()
        .try_for_each(|url| validate_attachment_url(url))
}

/// Money amounts must be finite and strictly positive.
pub fn validate_positive_amount(amount: f64) -> Result<(), ValidationError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ValidationError::new("amount_must_be_positive"));
    }
    Ok(())
}
