//! Status vocabularies and their transition tables.
//!
//! Every request table owns its own status enum. Each enum lists the statuses
//! it may move to next; a status with no successors is terminal.

use crate::error::AppError;

pub trait WorkflowStatus: Copy + PartialEq + std::fmt::Debug + Sized + 'static {
    /// Every status of the vocabulary, in lifecycle order.
    const ALL: &'static [Self];

    /// Value stored in the `status` column.
    fn db_value(&self) -> &'static str;

    /// Statuses reachable from `self` in one transition.
    fn allowed_next(&self) -> &'static [Self];

    fn can_transition_to(&self, next: Self) -> bool {
        self.allowed_next().contains(&next)
    }

    fn is_terminal(&self) -> bool {
        self.allowed_next().is_empty()
    }

    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.db_value().eq_ignore_ascii_case(raw))
    }
}

/// Parses a client supplied status, rejecting values outside the vocabulary.
pub fn parse_status<S: WorkflowStatus>(raw: &str) -> Result<S, AppError> {
    S::parse(raw).ok_or_else(|| {
        let allowed: Vec<&str> = S::ALL.iter().map(|s| s.db_value()).collect();
        AppError::BadRequest(format!(
            "Unknown status '{}'; expected one of: {}",
            raw.trim(),
            allowed.join(", ")
        ))
    })
}

/// Rejects transitions missing from the table with a conflict.
pub fn ensure_transition<S: WorkflowStatus>(current: S, next: S) -> Result<(), AppError> {
    if current.can_transition_to(next) {
        Ok(())
    } else {
        Err(AppError::Conflict(format!(
            "Cannot change status from '{}' to '{}'",
            current.db_value(),
            next.db_value()
        )))
    }
}
