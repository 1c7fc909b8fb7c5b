//! Domain error types.
//!
//! These errors describe why a feed row could not become a domain entity.
//! The load transaction never propagates them: it counts and logs the row
//! as skipped and carries on.

use super::InvalidDate;

/// Reasons a feed row is rejected during a load.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// An identifying key (id, service id, trip id...) is missing or empty
    #[error("missing required key: {0}")]
    MissingKey(&'static str),

    /// A calendar date could not be parsed
    #[error(transparent)]
    InvalidDate(#[from] InvalidDate),

    /// Exception type code other than 1 (added) or 2 (removed)
    #[error("invalid exception type: {0}")]
    InvalidExceptionType(u8),

    /// A trip lists the same stop sequence number twice
    #[error("duplicate stop sequence: {0}")]
    DuplicateSequence(u32),
}
