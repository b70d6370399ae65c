//! Shared error classification.

/// Grepable code and retry hint for every error surfaced by this crate.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}
