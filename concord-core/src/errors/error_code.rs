//! ConcordErrorCode trait for stable, machine-readable error tags.

/// Every error enum implements this to expose a structured error code
/// string alongside its human-readable message.
pub trait ConcordErrorCode {
    /// Returns the error code string (e.g., "CONFIG_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the tagged error string: `[ERROR_CODE] message`.
    fn tagged_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const EMPTY_VOCABULARY: &str = "EMPTY_VOCABULARY";
pub const INVALID_INPUT: &str = "INVALID_INPUT";
pub const NOT_FITTED: &str = "NOT_FITTED";
pub const CANCELLED: &str = "CANCELLED";
pub const AGREEMENT_ERROR: &str = "AGREEMENT_ERROR";
