use serde::Serialize;

/// Crate-wide error type. Every fallible function returns `Result<T, PacingError>`.
/// Serializes as `{ error, kind }` so API layers can pass it through structurally.
#[derive(Debug, thiserror::Error)]
pub enum PacingError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid budget: {0}")]
    InvalidBudget(String),

    #[error("Spend source unavailable: {0}")]
    SpendSource(String),

    #[error("Persistence failure: {0}")]
    Persistence(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0}")]
    Internal(String),
}

impl PacingError {
    /// Stable machine-readable kind, used in serialized errors and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            PacingError::Database(_) => "database",
            PacingError::Pool(_) => "pool",
            PacingError::NotFound(_) => "not_found",
            PacingError::InvalidBudget(_) => "invalid_budget",
            PacingError::SpendSource(_) => "spend_source",
            PacingError::Persistence(_) => "persistence",
            PacingError::Io(_) => "io",
            PacingError::Serde(_) => "serde",
            PacingError::Internal(_) => "internal",
        }
    }

    /// Whether a caller may retry the same call and expect it to succeed.
    /// Spend source outages are transient; bad budgets and unknown ids are not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PacingError::SpendSource(_) | PacingError::Persistence(_) | PacingError::Pool(_)
        )
    }
}

impl Serialize for PacingError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("PacingError", 2)?;
        s.serialize_field("error", &self.to_string())?;
        s.serialize_field("kind", self.kind())?;
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(PacingError::NotFound("c1".into()).kind(), "not_found");
        assert_eq!(PacingError::InvalidBudget("<= 0".into()).kind(), "invalid_budget");
        assert_eq!(PacingError::SpendSource("timeout".into()).kind(), "spend_source");
    }

    #[test]
    fn test_retryable() {
        assert!(PacingError::SpendSource("503".into()).is_retryable());
        assert!(!PacingError::InvalidBudget("zero".into()).is_retryable());
        assert!(!PacingError::NotFound("c1".into()).is_retryable());
    }

    #[test]
    fn test_serializes_with_kind() {
        let json = serde_json::to_value(PacingError::NotFound("c1".into())).unwrap();
        assert_eq!(json["kind"], "not_found");
        assert_eq!(json["error"], "Not found: c1");
    }
}
