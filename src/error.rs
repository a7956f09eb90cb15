use thiserror::Error;

#[derive(Error, Debug)]
pub enum SummarizerError {
    /// Caller handed the entry point something that violates its contract.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("annotation service error: {0}")]
    Annotation(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, SummarizerError>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn invalid_input_display() {
        let err = SummarizerError::InvalidInput("max_hops must be >= 1".to_string());
        assert!(err.to_string().contains("invalid input"));
        assert!(err.to_string().contains("max_hops"));
    }

    #[test]
    fn json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: SummarizerError = json_err.into();
        assert!(matches!(err, SummarizerError::Json(_)));
    }
}
