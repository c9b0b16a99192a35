#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to fetch data: {0}")]
    FetchError(String),

    #[error("Unparsable page: {0}")]
    ParseError(String),

    #[error("Places search error: {0}")]
    PlacesError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Cache error: {0}")]
    CacheError(String),
}

// Request URLs can carry credentials in their query, so they are dropped.
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::FetchError(err.without_url().to_string())
    }
}

impl From<std::env::VarError> for AppError {
    fn from(err: std::env::VarError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_message_omits_request_url() {
        // Nothing listens on port 1, so the connect fails without leaving the host.
        let err = reqwest::blocking::Client::new()
            .get("http://127.0.0.1:1/search?key=TOPSECRET")
            .send()
            .unwrap_err();

        let message = AppError::from(err).to_string();

        assert!(message.starts_with("Failed to fetch data"));
        assert!(!message.contains("TOPSECRET"), "message: {}", message);
        assert!(!message.contains("127.0.0.1:1/search"), "message: {}", message);
    }
}
