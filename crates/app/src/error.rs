use std::sync::Arc;

use thiserror::Error;

use crate::client::FetchError;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Engine(#[from] engine::EngineError),
    #[error("export error: {0}")]
    Export(#[from] engine::ExportError),
    #[error("aggregation failed: {0}")]
    Fetch(Arc<FetchError>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_failures_surface_through_export() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "blocked");
        let err = AppError::from(engine::ExportError::from(io));
        assert!(matches!(err, AppError::Export(engine::ExportError::Io(_))));
        assert_eq!(err.to_string(), "export error: io error: blocked");
    }
}
