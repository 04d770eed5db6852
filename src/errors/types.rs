use thiserror::Error;

#[derive(Debug, Error)]
pub enum GradewatchError {
    #[error("Malformed scan response: {0}")]
    MalformedResponse(String),

    #[error("Scan service error: {0}")]
    ScanService(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid grade: {0}")]
    InvalidGrade(String),

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Poll limit reached: {0}")]
    PollLimit(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Session not found: {0}")]
    SessionNotFound(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
