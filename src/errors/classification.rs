use super::types::GradewatchError;

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    /// The session status is reset to empty when a poll ends with this error.
    pub clears_status: bool,
    /// Whether the failure belongs to one target only.
    pub target_scoped: bool,
}

impl GradewatchError {
    /// Classify this error for logging and status handling.
    ///
    /// None of these errors are retried: only the pending scan statuses
    /// (`IN_PROGRESS`, `DNS`, ...) lead to another poll.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            // Per-target scan failures
            GradewatchError::MalformedResponse(_) => ErrorClassification {
                error_type: "MalformedResponse",
                clears_status: true,
                target_scoped: true,
            },
            GradewatchError::ScanService(_) => ErrorClassification {
                error_type: "ScanServiceError",
                clears_status: true,
                target_scoped: true,
            },
            GradewatchError::Transport(_) => ErrorClassification {
                error_type: "TransportError",
                clears_status: true,
                target_scoped: true,
            },
            GradewatchError::PollLimit(_) => ErrorClassification {
                error_type: "PollLimitError",
                clears_status: true,
                target_scoped: true,
            },
            GradewatchError::InvalidTarget(_) => ErrorClassification {
                error_type: "InvalidTargetError",
                clears_status: true,
                target_scoped: true,
            },
            GradewatchError::InvalidGrade(_) => ErrorClassification {
                error_type: "InvalidGradeError",
                clears_status: false,
                target_scoped: true,
            },

            // Process-wide failures
            GradewatchError::Config(_) => ErrorClassification {
                error_type: "ConfigError",
                clears_status: false,
                target_scoped: false,
            },
            GradewatchError::SessionNotFound(_) => ErrorClassification {
                error_type: "SessionNotFoundError",
                clears_status: false,
                target_scoped: false,
            },
            GradewatchError::Io(_) => ErrorClassification {
                error_type: "IoError",
                clears_status: false,
                target_scoped: false,
            },
            GradewatchError::Json(_) => ErrorClassification {
                error_type: "JsonError",
                clears_status: false,
                target_scoped: false,
            },
            GradewatchError::Yaml(_) => ErrorClassification {
                error_type: "YamlError",
                clears_status: false,
                target_scoped: false,
            },
            GradewatchError::Internal(_) => ErrorClassification {
                error_type: "InternalError",
                clears_status: true,
                target_scoped: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_response_clears_status() {
        let err = GradewatchError::MalformedResponse("expected value at line 1".into());
        let class = err.classify();
        assert!(class.clears_status);
        assert!(class.target_scoped);
        assert_eq!(class.error_type, "MalformedResponse");
    }

    #[test]
    fn test_scan_service_error_clears_status() {
        let err = GradewatchError::ScanService("Unable to resolve domain name".into());
        let class = err.classify();
        assert!(class.clears_status);
        assert_eq!(class.error_type, "ScanServiceError");
    }

    #[test]
    fn test_transport_error_is_target_scoped() {
        let err = GradewatchError::Transport("connection refused".into());
        assert!(err.classify().target_scoped);
    }

    #[test]
    fn test_config_error_not_target_scoped() {
        let err = GradewatchError::Config("maxAge must be positive".into());
        let class = err.classify();
        assert!(!class.target_scoped);
        assert!(!class.clears_status);
    }

    #[test]
    fn test_invalid_grade_keeps_status() {
        let err = GradewatchError::InvalidGrade("Z?".into());
        assert!(!err.classify().clears_status);
    }

    #[test]
    fn test_display_includes_message() {
        let err = GradewatchError::SessionNotFound(42);
        assert_eq!(err.to_string(), "Session not found: 42");
    }
}
