use thiserror::Error;

/// Errors surfaced to the host pipeline.
///
/// Visual misses are not errors: they come back as an `AnalyzeResult` without
/// a region. What lands here is either a configuration mismatch (fail loudly)
/// or a collaborator that stopped answering.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("unknown {kind}: '{name}'")]
    UnknownTarget { kind: &'static str, name: String },

    #[error("no handler registered as '{0}'")]
    UnknownHandler(String),

    #[error("malformed parameter: {0}")]
    MalformedParam(String),

    #[error("node '{0}' requires an explicit roi")]
    MissingRoi(String),

    #[error("vision backend error: {0}")]
    Backend(String),

    #[error("device error: {0}")]
    Device(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

impl AgentError {
    /// Caller/config mismatches, as opposed to collaborator failures.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownTarget { .. }
                | Self::UnknownHandler(_)
                | Self::MalformedParam(_)
                | Self::MissingRoi(_)
                | Self::Config(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_classified() {
        let unknown = AgentError::UnknownTarget {
            kind: "bounty",
            name: "Nobody".to_string(),
        };
        assert!(unknown.is_config_error());
        assert!(AgentError::MissingRoi("RiftCleared".to_string()).is_config_error());
        assert!(!AgentError::Backend("timeout".to_string()).is_config_error());
        assert!(!AgentError::Device("adb gone".to_string()).is_config_error());
    }

    #[test]
    fn test_unknown_target_message() {
        let err = AgentError::UnknownTarget {
            kind: "bounty",
            name: "Nobody".to_string(),
        };
        assert_eq!(err.to_string(), "unknown bounty: 'Nobody'");
    }
}
