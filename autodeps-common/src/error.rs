use std::sync::Arc;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum AutodepsError {
    #[error(
        "found mutually exclusive dependencies:\n\"{first}\" is mutually exclusive with \"{second}\"{}",
        because(.reason)
    )]
    MutualExclusionConflict {
        first: String,
        second: String,
        reason: Option<String>,
    },

    #[error("Host build tool rejected '{notation}' in configuration '{configuration}': {message}")]
    HostRejected {
        configuration: String,
        notation: String,
        message: String,
    },

    #[error("I/O Error: {0}")]
    Io(#[from] Arc<std::io::Error>),

    #[error("TOML Parsing Error: {0}")]
    Toml(#[from] Arc<toml::de::Error>),

    #[error("JSON Error: {0}")]
    Json(#[from] Arc<serde_json::Error>),

    #[error("Manifest Error: {0}")]
    Manifest(String),

    #[error("Configuration Error: {0}")]
    Config(String),
}

fn because(reason: &Option<String>) -> String {
    match reason {
        Some(reason) => format!("\nbecause {reason}"),
        None => String::new(),
    }
}

impl From<std::io::Error> for AutodepsError {
    fn from(err: std::io::Error) -> Self {
        AutodepsError::Io(Arc::new(err))
    }
}

impl From<toml::de::Error> for AutodepsError {
    fn from(err: toml::de::Error) -> Self {
        AutodepsError::Toml(Arc::new(err))
    }
}

impl From<serde_json::Error> for AutodepsError {
    fn from(err: serde_json::Error) -> Self {
        AutodepsError::Json(Arc::new(err))
    }
}

pub type Result<T> = std::result::Result<T, AutodepsError>;

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn conflict_message_includes_reason_line() {
        let err = AutodepsError::MutualExclusionConflict {
            first: "g:x:1".to_string(),
            second: "g:y:2".to_string(),
            reason: Some("they share a package".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "found mutually exclusive dependencies:\n\"g:x:1\" is mutually exclusive with \"g:y:2\"\nbecause they share a package"
        );
    }

    #[test]
    fn conflict_message_without_reason_has_two_lines() {
        let err = AutodepsError::MutualExclusionConflict {
            first: "g:x".to_string(),
            second: "g:y".to_string(),
            reason: None,
        };
        assert_eq!(err.to_string().lines().count(), 2);
    }
}
