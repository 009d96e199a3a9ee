use std::path::PathBuf;

/// Errors raised while loading policy configuration
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed privacy XML: {0}")]
    Xml(String),

    #[error("Unknown {kind} '{value}' in privacy configuration")]
    UnknownValue { kind: &'static str, value: String },

    #[error("Missing attribute '{attribute}' on <{element}>")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("Privacy configuration contains no devices")]
    EmptyTable,

    #[error("Invalid policy config: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PolicyError>;
