use thiserror::Error;

/// Construction-time failures. Nothing inside a simulation step returns
/// an error; guarded illegal actions are reported no-ops instead.
#[derive(Error, Debug)]
pub enum SkirmishError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown unit kind: '{0}'")]
    UnknownUnitKind(String),

    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Scenario parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SkirmishError>;
