use thiserror::Error;

#[derive(Error, Debug)]
pub enum WildError {
    #[error("Creature not found: {0}")]
    CreatureNotFound(crate::core::types::CreatureId),

    #[error("World is unavailable")]
    WorldUnavailable,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, WildError>;
