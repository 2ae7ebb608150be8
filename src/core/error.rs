use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Config parse error: {0}")]
    ConfigError(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Board index out of range: {0}")]
    BadBoardIndex(usize),
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// A recoverable fault in an in-world script. Never propagated across the
/// simulation boundary: the interpreter logs it and pauses the offending
/// thing, and the tick continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("Missing argument for #{0}")]
    MissingArgument(String),

    #[error("Bad direction expression: {0:?}")]
    BadDirection(String),

    #[error("Unknown entity kind: {0:?}")]
    UnknownKind(String),

    #[error("Unknown counter: {0:?}")]
    UnknownCounter(String),

    #[error("Bad numeric argument: {0:?}")]
    BadNumber(String),
}
