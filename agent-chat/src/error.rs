use std::fmt;

use thiserror::Error;

/// How the user ended an interactive session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InterruptKind {
    /// Ctrl-C while the session was running.
    CtrlC,
    /// Input stream closed (Ctrl-D or a closed pipe).
    Eof,
}

impl fmt::Display for InterruptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterruptKind::CtrlC => write!(f, "keyboard interrupt"),
            InterruptKind::Eof => write!(f, "end of input"),
        }
    }
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct ConfigError {
    message: String,
}

impl ConfigError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct ProviderError {
    message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("{0}")]
    MissingDependency(String),
    #[error("session interrupted: {0}")]
    Interrupted(InterruptKind),
    #[error("invalid conversation id '{0}': expected a single path component")]
    InvalidConversationId(String),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),
    #[error("conversation storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: std::io::Error,
    },
    #[error("terminal i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChatError {
    pub fn storage(message: impl Into<String>, source: std::io::Error) -> Self {
        ChatError::Storage {
            message: message.into(),
            source,
        }
    }
}
