//! Error types for every stage of the request pipeline

use std::path::PathBuf;
use thiserror::Error;

type Source = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A command-line item that matches none of the allowed separators
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ItemError {
    #[error("\"{0}\" is not a valid value")]
    InvalidToken(String),
}

/// Failures while merging items, flags and stdin into a request
#[derive(Error, Debug)]
pub enum AssembleError {
    #[error("Request body (stdin) and request data (key=value) cannot be mixed.")]
    MixedBodySource,

    #[error("could not read request body from stdin: {0}")]
    Stdin(#[source] std::io::Error),

    #[error("could not open {}: {source}", .path.display())]
    Attachment {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures reported by a [`crate::network::Transport`]
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("{message}")]
    Network {
        message: String,
        #[source]
        source: Option<Source>,
    },

    #[error("{message}")]
    Timeout {
        message: String,
        #[source]
        source: Option<Source>,
    },

    #[error("{message}")]
    Tls {
        message: String,
        #[source]
        source: Option<Source>,
    },

    /// The user cancelled the request (Ctrl-C)
    #[error("interrupted")]
    Interrupted,

    #[error("{message}")]
    Other {
        message: String,
        #[source]
        source: Option<Source>,
    },
}

impl TransportError {
    pub fn other(message: impl Into<String>) -> Self {
        TransportError::Other {
            message: message.into(),
            source: None,
        }
    }

    pub fn tls(message: impl Into<String>, source: impl Into<Source>) -> Self {
        TransportError::Tls {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

/// Everything that can end an invocation after argument parsing
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Assemble(#[from] AssembleError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("could not write output: {0}")]
    Output(#[from] std::io::Error),
}

impl AppError {
    /// Every failure after argument parsing exits with status 1
    pub fn exit_code(&self) -> u8 {
        1
    }

    pub fn is_interrupt(&self) -> bool {
        matches!(self, AppError::Transport(TransportError::Interrupted))
    }
}
