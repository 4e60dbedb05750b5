//! Error taxonomy for the extension pipeline.
//!
//! Every failure carries a stable diagnostic code so bundler integrations can
//! report it without matching on message text.

use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// DIAGNOSTIC CODES
// ═══════════════════════════════════════════════════════════════════════════════

pub const ERR_INPUT_SHAPE: &str = "EXT001";
pub const ERR_DEPTH_EXCEEDED: &str = "EXT002";
pub const ERR_MISSING_BASE_FILE: &str = "EXT003";
pub const ERR_INVALID_LINK: &str = "EXT004";
pub const ERR_SCRIPT_SYNTAX: &str = "EXT005";
pub const ERR_INVALID_OPTIONS: &str = "EXT006";
pub const ERR_IO: &str = "IO";

#[derive(Debug, Error)]
pub enum ExtendError {
    /// More than one script/style tag on a single source line.
    #[error(
        "The parser can't handle multiple script/style tags on the same line\n- file: {file}\n- line: {line}\n- code: {code}"
    )]
    InputShape {
        file: String,
        line: usize,
        code: String,
    },

    #[error("The file '{file}' can't extend from another file, the max depth limit is set to {max_depth}")]
    DepthExceeded { file: String, max_depth: usize },

    #[error("Unable to load '{from}' from '{file}'")]
    MissingBaseFile { from: String, file: String },

    #[error("You can't add more than one base component to '{file}'")]
    InvalidLink { file: String },

    #[error("Unable to parse the {fragment} script: {message}")]
    ScriptSyntax {
        fragment: &'static str,
        message: String,
    },

    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// Loader failures are passed through untouched.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ExtendError {
    pub fn code(&self) -> &'static str {
        match self {
            ExtendError::InputShape { .. } => ERR_INPUT_SHAPE,
            ExtendError::DepthExceeded { .. } => ERR_DEPTH_EXCEEDED,
            ExtendError::MissingBaseFile { .. } => ERR_MISSING_BASE_FILE,
            ExtendError::InvalidLink { .. } => ERR_INVALID_LINK,
            ExtendError::ScriptSyntax { .. } => ERR_SCRIPT_SYNTAX,
            ExtendError::InvalidOptions(_) => ERR_INVALID_OPTIONS,
            ExtendError::Io(_) => ERR_IO,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtendError>;
