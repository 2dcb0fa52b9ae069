//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: field error (bad dimensions, bad palette definition)
//! - 11: I/O error (PNG write, seed file read or write)
//! - 12: input error (unknown palette, bad JSON, bad color, bad frame counts)
//! - 13: serialization error

use plexus_core::FieldError;
use std::fmt;

/// Errors produced by CLI operations, each mapped to a distinct exit code.
#[derive(Debug)]
pub enum CliError {
    Field(FieldError),
    Io(String),
    Input(String),
    Serialization(String),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Field(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Field(e) => write!(f, "{e}"),
            CliError::Io(msg) | CliError::Input(msg) | CliError::Serialization(msg) => {
                write!(f, "{msg}")
            }
        }
    }
}

impl From<FieldError> for CliError {
    fn from(e: FieldError) -> Self {
        match e {
            FieldError::Io(msg) => CliError::Io(msg),
            FieldError::UnknownPalette(_) | FieldError::InvalidColor(_) => {
                CliError::Input(e.to_string())
            }
            other => CliError::Field(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}
