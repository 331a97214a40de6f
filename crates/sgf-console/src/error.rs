//! Error types for the operator console.

use thiserror::Error;

/// Errors that can occur when parsing an operator command line.
///
/// These are reported to the operator; none of them stop the controller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConsoleError {
    /// The first word is not a known verb.
    #[error("unknown or unsupported command: {0}")]
    UnknownVerb(String),

    /// A verb was given without an argument it needs.
    #[error("usage: {usage}")]
    MissingArgument {
        /// Usage line for the verb.
        usage: &'static str,
    },
}

/// Result type alias for console operations.
pub type ConsoleResult<T> = Result<T, ConsoleError>;
