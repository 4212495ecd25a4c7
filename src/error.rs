//! Error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias for forward-zone operations.
pub type Result<T> = std::result::Result<T, ForwardError>;

/// Errors returned by forward-zone operations.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// A configuration source could not be read.
    #[error("cannot read config source {}: {source}", path.display())]
    ConfigParse {
        /// The source that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The control executable could not be invoked at all.
    #[error("cannot invoke control program {}: {source}", program.display())]
    ControlUnavailable {
        /// Path of the control executable.
        program: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The control executable wrote to its error stream.
    #[error("{command} reported an error: {stderr}")]
    ControlReported {
        /// The subcommand that failed (e.g. `list_forwards`).
        command: String,
        /// Everything the command wrote to stderr.
        stderr: String,
    },

    /// Live state still differs from the config after one apply pass.
    #[error("live config drifted from file config: {missing} missing, {unexpected} unexpected")]
    Drift {
        /// Zones in the config that are still absent from the resolver.
        missing: usize,
        /// Zones in the resolver that the config does not declare.
        unexpected: usize,
    },
}

impl ForwardError {
    /// Returns `true` for errors that abort a run.
    ///
    /// [`ForwardError::Drift`] is the only soft failure.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::Drift { .. })
    }
}
