//! Oracle harness error types.

use thiserror::Error;

/// Errors raised by the Oracle Harness and its collaborators.
#[derive(Debug, Error)]
pub enum OracleError {
    /// Failed to read or write one of the harness's managed files.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path that failed.
        path: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The oracle script is missing, not a regular file, or not executable.
    #[error("oracle script `{path}` is missing or not executable")]
    OracleNotExecutable {
        /// Path given on the command line.
        path: String,
    },

    /// Failed to spawn the oracle script or the `indent` binary.
    #[error("failed to invoke `{program}`: {source}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// Propagated from the pure engine: a contract violation or a failed
    /// sanity check.
    #[error(transparent)]
    Core(#[from] shrinkc_core::CoreError),

    /// `--config <path>` pointed at a file that failed to parse as TOML.
    #[error("invalid configuration at {path}: {source}")]
    InvalidConfig {
        /// Path to the offending config file.
        path: String,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },
}
