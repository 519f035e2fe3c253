//! Error types for the buffer, pattern, and method layers.

use thiserror::Error;

/// Errors raised by [`crate::buffer::Buffer`] and the transformation catalogue.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Failed to read or write a buffer file.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path that failed.
        path: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// A method tagged non-enlarging produced a longer buffer and the trial
    /// was accepted anyway. Indicates a bug in that method.
    #[error("contract violation: method `{method}` grew the buffer from {old_len} to {new_len} bytes without ok_to_enlarge")]
    ContractViolation {
        /// Method that violated its own non-enlarging contract.
        method: &'static str,
        /// Length before the trial.
        old_len: usize,
        /// Length after the trial.
        new_len: usize,
    },

    /// The oracle rejected the last-accepted backup at the start of a pass.
    /// `oracle(backup) = true` must hold always; violating it is fatal.
    #[error("sanity check failed: oracle rejected the last-accepted backup at {path}")]
    SanityCheckFailed {
        /// Backup file path that failed the sanity check.
        path: String,
    },
}
