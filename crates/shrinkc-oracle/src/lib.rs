//! Oracle Harness: trial cache, backup/working/orig file lifecycle, and the
//! external oracle/`indent` subprocess boundary. Implements the
//! [`shrinkc_core::TrialRunner`] and [`shrinkc_core::methods::Pretty`]
//! traits so `shrinkc-core` never touches the filesystem or a process
//! itself.

pub mod backup;
pub mod config;
pub mod error;
pub mod harness;
pub mod indent_runner;
pub mod report;

pub use backup::BackupManager;
pub use config::ReducerConfig;
pub use error::OracleError;
pub use harness::OracleHarness;
pub use indent_runner::IndentRunner;
pub use report::Report;
