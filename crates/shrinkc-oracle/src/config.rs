//! Reducer configuration: constants an ad-hoc reduction script would leave
//! hardcoded, made overridable (mirrors `decy-oracle::config::OracleConfig`).

use serde::{Deserialize, Serialize};

/// The fixed `indent` flag set used to reformat a trial without changing its
/// line count.
pub const DEFAULT_INDENT_FLAGS: &[&str] = &[
    "-bad", "-bap", "-bc", "-cs", "-pcs", "-prs", "-saf", "-sai", "-saw", "-sob", "-ss", "-bl",
];

/// Everything the Oracle Harness needs beyond the oracle script and input
/// file path: the external binaries' names, the backup suffixes, and the
/// debug-dump toggle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReducerConfig {
    /// Name or path of the external pretty-printer binary.
    pub indent_bin: String,

    /// Extra flags appended after [`DEFAULT_INDENT_FLAGS`]; empty by default.
    pub indent_extra_flags: Vec<String>,

    /// Suffix for the last-accepted backup file.
    pub backup_suffix: String,

    /// Suffix for the startup snapshot.
    pub orig_suffix: String,

    /// When `true`, dump `delta_tmp_<trial>.c` on every trial.
    pub debug_tmp: bool,

    /// When `true`, keep `delta_backup_<pass>.c` snapshots after the run
    /// instead of deleting them (CLI `--no-backup-cleanup`).
    pub keep_pass_backups: bool,
}

impl Default for ReducerConfig {
    fn default() -> Self {
        Self {
            indent_bin: "indent".to_string(),
            indent_extra_flags: Vec::new(),
            backup_suffix: ".bak".to_string(),
            orig_suffix: ".orig".to_string(),
            debug_tmp: false,
            keep_pass_backups: false,
        }
    }
}

impl ReducerConfig {
    /// Overlay environment variables onto the defaults.
    ///
    /// Looks for:
    /// - `SHRINKC_INDENT_BIN`: override the `indent` binary name/path.
    /// - `SHRINKC_DEBUG_TMP`: enable `delta_tmp_<trial>.c` dumps (`true`/`false`).
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(bin) = std::env::var("SHRINKC_INDENT_BIN") {
            config.indent_bin = bin;
        }

        if let Ok(debug) = std::env::var("SHRINKC_DEBUG_TMP") {
            config.debug_tmp = debug.to_lowercase() == "true";
        }

        config
    }

    /// Load config from a TOML file, falling back to defaults on any
    /// missing field. Environment variables and explicit CLI flags both
    /// take precedence over this (`defaults < config file < env < flags`).
    pub fn from_file(path: &std::path::Path) -> Result<Self, crate::error::OracleError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| crate::error::OracleError::Io {
                path: path.display().to_string(),
                source,
            })?;
        toml::from_str(&content).map_err(|source| crate::error::OracleError::InvalidConfig {
            path: path.display().to_string(),
            source,
        })
    }

    /// Full `indent` argument list: the fixed set plus any extras.
    pub fn indent_args(&self) -> Vec<String> {
        let mut args: Vec<String> = DEFAULT_INDENT_FLAGS.iter().map(|s| s.to_string()).collect();
        args.extend(self.indent_extra_flags.iter().cloned());
        args
    }
}
