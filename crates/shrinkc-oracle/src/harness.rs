//! The Oracle Harness: trial cache, backup/working file management, and
//! synchronous invocation of the external oracle script.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use shrinkc_core::{Buffer, CoreError, MethodId, TrialRunner};

use crate::backup::BackupManager;
use crate::error::OracleError;

fn to_core(err: OracleError) -> CoreError {
    match err {
        OracleError::Core(e) => e,
        other => CoreError::Io {
            path: "<oracle harness>".to_string(),
            source: std::io::Error::other(other.to_string()),
        },
    }
}

/// Implements [`TrialRunner`] by shelling out to the user's oracle script
/// and managing the `.bak`/`.orig`/debug-dump files around it.
pub struct OracleHarness {
    oracle_script: PathBuf,
    backups: BackupManager,
    cache: HashMap<Vec<u8>, bool>,
    old_length: usize,
    cache_hits: u64,
    trial_counter: u64,
    pass_counter: u32,
    original_length: usize,
}

impl OracleHarness {
    /// Build a harness around `oracle_script` and an already-initialized
    /// [`BackupManager`]. `old_length` starts at the working file's current
    /// (sentinel-padded) length.
    pub fn new(
        oracle_script: PathBuf,
        backups: BackupManager,
        starting_length: usize,
    ) -> Result<Self, OracleError> {
        check_executable(&oracle_script)?;
        Ok(Self {
            oracle_script,
            backups,
            cache: HashMap::new(),
            old_length: starting_length,
            cache_hits: 0,
            trial_counter: 0,
            pass_counter: 0,
            original_length: starting_length,
        })
    }

    /// Number of trials short-circuited by the Trial Cache.
    pub fn cache_hits(&self) -> u64 {
        self.cache_hits
    }

    /// Length of the last-accepted program, in bytes (sentinels included).
    pub fn current_length(&self) -> usize {
        self.old_length
    }

    /// Percent reduction relative to the input's starting length.
    pub fn percent_reduction(&self) -> f64 {
        if self.original_length == 0 {
            return 0.0;
        }
        let saved = self.original_length.saturating_sub(self.old_length);
        100.0 * saved as f64 / self.original_length as f64
    }

    /// Snapshot `delta_backup_<pass>.c` and bump the pass counter; call
    /// once at the start of every outer pass, before [`sanity_check`].
    ///
    /// [`sanity_check`]: TrialRunner::sanity_check
    pub fn begin_pass(&mut self) -> Result<u32, OracleError> {
        self.pass_counter += 1;
        self.backups.snapshot_pass(self.pass_counter)?;
        Ok(self.pass_counter)
    }

    /// Remove per-pass debug snapshots (unless configured to keep them).
    pub fn cleanup(&self) -> Result<(), OracleError> {
        self.backups.cleanup()
    }

    fn run_oracle(&self) -> Result<bool, OracleError> {
        let status = Command::new(&self.oracle_script)
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .map_err(|source| OracleError::Spawn {
                program: self.oracle_script.display().to_string(),
                source,
            })?;
        Ok(status.success())
    }
}

impl TrialRunner for OracleHarness {
    fn try_commit(
        &mut self,
        candidate: &Buffer,
        method: MethodId,
        ok_to_enlarge: bool,
    ) -> Result<bool, CoreError> {
        let key = candidate.as_bytes().to_vec();

        // Cache hits of either verdict are treated as reject: a repeated
        // rejection needs no re-testing, and a repeated *success* yields no
        // progress, so reverting keeps the driver moving.
        if self.cache.contains_key(&key) {
            self.cache_hits += 1;
            self.backups.restore_working_from_backup().map_err(to_core)?;
            tracing::debug!(method = method.name(), "trial cache hit, rejecting");
            return Ok(false);
        }

        self.trial_counter += 1;
        self.backups.write_working(&key).map_err(to_core)?;
        self.backups.maybe_dump_trial(self.trial_counter, &key).map_err(to_core)?;

        let interesting = self.run_oracle().map_err(to_core)?;
        self.cache.insert(key, interesting);

        if !interesting {
            self.backups.restore_working_from_backup().map_err(to_core)?;
            tracing::debug!(method = method.name(), "trial rejected by oracle");
            return Ok(false);
        }

        self.backups.refresh_backup().map_err(to_core)?;
        let new_len = candidate.len();
        if new_len > self.old_length && !ok_to_enlarge {
            return Err(CoreError::ContractViolation {
                method: method.name(),
                old_len: self.old_length,
                new_len,
            });
        }
        if new_len < self.old_length {
            self.cache.clear();
        }
        self.old_length = new_len;
        tracing::info!(
            pass = self.pass_counter,
            method = method.name(),
            old_len = self.old_length,
            new_len,
            pct_reduction = self.percent_reduction(),
            "accepted"
        );
        Ok(true)
    }

    fn sanity_check(&mut self) -> Result<(), CoreError> {
        self.backups.restore_working_from_backup().map_err(to_core)?;
        if self.run_oracle().map_err(to_core)? {
            Ok(())
        } else {
            Err(CoreError::SanityCheckFailed {
                path: self.backups.backup().display().to_string(),
            })
        }
    }
}

fn check_executable(path: &Path) -> Result<(), OracleError> {
    let meta = std::fs::metadata(path).map_err(|_| OracleError::OracleNotExecutable {
        path: path.display().to_string(),
    })?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if meta.permissions().mode() & 0o111 == 0 {
            return Err(OracleError::OracleNotExecutable {
                path: path.display().to_string(),
            });
        }
    }
    #[cfg(not(unix))]
    {
        let _ = meta;
    }
    Ok(())
}
