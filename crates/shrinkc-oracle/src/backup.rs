//! Lifecycle of the files a reduction run writes alongside the target:
//! `<cfile>`, `<cfile>.bak`, `<cfile>.orig`, `delta_backup_<pass>.c`,
//! `delta_tmp_<trial>.c`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ReducerConfig;
use crate::error::OracleError;

fn io_err(path: &Path, source: std::io::Error) -> OracleError {
    OracleError::Io { path: path.display().to_string(), source }
}

/// Owns the working file, its `.bak`/`.orig` siblings, and the per-pass and
/// per-trial debug snapshots.
pub struct BackupManager {
    working: PathBuf,
    backup: PathBuf,
    orig: PathBuf,
    debug_tmp: bool,
    keep_pass_backups: bool,
    pass_backups_written: Vec<PathBuf>,
}

impl BackupManager {
    /// Derive `.bak`/`.orig` sibling paths from `working` and the config's
    /// suffixes, then snapshot the input to `.orig` and `.bak` (both start
    /// out equal to the input — the caller's initial sanity check is what
    /// establishes that the oracle accepts the backup).
    pub fn init(working: &Path, config: &ReducerConfig) -> Result<Self, OracleError> {
        let backup = append_suffix(working, &config.backup_suffix);
        let orig = append_suffix(working, &config.orig_suffix);
        let contents = fs::read(working).map_err(|e| io_err(working, e))?;
        fs::write(&orig, &contents).map_err(|e| io_err(&orig, e))?;
        fs::write(&backup, &contents).map_err(|e| io_err(&backup, e))?;
        Ok(Self {
            working: working.to_path_buf(),
            backup,
            orig,
            debug_tmp: config.debug_tmp,
            keep_pass_backups: config.keep_pass_backups,
            pass_backups_written: Vec::new(),
        })
    }

    /// Path to the current trial program.
    pub fn working(&self) -> &Path {
        &self.working
    }

    /// Path to the last-accepted program.
    pub fn backup(&self) -> &Path {
        &self.backup
    }

    /// Path to the startup snapshot.
    pub fn orig(&self) -> &Path {
        &self.orig
    }

    /// Write `bytes` to the working file.
    pub fn write_working(&self, bytes: &[u8]) -> Result<(), OracleError> {
        fs::write(&self.working, bytes).map_err(|e| io_err(&self.working, e))
    }

    /// Read the working file back.
    pub fn read_working(&self) -> Result<Vec<u8>, OracleError> {
        fs::read(&self.working).map_err(|e| io_err(&self.working, e))
    }

    /// On accept: copy the working file over the backup.
    pub fn refresh_backup(&self) -> Result<(), OracleError> {
        fs::copy(&self.working, &self.backup).map_err(|e| io_err(&self.backup, e))?;
        Ok(())
    }

    /// On reject: copy the backup over the working file, returning its new
    /// contents so the caller can reload the in-memory Buffer from it.
    pub fn restore_working_from_backup(&self) -> Result<Vec<u8>, OracleError> {
        fs::copy(&self.backup, &self.working).map_err(|e| io_err(&self.working, e))?;
        self.read_working()
    }

    /// Snapshot the backup to `delta_backup_<pass>.c` at the start of an
    /// outer pass.
    pub fn snapshot_pass(&mut self, pass: u32) -> Result<(), OracleError> {
        let path = sibling_named(&self.working, &format!("delta_backup_{pass}.c"));
        fs::copy(&self.backup, &path).map_err(|e| io_err(&path, e))?;
        self.pass_backups_written.push(path);
        Ok(())
    }

    /// Dump `delta_tmp_<trial>.c`, iff debug dumps are enabled.
    pub fn maybe_dump_trial(&self, trial: u64, bytes: &[u8]) -> Result<(), OracleError> {
        if !self.debug_tmp {
            return Ok(());
        }
        let path = sibling_named(&self.working, &format!("delta_tmp_{trial}.c"));
        fs::write(&path, bytes).map_err(|e| io_err(&path, e))
    }

    /// Remove the per-pass snapshots written during this run, unless the
    /// caller asked to keep them (`--no-backup-cleanup`).
    pub fn cleanup(&self) -> Result<(), OracleError> {
        if self.keep_pass_backups {
            return Ok(());
        }
        for path in &self.pass_backups_written {
            let _ = fs::remove_file(path);
        }
        Ok(())
    }
}

fn append_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut s = path.as_os_str().to_os_string();
    s.push(suffix);
    PathBuf::from(s)
}

fn sibling_named(path: &Path, name: &str) -> PathBuf {
    path.parent().map(|p| p.join(name)).unwrap_or_else(|| PathBuf::from(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_creates_bak_and_orig_with_input_contents() {
        let dir = tempfile::tempdir().unwrap();
        let working = dir.path().join("t.c");
        fs::write(&working, b" int main(){} ").unwrap();

        let mgr = BackupManager::init(&working, &ReducerConfig::default()).unwrap();
        assert_eq!(fs::read(mgr.backup()).unwrap(), b" int main(){} ");
        assert_eq!(fs::read(mgr.orig()).unwrap(), b" int main(){} ");
    }

    #[test]
    fn refresh_then_restore_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let working = dir.path().join("t.c");
        fs::write(&working, b" a ").unwrap();
        let mgr = BackupManager::init(&working, &ReducerConfig::default()).unwrap();

        mgr.write_working(b" b ").unwrap();
        mgr.refresh_backup().unwrap();
        assert_eq!(fs::read(mgr.backup()).unwrap(), b" b ");

        mgr.write_working(b" c ").unwrap();
        let restored = mgr.restore_working_from_backup().unwrap();
        assert_eq!(restored, b" b ");
        assert_eq!(fs::read(&working).unwrap(), b" b ");
    }

    #[test]
    fn pass_snapshot_then_cleanup_removes_it() {
        let dir = tempfile::tempdir().unwrap();
        let working = dir.path().join("t.c");
        fs::write(&working, b" a ").unwrap();
        let mut mgr = BackupManager::init(&working, &ReducerConfig::default()).unwrap();

        mgr.snapshot_pass(1).unwrap();
        let snap = sibling_named(&working, "delta_backup_1.c");
        assert!(snap.exists());
        mgr.cleanup().unwrap();
        assert!(!snap.exists());
    }
}
