//! The boundary between the pure transformation catalogue and whatever
//! drives the external oracle. `shrinkc-core` never touches the filesystem
//! or spawns processes itself; it only knows [`TrialRunner`], which
//! `shrinkc-oracle::OracleHarness` implements.

use crate::buffer::Buffer;
use crate::error::CoreError;
use crate::method::MethodId;

/// Given a candidate buffer state, decide whether it stays ("accept") or is
/// reverted ("reject"). Implementations own the trial cache, the backup
/// file, and the oracle subprocess invocation.
pub trait TrialRunner {
    /// Test `candidate` for a given method. `ok_to_enlarge` is the method's
    /// declared contract: if the candidate is longer than the previously
    /// committed length and this is `false`, a runner that accepts it must
    /// return [`CoreError::ContractViolation`] instead of `Ok(true)`.
    ///
    /// Returns `Ok(true)` to accept (commit the candidate), `Ok(false)` to
    /// reject (the caller restores its pre-trial snapshot).
    fn try_commit(
        &mut self,
        candidate: &Buffer,
        method: MethodId,
        ok_to_enlarge: bool,
    ) -> Result<bool, CoreError>;

    /// Run at the start of every per-method pass: re-test the last accepted
    /// state. A failure here is fatal.
    fn sanity_check(&mut self) -> Result<(), CoreError>;
}

/// Try one candidate edit: splice `[start, end)` to `replacement`, ask
/// `runner` whether the result is still interesting, and on rejection
/// restore `buf` to its pre-trial contents.
///
/// This is the one place that implements "a rejected trial leaves the
/// Buffer byte-identical to its pre-trial state".
pub fn attempt(
    buf: &mut Buffer,
    runner: &mut dyn TrialRunner,
    method: MethodId,
    ok_to_enlarge: bool,
    start: usize,
    end: usize,
    replacement: &[u8],
) -> Result<bool, CoreError> {
    let snapshot = buf.clone();
    buf.splice(start, end, replacement);
    match runner.try_commit(buf, method, ok_to_enlarge)? {
        true => Ok(true),
        false => {
            *buf = snapshot;
            Ok(false)
        }
    }
}

/// Compares the stripped-of-whitespace forms of two byte spans. An edit
/// whose old and new text are whitespace-equivalent reduces nothing and
/// must be silently skipped before it is ever offered.
pub fn whitespace_equivalent(a: &[u8], b: &[u8]) -> bool {
    fn strip(bytes: &[u8]) -> Vec<u8> {
        bytes.iter().copied().filter(|b| !b.is_ascii_whitespace()).collect()
    }
    strip(a) == strip(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysAccept;
    impl TrialRunner for AlwaysAccept {
        fn try_commit(&mut self, _c: &Buffer, _m: MethodId, _o: bool) -> Result<bool, CoreError> {
            Ok(true)
        }
        fn sanity_check(&mut self) -> Result<(), CoreError> {
            Ok(())
        }
    }

    struct AlwaysReject;
    impl TrialRunner for AlwaysReject {
        fn try_commit(&mut self, _c: &Buffer, _m: MethodId, _o: bool) -> Result<bool, CoreError> {
            Ok(false)
        }
        fn sanity_check(&mut self) -> Result<(), CoreError> {
            Ok(())
        }
    }

    #[test]
    fn rejected_trial_restores_buffer() {
        let mut buf = Buffer::from_bytes(b" a + b ".to_vec());
        let before = buf.clone();
        let worked = attempt(&mut buf, &mut AlwaysReject, MethodId::Parens, false, 1, 6, b"c").unwrap();
        assert!(!worked);
        assert_eq!(buf, before);
    }

    #[test]
    fn accepted_trial_keeps_edit() {
        let mut buf = Buffer::from_bytes(b" a + b ".to_vec());
        let worked = attempt(&mut buf, &mut AlwaysAccept, MethodId::Parens, false, 1, 6, b"c").unwrap();
        assert!(worked);
        assert_eq!(buf.to_string_lossy(), " c ");
    }

    #[test]
    fn whitespace_only_change_is_equivalent() {
        assert!(whitespace_equivalent(b"a  b", b"a b"));
        assert!(!whitespace_equivalent(b"a b", b"ab "));
    }
}
