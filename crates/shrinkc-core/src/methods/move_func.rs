//! `move_func`: moves a function definition up to replace its standalone
//! prototype, deleting the definition's original slot.
//!
//! The prototype must start exactly at `pos` (anchored, like every other
//! method in the catalogue); the matching definition is then searched for
//! anywhere at or after `pos` — only the prototype's start position is
//! pinned to the sweep cursor.

use crate::buffer::Buffer;
use crate::error::CoreError;
use crate::method::{Method, MethodId, MethodStats};
use crate::patterns::{match_func, match_proto};
use crate::trial::TrialRunner;

/// `move_func`.
pub struct MoveFunc;

impl Method for MoveFunc {
    fn id(&self) -> MethodId {
        MethodId::MoveFunc
    }

    fn try_at(
        &mut self,
        buf: &mut Buffer,
        pos: &mut usize,
        runner: &mut dyn TrialRunner,
        stats: &mut MethodStats,
    ) -> Result<bool, CoreError> {
        let Some((name, proto_end)) = match_proto(buf.as_bytes(), *pos, None) else {
            return Ok(false);
        };

        let mut search = *pos;
        let found = loop {
            if search >= buf.len() {
                break None;
            }
            if let Some((_, func_end)) = match_func(buf.as_bytes(), search, Some(&name)) {
                break Some((search, func_end));
            }
            search += 1;
        };
        let Some((func_start, func_end)) = found else {
            return Ok(false);
        };
        if func_start < proto_end {
            // Overlaps the prototype we just matched; not a sane pair, skip.
            return Ok(false);
        }

        let func_text = buf.slice(func_start, func_end).to_vec();
        let snapshot = buf.clone();

        // Apply the later edit first so the earlier offset stays valid.
        buf.splice(func_start, func_end, b"");
        buf.splice(*pos, proto_end, &func_text);

        match runner.try_commit(buf, self.id(), false)? {
            true => {
                stats.record(true);
                *pos += func_text.len();
                Ok(true)
            }
            false => {
                *buf = snapshot;
                stats.record(false);
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AcceptAll;
    impl TrialRunner for AcceptAll {
        fn try_commit(&mut self, _c: &Buffer, _m: MethodId, _o: bool) -> Result<bool, CoreError> {
            Ok(true)
        }
        fn sanity_check(&mut self) -> Result<(), CoreError> {
            Ok(())
        }
    }

    #[test]
    fn move_func_replaces_prototype_with_definition() {
        let mut buf =
            Buffer::from_bytes(b" int foo(int x); bar(); int foo(int x) { return x; } ".to_vec());
        let mut pos = 1usize;
        let mut stats = MethodStats::default();
        let worked = MoveFunc
            .try_at(&mut buf, &mut pos, &mut AcceptAll, &mut stats)
            .unwrap();
        assert!(worked);
        let text = buf.to_string_lossy();
        assert!(text.contains("int foo(int x) { return x; } bar();"));
        assert_eq!(text.matches("foo").count(), 1);
    }

    #[test]
    fn move_func_no_match_without_definition() {
        let mut buf = Buffer::from_bytes(b" int foo(int x); bar(); ".to_vec());
        let mut pos = 1usize;
        let mut stats = MethodStats::default();
        let worked = MoveFunc
            .try_at(&mut buf, &mut pos, &mut AcceptAll, &mut stats)
            .unwrap();
        assert!(!worked);
    }
}
