//! `del_args`: records prototype names seen so far and advances `pos` past
//! them. The coordinated edit — actually stripping an argument from the
//! declaration, definition, and every call site in lockstep — is a
//! documented extension point, not implemented here.

use std::collections::HashSet;

use crate::buffer::Buffer;
use crate::error::CoreError;
use crate::method::{Method, MethodId, MethodStats};
use crate::patterns::match_proto;
use crate::trial::TrialRunner;

/// `del_args`.
#[derive(Default)]
pub struct DelArgs {
    seen: HashSet<String>,
}

impl DelArgs {
    /// A fresh instance with no function names recorded yet.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Method for DelArgs {
    fn id(&self) -> MethodId {
        MethodId::DelArgs
    }

    fn try_at(
        &mut self,
        buf: &mut Buffer,
        pos: &mut usize,
        _runner: &mut dyn TrialRunner,
        _stats: &mut MethodStats,
    ) -> Result<bool, CoreError> {
        let Some((name, proto_end)) = match_proto(buf.as_bytes(), *pos, None) else {
            return Ok(false);
        };
        if self.seen.contains(&name) {
            return Ok(false);
        }
        self.seen.insert(name);
        // TODO(del_args): strip the last parameter from this prototype, its
        // matching definition, and every call site in one coordinated edit,
        // then test as a single trial. No trial is attempted yet, so no
        // stats are recorded; only the position-advance and once-per-
        // function discipline are implemented.
        *pos = proto_end;
        Ok(true)
    }
}
