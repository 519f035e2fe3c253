//! `indent`: one-shot invocation of the external pretty-printer, with
//! enlargement allowed.

use crate::buffer::Buffer;
use crate::error::CoreError;
use crate::method::{Method, MethodId, MethodStats};
use crate::trial::TrialRunner;

/// The external pretty-printer collaborator. `shrinkc` is the only thing
/// in this workspace allowed to shell out; `shrinkc-core` only knows this
/// trait, implemented by `shrinkc-oracle::IndentRunner`.
pub trait Pretty {
    /// Run the pretty-printer over `buf` and return its reformatted output.
    /// Implementations invoke the external binary with a fixed option set
    /// (`-bad -bap -bc -cs -pcs -prs -saf -sai -saw -sob -ss -bl`).
    fn format(&mut self, buf: &Buffer) -> Result<Buffer, CoreError>;
}

/// `indent`.
pub struct Indent<P: Pretty> {
    pretty: P,
}

impl<P: Pretty> Indent<P> {
    /// Wrap a pretty-printer collaborator.
    pub fn new(pretty: P) -> Self {
        Self { pretty }
    }
}

impl<P: Pretty + 'static> Method for Indent<P> {
    fn id(&self) -> MethodId {
        MethodId::Indent
    }

    fn is_one_shot(&self) -> bool {
        true
    }

    fn try_at(
        &mut self,
        buf: &mut Buffer,
        _pos: &mut usize,
        runner: &mut dyn TrialRunner,
        stats: &mut MethodStats,
    ) -> Result<bool, CoreError> {
        let formatted = self.pretty.format(buf)?;
        if formatted.as_bytes() == buf.as_bytes() {
            return Ok(false);
        }
        let snapshot = buf.clone();
        *buf = formatted;
        match runner.try_commit(buf, self.id(), true)? {
            true => {
                stats.record(true);
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
