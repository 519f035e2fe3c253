//! Method identifiers, priority ranks, and the [`Method`] capability that
//! the transformation catalogue implements.

use std::any::Any;

use crate::buffer::Buffer;
use crate::error::CoreError;
use crate::trial::TrialRunner;

/// One entry in the Method Registry. Canonical priority ranks:
/// `all_blanks:0 blanks:1 crc:1 move_func:2 del_args:2 brackets:2 ternary:2
/// parens:3 replace_regex:4 shorten_ints:5 indent:15`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MethodId {
    /// Deletes balanced parenthesis runs; second candidate strips the pair only.
    Parens,
    /// Deletes balanced brace runs; second candidate strips the pair only.
    Brackets,
    /// The bulk-reduction regex rule catalogue (unbounded + border-delimited).
    ReplaceRegex,
    /// Collapses a single run of 2+ whitespace bytes to one space.
    Blanks,
    /// One-shot global whitespace normalization plus comma/colon reflow.
    AllBlanks,
    /// Rewrites `a ? b : c` to `b`, then (independently) to `c`.
    Ternary,
    /// Successively shortens an integer literal's digits/prefix/suffix.
    ShortenInts,
    /// Rewrites `transparent_crc(args)` calls to a plain `printf`.
    Crc,
    /// Moves a function definition up to replace its standalone prototype.
    MoveFunc,
    /// Records function names seen at prototypes; coordinated arg-stripping
    /// edit is a documented extension point, not implemented here.
    DelArgs,
    /// Invokes the external pretty-printer and tests its output.
    Indent,
}

impl MethodId {
    /// Canonical ascending sort rank; outer passes run methods in this order.
    pub fn priority(self) -> u32 {
        match self {
            MethodId::AllBlanks => 0,
            MethodId::Blanks | MethodId::Crc => 1,
            MethodId::MoveFunc | MethodId::DelArgs | MethodId::Brackets | MethodId::Ternary => 2,
            MethodId::Parens => 3,
            MethodId::ReplaceRegex => 4,
            MethodId::ShortenInts => 5,
            MethodId::Indent => 15,
        }
    }

    /// The `--<name>` CLI flag / stats-report key for this method.
    pub fn name(self) -> &'static str {
        match self {
            MethodId::Parens => "parens",
            MethodId::Brackets => "brackets",
            MethodId::ReplaceRegex => "replace_regex",
            MethodId::Blanks => "blanks",
            MethodId::AllBlanks => "all_blanks",
            MethodId::Ternary => "ternary",
            MethodId::ShortenInts => "shorten_ints",
            MethodId::Crc => "crc",
            MethodId::MoveFunc => "move_func",
            MethodId::DelArgs => "del_args",
            MethodId::Indent => "indent",
        }
    }

    /// Parse a `--<name>` flag (without the leading dashes) into a `MethodId`.
    pub fn from_flag(flag: &str) -> Option<Self> {
        Self::all().into_iter().find(|m| m.name() == flag)
    }

    /// Every method, in declaration order (not priority order).
    pub fn all() -> [MethodId; 11] {
        [
            MethodId::Parens,
            MethodId::Brackets,
            MethodId::ReplaceRegex,
            MethodId::Blanks,
            MethodId::AllBlanks,
            MethodId::Ternary,
            MethodId::ShortenInts,
            MethodId::Crc,
            MethodId::MoveFunc,
            MethodId::DelArgs,
            MethodId::Indent,
        ]
    }
}

/// Per-method success/failure counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct MethodStats {
    /// Trials accepted.
    pub successes: u64,
    /// Trials rejected.
    pub failures: u64,
}

impl MethodStats {
    /// Record an outcome.
    pub fn record(&mut self, worked: bool) {
        if worked {
            self.successes += 1;
        } else {
            self.failures += 1;
        }
    }
}

/// A single reduction method: given a position, proposes zero or more
/// candidate edits, each immediately tested via `runner`.
pub trait Method: Any {
    /// Stable identifier and priority rank.
    fn id(&self) -> MethodId;

    /// Narrow a `&dyn Method` back to its concrete type, e.g. to read
    /// `ReplaceRegex`'s per-rule counters out of a [`crate::driver::Registry`]
    /// after a run. The default implementation works for every implementor.
    fn as_any(&self) -> &dyn Any {
        self
    }

    /// One-shot methods (`all_blanks`, `indent`) run exactly once per pass
    /// regardless of `pos` and do not participate in the position sweep.
    fn is_one_shot(&self) -> bool {
        false
    }

    /// Attempt an edit at `pos`. May try several candidates internally,
    /// each reverted independently on rejection. Returns whether any
    /// candidate was accepted. Methods that must not be retried at the
    /// same site after success (`move_func`, `del_args`) advance `*pos`
    /// themselves; all others leave `*pos` unchanged on success, relying on
    /// the driver to retry the same position.
    fn try_at(
        &mut self,
        buf: &mut Buffer,
        pos: &mut usize,
        runner: &mut dyn TrialRunner,
        stats: &mut MethodStats,
    ) -> Result<bool, CoreError>;
}
