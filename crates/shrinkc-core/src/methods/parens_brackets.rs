//! `parens` and `brackets`: delete a balanced bracket run, or failing that,
//! just the two bracket characters.

use crate::buffer::Buffer;
use crate::error::CoreError;
use crate::method::{Method, MethodId, MethodStats};
use crate::patterns::balanced;
use crate::trial::{attempt, TrialRunner};

/// Which bracket character pair a [`Parens`]/[`Brackets`] instance matches.
#[derive(Debug, Clone, Copy)]
pub struct BracketPair {
    open: u8,
    close: u8,
}

fn try_bracket_pair(
    id: MethodId,
    pair: BracketPair,
    buf: &mut Buffer,
    pos: &mut usize,
    runner: &mut dyn TrialRunner,
    stats: &mut MethodStats,
) -> Result<bool, CoreError> {
    if buf.at(*pos) != Some(pair.open) {
        return Ok(false);
    }
    let Some(close) = balanced(buf.as_bytes(), *pos, pair.open, pair.close) else {
        // Pattern mismatch: unbalanced input, silently skip.
        return Ok(false);
    };

    // First candidate: delete the whole span, brackets included.
    let whole = attempt(buf, runner, id, false, *pos, close + 1, b"")?;
    stats.record(whole);
    if whole {
        return Ok(true);
    }

    // Second candidate: delete only the two bracket characters, as one
    // atomic edit — the span `[pos, close]` is replaced by its own interior
    // (everything strictly between the brackets), so there is exactly one
    // trial and the buffer can never be left with just one bracket removed.
    let inner_start = *pos + 1;
    if inner_start > close {
        return Ok(false);
    }
    let interior = buf.as_bytes()[inner_start..close].to_vec();
    let brackets_only = attempt(buf, runner, id, false, *pos, close + 1, &interior)?;
    stats.record(brackets_only);
    Ok(brackets_only)
}

/// `parens`: deletes a balanced `( … )` run, or just the parens.
pub struct Parens;

impl Method for Parens {
    fn id(&self) -> MethodId {
        MethodId::Parens
    }

    fn try_at(
        &mut self,
        buf: &mut Buffer,
        pos: &mut usize,
        runner: &mut dyn TrialRunner,
        stats: &mut MethodStats,
    ) -> Result<bool, CoreError> {
        try_bracket_pair(
            self.id(),
            BracketPair { open: b'(', close: b')' },
            buf,
            pos,
            runner,
            stats,
        )
    }
}

/// `brackets`: deletes a balanced `{ … }` run, or just the braces.
pub struct Brackets;

impl Method for Brackets {
    fn id(&self) -> MethodId {
        MethodId::Brackets
    }

    fn try_at(
        &mut self,
        buf: &mut Buffer,
        pos: &mut usize,
        runner: &mut dyn TrialRunner,
        stats: &mut MethodStats,
    ) -> Result<bool, CoreError> {
        try_bracket_pair(
            self.id(),
            BracketPair { open: b'{', close: b'}' },
            buf,
            pos,
            runner,
            stats,
        )
    }
}
