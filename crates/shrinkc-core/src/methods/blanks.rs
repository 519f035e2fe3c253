//! `blanks` and `all_blanks`: whitespace normalization.

use crate::buffer::Buffer;
use crate::error::CoreError;
use crate::method::{Method, MethodId, MethodStats};
use crate::trial::{attempt, whitespace_equivalent, TrialRunner};

/// `blanks`: at `pos`, collapses a run of 2+ whitespace bytes to a single
/// space. Never enlarges.
pub struct Blanks;

impl Method for Blanks {
    fn id(&self) -> MethodId {
        MethodId::Blanks
    }

    fn try_at(
        &mut self,
        buf: &mut Buffer,
        pos: &mut usize,
        runner: &mut dyn TrialRunner,
        stats: &mut MethodStats,
    ) -> Result<bool, CoreError> {
        if !buf.at(*pos).is_some_and(|b| b.is_ascii_whitespace()) {
            return Ok(false);
        }
        let mut end = *pos;
        while buf.at(end).is_some_and(|b| b.is_ascii_whitespace()) {
            end += 1;
        }
        if end - *pos < 2 {
            return Ok(false);
        }
        let worked = attempt(buf, runner, self.id(), false, *pos, end, b" ")?;
        stats.record(worked);
        Ok(worked)
    }
}

fn collapse_whitespace_runs(buf: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(buf.len());
    let mut i = 0;
    while i < buf.len() {
        if buf[i].is_ascii_whitespace() {
            out.push(b' ');
            while i < buf.len() && buf[i].is_ascii_whitespace() {
                i += 1;
            }
        } else {
            out.push(buf[i]);
            i += 1;
        }
    }
    out
}

fn insert_newline_after_colons(buf: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(buf.len() + 8);
    let mut i = 0;
    while i < buf.len() {
        let b = buf[i];
        out.push(b);
        i += 1;
        if b != b':' {
            continue;
        }
        // Absorb a run of plain spaces/tabs between the colon and the next
        // token into the inserted newline. A newline already in the run
        // means a break was inserted here before; stop there and leave it
        // alone so a second pass is a no-op.
        let mut j = i;
        while j < buf.len() && matches!(buf[j], b' ' | b'\t') {
            j += 1;
        }
        if j < buf.len() && buf[j] != b'\n' {
            out.push(b'\n');
            i = j;
        }
    }
    out
}

fn pad_commas_then_collapse(buf: &[u8]) -> Vec<u8> {
    let mut padded = Vec::with_capacity(buf.len() + 16);
    for &b in buf {
        if b == b',' {
            padded.push(b' ');
            padded.push(b',');
            padded.push(b' ');
        } else {
            padded.push(b);
        }
    }
    collapse_whitespace_runs(&padded)
}

/// `all_blanks`: one-shot, runs three global rewrites in order, each tested
/// and reverted independently:
/// 1. collapse whitespace runs (non-enlarging),
/// 2. insert a newline after every `:`, absorbing any run of spaces/tabs
///    already between it and the next token (enlarging),
/// 3. pad commas with spaces then re-collapse (enlarging).
pub struct AllBlanks;

impl Method for AllBlanks {
    fn id(&self) -> MethodId {
        MethodId::AllBlanks
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
        let mut any = false;

        let collapsed = collapse_whitespace_runs(buf.as_bytes());
        if !whitespace_equivalent(buf.as_bytes(), &collapsed) || collapsed.len() != buf.len() {
            let worked = attempt(buf, runner, self.id(), false, 0, buf.len(), &collapsed)?;
            stats.record(worked);
            any |= worked;
        }

        let with_newlines = insert_newline_after_colons(buf.as_bytes());
        if with_newlines != buf.as_bytes() {
            let worked = attempt(buf, runner, self.id(), true, 0, buf.len(), &with_newlines)?;
            stats.record(worked);
            any |= worked;
        }

        let comma_padded = pad_commas_then_collapse(buf.as_bytes());
        if comma_padded != buf.as_bytes() {
            let worked = attempt(buf, runner, self.id(), true, 0, buf.len(), &comma_padded)?;
            stats.record(worked);
            any |= worked;
        }

        Ok(any)
    }
}
