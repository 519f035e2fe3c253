//! `crc`: rewrites `transparent_crc(args)` into a plain `printf` over its
//! first argument.

use crate::buffer::Buffer;
use crate::error::CoreError;
use crate::method::{Method, MethodId, MethodStats};
use crate::patterns::{balanced, match_idnum, skip_ws};
use crate::trial::{attempt, TrialRunner};

const CALL_NAME: &str = "transparent_crc";

/// Splits `args` on top-level commas (not nested inside `(...)`) and returns
/// the trimmed first piece.
fn first_arg(args: &[u8]) -> &[u8] {
    let mut depth = 0i64;
    for (i, &b) in args.iter().enumerate() {
        match b {
            b'(' => depth += 1,
            b')' => depth -= 1,
            b',' if depth == 0 => return trim(&args[..i]),
            _ => {}
        }
    }
    trim(args)
}

fn trim(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|b| !b.is_ascii_whitespace()).unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |p| p + 1);
    &bytes[start..end]
}

/// `crc`.
pub struct Crc;

impl Method for Crc {
    fn id(&self) -> MethodId {
        MethodId::Crc
    }

    fn try_at(
        &mut self,
        buf: &mut Buffer,
        pos: &mut usize,
        runner: &mut dyn TrialRunner,
        stats: &mut MethodStats,
    ) -> Result<bool, CoreError> {
        let bytes = buf.as_bytes();
        let Some(name_end) = match_idnum(bytes, *pos) else {
            return Ok(false);
        };
        if &bytes[*pos..name_end] != CALL_NAME.as_bytes() {
            return Ok(false);
        }
        let open = skip_ws(bytes, name_end);
        if bytes.get(open) != Some(&b'(') {
            return Ok(false);
        }
        let Some(close) = balanced(bytes, open, b'(', b')') else {
            return Ok(false);
        };

        let args = &bytes[open + 1..close];
        let arg0 = String::from_utf8_lossy(first_arg(args)).into_owned();
        let replacement = format!("printf (\"%d\\n\", (int){arg0})");

        let worked = attempt(buf, runner, self.id(), false, *pos, close + 1, replacement.as_bytes())?;
        stats.record(worked);
        Ok(worked)
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
    fn crc_rewrites_to_printf_over_first_arg() {
        let mut buf =
            Buffer::from_bytes(b" transparent_crc(g_1, \"x\", 0); X ".to_vec());
        let mut pos = 1usize;
        let mut stats = MethodStats::default();
        let worked = Crc.try_at(&mut buf, &mut pos, &mut AcceptAll, &mut stats).unwrap();
        assert!(worked);
        assert_eq!(
            buf.to_string_lossy(),
            " printf (\"%d\\n\", (int)g_1); X "
        );
    }

    #[test]
    fn crc_ignores_other_calls() {
        let mut buf = Buffer::from_bytes(b" foo(g_1, 0); X ".to_vec());
        let mut pos = 1usize;
        let mut stats = MethodStats::default();
        let worked = Crc.try_at(&mut buf, &mut pos, &mut AcceptAll, &mut stats).unwrap();
        assert!(!worked);
    }
}
