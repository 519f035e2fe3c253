//! `shorten_ints`: successively shrinks an integer literal at `pos`.
//!
//! Candidates are tried in this order: drop the first digit (when more than
//! one remains), drop one trailing suffix letter, drop the sign-and-base
//! prefix. This ordering matters for literals like `0x1ULL`, which shed
//! their suffix one letter at a time before the `0x` prefix is dropped —
//! suffix-then-prefix has to run ahead of the (here inapplicable,
//! single-digit) digit-drop candidate for that to happen.

use crate::buffer::Buffer;
use crate::error::CoreError;
use crate::method::{Method, MethodId, MethodStats};
use crate::trial::{attempt, TrialRunner};

struct Literal {
    start: usize,
    sign_len: usize,
    prefix_len: usize,
    digits_start: usize,
    digits_end: usize,
    suffix_end: usize,
}

fn parse_literal(buf: &[u8], pos: usize) -> Option<Literal> {
    let mut p = pos;
    let sign_len = if matches!(buf.get(p), Some(&b'+') | Some(&b'-')) { 1 } else { 0 };
    p += sign_len;
    let digit_start_candidate = p;

    let is_hex = matches!(
        (buf.get(p), buf.get(p + 1)),
        (Some(&b'0'), Some(&b'x')) | (Some(&b'0'), Some(&b'X'))
    );
    let prefix_len = if is_hex {
        2
    } else if buf.get(p) == Some(&b'0') && buf.get(p + 1).is_some_and(u8::is_ascii_digit) {
        1
    } else {
        0
    };
    let digits_start = digit_start_candidate + prefix_len;

    let mut digits_end = digits_start;
    let digit_ok: fn(u8) -> bool = if is_hex {
        |b| b.is_ascii_hexdigit()
    } else {
        |b| b.is_ascii_digit()
    };
    while buf.get(digits_end).copied().is_some_and(digit_ok) {
        digits_end += 1;
    }
    if digits_end == digits_start {
        return None;
    }

    let mut suffix_end = digits_end;
    while buf
        .get(suffix_end)
        .copied()
        .is_some_and(|b| matches!(b, b'u' | b'U' | b'l' | b'L'))
    {
        suffix_end += 1;
    }

    Some(Literal {
        start: pos,
        sign_len,
        prefix_len,
        digits_start,
        digits_end,
        suffix_end,
    })
}

/// `shorten_ints`.
pub struct ShortenInts;

impl Method for ShortenInts {
    fn id(&self) -> MethodId {
        MethodId::ShortenInts
    }

    fn try_at(
        &mut self,
        buf: &mut Buffer,
        pos: &mut usize,
        runner: &mut dyn TrialRunner,
        stats: &mut MethodStats,
    ) -> Result<bool, CoreError> {
        let Some(lit) = parse_literal(buf.as_bytes(), *pos) else {
            return Ok(false);
        };

        if lit.digits_end - lit.digits_start > 1 {
            let worked = attempt(
                buf,
                runner,
                self.id(),
                false,
                lit.digits_start,
                lit.digits_start + 1,
                b"",
            )?;
            stats.record(worked);
            if worked {
                return Ok(true);
            }
        }

        if lit.suffix_end > lit.digits_end {
            let worked = attempt(
                buf,
                runner,
                self.id(),
                false,
                lit.suffix_end - 1,
                lit.suffix_end,
                b"",
            )?;
            stats.record(worked);
            if worked {
                return Ok(true);
            }
        }

        if lit.sign_len + lit.prefix_len > 0 {
            let worked = attempt(
                buf,
                runner,
                self.id(),
                false,
                lit.start,
                lit.start + lit.sign_len + lit.prefix_len,
                b"",
            )?;
            stats.record(worked);
            if worked {
                return Ok(true);
            }
        }

        Ok(false)
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

    fn shrink_once(text: &str) -> String {
        let mut buf = Buffer::from_bytes(format!(" {text} ").into_bytes());
        let mut pos = 1usize;
        let mut stats = MethodStats::default();
        ShortenInts.try_at(&mut buf, &mut pos, &mut AcceptAll, &mut stats).unwrap();
        buf.to_string_lossy().trim().to_string()
    }

    #[test]
    fn shorten_ints_walks_through_scenario_3() {
        assert_eq!(shrink_once("0x1ULL"), "0x1UL");
        assert_eq!(shrink_once("0x1UL"), "0x1U");
        assert_eq!(shrink_once("0x1U"), "0x1");
        assert_eq!(shrink_once("0x1"), "1");
    }

    #[test]
    fn shorten_ints_drops_first_digit_of_multidigit_literal() {
        assert_eq!(shrink_once("12345"), "2345");
    }

    #[test]
    fn shorten_ints_no_match_on_non_literal() {
        let mut buf = Buffer::from_bytes(b" foo ".to_vec());
        let mut pos = 1usize;
        let mut stats = MethodStats::default();
        let worked = ShortenInts
            .try_at(&mut buf, &mut pos, &mut AcceptAll, &mut stats)
            .unwrap();
        assert!(!worked);
    }
}
