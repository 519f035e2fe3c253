//! `replace_regex`: the bulk reduction rule catalogue.
//!
//! Two ordered lists — unbounded rules (match exactly at `pos`) and
//! border-delimited rules (match at `pos`, flanked by [`is_bsp`] on both
//! sides) — followed by the five sub-expression shapes, each offered with
//! seven replace-with-`0`/`1`/empty variants. Every candidate is screened
//! by [`whitespace_equivalent`] before it is ever offered to the oracle.

use std::collections::HashMap;

use crate::buffer::Buffer;
use crate::error::CoreError;
use crate::method::{Method, MethodId, MethodStats};
use crate::patterns::{
    balanced, border_flanked, match_binop, match_call, match_fullvar, match_func, match_idnum,
    match_ternary, skip_ws,
};
use crate::trial::{attempt, whitespace_equivalent, TrialRunner};

/// One candidate: replace `[start, end)` with `replacement`.
struct Candidate {
    start: usize,
    end: usize,
    replacement: Vec<u8>,
}

fn match_keyword(buf: &[u8], pos: usize, kw: &str) -> Option<usize> {
    let end = pos + kw.len();
    if buf.get(pos..end)? != kw.as_bytes() {
        return None;
    }
    if buf
        .get(end)
        .copied()
        .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_')
    {
        return None;
    }
    Some(end)
}

fn scan_to_top_level_semicolon(buf: &[u8], start: usize) -> Option<usize> {
    let mut depth: i64 = 0;
    let mut i = start;
    while i < buf.len() {
        match buf[i] {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth -= 1,
            b';' if depth == 0 => return Some(i),
            _ => {}
        }
        i += 1;
    }
    None
}

fn match_string_literal(buf: &[u8], pos: usize) -> Option<usize> {
    if buf.get(pos) != Some(&b'"') {
        return None;
    }
    let mut i = pos + 1;
    while i < buf.len() {
        match buf[i] {
            b'\\' => i += 2,
            b'"' => return Some(i + 1),
            _ => i += 1,
        }
    }
    None
}

// --- Unbounded rules (no border requirement) -----------------------------

fn unbounded_rules() -> Vec<(&'static str, fn(&[u8], usize) -> Option<Candidate>)> {
    vec![
        ("del_parens", |buf, pos| {
            if buf.get(pos) != Some(&b'(') {
                return None;
            }
            let close = balanced(buf, pos, b'(', b')')?;
            Some(Candidate { start: pos, end: close + 1, replacement: Vec::new() })
        }),
        ("del_braces", |buf, pos| {
            if buf.get(pos) != Some(&b'{') {
                return None;
            }
            let close = balanced(buf, pos, b'{', b'}')?;
            Some(Candidate { start: pos, end: close + 1, replacement: Vec::new() })
        }),
        ("del_assign_braces", |buf, pos| {
            if buf.get(pos) != Some(&b'=') {
                return None;
            }
            let p = skip_ws(buf, pos + 1);
            if buf.get(p) != Some(&b'{') {
                return None;
            }
            let close = balanced(buf, p, b'{', b'}')?;
            Some(Candidate { start: pos, end: close + 1, replacement: Vec::new() })
        }),
        ("bitfield_to_semicolon", |buf, pos| {
            if buf.get(pos) != Some(&b':') {
                return None;
            }
            let p = skip_ws(buf, pos + 1);
            let digits_end = {
                let mut e = p;
                while buf.get(e).copied().is_some_and(|b| b.is_ascii_digit()) {
                    e += 1;
                }
                e
            };
            if digits_end == p {
                return None;
            }
            let p2 = skip_ws(buf, digits_end);
            if buf.get(p2) != Some(&b';') {
                return None;
            }
            Some(Candidate { start: pos, end: p2 + 1, replacement: b";".to_vec() })
        }),
        ("del_semicolon", |buf, pos| {
            if buf.get(pos) != Some(&b';') {
                return None;
            }
            Some(Candidate { start: pos, end: pos + 1, replacement: Vec::new() })
        }),
        ("compound_assign_to_assign", |buf, pos| {
            const OPS: &[&str] = &["<<=", ">>=", "^=", "|=", "&=", "+=", "-=", "*=", "/=", "%="];
            for op in OPS {
                if buf.get(pos..pos + op.len()) == Some(op.as_bytes()) {
                    return Some(Candidate {
                        start: pos,
                        end: pos + op.len(),
                        replacement: b"=".to_vec(),
                    });
                }
            }
            None
        }),
        ("del_unary_op", |buf, pos| {
            if matches!(buf.get(pos), Some(&b'+') | Some(&b'-') | Some(&b'!') | Some(&b'~')) {
                Some(Candidate { start: pos, end: pos + 1, replacement: Vec::new() })
            } else {
                None
            }
        }),
        ("del_string_literal_with_comma", |buf, pos| {
            let end = match_string_literal(buf, pos)?;
            if buf.get(end) == Some(&b',') {
                Some(Candidate { start: pos, end: end + 1, replacement: Vec::new() })
            } else {
                None
            }
        }),
        ("del_string_literal", |buf, pos| {
            let end = match_string_literal(buf, pos)?;
            Some(Candidate { start: pos, end, replacement: Vec::new() })
        }),
    ]
}

// --- Border-delimited rules ------------------------------------------------

fn border_rules() -> Vec<(&'static str, fn(&[u8], usize) -> Option<Candidate>)> {
    vec![
        ("del_labeled_statement", |buf, pos| {
            let name_end = match_idnum(buf, pos)?;
            let p = skip_ws(buf, name_end);
            if buf.get(p) != Some(&b':') || buf.get(p + 1) == Some(&b':') {
                return None;
            }
            Some(Candidate { start: pos, end: p + 1, replacement: Vec::new() })
        }),
        ("del_goto_statement", |buf, pos| {
            let p = match_keyword(buf, pos, "goto")?;
            let p = skip_ws(buf, p);
            let name_end = match_idnum(buf, p)?;
            let p2 = skip_ws(buf, name_end);
            if buf.get(p2) != Some(&b';') {
                return None;
            }
            Some(Candidate { start: pos, end: p2 + 1, replacement: Vec::new() })
        }),
        ("inttype_keyword_to_int", |buf, pos| {
            const KEYWORDS: &[&str] = &["short", "long", "char", "signed", "unsigned"];
            for kw in KEYWORDS {
                if let Some(end) = match_keyword(buf, pos, kw) {
                    return Some(Candidate { start: pos, end, replacement: b"int".to_vec() });
                }
            }
            None
        }),
        ("argc_argv_to_void", |buf, pos| {
            let p = match_keyword(buf, pos, "int")?;
            let p = skip_ws(buf, p);
            let p = match_keyword(buf, p, "argc")?;
            let p = skip_ws(buf, p);
            let p = if buf.get(p) == Some(&b',') { p + 1 } else { return None };
            let p = skip_ws(buf, p);
            let p = match_keyword(buf, p, "char")?;
            let p = skip_ws(buf, p);
            let p = if buf.get(p) == Some(&b'*') { p + 1 } else { return None };
            let p = skip_ws(buf, p);
            let p = match_keyword(buf, p, "argv")?;
            let p = skip_ws(buf, p);
            let p = if buf.get(p) == Some(&b'[') { p + 1 } else { return None };
            let p = skip_ws(buf, p);
            let p = if buf.get(p) == Some(&b']') { p + 1 } else { return None };
            Some(Candidate { start: pos, end: p, replacement: b"void".to_vec() })
        }),
        ("del_int_declaration", |buf, pos| {
            let p = match_keyword(buf, pos, "int")?;
            if !buf.get(p).copied().is_some_and(|b| b.is_ascii_whitespace()) {
                return None;
            }
            let end = scan_to_top_level_semicolon(buf, p)?;
            Some(Candidate { start: pos, end: end + 1, replacement: Vec::new() })
        }),
        ("del_for_keyword", |buf, pos| {
            let end = match_keyword(buf, pos, "for")?;
            Some(Candidate { start: pos, end, replacement: Vec::new() })
        }),
        ("del_if_condition", |buf, pos| {
            let p = match_keyword(buf, pos, "if")?;
            let p = skip_ws(buf, p);
            if buf.get(p) != Some(&b'(') {
                return None;
            }
            let close = balanced(buf, p, b'(', b')')?;
            Some(Candidate { start: pos, end: close + 1, replacement: Vec::new() })
        }),
        ("del_struct_or_union_declaration", |buf, pos| {
            let p = match_keyword(buf, pos, "struct").or_else(|| match_keyword(buf, pos, "union"))?;
            if !buf.get(p).copied().is_some_and(|b| b.is_ascii_whitespace()) {
                return None;
            }
            let end = scan_to_top_level_semicolon(buf, p)?;
            Some(Candidate { start: pos, end: end + 1, replacement: Vec::new() })
        }),
        ("del_function_definition", |buf, pos| {
            let (_, end) = match_func(buf, pos, None)?;
            Some(Candidate { start: pos, end, replacement: Vec::new() })
        }),
        ("call_comma_to_zero_comma", |buf, pos| {
            let end = match_call(buf, pos)?;
            if buf.get(end) != Some(&b',') {
                return None;
            }
            Some(Candidate { start: pos, end: end + 1, replacement: b"0,".to_vec() })
        }),
        ("call_comma_to_empty", |buf, pos| {
            let end = match_call(buf, pos)?;
            if buf.get(end) != Some(&b',') {
                return None;
            }
            Some(Candidate { start: pos, end: end + 1, replacement: Vec::new() })
        }),
        ("call_to_zero", |buf, pos| {
            let end = match_call(buf, pos)?;
            Some(Candidate { start: pos, end, replacement: b"0".to_vec() })
        }),
        ("call_to_empty", |buf, pos| {
            let end = match_call(buf, pos)?;
            Some(Candidate { start: pos, end, replacement: Vec::new() })
        }),
    ]
}

// --- Sub-expression shapes, 7 variants each -------------------------------

fn shape_matchers() -> Vec<(&'static str, fn(&[u8], usize) -> Option<usize>)> {
    vec![
        ("fullvar_binop_fullvar", |buf, pos| {
            let a_end = match_fullvar(buf, pos)?;
            let p = skip_ws(buf, a_end);
            let op_end = match_binop(buf, p)?;
            let p2 = skip_ws(buf, op_end);
            match_fullvar(buf, p2)
        }),
        ("fullvar_binop", |buf, pos| {
            let a_end = match_fullvar(buf, pos)?;
            let p = skip_ws(buf, a_end);
            match_binop(buf, p)
        }),
        ("binop_fullvar", |buf, pos| {
            let op_end = match_binop(buf, pos)?;
            let p = skip_ws(buf, op_end);
            match_fullvar(buf, p)
        }),
        ("fullvar", |buf, pos| match_fullvar(buf, pos)),
        ("ternary_expr", |buf, pos| match_ternary(buf, pos).map(|t| t.end)),
    ]
}

fn expr_variants(buf: &[u8], start: usize, end: usize) -> Vec<Candidate> {
    let mut out = vec![
        Candidate { start, end, replacement: b"0".to_vec() },
        Candidate { start, end, replacement: b"1".to_vec() },
        Candidate { start, end, replacement: Vec::new() },
    ];
    if buf.get(end) == Some(&b',') {
        out.push(Candidate { start, end: end + 1, replacement: b"0,".to_vec() });
        out.push(Candidate { start, end: end + 1, replacement: b"1,".to_vec() });
        out.push(Candidate { start, end: end + 1, replacement: Vec::new() });
    }
    if start > 0 && buf.get(start - 1) == Some(&b',') {
        out.push(Candidate { start: start - 1, end, replacement: Vec::new() });
    }
    out
}

/// `replace_regex`.
#[derive(Default)]
pub struct ReplaceRegex {
    rule_stats: HashMap<&'static str, MethodStats>,
}

impl ReplaceRegex {
    /// A fresh instance with no per-rule counters recorded yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Per-rule success/failure counters, indexed by rule name.
    pub fn rule_stats(&self) -> &HashMap<&'static str, MethodStats> {
        &self.rule_stats
    }

    fn offer(
        &mut self,
        rule_name: &'static str,
        candidate: Candidate,
        buf: &mut Buffer,
        runner: &mut dyn TrialRunner,
        stats: &mut MethodStats,
    ) -> Result<bool, CoreError> {
        let old = buf.slice(candidate.start, candidate.end);
        if old == candidate.replacement.as_slice() {
            return Ok(false);
        }
        if whitespace_equivalent(old, &candidate.replacement) {
            return Ok(false);
        }
        let worked = attempt(
            buf,
            runner,
            MethodId::ReplaceRegex,
            false,
            candidate.start,
            candidate.end,
            &candidate.replacement,
        )?;
        stats.record(worked);
        self.rule_stats.entry(rule_name).or_default().record(worked);
        Ok(worked)
    }
}

impl Method for ReplaceRegex {
    fn id(&self) -> MethodId {
        MethodId::ReplaceRegex
    }

    fn try_at(
        &mut self,
        buf: &mut Buffer,
        pos: &mut usize,
        runner: &mut dyn TrialRunner,
        stats: &mut MethodStats,
    ) -> Result<bool, CoreError> {
        for (name, matcher) in unbounded_rules() {
            if let Some(candidate) = matcher(buf.as_bytes(), *pos) {
                if self.offer(name, candidate, buf, runner, stats)? {
                    return Ok(true);
                }
            }
        }

        for (name, matcher) in border_rules() {
            if let Some(candidate) = matcher(buf.as_bytes(), *pos) {
                if border_flanked(buf.as_bytes(), candidate.start, {
                    // Border check uses the matched construct's own span,
                    // not an already-extended comma span.
                    let bytes = buf.as_bytes();
                    let mut e = candidate.end;
                    if e > candidate.start && bytes.get(e - 1) == Some(&b',') {
                        e -= 1;
                    }
                    e
                }) && self.offer(name, candidate, buf, runner, stats)?
                {
                    return Ok(true);
                }
            }
        }

        for (name, matcher) in shape_matchers() {
            let Some(shape_end) = matcher(buf.as_bytes(), *pos) else {
                continue;
            };
            if !border_flanked(buf.as_bytes(), *pos, shape_end) {
                continue;
            }
            for candidate in expr_variants(buf.as_bytes(), *pos, shape_end) {
                if self.offer(name, candidate, buf, runner, stats)? {
                    return Ok(true);
                }
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

    fn run_once(text: &str) -> String {
        let mut buf = Buffer::from_bytes(format!(" {text} ").into_bytes());
        let mut pos = 0usize;
        let mut stats = MethodStats::default();
        let mut method = ReplaceRegex::new();
        while pos < buf.len() {
            let worked = method
                .try_at(&mut buf, &mut pos, &mut AcceptAll, &mut stats)
                .unwrap();
            if !worked {
                pos += 1;
            } else {
                break;
            }
        }
        buf.to_string_lossy()
    }

    #[test]
    fn deletes_semicolon() {
        assert_eq!(run_once(";").trim(), "");
    }

    #[test]
    fn deletes_balanced_parens() {
        assert_eq!(run_once("(a + b)").trim(), "");
    }

    #[test]
    fn normalizes_compound_assignment() {
        let mut buf = Buffer::from_bytes(b" x += 1; ".to_vec());
        let plus_eq = buf.to_string_lossy().find("+=").unwrap();
        let mut pos = plus_eq;
        let mut stats = MethodStats::default();
        let mut method = ReplaceRegex::new();
        let worked = method
            .try_at(&mut buf, &mut pos, &mut AcceptAll, &mut stats)
            .unwrap();
        assert!(worked);
        assert_eq!(buf.to_string_lossy(), " x = 1; ");
    }

    #[test]
    fn collapses_int_declaration_to_nothing() {
        let mut buf = Buffer::from_bytes(b" int x = foo(1, 2); y; ".to_vec());
        let start = buf.to_string_lossy().find("int").unwrap();
        let mut pos = start;
        let mut stats = MethodStats::default();
        let mut method = ReplaceRegex::new();
        let worked = method
            .try_at(&mut buf, &mut pos, &mut AcceptAll, &mut stats)
            .unwrap();
        assert!(worked);
        assert_eq!(buf.to_string_lossy(), "  y; ");
    }

    #[test]
    fn rewrites_call_with_trailing_comma_to_zero_comma() {
        let mut buf = Buffer::from_bytes(b" foo(1, 2), bar(); ".to_vec());
        let mut pos = 1usize;
        let mut stats = MethodStats::default();
        let mut method = ReplaceRegex::new();
        let worked = method
            .try_at(&mut buf, &mut pos, &mut AcceptAll, &mut stats)
            .unwrap();
        assert!(worked);
        assert_eq!(buf.to_string_lossy(), " 0, bar(); ");
    }

    #[test]
    fn fullvar_shape_can_be_zeroed() {
        let mut buf = Buffer::from_bytes(b" a + b ; X ".to_vec());
        let mut pos = 1usize;
        let mut stats = MethodStats::default();
        let mut method = ReplaceRegex::new();
        let worked = method
            .try_at(&mut buf, &mut pos, &mut AcceptAll, &mut stats)
            .unwrap();
        assert!(worked);
        assert!(method.rule_stats().contains_key("fullvar_binop_fullvar"));
    }

    #[test]
    fn no_match_returns_false() {
        let mut buf = Buffer::from_bytes(b" xyz ".to_vec());
        let mut pos = 1usize;
        let mut stats = MethodStats::default();
        let mut method = ReplaceRegex::new();
        let worked = method
            .try_at(&mut buf, &mut pos, &mut AcceptAll, &mut stats)
            .unwrap();
        assert!(!worked);
    }
}
