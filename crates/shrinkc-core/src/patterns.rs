//! Named textual patterns over a [`Buffer`](crate::buffer::Buffer), expressed
//! as matcher functions anchored at an arbitrary byte offset.
//!
//! `regex` has no construct for balanced brackets, so those patterns
//! (`PEXPR`'s parenthesized alternative, `PROTO`, `FUNC`, `CALL`) are built
//! by hand on top of [`balanced`], while the flat patterns (`IDNUM`,
//! `BINOP`, `RETTYPE`, …) are precompiled `Regex`es anchored with `\A`.

use once_cell::sync::Lazy;
use regex::bytes::Regex;

/// Any byte counted as a "border" character: `* { ( [ : , } ) ] ;` and comma.
pub fn is_border(b: u8) -> bool {
    matches!(
        b,
        b'*' | b'{' | b'(' | b'[' | b':' | b',' | b'}' | b')' | b']' | b';'
    )
}

/// `BORDER` or ASCII whitespace.
pub fn is_bsp(b: u8) -> bool {
    is_border(b) || b.is_ascii_whitespace()
}

/// True when `buf[pos]` is flanked by [`is_bsp`] on both sides. `pos..end`
/// is the candidate match span; the sentinel spaces guarantee a valid
/// border at position 0 and at the last index, so no special-casing is
/// needed at the buffer's logical boundaries.
pub fn border_flanked(buf: &[u8], pos: usize, end: usize) -> bool {
    let left_ok = pos == 0 || buf.get(pos - 1).copied().is_some_and(is_bsp);
    let right_ok = buf.get(end).copied().is_some_and(is_bsp);
    left_ok && right_ok
}

static IDNUM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\A[+-]?[0-9A-Za-z_]+").unwrap());
static BINOP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\A(<<=|>>=|<=|>=|==|!=|&&|\|\||<<|>>|[+\-%/*<>=|&^])").unwrap()
});
static RETTYPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\A(int|void|short|long|char|signed|unsigned|const|static|union\s+U[0-9]+|struct\s+S[0-9]+)").unwrap()
});
static INT_LITERAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A[+-]?(0[xX][0-9A-Fa-f]+|[0-9]+)[uUlL]*").unwrap());

/// `IDNUM`: optional leading `+`/`-`, then one or more `[0-9A-Za-z_]`.
/// Returns the end offset (exclusive) of the match, if any.
pub fn match_idnum(buf: &[u8], pos: usize) -> Option<usize> {
    IDNUM_RE
        .find(&buf[pos..])
        .filter(|m| m.start() == 0)
        .map(|m| pos + m.end())
}

/// `BINOP`: arithmetic, comparison, logical, and bitwise binary operators.
pub fn match_binop(buf: &[u8], pos: usize) -> Option<usize> {
    BINOP_RE
        .find(&buf[pos..])
        .filter(|m| m.start() == 0)
        .map(|m| pos + m.end())
}

/// `RETTYPE`: one integer-ish type keyword, or `union U<digits>` / `struct S<digits>`.
pub fn match_rettype(buf: &[u8], pos: usize) -> Option<usize> {
    RETTYPE_RE
        .find(&buf[pos..])
        .filter(|m| m.start() == 0)
        .map(|m| pos + m.end())
}

/// `FUNCTYPE`: one or more `RETTYPE` or `*` runs separated by whitespace.
pub fn match_functype(buf: &[u8], pos: usize) -> Option<usize> {
    let mut end = match_rettype(buf, pos).or_else(|| {
        if buf.get(pos) == Some(&b'*') {
            Some(pos + 1)
        } else {
            None
        }
    })?;
    loop {
        let mut p = end;
        while buf.get(p).copied().is_some_and(|b| b.is_ascii_whitespace()) {
            p += 1;
        }
        if buf.get(p) == Some(&b'*') {
            end = p + 1;
            continue;
        }
        if let Some(e) = match_rettype(buf, p) {
            if p > end {
                end = e;
                continue;
            }
        }
        break;
    }
    Some(end)
}

/// An integer literal: optional sign, optional `0x`/`0` base prefix, digits,
/// optional `U`/`L` suffix letters. Used by `shorten_ints`.
pub fn match_int_literal(buf: &[u8], pos: usize) -> Option<usize> {
    INT_LITERAL_RE
        .find(&buf[pos..])
        .filter(|m| m.start() == 0)
        .map(|m| pos + m.end())
}

/// Walk forward from an open bracket at `pos`, counting `+1` on `open` and
/// `-1` on `close`, returning the position of the zeroing close bracket.
/// Returns `None` (no match) if the end of the buffer is reached first —
/// the caller is expected to silently skip the candidate.
pub fn balanced(buf: &[u8], pos: usize, open: u8, close: u8) -> Option<usize> {
    if buf.get(pos) != Some(&open) {
        return None;
    }
    let mut depth: i64 = 0;
    let mut i = pos;
    while i < buf.len() {
        let b = buf[i];
        if b == open {
            depth += 1;
        } else if b == close {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
        i += 1;
    }
    None
}

/// `PEXPR`: either `IDNUM` or a balanced `( … )` run. Returns the end
/// offset (exclusive of the closing paren, if any).
pub fn match_pexpr(buf: &[u8], pos: usize) -> Option<usize> {
    if let Some(end) = match_idnum(buf, pos) {
        return Some(end);
    }
    balanced(buf, pos, b'(', b')').map(|close| close + 1)
}

/// `FULLVAR`: zero or more `&`/`*` prefixes, `PEXPR`, then zero or more
/// `.IDNUM` / `[IDNUM]` suffixes.
pub fn match_fullvar(buf: &[u8], pos: usize) -> Option<usize> {
    let mut p = pos;
    while matches!(buf.get(p), Some(&b'&') | Some(&b'*')) {
        p += 1;
    }
    let mut end = match_pexpr(buf, p)?;
    loop {
        if buf.get(end) == Some(&b'.') {
            if let Some(e) = match_idnum(buf, end + 1) {
                end = e;
                continue;
            }
        }
        if buf.get(end) == Some(&b'[') {
            if let Some(close) = balanced(buf, end, b'[', b']') {
                if match_idnum(buf, end + 1) == Some(close) {
                    end = close + 1;
                    continue;
                }
            }
        }
        break;
    }
    Some(end)
}

/// A function call: `IDNUM` followed directly by a balanced `( … )` run.
/// Returns the end offset (exclusive of the closing paren).
pub fn match_call(buf: &[u8], pos: usize) -> Option<usize> {
    let name_end = match_idnum(buf, pos)?;
    if buf.get(name_end) != Some(&b'(') {
        return None;
    }
    let close = balanced(buf, name_end, b'(', b')')?;
    Some(close + 1)
}

/// Advance `p` past any run of ASCII whitespace.
pub fn skip_ws(buf: &[u8], mut p: usize) -> usize {
    while buf.get(p).copied().is_some_and(|b| b.is_ascii_whitespace()) {
        p += 1;
    }
    p
}

/// `PROTO(name)`: `FUNCTYPE` ws `name` ws balanced `( … )` `;`.
/// With `name = None`, captures the first identifier instead of requiring
/// a specific one ("free" variant). Returns `(captured_name, end_offset)`.
pub fn match_proto(buf: &[u8], pos: usize, name: Option<&str>) -> Option<(String, usize)> {
    let ft_end = match_functype(buf, pos)?;
    let p = skip_ws(buf, ft_end);
    if p == ft_end {
        return None; // FUNCTYPE and name must be whitespace-separated
    }
    let name_end = match_idnum(buf, p)?;
    let found = std::str::from_utf8(&buf[p..name_end]).ok()?.to_string();
    if let Some(want) = name {
        if found != want {
            return None;
        }
    }
    let p2 = skip_ws(buf, name_end);
    if buf.get(p2) != Some(&b'(') {
        return None;
    }
    let close = balanced(buf, p2, b'(', b')')?;
    let p3 = skip_ws(buf, close + 1);
    if buf.get(p3) != Some(&b';') {
        return None;
    }
    Some((found, p3 + 1))
}

/// `FUNC(name)`: same shape as [`match_proto`] but terminated by a balanced
/// `{ … }` body instead of `;`.
pub fn match_func(buf: &[u8], pos: usize, name: Option<&str>) -> Option<(String, usize)> {
    let ft_end = match_functype(buf, pos)?;
    let p = skip_ws(buf, ft_end);
    if p == ft_end {
        return None;
    }
    let name_end = match_idnum(buf, p)?;
    let found = std::str::from_utf8(&buf[p..name_end]).ok()?.to_string();
    if let Some(want) = name {
        if found != want {
            return None;
        }
    }
    let p2 = skip_ws(buf, name_end);
    if buf.get(p2) != Some(&b'(') {
        return None;
    }
    let close = balanced(buf, p2, b'(', b')')?;
    let p3 = skip_ws(buf, close + 1);
    if buf.get(p3) != Some(&b'{') {
        return None;
    }
    let body_close = balanced(buf, p3, b'{', b'}')?;
    Some((found, body_close + 1))
}

/// Positions of the three operands of a matched `a ? b : c` expression.
pub struct TernaryParts {
    /// End offset (exclusive) of the whole `a ? b : c` span.
    pub end: usize,
    /// `[start, end)` of the `b` (true) branch.
    pub b: (usize, usize),
    /// `[start, end)` of the `c` (false) branch.
    pub c: (usize, usize),
}

/// The ternary shape `a ? b : c`, where each operand is a `FULLVAR`.
pub fn match_ternary(buf: &[u8], pos: usize) -> Option<TernaryParts> {
    let a_end = match_fullvar(buf, pos)?;
    let p = skip_ws(buf, a_end);
    if buf.get(p) != Some(&b'?') {
        return None;
    }
    let p = skip_ws(buf, p + 1);
    let b_start = p;
    let b_end = match_fullvar(buf, p)?;
    let p = skip_ws(buf, b_end);
    if buf.get(p) != Some(&b':') {
        return None;
    }
    let p = skip_ws(buf, p + 1);
    let c_start = p;
    let c_end = match_fullvar(buf, p)?;
    Some(TernaryParts {
        end: c_end,
        b: (b_start, b_end),
        c: (c_start, c_end),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idnum_matches_sign_and_alnum() {
        assert_eq!(match_idnum(b"-123abc ", 0), Some(7));
        assert_eq!(match_idnum(b"foo_bar;", 0), Some(7));
        assert_eq!(match_idnum(b";foo", 0), None);
    }

    #[test]
    fn balanced_parens_basic() {
        let buf = b"(a + (b))X";
        assert_eq!(balanced(buf, 0, b'(', b')'), Some(8));
    }

    #[test]
    fn balanced_unmatched_yields_none() {
        let buf = b"(a + (b)";
        assert_eq!(balanced(buf, 0, b'(', b')'), None);
    }

    #[test]
    fn pexpr_matches_parenthesized_run() {
        let buf = b"(x + y) + 1";
        assert_eq!(match_pexpr(buf, 0), Some(7));
    }

    #[test]
    fn fullvar_matches_pointer_and_suffix_chain() {
        let buf = b"&a.b[c] rest";
        assert_eq!(match_fullvar(buf, 0), Some(7));
    }

    #[test]
    fn call_matches_name_and_args() {
        let buf = b"foo(a, b);";
        assert_eq!(match_call(buf, 0), Some(9));
    }

    #[test]
    fn call_rejects_missing_parens() {
        let buf = b"foo;";
        assert_eq!(match_call(buf, 0), None);
    }

    #[test]
    fn proto_matches_named_prototype() {
        let buf = b"int foo(int x);";
        let (name, end) = match_proto(buf, 0, None).unwrap();
        assert_eq!(name, "foo");
        assert_eq!(end, buf.len());
    }

    #[test]
    fn proto_rejects_wrong_name() {
        let buf = b"int foo(int x);";
        assert!(match_proto(buf, 0, Some("bar")).is_none());
    }

    #[test]
    fn func_matches_full_definition() {
        let buf = b"int foo(int x) { return x; }";
        let (name, end) = match_func(buf, 0, None).unwrap();
        assert_eq!(name, "foo");
        assert_eq!(end, buf.len());
    }

    #[test]
    fn border_flanked_respects_buffer_edges() {
        let buf = b" x ";
        assert!(border_flanked(buf, 1, 2));
    }

    #[test]
    fn int_literal_matches_hex_with_suffix() {
        let buf = b"0x1ULL;";
        assert_eq!(match_int_literal(buf, 0), Some(6));
    }
}
