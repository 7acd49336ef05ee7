//! Identifier-boundary text scanning.
//!
//! A match of `needle` in `haystack` only counts when the bytes around it are
//! not identifier bytes (or are the start/end of the text). Identifier bytes
//! are the ones the grammar allows in equation names: ASCII letters, digits,
//! `_` and `.`.

/// Byte that may appear inside an equation identifier
#[must_use]
pub const fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'.'
}

/// Byte that may start an equation identifier
#[must_use]
pub const fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'.'
}

/// Check that `s` is a complete identifier
#[must_use]
pub fn is_identifier(s: &str) -> bool {
    let bytes = s.as_bytes();
    match bytes.first() {
        Some(&first) => is_ident_start(first) && bytes.iter().all(|&b| is_ident_byte(b)),
        None => false,
    }
}

/// Byte offsets of every non-overlapping boundary-bound occurrence of `needle`
#[must_use]
pub fn bound_positions(haystack: &str, needle: &str) -> Vec<usize> {
    let mut out = Vec::new();
    if needle.is_empty() {
        return out;
    }
    let bytes = haystack.as_bytes();
    let mut start = 0usize;
    while let Some(pos) = haystack[start..].find(needle) {
        let idx = start + pos;
        let after_idx = idx + needle.len();
        let before_ok = idx == 0 || !is_ident_byte(bytes[idx - 1]);
        let after_ok = after_idx >= bytes.len() || !is_ident_byte(bytes[after_idx]);
        if before_ok && after_ok {
            out.push(idx);
            start = after_idx;
        } else {
            // step over the first char of the candidate, keeping char alignment
            let step = haystack[idx..].chars().next().map_or(1, char::len_utf8);
            start = idx + step;
        }
        if start >= haystack.len() {
            break;
        }
    }
    out
}

#[must_use]
pub fn contains_bound(haystack: &str, needle: &str) -> bool {
    // cheap substring test first, most needles are absent
    haystack.contains(needle) && !bound_positions(haystack, needle).is_empty()
}

/// Replace every boundary-bound occurrence of `needle` with `replacement`.
///
/// The replacement is inserted literally. Returns `None` when nothing matched.
#[must_use]
pub fn replace_bound(haystack: &str, needle: &str, replacement: &str) -> Option<String> {
    let positions = bound_positions(haystack, needle);
    if positions.is_empty() {
        return None;
    }
    let mut out = String::with_capacity(haystack.len() + positions.len() * replacement.len());
    let mut last = 0usize;
    for idx in positions {
        out.push_str(&haystack[last..idx]);
        out.push_str(replacement);
        last = idx + needle.len();
    }
    out.push_str(&haystack[last..]);
    Some(out)
}

/// Byte ranges of the maximal identifier runs in `text`
#[must_use]
pub fn identifier_spans(text: &str) -> Vec<(usize, usize)> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut i = 0usize;
    while i < bytes.len() {
        if is_ident_byte(bytes[i]) {
            let start = i;
            while i < bytes.len() && is_ident_byte(bytes[i]) {
                i += 1;
            }
            spans.push((start, i));
        } else {
            i += 1;
        }
    }
    spans
}

/// Rewrite maximal identifier runs in a single left-to-right pass.
///
/// `f` receives each run and returns its replacement, or `None` to keep it.
/// Inserted text is never rescanned.
pub fn rewrite_identifiers<F>(text: &str, mut f: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    let mut out = String::with_capacity(text.len());
    let mut last = 0usize;
    for (start, end) in identifier_spans(text) {
        if let Some(replacement) = f(&text[start..end]) {
            out.push_str(&text[last..start]);
            out.push_str(&replacement);
            last = end;
        }
    }
    out.push_str(&text[last..]);
    out
}
