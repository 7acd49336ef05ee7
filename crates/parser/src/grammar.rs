//! Grammar of the equation-definition format.
//!
//! ```text
//! block     := "ADDEQ" ["TOP" | "BOTTOM"] "," item+ ";"
//! item      := region | equation+ | "--endregion"
//! region    := "--region" <label> equation* ["--endregion"]
//! equation  := identifier ":" <text up to "="> "=" <text up to "," or ";"> [","]
//! ```
//!
//! Anything outside a block is skipped. C-style comments are removed before
//! matching, after `//region` / `//endregion` markers have been rewritten to
//! their `--` spelling so the comment pass does not swallow them. A region
//! whose markers enclose no equation is dropped.
//!
//! A label is the rest of the `--region` line, cut short where a
//! `--endregion`, a `;` or an equation starts on that same line.

use crate::error::{ParseError, Result};
use crate::types::{ParsedEquation, ParsedRegion, Placement};
use regex::{Captures, Regex};

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|err| panic!("invalid grammar pattern {pattern}: {err}"))
}

/// Compiled grammar. Build once and share by reference.
#[derive(Debug, Clone)]
pub struct Grammar {
    block_open: Regex,
    block_header: Regex,
    block_end: Regex,
    region_open: Regex,
    region_close: Regex,
    region_marker: Regex,
    label_stop: Regex,
    equation_head: Regex,
    alt_marker: Regex,
    comment: Regex,
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new()
    }
}

impl Grammar {
    pub fn new() -> Self {
        Self {
            block_open: compile(r"(?i)\baddeq\b"),
            block_header: compile(r"(?i)^\s*(?:(?P<placement>top|bottom)\b\s*)?,"),
            block_end: compile(r"^\s*;"),
            region_open: compile(r"(?i)^\s*--region\b[ \t]*(?P<label>[^\r\n]*)"),
            region_close: compile(r"(?i)^\s*--endregion\b"),
            region_marker: compile(r"(?i)--(?:end)?region\b"),
            label_stop: compile(
                r"(?i)--endregion\b|;|(?:^|\s)[A-Za-z_.][A-Za-z0-9_.]*\s*:[^=;\n]*=",
            ),
            equation_head: compile(r"^\s*(?P<name>[A-Za-z_.][A-Za-z0-9_.]*)\s*:"),
            alt_marker: compile(r"(?i)//(?P<end>end)?region\b"),
            comment: compile(r"(?s)/\*.*?\*/|//[^\n]*"),
        }
    }

    /// Rewrite alternate region markers, then strip C-style comments.
    ///
    /// Block comments are replaced by the line breaks they contained so that
    /// "rest of line" region labels keep their extent.
    #[must_use]
    pub fn preprocess(&self, text: &str) -> String {
        let markers = self
            .alt_marker
            .replace_all(text, |caps: &Captures| match caps.name("end") {
                Some(_) => "--endregion",
                None => "--region",
            });
        self.comment
            .replace_all(&markers, |caps: &Captures| {
                let comment = &caps[0];
                if comment.starts_with("/*") {
                    let breaks: String = comment.chars().filter(|&c| c == '\n').collect();
                    if breaks.is_empty() {
                        " ".to_string()
                    } else {
                        breaks
                    }
                } else {
                    String::new()
                }
            })
            .into_owned()
    }

    /// Extract every block of `text` as an ordered list of regions.
    ///
    /// `source_name` only appears in the error when no block is found.
    pub fn parse(&self, text: &str, source_name: &str) -> Result<Vec<ParsedRegion>> {
        let clean = self.preprocess(text);
        let mut regions = Vec::new();
        let mut blocks = 0usize;
        let mut search_from = 0usize;

        while let Some(keyword) = self.block_open.find_at(&clean, search_from) {
            match self.parse_block(&clean, keyword.end()) {
                Some((block_regions, end)) => {
                    blocks += 1;
                    regions.extend(block_regions);
                    search_from = end;
                }
                None => {
                    log::debug!(
                        "Skipping unrecognized ADDEQ block at byte {}",
                        keyword.start()
                    );
                    search_from = keyword.end();
                }
            }
        }

        if blocks == 0 {
            return Err(ParseError::grammar_mismatch(source_name));
        }

        log::info!(
            "Parsed {} block(s), {} region(s), {} equation(s) from {}",
            blocks,
            regions.len(),
            regions.iter().map(|r| r.equations.len()).sum::<usize>(),
            source_name
        );
        Ok(regions)
    }

    /// Parse one block whose `ADDEQ` keyword ends at `pos`.
    /// Returns the regions and the offset just past the terminating `;`.
    fn parse_block(&self, text: &str, pos: usize) -> Option<(Vec<ParsedRegion>, usize)> {
        let header = self.block_header.captures(&text[pos..])?;
        let placement = header.name("placement").map(|m| {
            if m.as_str().eq_ignore_ascii_case("top") {
                Placement::Top
            } else {
                Placement::Bottom
            }
        });
        let mut cursor = pos + header.get(0).map_or(0, |m| m.end());
        let mut regions = Vec::new();
        let mut items = 0usize;

        loop {
            let rest = &text[cursor..];

            if let Some(end) = self.block_end.find(rest) {
                cursor += end.end();
                break;
            }

            if let Some(open) = self.region_open.captures(rest) {
                let (label, consumed) = match open.name("label") {
                    Some(m) => {
                        let end = self.label_end(m.as_str());
                        (m.as_str()[..end].trim(), m.start() + end)
                    }
                    None => ("", open.get(0).map_or(0, |m| m.end())),
                };
                let label = Some(label.to_string()).filter(|l| !l.is_empty());
                cursor += consumed;

                let (equations, next) = self.parse_equations(text, cursor);
                cursor = next;
                if let Some(close) = self.region_close.find(&text[cursor..]) {
                    cursor += close.end();
                }
                items += 1;

                if equations.is_empty() {
                    log::debug!("Discarding void region {:?}", label.as_deref().unwrap_or(""));
                    continue;
                }
                regions.push(ParsedRegion {
                    name: label,
                    placement,
                    equations,
                });
                continue;
            }

            // closing marker without an opening one
            if let Some(close) = self.region_close.find(rest) {
                cursor += close.end();
                continue;
            }

            let (equations, next) = self.parse_equations(text, cursor);
            if equations.is_empty() {
                return None;
            }
            cursor = next;
            items += 1;
            regions.push(ParsedRegion {
                name: None,
                placement,
                equations,
            });
        }

        (items > 0).then_some((regions, cursor))
    }

    /// Length of the label part of a `--region` line: the whole line unless a
    /// `--endregion`, a `;` or an equation starts on it
    fn label_end(&self, line: &str) -> usize {
        self.label_stop.find(line).map_or(line.len(), |m| m.start())
    }

    fn parse_equations(&self, text: &str, mut cursor: usize) -> (Vec<ParsedEquation>, usize) {
        let mut equations = Vec::new();
        while let Some((equation, next)) = self.parse_equation(text, cursor) {
            log::debug!("Equation: {}", equation.name);
            log::debug!("Left side of equation: {}", equation.left_side.trim());
            log::debug!("Right side of equation: {}", equation.right_side.trim());
            equations.push(equation);
            cursor = next;
        }
        (equations, cursor)
    }

    fn parse_equation(&self, text: &str, pos: usize) -> Option<(ParsedEquation, usize)> {
        let head = self.equation_head.captures(&text[pos..])?;
        let name = head.name("name")?.as_str().to_string();
        let mut cursor = pos + head.get(0)?.end();

        let left_len = find_unescaped_equals(&text[cursor..])?;
        let left_side = &text[cursor..cursor + left_len];
        if left_side.trim().is_empty() {
            return None;
        }
        cursor += left_len + 1;

        let rest = &text[cursor..];
        let mut right_len = rest.find([',', ';']).unwrap_or(rest.len());
        if let Some(marker) = self.region_marker.find(&rest[..right_len]) {
            right_len = marker.start();
        }
        let right_side = &rest[..right_len];
        if right_side.trim().is_empty() {
            return None;
        }
        cursor += right_len;
        if text[cursor..].starts_with(',') {
            cursor += 1;
        }

        Some((
            ParsedEquation {
                name,
                left_side: left_side.to_string(),
                right_side: right_side.to_string(),
            },
            cursor,
        ))
    }
}

/// Offset of the first `=` not preceded by a backslash escape. A `;` first
/// means the block ended before the equation did.
fn find_unescaped_equals(text: &str) -> Option<usize> {
    let mut escaped = false;
    for (idx, ch) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '=' => return Some(idx),
            ';' => return None,
            _ => {}
        }
    }
    None
}
