//! Hyperlink anchors inserted into equation text by the linker.
//!
//! Later stages must not rewrite inside these tags, and renderers must not
//! escape them, so the exact shapes produced here are also the only shapes
//! [`segments`] recognizes as markup.

use once_cell::sync::Lazy;
use regex::Regex;

/// CSS class carried by an equation's anchor to its own name
pub const SELF_REFERENCE_CLASS: &str = "main_variable";

static ANCHOR_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r##"<a href="#[A-Za-z0-9_.]+"(?: class="main_variable")?>|</a>"##)
        .expect("anchor tag pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorKind {
    /// Link to another equation
    Reference,
    /// Occurrence of the equation's own name
    SelfReference,
}

/// Anchor pointing at the equation `name`
#[must_use]
pub fn anchor(name: &str, kind: AnchorKind) -> String {
    match kind {
        AnchorKind::Reference => format!(r##"<a href="#{name}">{name}</a>"##),
        AnchorKind::SelfReference => {
            format!(r##"<a href="#{name}" class="{SELF_REFERENCE_CLASS}">{name}</a>"##)
        }
    }
}

/// Piece of equation text: either anchor markup or plain text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Markup(&'a str),
    Text(&'a str),
}

/// Split text into anchor tags and the plain text between them
#[must_use]
pub fn segments(text: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut last = 0usize;
    for m in ANCHOR_TAG.find_iter(text) {
        if m.start() > last {
            out.push(Segment::Text(&text[last..m.start()]));
        }
        out.push(Segment::Markup(m.as_str()));
        last = m.end();
    }
    if last < text.len() {
        out.push(Segment::Text(&text[last..]));
    }
    out
}

/// Rebuild `text` with `f` applied to every plain-text segment
pub fn map_text<F>(text: &str, mut f: F) -> String
where
    F: FnMut(&str) -> String,
{
    let mut out = String::with_capacity(text.len());
    for segment in segments(text) {
        match segment {
            Segment::Markup(tag) => out.push_str(tag),
            Segment::Text(plain) => out.push_str(&f(plain)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn anchors_have_expected_shape() {
        assert_eq!(anchor("y", AnchorKind::Reference), r##"<a href="#y">y</a>"##);
        assert_eq!(
            anchor("x", AnchorKind::SelfReference),
            r##"<a href="#x" class="main_variable">x</a>"##
        );
    }

    #[test]
    fn segments_separate_tags_from_text() {
        let text = format!("x = {} + 1 < 2", anchor("y", AnchorKind::Reference));
        let parts = segments(&text);
        assert_eq!(
            parts,
            vec![
                Segment::Text("x = "),
                Segment::Markup(r##"<a href="#y">"##),
                Segment::Text("y"),
                Segment::Markup("</a>"),
                Segment::Text(" + 1 < 2"),
            ]
        );
    }

    #[test]
    fn both_anchor_shapes_are_markup() {
        let text = format!(
            "{} = {}",
            anchor("gdp.r", AnchorKind::SelfReference),
            anchor("_c", AnchorKind::Reference)
        );
        assert_eq!(
            segments(&text),
            vec![
                Segment::Markup(r##"<a href="#gdp.r" class="main_variable">"##),
                Segment::Text("gdp.r"),
                Segment::Markup("</a>"),
                Segment::Text(" = "),
                Segment::Markup(r##"<a href="#_c">"##),
                Segment::Text("_c"),
                Segment::Markup("</a>"),
            ]
        );
    }

    #[test]
    fn comparison_operators_are_not_markup() {
        let parts = segments("a < b and c > d");
        assert_eq!(parts, vec![Segment::Text("a < b and c > d")]);
    }

    #[test]
    fn map_text_leaves_tags_untouched() {
        let text = anchor("href", AnchorKind::SelfReference);
        let out = map_text(&text, |plain| plain.replace("href", "H"));
        assert_eq!(out, r##"<a href="#href" class="main_variable">H</a>"##);
    }
}
