use crate::table::LookupTable;
use modeldoc_parser::markup::map_text;
use modeldoc_parser::text::replace_bound;
use modeldoc_parser::{Equation, Model};

/// Replaces parameter names in equation text with their values.
///
/// Backslash escapes in values (`\\`, `\n`, `\t`, ...) are decoded once when
/// the engine is built; the decoded text is then inserted as is.
///
/// Keys are applied one after another in table order, each one scanning the
/// text produced by the previous keys. A value that spells a later key is
/// therefore substituted again. Anchor tags are never rewritten; the text
/// they wrap is.
#[derive(Debug, Clone)]
pub struct ParameterSubstitution {
    table: LookupTable,
}

impl ParameterSubstitution {
    pub fn new(table: LookupTable) -> Self {
        Self {
            table: table.map_values(decode_escapes),
        }
    }

    pub fn table(&self) -> &LookupTable {
        &self.table
    }

    /// Substitute every parameter in `text`
    pub fn substitute(&self, text: &str) -> String {
        let mut current = text.to_string();
        for (key, value) in self.table.iter() {
            if !current.contains(key) {
                continue;
            }
            let mut replaced = false;
            let next = map_text(&current, |plain| match replace_bound(plain, key, value) {
                Some(out) => {
                    replaced = true;
                    out
                }
                None => plain.to_string(),
            });
            if replaced {
                log::debug!("Replacing the parameter {key} in {next}");
                current = next;
            }
        }
        current
    }

    pub fn apply(&self, equation: Equation) -> Equation {
        let whole_equation = self.substitute(&equation.whole_equation);
        Equation {
            whole_equation,
            ..equation
        }
    }

    pub fn apply_model(&self, model: Model) -> Model {
        log::info!("Replacing parameter names by their values ({} parameters)", self.table.len());
        model.map_equations(|equation| self.apply(equation))
    }
}

/// Interpret backslash escapes the way a regex replacement template does.
/// Unknown escapes and a trailing backslash are kept verbatim.
fn decode_escapes(value: &str) -> String {
    if !value.contains('\\') {
        return value.to_string();
    }
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('v') => out.push('\u{b}'),
            Some('a') => out.push('\u{7}'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
