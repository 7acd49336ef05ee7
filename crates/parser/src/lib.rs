//! # Modeldoc Parser
//!
//! Reads equation-definition files and produces the canonical model that the
//! linking and enrichment stages work on.
//!
//! ## Architecture
//!
//! ```text
//! Model file (Latin-1)
//!     │
//!     ├──> Preprocess
//!     │      ├─ //region → --region
//!     │      └─ strip C-style comments
//!     │
//!     ├──> Grammar
//!     │      └─ ADDEQ blocks → regions → raw equations
//!     │
//!     └──> Normalizer
//!            └─ trimmed, reassembled, lower-cased Model
//! ```
//!
//! ## Example
//!
//! ```rust
//! use modeldoc_parser::{parse_model, Grammar};
//!
//! let grammar = Grammar::new();
//! let model = parse_model(&grammar, "ADDEQ, x: x = y + 1, y: y = 2;", "inline").unwrap();
//! assert_eq!(model.names(), vec!["x", "y"]);
//! assert_eq!(model.find("x").unwrap().whole_equation, "x = y + 1");
//! ```

mod error;
mod grammar;
pub mod markup;
mod normalizer;
mod source;
pub mod text;
mod types;

pub use error::{ParseError, Result};
pub use grammar::Grammar;
pub use normalizer::{normalize, normalize_equation};
pub use source::{decode_latin1, read_model_file};
pub use types::{Equation, Model, ParsedEquation, ParsedRegion, Placement, Region};

/// Parse and normalize model text in one call
pub fn parse_model(grammar: &Grammar, text: &str, source_name: &str) -> Result<Model> {
    let regions = grammar.parse(text, source_name)?;
    Ok(normalize(regions))
}
