//! # Modeldoc Enrich
//!
//! External `key;value` tables applied to a linked model: parameter values
//! substituted into equation text, legends attached to equations.
//!
//! Both passes are pure model → model transforms and run after linking, so
//! they see equation text that already carries anchor markup.

mod error;
mod legend;
mod params;
mod table;

pub use error::{EnrichError, Result};
pub use legend::LegendAnnotator;
pub use params::ParameterSubstitution;
pub use table::LookupTable;
