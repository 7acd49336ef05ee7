//! # Modeldoc Graph
//!
//! Cross-references between equations, found by scanning equation text.
//!
//! ## Architecture
//!
//! ```text
//! Model (normalized)
//!     │
//!     ├──> Link Builder
//!     │      ├─ Phase 1: name → node index
//!     │      ├─ Phase 2: one identifier scan per equation
//!     │      └─ write back variables / appears_in / anchors
//!     │
//!     ├──> Equation Graph (petgraph)
//!     │      ├─ Nodes: equations, in model order
//!     │      └─ Edges: "text of A mentions B"
//!     │
//!     └──> Model Assembler
//!            ├─ frozen model + timestamp for the renderer
//!            └─ upstream / downstream traces
//! ```
//!
//! `appears_in` is read from the incoming edges of the same graph that
//! produced `variables`, so the two lists are exact transposes.

mod assembler;
mod builder;
mod error;
mod graph;
mod types;

pub use assembler::{
    AssembledModel, EquationTrace, ModelAssembler, ModelStats, TraceStrategy, TracedEquation,
};
pub use builder::LinkBuilder;
pub use error::{GraphError, Result};
pub use types::{EquationGraph, EquationNode, LinkedModel, Reference};
