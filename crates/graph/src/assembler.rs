use crate::error::{GraphError, Result};
use crate::types::EquationGraph;
use modeldoc_parser::{Equation, Model, Region};
use petgraph::Direction;
use serde::Serialize;

/// Final stage of the pipeline: freezes the enriched model and answers
/// dependency questions through the reference graph.
pub struct ModelAssembler {
    graph: EquationGraph,
}

/// How far a dependency trace walks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceStrategy {
    /// Direct references only (depth=1)
    Direct,

    /// References and their references (depth=2)
    Extended,

    /// Three levels (depth=3)
    Deep,

    /// Custom depth
    Custom(usize),
}

impl TraceStrategy {
    pub const fn depth(self) -> usize {
        match self {
            TraceStrategy::Direct => 1,
            TraceStrategy::Extended => 2,
            TraceStrategy::Deep => 3,
            TraceStrategy::Custom(d) => d,
        }
    }
}

/// Read-only model handed to a renderer, with its generation timestamp
#[derive(Debug, Clone, Serialize)]
pub struct AssembledModel {
    regions: Vec<Region>,
    generated_at: String,
    stats: ModelStats,
}

impl AssembledModel {
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn equations(&self) -> impl Iterator<Item = &Equation> {
        self.regions.iter().flat_map(|r| r.equations.iter())
    }

    pub fn generated_at(&self) -> &str {
        &self.generated_at
    }

    pub fn stats(&self) -> &ModelStats {
        &self.stats
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelStats {
    pub equations: usize,
    pub regions: usize,
    pub references: usize,
}

/// Equation reached by a trace
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TracedEquation {
    pub name: String,
    pub distance: usize,
    pub region: Option<String>,
}

/// Upstream and downstream neighbourhood of one equation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EquationTrace {
    pub equation: String,
    /// Equations this one depends on
    pub upstream: Vec<TracedEquation>,
    /// Equations depending on this one
    pub downstream: Vec<TracedEquation>,
}

impl ModelAssembler {
    pub fn new(graph: EquationGraph) -> Self {
        Self { graph }
    }

    /// Freeze `model` for rendering
    pub fn assemble(&self, model: Model, generated_at: impl Into<String>) -> AssembledModel {
        let stats = self.stats_for(&model);
        log::info!(
            "Assembled model: {} equations in {} regions, {} references",
            stats.equations,
            stats.regions,
            stats.references
        );
        AssembledModel {
            regions: model.regions,
            generated_at: generated_at.into(),
            stats,
        }
    }

    fn stats_for(&self, model: &Model) -> ModelStats {
        ModelStats {
            equations: model.equation_count(),
            regions: model.region_count(),
            references: self.graph.edge_count(),
        }
    }

    /// Trace dependencies of the equation `name`
    pub fn trace(
        &self,
        model: &Model,
        name: &str,
        strategy: TraceStrategy,
    ) -> Result<EquationTrace> {
        let canonical = name.to_lowercase();
        let node = self
            .graph
            .find_node(&canonical)
            .ok_or_else(|| GraphError::EquationNotFound(name.to_string()))?;

        let depth = strategy.depth();
        let collect = |direction: Direction| -> Vec<TracedEquation> {
            self.graph
                .related_nodes(node, depth, direction)
                .into_iter()
                .filter_map(|(idx, distance)| {
                    let data = self.graph.get_node(idx)?;
                    let region = model
                        .regions
                        .get(data.region)
                        .and_then(|r| r.name.clone());
                    Some(TracedEquation {
                        name: data.name.clone(),
                        distance,
                        region,
                    })
                })
                .collect()
        };

        Ok(EquationTrace {
            equation: canonical,
            upstream: collect(Direction::Outgoing),
            downstream: collect(Direction::Incoming),
        })
    }

    pub fn graph(&self) -> &EquationGraph {
        &self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::LinkBuilder;
    use modeldoc_parser::{parse_model, Grammar};
    use pretty_assertions::assert_eq;

    const MODEL: &str = "ADDEQ,\n--region Supply\ny: y = k + l,\nk: k = 0.9*k + i,\n--endregion\n--region Demand\ni: i = 0.2*y,\nc: c = y - i;";

    fn assembler() -> (ModelAssembler, Model) {
        let model = parse_model(&Grammar::new(), MODEL, "test.inp").unwrap();
        let linked = LinkBuilder::new().link(model);
        (ModelAssembler::new(linked.graph), linked.model)
    }

    #[test]
    fn assemble_reports_stats_and_timestamp() {
        let (assembler, model) = assembler();
        let assembled = assembler.assemble(model, "18/10/2026 - 10h38");
        assert_eq!(
            *assembled.stats(),
            ModelStats {
                equations: 4,
                regions: 2,
                references: 5,
            }
        );
        assert_eq!(assembled.generated_at(), "18/10/2026 - 10h38");
        assert_eq!(assembled.regions()[1].name.as_deref(), Some("Demand"));
        assert_eq!(assembled.equations().count(), 4);
    }

    #[test]
    fn trace_walks_both_directions() {
        let (assembler, model) = assembler();
        let trace = assembler.trace(&model, "I", TraceStrategy::Direct).unwrap();
        assert_eq!(trace.equation, "i");
        let up: Vec<_> = trace.upstream.iter().map(|t| t.name.as_str()).collect();
        let down: Vec<_> = trace.downstream.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(up, vec!["y"]);
        assert_eq!(down, vec!["k", "c"]);
        assert_eq!(trace.upstream[0].region.as_deref(), Some("Supply"));
    }

    #[test]
    fn deeper_trace_reports_distance() {
        let (assembler, model) = assembler();
        let trace = assembler.trace(&model, "c", TraceStrategy::Extended).unwrap();
        let up: Vec<_> = trace
            .upstream
            .iter()
            .map(|t| (t.name.as_str(), t.distance))
            .collect();
        assert_eq!(up, vec![("y", 1), ("i", 1), ("k", 2)]);
        assert!(trace.downstream.is_empty());
    }

    #[test]
    fn unknown_equation_is_an_error() {
        let (assembler, model) = assembler();
        let err = assembler.trace(&model, "nope", TraceStrategy::Deep).unwrap_err();
        assert_eq!(err.to_string(), "Equation not found: nope");
    }

    #[test]
    fn strategy_depths() {
        assert_eq!(TraceStrategy::Direct.depth(), 1);
        assert_eq!(TraceStrategy::Extended.depth(), 2);
        assert_eq!(TraceStrategy::Deep.depth(), 3);
        assert_eq!(TraceStrategy::Custom(7).depth(), 7);
    }
}
