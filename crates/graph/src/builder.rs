use crate::types::*;
use modeldoc_parser::markup::{anchor, AnchorKind};
use modeldoc_parser::text::{identifier_spans, rewrite_identifiers};
use modeldoc_parser::{Equation, Model};
use petgraph::graph::NodeIndex;
use std::collections::BTreeMap;

/// Builds the reference graph of a model and writes the links back into it
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkBuilder;

impl LinkBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the reference graph from normalized equations
    pub fn build(&self, model: &Model) -> EquationGraph {
        let mut graph = EquationGraph::new();

        // Phase 1: one node per equation, in model order
        let mut order: Vec<NodeIndex> = Vec::with_capacity(model.equation_count());
        for (region_idx, region) in model.regions.iter().enumerate() {
            for (position, equation) in region.equations.iter().enumerate() {
                let idx = graph.add_node(EquationNode {
                    name: equation.name.clone(),
                    region: region_idx,
                    position,
                });
                order.push(idx);
            }
        }

        // Phase 2: scan each equation once against the name index
        for (equation, &from_idx) in model.equations().zip(order.iter()) {
            for (to_idx, occurrences) in Self::scan_references(&graph, equation) {
                graph.add_edge(from_idx, to_idx, Reference { occurrences });
            }
        }

        log::info!(
            "Built reference graph: {} equations, {} references",
            graph.node_count(),
            graph.edge_count()
        );

        graph
    }

    /// Referenced equations of `equation`, keyed (and therefore ordered) by
    /// node index, with their occurrence counts. The equation's own name is
    /// never a reference.
    fn scan_references(graph: &EquationGraph, equation: &Equation) -> BTreeMap<NodeIndex, usize> {
        let text = &equation.whole_equation;
        let mut found = BTreeMap::new();
        for (start, end) in identifier_spans(text) {
            let token = &text[start..end];
            if token == equation.name {
                continue;
            }
            if let Some(idx) = graph.find_node(token) {
                *found.entry(idx).or_insert(0) += 1;
            }
        }
        found
    }

    /// Link a normalized model: fill `variables` and `appears_in`, and
    /// rewrite every known name in `whole_equation` into an anchor.
    pub fn link(&self, model: Model) -> LinkedModel {
        let graph = self.build(&model);

        let mut node_iter = graph.graph.node_indices();
        let model = model.map_equations(|equation| {
            let Some(idx) = node_iter.next() else {
                return equation;
            };
            Self::link_equation(&graph, idx, equation)
        });

        LinkedModel { model, graph }
    }

    fn link_equation(graph: &EquationGraph, idx: NodeIndex, equation: Equation) -> Equation {
        let variables: Vec<String> = graph
            .dependencies(idx)
            .into_iter()
            .map(|dep| graph.name_of(dep).to_string())
            .collect();
        let appears_in: Vec<String> = graph
            .dependents(idx)
            .into_iter()
            .map(|user| graph.name_of(user).to_string())
            .collect();

        let own_name = equation.name.as_str();
        let whole_equation = rewrite_identifiers(&equation.whole_equation, |token| {
            if token == own_name {
                Some(anchor(token, AnchorKind::SelfReference))
            } else if graph.find_node(token).is_some() {
                log::debug!("Making a link on {token} in {own_name}");
                Some(anchor(token, AnchorKind::Reference))
            } else {
                None
            }
        });

        Equation {
            whole_equation,
            variables,
            appears_in,
            ..equation
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modeldoc_parser::{parse_model, Grammar};
    use pretty_assertions::assert_eq;

    fn link(text: &str) -> LinkedModel {
        let model = parse_model(&Grammar::new(), text, "test.inp").unwrap();
        LinkBuilder::new().link(model)
    }

    #[test]
    fn test_build_simple_graph() {
        let linked = link("ADDEQ, x: x = y + 1.5, y: y = 2*x;");
        assert_eq!(linked.graph.node_count(), 2);
        assert_eq!(linked.graph.edge_count(), 2);

        let x = linked.model.find("x").unwrap();
        assert_eq!(x.variables, vec!["y"]);
        assert_eq!(x.appears_in, vec!["y"]);
        assert_eq!(
            x.whole_equation,
            r##"<a href="#x" class="main_variable">x</a> = <a href="#y">y</a> + 1.5"##
        );
    }

    #[test]
    fn boundary_prevents_partial_name_links() {
        let linked = link("ADDEQ, cd_ef: cd_ef = 1, ab_cd_ef: ab_cd_ef = 2, z: z = ab_cd_ef * 3;");
        let z = linked.model.find("z").unwrap();
        assert_eq!(z.variables, vec!["ab_cd_ef"]);
        assert!(linked.model.find("cd_ef").unwrap().appears_in.is_empty());
        assert_eq!(linked.model.find("ab_cd_ef").unwrap().appears_in, vec!["z"]);
        assert!(!z.whole_equation.contains(r##"href="#cd_ef""##));
    }

    #[test]
    fn self_reference_is_marked_but_not_a_variable() {
        let linked = link("ADDEQ, k: k = 0.9*k(-1) + inv, inv: inv = 1;");
        let k = linked.model.find("k").unwrap();
        assert_eq!(k.variables, vec!["inv"]);
        assert_eq!(
            k.whole_equation,
            concat!(
                r##"<a href="#k" class="main_variable">k</a> = 0.9*"##,
                r##"<a href="#k" class="main_variable">k</a>(-1) + <a href="#inv">inv</a>"##
            )
        );
        assert!(!k.appears_in.contains(&"k".to_string()));
    }

    #[test]
    fn variables_follow_model_order_not_text_order() {
        let linked = link("ADDEQ, a: a = 1, b: b = 2, c: c = b + a + b;");
        let c = linked.model.find("c").unwrap();
        assert_eq!(c.variables, vec!["a", "b"]);
        let edge = linked
            .graph
            .graph
            .find_edge(
                linked.graph.find_node("c").unwrap(),
                linked.graph.find_node("b").unwrap(),
            )
            .unwrap();
        assert_eq!(linked.graph.graph[edge].occurrences, 2);
    }

    #[test]
    fn appears_in_follows_model_order_across_regions() {
        let text = "ADDEQ,\n--region One\nz: z = t,\n--endregion\n--region Two\nt: t = 1,\na: a = t;";
        let linked = link(text);
        assert_eq!(linked.model.find("t").unwrap().appears_in, vec!["z", "a"]);
    }

    #[test]
    fn mixed_case_names_link_after_normalization() {
        let linked = link("ADDEQ, GDP: GDP = Cons + 1, CONS: cons = 2;");
        assert_eq!(linked.model.find("gdp").unwrap().variables, vec!["cons"]);
        assert_eq!(linked.model.find("cons").unwrap().appears_in, vec!["gdp"]);
    }

    #[test]
    fn names_that_look_like_markup_do_not_corrupt_anchors() {
        let linked = link("ADDEQ, a: a = href + class, href: href = 1, class: class = 2;");
        let a = linked.model.find("a").unwrap();
        assert_eq!(
            a.whole_equation,
            concat!(
                r##"<a href="#a" class="main_variable">a</a> = "##,
                r##"<a href="#href">href</a> + <a href="#class">class</a>"##
            )
        );
    }

    #[test]
    fn duplicate_names_link_to_first_definition() {
        let linked = link("ADDEQ, d: d = 1, d: d = 2, u: u = d;");
        assert_eq!(linked.graph.node_count(), 3);
        let first = linked.graph.find_node("d").unwrap();
        assert_eq!(linked.graph.get_node(first).unwrap().position, 0);
        assert_eq!(linked.model.regions[0].equations[0].appears_in, vec!["u"]);
        assert!(linked.model.regions[0].equations[1].appears_in.is_empty());
    }
}
