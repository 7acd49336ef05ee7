use crate::table::LookupTable;
use modeldoc_parser::text::contains_bound;
use modeldoc_parser::{Equation, Model};

/// Attaches human-readable labels to equations whose name contains a legend
/// key. When several keys match, the last one in table order wins.
#[derive(Debug, Clone)]
pub struct LegendAnnotator {
    table: LookupTable,
}

impl LegendAnnotator {
    pub fn new(table: LookupTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &LookupTable {
        &self.table
    }

    /// Legend for an equation name, if any key matches
    pub fn legend_for(&self, name: &str) -> Option<&str> {
        let mut legend = None;
        for (key, value) in self.table.iter() {
            if contains_bound(name, key) {
                log::debug!("Inserting legend {key} corresponding to {name}");
                legend = Some(value);
            }
        }
        legend
    }

    pub fn apply(&self, equation: Equation) -> Equation {
        match self.legend_for(&equation.name) {
            Some(legend) => Equation {
                legend: Some(legend.to_string()),
                ..equation
            },
            None => equation,
        }
    }

    pub fn apply_model(&self, model: Model) -> Model {
        log::info!("Inserting legends ({} entries)", self.table.len());
        model.map_equations(|equation| self.apply(equation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modeldoc_parser::{parse_model, Grammar};
    use pretty_assertions::assert_eq;

    fn annotator(pairs: &[(&str, &str)]) -> LegendAnnotator {
        LegendAnnotator::new(pairs.iter().copied().collect())
    }

    #[test]
    fn matching_key_sets_legend() {
        let legends = annotator(&[("GDP", "Gross domestic product")]);
        let model = parse_model(&Grammar::new(), "ADDEQ, GDP: gdp = c + i, c: c = 1;", "m").unwrap();
        let model = legends.apply_model(model);
        assert_eq!(
            model.find("gdp").unwrap().legend.as_deref(),
            Some("Gross domestic product")
        );
        assert_eq!(model.find("c").unwrap().legend, None);
    }

    #[test]
    fn key_must_be_boundary_bound_in_name() {
        let legends = annotator(&[("gdp", "GDP")]);
        assert_eq!(legends.legend_for("gdp_r"), None);
        assert_eq!(legends.legend_for("rgdp"), None);
        assert_eq!(legends.legend_for("gdp"), Some("GDP"));
    }

    #[test]
    fn last_matching_key_wins() {
        let legends = annotator(&[("k", "first"), ("x", "other"), ("K", "second")]);
        // "K" folds onto "k": position of the first entry, value of the last
        assert_eq!(legends.legend_for("k"), Some("second"));
    }

    #[test]
    fn empty_table_leaves_equations_untouched() {
        let legends = annotator(&[]);
        let model = parse_model(&Grammar::new(), "ADDEQ, a: a = 1;", "m").unwrap();
        assert_eq!(legends.apply_model(model.clone()), model);
    }
}
