use crate::types::{Equation, Model, ParsedEquation, ParsedRegion, Region};

/// Canonical form of one parsed equation: trimmed sides, reassembled
/// `whole_equation`, everything lower-cased.
#[must_use]
pub fn normalize_equation(parsed: ParsedEquation) -> Equation {
    let left_side = parsed.left_side.trim().to_lowercase();
    let right_side = parsed.right_side.trim().to_lowercase();
    let whole_equation = format!("{left_side} = {right_side}");

    Equation {
        name: parsed.name.to_lowercase(),
        left_side,
        right_side,
        whole_equation,
        variables: Vec::new(),
        appears_in: Vec::new(),
        legend: None,
    }
}

/// Normalize every parsed region into the model handed to the linker
#[must_use]
pub fn normalize(regions: Vec<ParsedRegion>) -> Model {
    let regions = regions
        .into_iter()
        .map(|region| Region {
            name: region.name,
            placement: region.placement,
            equations: region
                .equations
                .into_iter()
                .map(normalize_equation)
                .collect(),
        })
        .collect();
    Model::new(regions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parsed(name: &str, left: &str, right: &str) -> ParsedEquation {
        ParsedEquation {
            name: name.to_string(),
            left_side: left.to_string(),
            right_side: right.to_string(),
        }
    }

    #[test]
    fn trims_reassembles_and_lowercases() {
        let eq = normalize_equation(parsed("GDP_R", "  Log(GDP_R) ", "\n  C + I\t"));
        assert_eq!(eq.name, "gdp_r");
        assert_eq!(eq.left_side, "log(gdp_r)");
        assert_eq!(eq.right_side, "c + i");
        assert_eq!(eq.whole_equation, "log(gdp_r) = c + i");
        assert!(eq.variables.is_empty());
        assert!(eq.appears_in.is_empty());
        assert_eq!(eq.legend, None);
    }

    #[test]
    fn region_names_keep_their_casing() {
        let model = normalize(vec![ParsedRegion {
            name: Some("Foreign Trade".to_string()),
            placement: None,
            equations: vec![parsed("X", "x", "m")],
        }]);
        assert_eq!(model.regions[0].name.as_deref(), Some("Foreign Trade"));
        assert_eq!(model.names(), vec!["x"]);
    }
}
