use serde::{Deserialize, Serialize};

/// Placement modifier of an `ADDEQ` block (`ADDEQ TOP,` / `ADDEQ BOTTOM,`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Top,
    Bottom,
}

impl Placement {
    pub const fn as_str(self) -> &'static str {
        match self {
            Placement::Top => "top",
            Placement::Bottom => "bottom",
        }
    }
}

/// Equation as recognized by the grammar, before normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEquation {
    /// Identifier before the `:`, original casing
    pub name: String,

    /// Text between `:` and the first unescaped `=`
    pub left_side: String,

    /// Text between `=` and the next `,` or block terminator
    pub right_side: String,
}

/// Group of parsed equations, optionally introduced by a `--region` marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRegion {
    /// Remainder of the `--region` line, trimmed
    pub name: Option<String>,

    /// Placement of the enclosing block
    pub placement: Option<Placement>,

    pub equations: Vec<ParsedEquation>,
}

/// A named relation of the model, enriched by each pipeline stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equation {
    /// Canonical lowercase identifier, the cross-reference key
    pub name: String,

    pub left_side: String,

    pub right_side: String,

    /// Display text: `left_side = right_side`, then rewritten by the
    /// linker (anchors) and by parameter substitution
    pub whole_equation: String,

    /// Names of other equations referenced by this one, in model order
    #[serde(default)]
    pub variables: Vec<String>,

    /// Names of equations referencing this one, in model order
    #[serde(default)]
    pub appears_in: Vec<String>,

    /// Human readable label from the legend table
    #[serde(default)]
    pub legend: Option<String>,
}

impl Equation {
    /// Check whether `name` is a forward dependency of this equation
    #[must_use]
    pub fn depends_on(&self, name: &str) -> bool {
        self.variables.iter().any(|v| v == name)
    }

    /// Check whether `name` references this equation
    #[must_use]
    pub fn is_referenced_by(&self, name: &str) -> bool {
        self.appears_in.iter().any(|v| v == name)
    }
}

/// Named or anonymous grouping of equations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Label from the `--region` marker, `None` for anonymous regions
    pub name: Option<String>,

    #[serde(default)]
    pub placement: Option<Placement>,

    pub equations: Vec<Equation>,
}

impl Region {
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.name.is_none()
    }
}

/// Ordered regions covering the whole input file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub regions: Vec<Region>,
}

impl Model {
    #[must_use]
    pub const fn new(regions: Vec<Region>) -> Self {
        Self { regions }
    }

    /// All equations in region order, then equation order within a region
    pub fn equations(&self) -> impl Iterator<Item = &Equation> {
        self.regions.iter().flat_map(|region| region.equations.iter())
    }

    pub fn equations_mut(&mut self) -> impl Iterator<Item = &mut Equation> {
        self.regions
            .iter_mut()
            .flat_map(|region| region.equations.iter_mut())
    }

    /// Equation names in model order
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.equations().map(|eq| eq.name.clone()).collect()
    }

    /// Find the first equation with the given canonical name
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Equation> {
        self.equations().find(|eq| eq.name == name)
    }

    #[must_use]
    pub fn equation_count(&self) -> usize {
        self.regions.iter().map(|r| r.equations.len()).sum()
    }

    #[must_use]
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.equation_count() == 0
    }

    /// Produce a new model by transforming every equation in order
    #[must_use]
    pub fn map_equations<F>(self, mut f: F) -> Self
    where
        F: FnMut(Equation) -> Equation,
    {
        let regions = self
            .regions
            .into_iter()
            .map(|region| Region {
                equations: region.equations.into_iter().map(&mut f).collect(),
                ..region
            })
            .collect();
        Self { regions }
    }
}
