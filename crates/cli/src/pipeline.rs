use crate::config::BuildSettings;
use anyhow::{Context, Result};
use modeldoc_enrich::{LegendAnnotator, LookupTable, ParameterSubstitution};
use modeldoc_graph::{AssembledModel, LinkBuilder, LinkedModel, ModelAssembler};
use modeldoc_parser::{parse_model, read_model_file, Grammar};
use std::path::Path;

/// parse → normalize → link → substitute → annotate → assemble
pub struct Pipeline {
    grammar: Grammar,
    linker: LinkBuilder,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            grammar: Grammar::new(),
            linker: LinkBuilder::new(),
        }
    }

    /// Read, parse and link a model file
    pub fn link(&self, input: &Path) -> Result<LinkedModel> {
        log::info!("Parsing input file for equations: {}", input.display());
        let text = read_model_file(input)?;
        let model = parse_model(&self.grammar, &text, &input.display().to_string())?;
        log::info!("{} equations found.", model.equation_count());
        Ok(self.linker.link(model))
    }

    /// Full run for `build`; the parameter and legend stages only run when
    /// their table is configured
    pub fn build(
        &self,
        input: &Path,
        settings: &BuildSettings,
        generated_at: String,
    ) -> Result<AssembledModel> {
        let LinkedModel { mut model, graph } = self.link(input)?;

        if let Some(path) = &settings.params {
            let table = load_table(path, "parameter")?;
            model = ParameterSubstitution::new(table).apply_model(model);
        }
        if let Some(path) = &settings.legends {
            let table = load_table(path, "legend")?;
            model = LegendAnnotator::new(table).apply_model(model);
        }

        for region in &model.regions {
            log::debug!(
                "Region: {}",
                region.name.as_deref().unwrap_or("(anonymous)")
            );
        }

        Ok(ModelAssembler::new(graph).assemble(model, generated_at))
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

fn load_table(path: &Path, kind: &str) -> Result<LookupTable> {
    LookupTable::load(path).with_context(|| format!("Failed to load {kind} table {}", path.display()))
}
