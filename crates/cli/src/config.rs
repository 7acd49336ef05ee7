use anyhow::{anyhow, Context, Result};
use chrono::format::{Item, StrftimeItems};
use clap::ValueEnum;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration file picked up from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "modeldoc.toml";

pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%d/%m/%Y - %Hh%M";

pub const DEFAULT_TITLE: &str = "Model documentation";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Html,
    Json,
}

impl OutputFormat {
    pub const fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Json => "json",
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    params: Option<PathBuf>,
    legends: Option<PathBuf>,
    format: Option<OutputFormat>,
    title: Option<String>,
    timestamp_format: Option<String>,
}

/// Values given on the command line; they win over the configuration file
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub params: Option<PathBuf>,
    pub legends: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub title: Option<String>,
}

/// Effective settings of a `build` run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildSettings {
    pub params: Option<PathBuf>,
    pub legends: Option<PathBuf>,
    pub format: OutputFormat,
    pub title: String,
    pub timestamp_format: String,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            params: None,
            legends: None,
            format: OutputFormat::default(),
            title: DEFAULT_TITLE.to_string(),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

impl BuildSettings {
    /// Merge defaults, the optional configuration file and command-line
    /// overrides, in increasing priority
    pub fn resolve(config_file: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let defaults = Self::default();
        let raw = match config_file {
            Some(path) => load_raw(path)?,
            None => RawConfig::default(),
        };
        // table paths in the file are relative to the file itself
        let base = config_file
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let settings = Self {
            params: overrides
                .params
                .or_else(|| raw.params.map(|p| base.join(p))),
            legends: overrides
                .legends
                .or_else(|| raw.legends.map(|p| base.join(p))),
            format: overrides.format.or(raw.format).unwrap_or(defaults.format),
            title: overrides.title.or(raw.title).unwrap_or(defaults.title),
            timestamp_format: raw.timestamp_format.unwrap_or(defaults.timestamp_format),
        };
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if StrftimeItems::new(&self.timestamp_format).any(|item| matches!(item, Item::Error)) {
            return Err(anyhow!(
                "timestamp_format {:?} is not a valid strftime format",
                self.timestamp_format
            ));
        }
        Ok(())
    }
}

fn load_raw(path: &Path) -> Result<RawConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("Invalid config {}", path.display()))
}

/// Explicit `--config` path, or `modeldoc.toml` in `cwd` when it exists
pub fn discover_config(explicit: Option<&Path>, cwd: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let candidate = cwd.join(DEFAULT_CONFIG_FILE);
    candidate.is_file().then_some(candidate)
}
