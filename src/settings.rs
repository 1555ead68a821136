use std::path::{Path, PathBuf};

use config::Config;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::rules::RuleSet;

pub const DEFAULT_CONFIG_FILE: &str = "catalog.toml";
const ENV_PREFIX: &str = "CATALOG";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Prepended verbatim to every href to form the canonical URL.
    pub base_url: String,
    pub input: InputSettings,
    pub output: OutputSettings,
    pub rules: RuleSet,
    /// Exact-name lookups reported after a run.
    pub checks: Vec<Check>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    pub dir: PathBuf,
    pub extensions: Vec<String>,
    /// Explicit source order; when empty every matching file in `dir` is used.
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub dir: PathBuf,
    pub prefix: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Check {
    pub source: String,
    pub name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            base_url: "https://old-wiki.warthunder.com".into(),
            input: InputSettings::default(),
            output: OutputSettings::default(),
            rules: RuleSet::default(),
            checks: vec![Check {
                source: "USA".into(),
                name: "F-8E".into(),
            }],
        }
    }
}

impl Default for InputSettings {
    fn default() -> Self {
        InputSettings {
            dir: PathBuf::from("data/raw"),
            extensions: vec!["html".into(), "htm".into(), "txt".into()],
            sources: Vec::new(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        OutputSettings {
            dir: PathBuf::from("data/pages"),
            prefix: "aircraft_pages_".into(),
        }
    }
}

impl Check {
    /// Parse `SOURCE=NAME`.
    pub fn parse(raw: &str) -> Option<Check> {
        let (source, name) = raw.split_once('=')?;
        let (source, name) = (source.trim(), name.trim());
        if source.is_empty() || name.is_empty() {
            return None;
        }
        Some(Check {
            source: source.to_string(),
            name: name.to_string(),
        })
    }
}

/// The TOML file, then `CATALOG__*` environment variables, over serde defaults.
///
/// An explicit `path` must exist; the default `catalog.toml` is optional.
pub fn load(path: Option<&Path>) -> Result<Settings, CatalogError> {
    let (file, required) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    let settings = Config::builder()
        .add_source(config::File::from(file).required(required))
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?
        .try_deserialize()?;
    Ok(settings)
}
