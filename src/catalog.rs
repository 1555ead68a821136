use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::CatalogError;
use crate::parser;
use crate::provider::DocumentProvider;
use crate::rules::Rules;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    pub name: String,
    pub url: String,
}

impl Entity {
    /// `name|url`, the on-disk line format.
    pub fn to_line(&self) -> String {
        format!("{}|{}", self.name, self.url)
    }
}

/// Unique-by-URL entities of one source, sorted case-insensitively by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    pub source: String,
    pub entities: Vec<Entity>,
}

impl Catalog {
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entity whose name equals `name` exactly.
    pub fn lookup(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }
}

/// Everything one run produced: catalogs in provider order plus per-source failures.
#[derive(Debug, Default)]
pub struct CatalogSet {
    pub catalogs: Vec<Catalog>,
    pub failures: Vec<(String, CatalogError)>,
}

impl CatalogSet {
    pub fn total(&self) -> usize {
        self.catalogs.iter().map(Catalog::len).sum()
    }

    /// Source identifiers match case-insensitively.
    pub fn get(&self, source: &str) -> Option<&Catalog> {
        self.catalogs
            .iter()
            .find(|c| c.source.eq_ignore_ascii_case(source))
    }
}

/// Run the extraction pipeline over every source the provider lists.
///
/// Sources share no state and are processed in parallel; a document that fails
/// to load is recorded and the remaining sources still run.
pub fn build_catalogs(
    provider: &dyn DocumentProvider,
    base_url: &str,
    rules: &Rules,
) -> Result<CatalogSet, CatalogError> {
    let sources = provider.sources()?;
    info!("Building catalogs for {} sources", sources.len());

    let results: Vec<(String, Result<Catalog, CatalogError>)> = sources
        .into_par_iter()
        .map(|source| {
            let result = provider.load(&source).map(|doc| Catalog {
                entities: parser::process_document(&doc, base_url, rules),
                source: source.clone(),
            });
            (source, result)
        })
        .collect();

    let mut set = CatalogSet::default();
    for (source, result) in results {
        match result {
            Ok(catalog) => {
                info!(source = %catalog.source, entities = catalog.len(), "catalog built");
                set.catalogs.push(catalog);
            }
            Err(e) => {
                warn!("Skipping {}: {}", source, e);
                set.failures.push((source, e));
            }
        }
    }
    Ok(set)
}

// ── Tests ──
