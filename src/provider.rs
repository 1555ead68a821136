#[cfg(test)]
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::CatalogError;
use crate::settings::InputSettings;

/// Supplies one raw document per source identifier.
pub trait DocumentProvider: Sync {
    /// Source identifiers, in the order catalogs should be reported.
    fn sources(&self) -> Result<Vec<String>, CatalogError>;
    fn load(&self, source: &str) -> Result<String, CatalogError>;
}

/// Documents stored as `<dir>/<source>.<ext>`.
pub struct DirProvider {
    dir: PathBuf,
    extensions: Vec<String>,
    sources: Vec<String>,
}

impl DirProvider {
    pub fn new(settings: &InputSettings) -> Self {
        DirProvider {
            dir: settings.dir.clone(),
            extensions: settings.extensions.clone(),
            sources: settings.sources.clone(),
        }
    }

    fn has_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
            .unwrap_or(false)
    }

    /// `<source>.<ext>`, falling back to the lower-cased stem.
    fn find(&self, source: &str) -> Option<PathBuf> {
        let lower = source.to_lowercase();
        let found = [source, lower.as_str()]
            .into_iter()
            .flat_map(|stem| {
                self.extensions
                    .iter()
                    .map(move |ext| self.dir.join(format!("{}.{}", stem, ext)))
            })
            .find(|p| p.is_file());
        found
    }

    fn provider_err(&self, source: &str, reason: impl ToString) -> CatalogError {
        CatalogError::Provider {
            source_id: source.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl DocumentProvider for DirProvider {
    fn sources(&self) -> Result<Vec<String>, CatalogError> {
        if !self.sources.is_empty() {
            return Ok(self.sources.clone());
        }

        let entries = fs::read_dir(&self.dir)
            .map_err(|e| self.provider_err(&self.dir.display().to_string(), e))?;

        let mut found: Vec<String> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && self.has_extension(p))
            .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(String::from))
            .collect();
        found.sort();
        found.dedup();

        if found.is_empty() {
            warn!("No documents found in {:?}", self.dir);
        }
        Ok(found)
    }

    fn load(&self, source: &str) -> Result<String, CatalogError> {
        let path = self
            .find(source)
            .ok_or_else(|| self.provider_err(source, format!("no document in {:?}", self.dir)))?;
        debug!("Loading {} from {:?}", source, path);
        fs::read_to_string(&path).map_err(|e| self.provider_err(source, e))
    }
}

/// In-memory documents, reported in key order.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryProvider {
    docs: BTreeMap<String, String>,
}

#[cfg(test)]
impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, source: &str, doc: &str) -> Self {
        self.docs.insert(source.to_string(), doc.to_string());
        self
    }
}

#[cfg(test)]
impl DocumentProvider for MemoryProvider {
    fn sources(&self) -> Result<Vec<String>, CatalogError> {
        Ok(self.docs.keys().cloned().collect())
    }

    fn load(&self, source: &str) -> Result<String, CatalogError> {
        self.docs
            .get(source)
            .cloned()
            .ok_or_else(|| CatalogError::Provider {
                source_id: source.to_string(),
                reason: "unknown source".into(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(dir: &Path, sources: &[&str]) -> InputSettings {
        InputSettings {
            dir: dir.to_path_buf(),
            sources: sources.iter().map(|s| s.to_string()).collect(),
            ..InputSettings::default()
        }
    }

    #[test]
    fn discovers_fixture_files() {
        let p = DirProvider::new(&settings(Path::new("tests/fixtures"), &[]));
        assert_eq!(p.sources().unwrap(), vec!["germany", "israel", "usa"]);
        assert!(p.load("usa").unwrap().contains("P-51"));
    }

    #[test]
    fn explicit_order_wins() {
        let p = DirProvider::new(&settings(Path::new("tests/fixtures"), &["usa", "israel"]));
        assert_eq!(p.sources().unwrap(), vec!["usa", "israel"]);
    }

    #[test]
    fn skips_other_extensions() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("usa.html"), "x").unwrap();
        fs::write(dir.path().join("notes.md"), "x").unwrap();
        let p = DirProvider::new(&settings(dir.path(), &[]));
        assert_eq!(p.sources().unwrap(), vec!["usa"]);
    }

    #[test]
    fn configured_source_matches_lowercase_file() {
        let p = DirProvider::new(&settings(Path::new("tests/fixtures"), &["USA", "Israel"]));
        assert_eq!(p.sources().unwrap(), vec!["USA", "Israel"]);
        assert!(p.load("USA").unwrap().contains("P-51"));
        assert!(p.load("Israel").unwrap().contains("Kurnass"));
    }

    #[test]
    fn exact_stem_preferred_over_lowercase() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("USA.html"), "upper").unwrap();
        fs::write(dir.path().join("usa.html"), "lower").unwrap();
        let p = DirProvider::new(&settings(dir.path(), &["USA"]));
        // On a case-insensitive filesystem both names read the same file.
        let upper = fs::read_to_string(dir.path().join("USA.html")).unwrap();
        assert_eq!(p.load("USA").unwrap(), upper);
    }

    #[test]
    fn missing_document_is_provider_error() {
        let p = DirProvider::new(&settings(Path::new("tests/fixtures"), &["france"]));
        let err = p.load("france").unwrap_err();
        assert!(matches!(err, CatalogError::Provider { ref source_id, .. } if source_id == "france"));
    }

    #[test]
    fn memory_provider() {
        let p = MemoryProvider::new().with("USA", "a").with("Germany", "b");
        assert_eq!(p.sources().unwrap(), vec!["Germany", "USA"]);
        assert_eq!(p.load("USA").unwrap(), "a");
        assert!(p.load("Japan").is_err());
    }
}
