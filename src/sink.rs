use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::Catalog;
use crate::error::CatalogError;
use crate::settings::OutputSettings;

/// Writes each catalog to `<dir>/<prefix><source lower-cased>.txt`.
pub struct FileSink {
    dir: PathBuf,
    prefix: String,
}

impl FileSink {
    pub fn new(settings: &OutputSettings) -> Self {
        FileSink {
            dir: settings.dir.clone(),
            prefix: settings.prefix.clone(),
        }
    }

    pub fn path_for(&self, source: &str) -> PathBuf {
        self.dir
            .join(format!("{}{}.txt", self.prefix, source.to_lowercase()))
    }

    /// Replace the source's file with one `name|url` line per entity.
    pub fn write(&self, catalog: &Catalog) -> Result<PathBuf, CatalogError> {
        let path = self.path_for(&catalog.source);
        let sink_err = |e: std::io::Error| CatalogError::Sink {
            path: path.clone(),
            source: e,
        };

        fs::create_dir_all(&self.dir).map_err(sink_err)?;
        fs::write(&path, render(catalog)).map_err(sink_err)?;
        Ok(path)
    }

    /// Entity count in the file a previous run left behind, if any.
    pub fn previous_count(&self, source: &str) -> Option<usize> {
        count_entries(&self.path_for(source)).ok()
    }
}

pub fn render(catalog: &Catalog) -> String {
    catalog
        .entities
        .iter()
        .map(|e| e.to_line() + "\n")
        .collect()
}

/// Non-blank lines in a catalog file.
pub fn count_entries(path: &Path) -> std::io::Result<usize> {
    let text = fs::read_to_string(path)?;
    Ok(text.lines().filter(|l| !l.trim().is_empty()).count())
}
