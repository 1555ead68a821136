use std::path::PathBuf;

use serde::Serialize;

use crate::catalog::{CatalogSet, Entity};
use crate::settings::Check;
use crate::sink;

const SAMPLE_SIZE: usize = 5;

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub sources: Vec<SourceReport>,
    pub checks: Vec<CheckResult>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct SourceReport {
    pub source: String,
    pub count: usize,
    /// Where the catalog was written; `None` for empty or failed sources.
    pub path: Option<PathBuf>,
    /// Count in the file left by the previous run.
    pub previous: Option<usize>,
    pub samples: Vec<Entity>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CheckResult {
    pub source: String,
    pub name: String,
    pub found: Option<Entity>,
}

impl SourceReport {
    pub fn failed(source: &str, error: String) -> Self {
        SourceReport {
            source: source.to_string(),
            count: 0,
            path: None,
            previous: None,
            samples: Vec::new(),
            error: Some(error),
        }
    }

    /// Signed change against the previous run, with percentage when defined.
    fn delta(&self) -> Option<(i64, Option<f64>)> {
        let prev = self.previous?;
        let diff = self.count as i64 - prev as i64;
        let pct = (prev > 0).then(|| diff as f64 / prev as f64 * 100.0);
        Some((diff, pct))
    }
}

pub fn run_checks(set: &CatalogSet, checks: &[Check]) -> Vec<CheckResult> {
    checks
        .iter()
        .map(|c| CheckResult {
            source: c.source.clone(),
            name: c.name.clone(),
            found: set
                .get(&c.source)
                .and_then(|cat| cat.lookup(&c.name))
                .cloned(),
        })
        .collect()
}

pub fn samples(entities: &[Entity]) -> Vec<Entity> {
    entities.iter().take(SAMPLE_SIZE).cloned().collect()
}

impl RunReport {
    pub fn failures(&self) -> usize {
        self.sources.iter().filter(|s| s.error.is_some()).count()
    }

    pub fn print(&self) {
        let rule = "=".repeat(60);

        for s in &self.sources {
            println!("=== {} ===", s.source);
            match (&s.error, &s.path) {
                (Some(e), _) => println!("FAILED: {}", e),
                (None, Some(p)) => {
                    println!("Saved {} entities to {} (sorted alphabetically)", s.count, p.display())
                }
                (None, None) => println!("No entities found for {}", s.source),
            }
            if !s.samples.is_empty() {
                println!("Sample entities:");
                for e in &s.samples {
                    println!("  {} -> {}", e.name, e.url);
                }
                if s.count > s.samples.len() {
                    println!("  ... and {} more", s.count - s.samples.len());
                }
            }
            println!();
        }

        if !self.checks.is_empty() {
            println!("{}\nVERIFICATION\n{}", rule, rule);
            for c in &self.checks {
                let mark = if c.found.is_some() { "✓" } else { "✗" };
                println!("{} found in {}: {}", c.name, c.source, mark);
                if let Some(e) = &c.found {
                    println!("  {} -> {}", e.name, e.url);
                }
            }
            println!();
        }

        println!("{}\nSUMMARY\n{}", rule, rule);
        println!("Total entities processed: {}", self.total);
        let written: Vec<_> = self.sources.iter().filter_map(|s| s.path.as_ref()).collect();
        if !written.is_empty() {
            println!("\nOutput files created:");
            for p in written {
                match sink::count_entries(p) {
                    Ok(n) => println!("  {}: {} entities", p.display(), n),
                    Err(e) => println!("  {}: unreadable ({})", p.display(), e),
                }
            }
        }

        let compared: Vec<_> = self
            .sources
            .iter()
            .filter_map(|s| s.delta().map(|d| (s, d)))
            .collect();
        if !compared.is_empty() {
            println!("\nCOMPARISON WITH PREVIOUS RUN:\n{}", rule);
            for (s, (diff, pct)) in compared {
                let prev = s.previous.unwrap_or_default();
                match pct {
                    Some(p) => println!(
                        "  {}: {} -> {} ({:+}, {:+.1}%)",
                        s.source, prev, s.count, diff, p
                    ),
                    None => println!("  {}: {} -> {} ({:+})", s.source, prev, s.count, diff),
                }
            }
        }

        let failed = self.failures();
        if failed > 0 {
            println!("\n{} source(s) failed.", failed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn entity(name: &str) -> Entity {
        Entity {
            name: name.into(),
            url: format!("https://w/{}", name),
        }
    }

    fn report(count: usize, previous: Option<usize>) -> SourceReport {
        SourceReport {
            source: "USA".into(),
            count,
            path: None,
            previous,
            samples: Vec::new(),
            error: None,
        }
    }

    #[test]
    fn delta_against_previous() {
        assert_eq!(report(35, Some(28)).delta(), Some((7, Some(25.0))));
        assert_eq!(report(3, Some(0)).delta(), Some((3, None)));
        assert_eq!(report(3, None).delta(), None);
    }

    #[test]
    fn checks_resolve_by_source_and_exact_name() {
        let set = CatalogSet {
            catalogs: vec![Catalog {
                source: "usa".into(),
                entities: vec![entity("F-8E"), entity("P-51")],
            }],
            failures: Vec::new(),
        };
        let checks = vec![
            Check {
                source: "USA".into(),
                name: "F-8E".into(),
            },
            Check {
                source: "USA".into(),
                name: "F-8".into(),
            },
            Check {
                source: "Japan".into(),
                name: "A6M2".into(),
            },
        ];
        let results = run_checks(&set, &checks);
        assert_eq!(results[0].found, Some(entity("F-8E")));
        assert!(results[1].found.is_none());
        assert!(results[2].found.is_none());
    }

    #[test]
    fn samples_are_capped() {
        let es: Vec<_> = (0..8).map(|i| entity(&format!("A-{}", i))).collect();
        assert_eq!(samples(&es).len(), 5);
        assert_eq!(samples(&es[..2]).len(), 2);
    }

    #[test]
    fn json_summary_shape() {
        let r = RunReport {
            sources: vec![report(2, Some(1))],
            checks: Vec::new(),
            total: 2,
        };
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["total"], 2);
        assert_eq!(v["sources"][0]["source"], "USA");
        assert_eq!(v["sources"][0]["previous"], 1);
    }
}
