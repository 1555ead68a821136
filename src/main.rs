mod catalog;
mod error;
mod parser;
mod provider;
mod report;
mod rules;
mod settings;
mod sink;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use catalog::CatalogSet;
use provider::DirProvider;
use report::{RunReport, SourceReport};
use settings::Check;
use sink::FileSink;

#[derive(Parser)]
#[command(name = "link_catalog", about = "Entity catalogs from wiki link markup")]
struct Cli {
    /// Settings file (default: ./catalog.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and write a catalog for every source document
    Run {
        /// Directory of raw documents, one per source
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Directory for the catalog files
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Base address prepended to every link path
        #[arg(long)]
        base_url: Option<String>,
        /// Exact-name lookup to verify, as SOURCE=NAME (repeatable)
        #[arg(long = "check", value_parser = parse_check)]
        checks: Vec<Check>,
        /// Print the run summary as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the catalog of a single document without writing it
    Extract {
        file: PathBuf,
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Show the classifier verdict for each name
    Classify {
        #[arg(required = true)]
        names: Vec<String>,
    },
}

fn parse_check(raw: &str) -> Result<Check, String> {
    Check::parse(raw).ok_or_else(|| format!("expected SOURCE=NAME, got {:?}", raw))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let mut settings = settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    let rules = settings.rules.compile()?;

    let result = match cli.command {
        Commands::Run {
            input,
            out,
            base_url,
            checks,
            json,
        } => {
            if let Some(dir) = input {
                settings.input.dir = dir;
            }
            if let Some(dir) = out {
                settings.output.dir = dir;
            }
            if let Some(url) = base_url {
                settings.base_url = url;
            }
            if !checks.is_empty() {
                settings.checks = checks;
            }
            info!(
                input = ?settings.input.dir,
                output = ?settings.output.dir,
                base_url = %settings.base_url,
                "Starting run"
            );

            let provider = DirProvider::new(&settings.input);
            let set = catalog::build_catalogs(&provider, &settings.base_url, &rules)?;
            if set.catalogs.is_empty() && set.failures.is_empty() {
                println!("No source documents in {:?}.", settings.input.dir);
                return Ok(());
            }

            let sink = FileSink::new(&settings.output);
            let report = write_catalogs(&set, &sink, &settings.checks);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                report.print();
            }

            match report.failures() {
                0 => Ok(()),
                n => Err(anyhow::anyhow!("{} source(s) failed", n)),
            }
        }
        Commands::Extract { file, base_url } => {
            let doc = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {:?}", file))?;
            let base = base_url.unwrap_or(settings.base_url);
            for entity in parser::process_document(&doc, &base, &rules) {
                println!("{}", entity.to_line());
            }
            Ok(())
        }
        Commands::Classify { names } => {
            for name in &names {
                println!("{:<32} {}", name, parser::classify::classify(name, &rules));
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

/// Write every non-empty catalog, one full overwrite per source.
///
/// A write failure is recorded against its source; the others are still written.
fn write_catalogs(set: &CatalogSet, sink: &FileSink, checks: &[Check]) -> RunReport {
    let pb = ProgressBar::new(set.catalogs.len() as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }

    let mut sources = Vec::with_capacity(set.catalogs.len() + set.failures.len());
    for cat in &set.catalogs {
        pb.set_message(cat.source.clone());
        let previous = sink.previous_count(&cat.source);
        let mut entry = SourceReport {
            source: cat.source.clone(),
            count: cat.len(),
            path: None,
            previous,
            samples: report::samples(&cat.entities),
            error: None,
        };

        if !cat.is_empty() {
            match sink.write(cat) {
                Ok(path) => entry.path = Some(path),
                Err(e) => {
                    let msg = format!("{:#}", anyhow::Error::from(e));
                    warn!("{}: {}", cat.source, msg);
                    entry.error = Some(msg);
                }
            }
        }
        sources.push(entry);
        pb.inc(1);
    }
    pb.finish_and_clear();

    for (source, e) in &set.failures {
        sources.push(SourceReport::failed(source, e.to_string()));
    }

    RunReport {
        checks: report::run_checks(set, checks),
        total: set.total(),
        sources,
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
