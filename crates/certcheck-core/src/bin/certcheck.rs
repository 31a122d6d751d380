//! certcheck - scan a certification snapshot for irregularities
//!
//! Reads `{"records": [...], "types": [...]}` JSON and prints findings as JSON.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use certcheck_core::{
    filter_by_severity, Classifier, Dataset, EngineConfig, Severity, SeverityCounts, SeverityFilter,
};

#[derive(Parser)]
#[command(name = "certcheck", version, about = "Certification irregularity detection")]
struct Cli {
    /// Engine configuration (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print finding groups
    Scan {
        dataset: PathBuf,
        /// all, duplicate_type, exact, similar, function_mismatch
        #[arg(long, default_value = "all")]
        severity: String,
    },
    /// Print per-severity counts
    Counts { dataset: PathBuf },
    /// Recommend a survivor for a duplicate-type group
    Recommend {
        dataset: PathBuf,
        #[arg(long)]
        group: u32,
    },
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(EngineConfig::from_toml(&std::fs::read_to_string(path)?)?),
        None => Ok(EngineConfig::default()),
    }
}

fn load_dataset(path: &Path) -> Result<Dataset, Box<dyn std::error::Error>> {
    let dataset = Dataset::from_json(&std::fs::read_to_string(path)?)?;
    if !dataset.skipped.is_empty() {
        tracing::warn!("Skipped {} invalid entities", dataset.skipped.len());
    }
    Ok(dataset)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("CERTCHECK_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let classifier = Classifier::new(config.matching);

    match cli.command {
        Command::Scan { dataset, severity } => {
            let filter: SeverityFilter = severity.parse()?;
            let dataset = load_dataset(&dataset)?;
            let groups = classifier.classify(&dataset.records, &dataset.types)?;
            let shown = filter_by_severity(&groups, filter);
            println!("{}", serde_json::to_string_pretty(&shown)?);
        }
        Command::Counts { dataset } => {
            let dataset = load_dataset(&dataset)?;
            let groups = classifier.classify(&dataset.records, &dataset.types)?;
            println!(
                "{}",
                serde_json::to_string_pretty(&SeverityCounts::from_groups(&groups))?
            );
        }
        Command::Recommend { dataset, group } => {
            let dataset = load_dataset(&dataset)?;
            let groups = classifier.classify(&dataset.records, &dataset.types)?;
            let found = groups
                .iter()
                .find(|g| g.number == group)
                .ok_or_else(|| format!("Finding group {} not found", group))?;
            if found.severity != Severity::DuplicateType {
                return Err(format!("Finding group {} is {}, not duplicate_type", group, found.severity).into());
            }
            let recommendation =
                certcheck_core::recommend_survivor(&found.types, &dataset.records);
            println!("{}", serde_json::to_string_pretty(&recommendation)?);
        }
    }

    Ok(())
}
