//! Organ insertion command line.
//!
//! ```text
//! organ-insert --scaffold whole_body.exf --output-dir out heart.exf colon.exf
//! ```
//!
//! Writes the scaffold's marker coordinates and one tagged model per organ to
//! the output directory. Parameters can be loaded from a TOML file with
//! `--config`; flags override the file.

mod config;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use organ_inserter::{FailurePolicy, InsertParams, OrganInserter};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Insert organ models into a whole-body scaffold
#[derive(Parser, Debug)]
#[command(name = "organ-insert")]
#[command(about = "Insert organ models into a whole-body scaffold", long_about = None)]
#[command(version)]
struct Cli {
    /// Whole-body scaffold file
    #[arg(long)]
    scaffold: PathBuf,

    /// Directory for the marker file and fitted organs
    #[arg(long)]
    output_dir: PathBuf,

    /// Organ model files
    #[arg(name = "ORGAN")]
    organs: Vec<PathBuf>,

    /// TOML file with run parameters
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep going when an organ fails
    #[arg(long)]
    continue_on_error: bool,

    /// Write the annotation manifest
    #[arg(long)]
    manifest: bool,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn params(&self) -> Result<InsertParams> {
        let mut params = match &self.config {
            Some(path) => config::load_params(path)?,
            None => InsertParams::default(),
        };
        if self.continue_on_error {
            params.failure_policy = FailurePolicy::Continue;
        }
        if self.manifest {
            params.write_manifest = true;
        }
        Ok(params)
    }
}

fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn,organ_inserter=info,organ_insert=info",
        1 => "info,organ_inserter=debug,organ_insert=debug,scaffold_fit=debug,scaffold_markers=debug",
        _ => "trace",
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(cli.verbose).into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let params = cli.params()?;
    if !cli.output_dir.is_dir() {
        bail!("Output directory {} does not exist", cli.output_dir.display());
    }

    let report = OrganInserter::new(params)
        .run(&cli.scaffold, &cli.organs, &cli.output_dir)
        .with_context(|| format!("Organ insertion from {} failed", cli.scaffold.display()))?;

    info!(path = %report.marker_file.display(), "Marker coordinates");
    for outcome in &report.organs {
        match &outcome.result {
            Ok(tagged) => println!("{}", tagged.path.display()),
            Err(e) => error!(organ = %outcome.input.display(), "{e}"),
        }
    }

    if report.failures() > 0 {
        bail!("{} of {} organs failed", report.failures(), report.organs.len());
    }
    Ok(())
}
