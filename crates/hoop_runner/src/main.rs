//! Hoop CLI
//!
//! Detections JSON → analysis report JSON, single video or batch.

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use hoop_core::{AnalysisConfig, Pipeline};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "hoop")]
#[command(about = "Possession, passes and tactical tracks from basketball detections", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Analyze one detections document
    Analyze {
        /// Input detections JSON
        #[arg(long)]
        input: PathBuf,

        /// Output report JSON
        #[arg(long)]
        out: PathBuf,

        /// Config file (.yaml, .yml or .json); overrides --profile
        #[arg(long)]
        config: Option<PathBuf>,

        /// Preset name (broadcast, responsive, strict)
        #[arg(long)]
        profile: Option<String>,

        /// Stage cache directory
        #[arg(long)]
        cache_dir: Option<PathBuf>,
    },

    /// Analyze several documents in parallel
    Batch {
        /// Input detections JSON files
        #[arg(long, num_args = 1.., required = true)]
        inputs: Vec<PathBuf>,

        /// Directory receiving `<stem>.report.json` files
        #[arg(long)]
        out_dir: PathBuf,

        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        profile: Option<String>,

        #[arg(long)]
        cache_dir: Option<PathBuf>,

        /// Write a JSON summary of all jobs
        #[arg(long)]
        summary: Option<PathBuf>,
    },

    /// Check a cached stage against its recorded checksum
    VerifyCache {
        /// Cached artifact (the `.meta.json` sidecar must sit next to it)
        #[arg(long)]
        path: PathBuf,
    },
}

#[cfg(feature = "cli")]
fn resolve_config(config: Option<&Path>, profile: Option<&str>) -> Result<AnalysisConfig> {
    if let Some(path) = config {
        return AnalysisConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()));
    }
    match profile {
        Some(name) => AnalysisConfig::from_profile(name)
            .with_context(|| format!("Unknown profile '{}'", name)),
        None => Ok(AnalysisConfig::from_env_or_default()),
    }
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            input,
            out,
            config,
            profile,
            cache_dir,
        } => {
            let pipeline = Pipeline::new(resolve_config(config.as_deref(), profile.as_deref())?)?;
            let job = hoop_runner::AnalysisJob {
                input,
                output: out,
                cache_dir,
            };
            let report = hoop_runner::run_job(&job, &pipeline)?;

            println!("Analyzed {} frames ({:?} policy)", report.frame_count, report.policy);
            println!(
                "   Passes:        {} / {}",
                report.totals.passes[0], report.totals.passes[1]
            );
            println!(
                "   Interceptions: {} / {}",
                report.totals.interceptions[0], report.totals.interceptions[1]
            );
            println!(
                "   Ball control:  {:.1}% / {:.1}%",
                report.control_share.team_one * 100.0,
                report.control_share.team_two * 100.0
            );
            println!("   Report:        {}", job.output.display());
        }

        Commands::Batch {
            inputs,
            out_dir,
            config,
            profile,
            cache_dir,
            summary,
        } => {
            let pipeline = Pipeline::new(resolve_config(config.as_deref(), profile.as_deref())?)?;
            let jobs = hoop_runner::AnalysisJob::all_into_dir(inputs, &out_dir, cache_dir);

            let outcomes = hoop_runner::run_batch(&jobs, &pipeline);
            let failed = outcomes.iter().filter(|o| !o.succeeded()).count();

            if let Some(path) = summary {
                std::fs::write(&path, serde_json::to_string_pretty(&outcomes)?)
                    .with_context(|| format!("Failed to write summary: {}", path.display()))?;
            }

            println!("{} of {} videos analyzed", outcomes.len() - failed, outcomes.len());
            if failed > 0 {
                anyhow::bail!("{} videos failed", failed);
            }
        }

        Commands::VerifyCache { path } => {
            let meta = hoop_runner::cache::read_metadata(&path)?;
            println!("   Schema:  {}", meta.schema_version);
            println!("   Frames:  {}", meta.frame_count);
            println!("   Created: {}", meta.created_at);

            if hoop_runner::verify_cache(&path)? {
                println!("Cache verification passed");
            } else {
                anyhow::bail!("Cache verification failed - checksum mismatch");
            }
        }
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("hoop CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
