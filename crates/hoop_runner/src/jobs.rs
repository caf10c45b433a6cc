//! Analysis jobs
//!
//! One job = one detections document in, one JSON report out. Jobs never
//! share pipeline state, so a batch runs them in parallel on the rayon pool.

use crate::cache::cached_or_compute;
use anyhow::{Context, Result};
use hoop_core::analysis::CleanedBallTrack;
use hoop_core::{AnalysisInput, AnalysisReport, Holder, Pipeline};
use rayon::prelude::*;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info};

#[derive(Debug, Clone)]
pub struct AnalysisJob {
    /// Detections document (JSON)
    pub input: PathBuf,
    /// Report destination (JSON)
    pub output: PathBuf,
    /// Stage cache root; `None` disables caching
    pub cache_dir: Option<PathBuf>,
}

fn input_stem(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "video".to_string())
}

impl AnalysisJob {
    /// Job writing `<out_dir>/<input stem>.report.json`.
    pub fn into_dir(input: PathBuf, out_dir: &Path, cache_dir: Option<PathBuf>) -> Self {
        let output = out_dir.join(format!("{}.report.json", input_stem(&input)));
        Self {
            input,
            output,
            cache_dir,
        }
    }

    /// One job per input, all reporting into `out_dir`.
    ///
    /// Inputs sharing a file stem get numbered report names (`game.report.json`,
    /// `game-2.report.json`, ...) in input order.
    pub fn all_into_dir(
        inputs: Vec<PathBuf>,
        out_dir: &Path,
        cache_dir: Option<PathBuf>,
    ) -> Vec<Self> {
        let mut taken = HashSet::new();
        inputs
            .into_iter()
            .map(|input| {
                let stem = input_stem(&input);
                let mut name = stem.clone();
                let mut n = 1;
                while !taken.insert(name.clone()) {
                    n += 1;
                    name = format!("{}-{}", stem, n);
                }
                Self {
                    output: out_dir.join(format!("{}.report.json", name)),
                    input,
                    cache_dir: cache_dir.clone(),
                }
            })
            .collect()
    }
}

/// Result of one job within a batch.
#[derive(Debug, Clone, Serialize)]
pub struct JobOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    pub frame_count: Option<usize>,
    pub elapsed_ms: u128,
    pub error: Option<String>,
}

impl JobOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

fn read_input(path: &Path) -> Result<(AnalysisInput, Vec<u8>)> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read detections: {}", path.display()))?;
    let input = serde_json::from_slice(&bytes)
        .with_context(|| format!("Failed to parse detections: {}", path.display()))?;
    Ok((input, bytes))
}

pub fn load_input(path: &Path) -> Result<AnalysisInput> {
    read_input(path).map(|(input, _)| input)
}

pub fn write_report(path: &Path, report: &AnalysisReport) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json).with_context(|| format!("Failed to write report: {}", path.display()))
}

fn short_digest(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))[..12].to_string()
}

/// Short digest of the configuration so a config change never reuses stale
/// stages.
pub fn config_fingerprint(pipeline: &Pipeline) -> Result<String> {
    let json = serde_json::to_vec(pipeline.config())?;
    Ok(short_digest(&json))
}

/// Short digest of a detections document.
pub fn input_fingerprint(document: &[u8]) -> String {
    short_digest(document)
}

/// Stage cache directory of one video:
/// `<root>/<stem>-<input fingerprint>-<config fingerprint>/`.
///
/// Keyed on the document bytes, so same-named inputs from different
/// directories and edited inputs never share stages.
pub fn stage_dir(
    cache_root: &Path,
    input: &Path,
    document: &[u8],
    pipeline: &Pipeline,
) -> Result<PathBuf> {
    Ok(cache_root.join(format!(
        "{}-{}-{}",
        input_stem(input),
        input_fingerprint(document),
        config_fingerprint(pipeline)?
    )))
}

/// Run the pipeline on an in-memory input, reusing cached stages.
pub fn analyze_input(
    input: &AnalysisInput,
    pipeline: &Pipeline,
    stage_dir: Option<&Path>,
) -> Result<AnalysisReport> {
    pipeline.validate(input)?;
    let frames = input.frame_count();

    let ball_path = stage_dir.map(|d| d.join("ball_track.msgpack.lz4"));
    let ball: CleanedBallTrack =
        cached_or_compute(ball_path.as_deref(), frames, || Ok(pipeline.clean_ball(input)))?;

    let holders_path = stage_dir.map(|d| d.join("holders.msgpack.lz4"));
    let holders: Vec<Holder> = cached_or_compute(holders_path.as_deref(), frames, || {
        pipeline.assign_possession(input, &ball)
    })?;

    Ok(pipeline.finish(input, ball, holders)?)
}

/// Load, analyze and write one job.
pub fn run_job(job: &AnalysisJob, pipeline: &Pipeline) -> Result<AnalysisReport> {
    let (input, document) = read_input(&job.input)?;
    let stages = match &job.cache_dir {
        Some(root) => Some(stage_dir(root, &job.input, &document, pipeline)?),
        None => None,
    };
    let report = analyze_input(&input, pipeline, stages.as_deref())
        .with_context(|| format!("Analysis failed for {}", job.input.display()))?;
    write_report(&job.output, &report)?;
    Ok(report)
}

/// Run every job in parallel. One failing job does not stop the others.
///
/// A job whose report path was already claimed by an earlier job in the
/// batch fails without running.
pub fn run_batch(jobs: &[AnalysisJob], pipeline: &Pipeline) -> Vec<JobOutcome> {
    info!("Batch: {} jobs on {} threads", jobs.len(), rayon::current_num_threads());

    let mut claimed = HashSet::new();
    let duplicate: Vec<bool> = jobs.iter().map(|job| !claimed.insert(&job.output)).collect();

    jobs.par_iter()
        .zip(duplicate)
        .map(|(job, duplicate)| {
            let start = Instant::now();
            let result = if duplicate {
                Err(anyhow::anyhow!(
                    "Report path {} is already written by another job in this batch",
                    job.output.display()
                ))
            } else {
                run_job(job, pipeline)
            };
            let elapsed_ms = start.elapsed().as_millis();
            match result {
                Ok(report) => {
                    info!("{} -> {} ({} ms)", job.input.display(), job.output.display(), elapsed_ms);
                    JobOutcome {
                        input: job.input.clone(),
                        output: job.output.clone(),
                        frame_count: Some(report.frame_count),
                        elapsed_ms,
                        error: None,
                    }
                }
                Err(err) => {
                    error!("{}: {:#}", job.input.display(), err);
                    JobOutcome {
                        input: job.input.clone(),
                        output: job.output.clone(),
                        frame_count: None,
                        elapsed_ms,
                        error: Some(format!("{:#}", err)),
                    }
                }
            }
        })
        .collect()
}
