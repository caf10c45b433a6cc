//! Hoop Runner Library
//!
//! Host side of `hoop_core`: loads detection documents, caches intermediate
//! stages on disk and runs batches of videos in parallel.

pub mod cache;
pub mod jobs;

pub use cache::{
    cached_or_compute, load_stage, save_stage, verify_cache, CacheMetadata, CACHE_SCHEMA_VERSION,
};
pub use jobs::{
    analyze_input, input_fingerprint, load_input, run_batch, run_job, write_report, AnalysisJob,
    JobOutcome,
};
