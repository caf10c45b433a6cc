//! Stage cache
//!
//! Intermediate results (cleaned ball track, holders) are stored as
//! MessagePack → LZ4 with a JSON sidecar holding the SHA-256 checksum and the
//! frame count they were computed for. A cached artifact is only trusted when
//! the checksum matches and the frame count equals the current video's; any
//! other outcome is a miss and the stage is recomputed.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Bumped whenever a cached stage type changes shape.
pub const CACHE_SCHEMA_VERSION: &str = "hoop-stage-v1";

/// Sidecar stored next to every cached artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheMetadata {
    pub schema_version: String,
    /// Frames of the video the artifact was computed for
    pub frame_count: usize,
    /// SHA256 of the compressed artifact (hex)
    pub checksum: String,
    /// RFC3339
    pub created_at: String,
    /// MessagePack size (bytes)
    pub original_size: u64,
    /// Size on disk (bytes)
    pub compressed_size: u64,
    /// compressed / original
    pub compression_ratio: f64,
}

/// `<artifact>.meta.json`
pub fn metadata_path(artifact: &Path) -> PathBuf {
    let mut name = artifact.as_os_str().to_owned();
    name.push(".meta.json");
    PathBuf::from(name)
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Write `value` and its sidecar.
pub fn save_stage<T: Serialize>(artifact: &Path, frame_count: usize, value: &T) -> Result<CacheMetadata> {
    let msgpack_bytes = rmp_serde::to_vec(value).context("Failed to serialize stage to MessagePack")?;
    let original_size = msgpack_bytes.len() as u64;

    let compressed = lz4_flex::compress_prepend_size(&msgpack_bytes);
    let compressed_size = compressed.len() as u64;

    if let Some(parent) = artifact.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create cache directory: {}", parent.display()))?;
    }
    fs::write(artifact, &compressed)
        .with_context(|| format!("Failed to write cache file: {}", artifact.display()))?;

    let meta = CacheMetadata {
        schema_version: CACHE_SCHEMA_VERSION.to_string(),
        frame_count,
        checksum: sha256_hex(&compressed),
        created_at: chrono::Utc::now().to_rfc3339(),
        original_size,
        compressed_size,
        compression_ratio: if original_size > 0 {
            compressed_size as f64 / original_size as f64
        } else {
            0.0
        },
    };

    let meta_path = metadata_path(artifact);
    let meta_json = serde_json::to_string_pretty(&meta)?;
    fs::write(&meta_path, meta_json)
        .with_context(|| format!("Failed to write cache metadata: {}", meta_path.display()))?;

    debug!(
        "Cached {} ({} frames, {} bytes)",
        artifact.display(),
        frame_count,
        compressed_size
    );
    Ok(meta)
}

pub fn read_metadata(artifact: &Path) -> Result<CacheMetadata> {
    let meta_path = metadata_path(artifact);
    let text = fs::read_to_string(&meta_path)
        .with_context(|| format!("Failed to read cache metadata: {}", meta_path.display()))?;
    serde_json::from_str(&text).context("Failed to parse cache metadata")
}

/// Whether the artifact on disk still matches its recorded checksum.
pub fn verify_cache(artifact: &Path) -> Result<bool> {
    let meta = read_metadata(artifact)?;
    let bytes = fs::read(artifact)
        .with_context(|| format!("Failed to read cache file: {}", artifact.display()))?;
    Ok(sha256_hex(&bytes) == meta.checksum)
}

fn try_load<T: DeserializeOwned>(artifact: &Path, expected_frames: usize) -> Result<Option<T>> {
    if !artifact.exists() {
        return Ok(None);
    }
    let meta = read_metadata(artifact)?;
    if meta.schema_version != CACHE_SCHEMA_VERSION {
        debug!(
            "Cache {}: schema {} != {}",
            artifact.display(),
            meta.schema_version,
            CACHE_SCHEMA_VERSION
        );
        return Ok(None);
    }
    if meta.frame_count != expected_frames {
        debug!(
            "Cache {}: built for {} frames, video has {}",
            artifact.display(),
            meta.frame_count,
            expected_frames
        );
        return Ok(None);
    }

    let compressed = fs::read(artifact)
        .with_context(|| format!("Failed to read cache file: {}", artifact.display()))?;
    if sha256_hex(&compressed) != meta.checksum {
        anyhow::bail!("checksum mismatch");
    }
    let msgpack_bytes =
        lz4_flex::decompress_size_prepended(&compressed).context("Failed to decompress LZ4")?;
    let value = rmp_serde::from_slice(&msgpack_bytes).context("Failed to deserialize MessagePack")?;
    Ok(Some(value))
}

/// Cached stage for a video of `expected_frames` frames, `None` on any miss.
///
/// A corrupt artifact is logged and treated as a miss.
pub fn load_stage<T: DeserializeOwned>(artifact: &Path, expected_frames: usize) -> Option<T> {
    match try_load(artifact, expected_frames) {
        Ok(hit) => hit,
        Err(err) => {
            warn!("Ignoring cache {}: {:#}", artifact.display(), err);
            None
        }
    }
}

/// Load the stage from `artifact` or compute and store it.
///
/// With `artifact == None` the cache is bypassed.
pub fn cached_or_compute<T, F>(artifact: Option<&Path>, frame_count: usize, compute: F) -> Result<T>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> hoop_core::Result<T>,
{
    let Some(artifact) = artifact else {
        return Ok(compute()?);
    };
    if let Some(hit) = load_stage(artifact, frame_count) {
        debug!("Cache hit: {}", artifact.display());
        return Ok(hit);
    }

    let value = compute()?;
    if let Err(err) = save_stage(artifact, frame_count, &value) {
        // A read-only cache directory must not fail the analysis
        warn!("Could not cache {}: {:#}", artifact.display(), err);
    }
    Ok(value)
}
