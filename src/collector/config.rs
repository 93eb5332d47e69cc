//! Run Configuration
//!
//! Parameters of one collection run as handed over by the UI/CLI
//! collaborator, plus the settle timings the scheduler waits on. Save-path
//! validation happens here, synchronously, before any run state is mutated.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::{Result, VaricullError};
use crate::manifest::MANIFEST_EXTENSION;

/// Parameters of one collection run.
#[derive(Debug, Clone)]
pub struct CollectRequest {
    /// Destination of the combined manifest document. Without an extension
    /// the canonical one is appended; any other extension is rejected.
    pub save_path: PathBuf,
    pub material_root: String,
    pub scene_root: String,
    /// Path substrings excluding materials and scenes from the sweep.
    pub blacklist: Vec<String>,
    /// Shader names excluded from collection and from the manifest.
    pub shader_filter: Vec<String>,
    /// Upper bound of probes created per batch.
    pub batch_size: usize,
    /// Write one manifest document per shader instead of one combined one.
    pub split_by_shader_name: bool,
    /// Name of the settings profile the run reads.
    pub profile: String,
}

impl CollectRequest {
    #[must_use]
    pub fn new(save_path: impl Into<PathBuf>, material_root: impl Into<String>) -> Self {
        Self {
            save_path: save_path.into(),
            material_root: material_root.into(),
            scene_root: String::new(),
            blacklist: Vec::new(),
            shader_filter: Vec::new(),
            batch_size: 100,
            split_by_shader_name: false,
            profile: "Default".to_string(),
        }
    }
}

/// Append the canonical extension to an extension-less save path, reject
/// any other extension.
pub fn normalize_save_path(path: &Path) -> Result<PathBuf> {
    match path.extension() {
        None => Ok(path.with_extension(MANIFEST_EXTENSION)),
        Some(ext) if ext == MANIFEST_EXTENSION => Ok(path.to_path_buf()),
        Some(_) => Err(VaricullError::InvalidSaveExtension(path.to_path_buf())),
    }
}

/// Settle delays of the timer-gated phases.
///
/// The backend compiles variants asynchronously with no completion signal,
/// so every visible-state change is followed by an empirical wait. The final
/// delay is separate because compiled-variant persistence needs the backend
/// to settle once more before readback.
#[derive(Debug, Clone, Copy)]
pub struct Timings {
    /// Wait after rendering a probe batch or toggling a global keyword.
    pub batch_settle: Duration,
    /// Time one scene visit takes; the capture view travels its full path
    /// across this window.
    pub scene_settle: Duration,
    /// Wait before reading back and persisting the collection.
    pub final_delay: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            batch_settle: Duration::from_millis(5000),
            scene_settle: Duration::from_millis(10_000),
            final_delay: Duration::from_millis(2000),
        }
    }
}
