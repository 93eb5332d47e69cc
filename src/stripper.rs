//! Build-Time Variant Stripper
//!
//! Invoked by the build pipeline once per (shader, program snippet) with the
//! candidate compiler permutations for that snippet, and decides keep or
//! discard per permutation against the manifests a collection run produced.
//!
//! The lookup index is built lazily on the first invocation and is read-only
//! afterwards, so the stripper is safe under serial or concurrent build
//! callbacks. Shaders never seen during collection are passed through
//! untouched — absence from the manifest means out-of-scope, not strippable.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use rustc_hash::FxHashSet;

use crate::key::{PassType, VariantKey};
use crate::manifest::{MANIFEST_EXTENSION, Manifest};

// ─── Build Pipeline Records ──────────────────────────────────────────────────

/// One shader program snippet offered by the build pipeline.
#[derive(Debug, Clone)]
pub struct ShaderSnippet {
    pub pass_type: PassType,
    pub pass_name: String,
}

/// One candidate compiler permutation: the keyword set it would be
/// compiled with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateVariant {
    pub keywords: Vec<String>,
}

// ─── Configuration ───────────────────────────────────────────────────────────

/// Stripper configuration — compile-time or configuration constants, not a
/// runtime API.
#[derive(Debug, Clone)]
pub struct StripperConfig {
    /// Root under which all manifest documents for the build live.
    pub manifest_root: PathBuf,
    /// Permutations containing any of these keywords are always kept.
    pub keep_keywords: Vec<String>,
    /// Permutations containing any of these keywords are discarded unless
    /// a keep keyword already saved them.
    pub strip_keywords: Vec<String>,
}

impl StripperConfig {
    #[must_use]
    pub fn new(manifest_root: impl Into<PathBuf>) -> Self {
        Self {
            manifest_root: manifest_root.into(),
            keep_keywords: vec!["_ADDITIONAL_LIGHTS".to_string(), "LIGHTMAP_ON".to_string()],
            strip_keywords: vec!["_ADDITIONAL_LIGHT_SHADOWS".to_string()],
        }
    }
}

// ─── Index ───────────────────────────────────────────────────────────────────

/// Lookup state built once per build invocation.
#[derive(Debug, Default)]
struct StripperIndex {
    valid_variants: FxHashSet<VariantKey>,
    handled_shader_names: FxHashSet<String>,
}

fn build_index(root: &Path) -> StripperIndex {
    let mut index = StripperIndex::default();
    let mut files = Vec::new();
    scan_manifest_files(root, &mut files);

    for path in files {
        let manifest = match Manifest::load(&path) {
            Ok(manifest) => manifest,
            Err(err) => {
                // Partial manifest is better than none.
                log::warn!("Skipping unreadable manifest {}: {err}", path.display());
                continue;
            }
        };
        for info in &manifest.shader_variant_infos {
            index.handled_shader_names.insert(info.shader_name.clone());
            for element in &info.elements {
                index.valid_variants.insert(VariantKey::canonicalize(
                    &info.shader_name,
                    element.pass_type,
                    element.keywords.iter().map(String::as_str),
                ));
            }
        }
    }

    log::info!(
        "Variant stripper index: {} shaders, {} valid variants",
        index.handled_shader_names.len(),
        index.valid_variants.len()
    );
    index
}

/// Collect every manifest document under `root`, recursively.
fn scan_manifest_files(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        log::warn!("Manifest root not readable: {}", dir.display());
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            scan_manifest_files(&path, out);
        } else if path.extension().is_some_and(|e| e == MANIFEST_EXTENSION) {
            out.push(path);
        }
    }
}

// ─── Stripper ────────────────────────────────────────────────────────────────

/// Per-permutation keep/discard decision (diagnostics).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decision {
    KeptByOverride,
    StrippedByOverride,
    KeptByManifest,
    Stripped,
}

/// Build-time variant filter. One instance lives for the whole build.
pub struct VariantStripper {
    config: StripperConfig,
    index: OnceLock<StripperIndex>,
}

impl VariantStripper {
    #[must_use]
    pub fn new(config: StripperConfig) -> Self {
        Self {
            config,
            index: OnceLock::new(),
        }
    }

    /// Filter the candidate permutations of one (shader, snippet) pair in
    /// place. Kept candidates preserve their relative order.
    pub fn process(
        &self,
        shader_name: &str,
        snippet: &ShaderSnippet,
        candidates: &mut Vec<CandidateVariant>,
    ) {
        let index = self
            .index
            .get_or_init(|| build_index(&self.config.manifest_root));

        if !index.handled_shader_names.contains(shader_name) {
            log::debug!("Not in any collected manifest, left untouched: {shader_name}");
            return;
        }

        let original = candidates.len();
        let mut removed = 0usize;
        candidates.retain(|candidate| {
            let decision = self.decide(index, shader_name, snippet, candidate);
            let keep = matches!(decision, Decision::KeptByOverride | Decision::KeptByManifest);
            if !keep {
                removed += 1;
            }
            keep
        });

        log::info!(
            "Stripped {removed} / {original} permutations of {shader_name} ({})",
            snippet.pass_name
        );
    }

    fn decide(
        &self,
        index: &StripperIndex,
        shader_name: &str,
        snippet: &ShaderSnippet,
        candidate: &CandidateVariant,
    ) -> Decision {
        let has = |names: &[String]| {
            candidate
                .keywords
                .iter()
                .any(|kw| names.iter().any(|n| n == kw))
        };
        let key = VariantKey::canonicalize(
            shader_name,
            snippet.pass_type,
            candidate.keywords.iter().map(String::as_str),
        );

        // Override rules run before manifest membership, keep before strip.
        let decision = if has(&self.config.keep_keywords) {
            Decision::KeptByOverride
        } else if has(&self.config.strip_keywords) {
            Decision::StrippedByOverride
        } else if index.valid_variants.contains(&key) {
            Decision::KeptByManifest
        } else {
            Decision::Stripped
        };
        match decision {
            Decision::KeptByOverride => log::debug!("[keep:override] {key}"),
            Decision::StrippedByOverride => log::debug!("[strip:override] {key}"),
            Decision::KeptByManifest => log::debug!("[keep] {key}"),
            Decision::Stripped => log::debug!("[strip] {key}"),
        }
        decision
    }
}
