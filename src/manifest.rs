//! Variant Manifest
//!
//! The structured, persisted record of which variants were observed as
//! compiled during a collection run: shader → list of `(pass, keyword set)`
//! elements. Built once per run from the backend's accumulated collection,
//! filtered, then written either as one combined document or split into one
//! document per shader (the two forms are mutually exclusive on disk).
//!
//! Documents are JSON with PascalCase field names so external build tooling
//! can consume them without knowing this crate.

use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::backend::CompiledVariant;
use crate::errors::Result;
use crate::key::{PassType, VariantKey};

/// Canonical extension of persisted variant collection documents.
pub const MANIFEST_EXTENSION: &str = "shadervariants";

/// Path segment reserved for always-loaded resources. Shaders under it are
/// force-included by other mechanisms and must not be stripped based on
/// this manifest.
pub const RESERVED_RESOURCES_SEGMENT: &str = "Resources";

// ─── Data Model ──────────────────────────────────────────────────────────────

/// One `(pass, keyword set)` element of a shader's variant list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantElement {
    #[serde(rename = "PassType")]
    pub pass_type: PassType,
    #[serde(rename = "Keywords")]
    pub keywords: Vec<String>,
}

/// All observed variants of one shader.
///
/// Invariant: no two elements share the same canonical `(pass, keyword
/// set)`; [`Manifest::extract`] enforces this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShaderVariantInfo {
    #[serde(rename = "ShaderName")]
    pub shader_name: String,
    #[serde(rename = "AssetPath")]
    pub asset_path: String,
    #[serde(rename = "ShaderVariantElements")]
    pub elements: Vec<VariantElement>,
}

/// The persisted manifest document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(rename = "ShaderVariantInfos")]
    pub shader_variant_infos: Vec<ShaderVariantInfo>,
}

impl Manifest {
    /// Group the backend's accumulated collection per shader, deduplicating
    /// identical `(pass, keyword set)` pairs. Shader order and element order
    /// follow first observation.
    #[must_use]
    pub fn extract(compiled: &[CompiledVariant]) -> Self {
        let mut infos: Vec<ShaderVariantInfo> = Vec::new();
        let mut index_of: FxHashMap<String, usize> = FxHashMap::default();
        let mut seen: FxHashSet<VariantKey> = FxHashSet::default();

        for variant in compiled {
            let key = VariantKey::canonicalize(
                &variant.shader_name,
                variant.pass,
                variant.keywords.iter().map(String::as_str),
            );
            if !seen.insert(key) {
                continue;
            }

            let idx = *index_of
                .entry(variant.shader_name.clone())
                .or_insert_with(|| {
                    infos.push(ShaderVariantInfo {
                        shader_name: variant.shader_name.clone(),
                        asset_path: variant.shader_asset_path.clone(),
                        elements: Vec::new(),
                    });
                    infos.len() - 1
                });
            infos[idx].elements.push(VariantElement {
                pass_type: variant.pass,
                keywords: variant.keywords.clone(),
            });
        }

        Self {
            shader_variant_infos: infos,
        }
    }

    /// Remove shaders in the exclusion set and shaders whose asset path
    /// falls under the reserved always-loaded resources segment.
    pub fn apply_exclusions(&mut self, excluded_shaders: &FxHashSet<String>) {
        self.shader_variant_infos.retain(|info| {
            !excluded_shaders.contains(&info.shader_name)
                && !info.asset_path.contains(RESERVED_RESOURCES_SEGMENT)
        });
    }

    /// Split into one single-shader manifest per shader, paired with the
    /// file base name derived from the shader name (path separators
    /// replaced by underscores).
    #[must_use]
    pub fn split(&self) -> Vec<(String, Manifest)> {
        self.shader_variant_infos
            .iter()
            .map(|info| {
                let file_name = info.shader_name.replace(['/', '\\'], "_");
                let subset = Manifest {
                    shader_variant_infos: vec![info.clone()],
                };
                (file_name, subset)
            })
            .collect()
    }

    /// Total number of variant elements across all shaders.
    #[must_use]
    pub fn variant_count(&self) -> usize {
        self.shader_variant_infos
            .iter()
            .map(|info| info.elements.len())
            .sum()
    }

    /// Parse a persisted manifest document.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

// ─── Persistence ─────────────────────────────────────────────────────────────

/// Files written by [`persist`].
#[derive(Debug, Default)]
pub struct PersistedOutputs {
    /// Every document written, in write order.
    pub files: Vec<PathBuf>,
    /// Per-shader file base names (split mode only), in manifest order.
    pub shader_file_names: Vec<String>,
}

/// Write the filtered manifest to disk.
///
/// Always writes the combined document first; with `save_readable_json` a
/// pretty-printed mirror is written next to it. In split mode every
/// pre-existing split output in the destination directory is wiped, one
/// document per shader is written plus a plain-text index of their base
/// names, and the combined document is removed — the split and combined
/// forms never coexist.
pub fn persist(
    manifest: &Manifest,
    save_path: &Path,
    split_by_shader_name: bool,
    save_readable_json: bool,
) -> Result<PersistedOutputs> {
    if let Some(parent) = save_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let mut outputs = PersistedOutputs::default();

    fs::write(save_path, serde_json::to_string(manifest)?)?;
    outputs.files.push(save_path.to_path_buf());

    if save_readable_json {
        let mirror = save_path.with_extension("json");
        fs::write(&mirror, serde_json::to_string_pretty(manifest)?)?;
        outputs.files.push(mirror);
    }

    if split_by_shader_name {
        let dir = save_path.parent().unwrap_or_else(|| Path::new("."));
        wipe_manifests(dir)?;
        outputs.files.retain(|f| f.extension().is_some_and(|e| e != MANIFEST_EXTENSION));

        for (file_name, subset) in manifest.split() {
            let path = dir.join(format!("{file_name}.{MANIFEST_EXTENSION}"));
            fs::write(&path, serde_json::to_string(&subset)?)?;
            outputs.files.push(path);
            outputs.shader_file_names.push(file_name);
        }

        let base = save_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let index_path = dir.join(format!("{base}_shader_names.txt"));
        let mut index = outputs.shader_file_names.join("\n");
        index.push('\n');
        fs::write(&index_path, index)?;
        outputs.files.push(index_path);
    }

    Ok(outputs)
}

/// Remove every manifest document directly inside `dir`.
fn wipe_manifests(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        return Ok(());
    }
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == MANIFEST_EXTENSION) {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}
