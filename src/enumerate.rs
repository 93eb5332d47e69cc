//! Material & Scene Enumeration
//!
//! Produces the candidate lists a collection run sweeps: materials under a
//! search root (expanded by declared local keywords into one entry per
//! `(material, keyword)` combination) and scenes under a search root. Both
//! honor a blacklist of path substrings.
//!
//! Order is the asset database's stable enumeration order; no sorting.

use rustc_hash::FxHashSet;

use crate::backend::AssetDatabase;
use crate::keywords::KeywordPolicy;

/// One candidate material permutation.
///
/// `keyword: None` is the material's base permutation; `Some` means "this
/// material's shader with that declared local keyword also enabled". A
/// material whose shader declares N local keywords yields N+1 entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialEntry {
    pub asset_path: String,
    pub keyword: Option<String>,
}

/// `true` if `path` contains any non-empty blacklist substring.
#[must_use]
pub fn is_blacklisted(path: &str, blacklist: &[String]) -> bool {
    blacklist
        .iter()
        .any(|black| !black.is_empty() && path.contains(black.as_str()))
}

/// Enumerate candidate materials under `root`.
///
/// Materials on a blacklisted path or whose shader name is in the exclusion
/// set `shader_filter` are dropped; materials whose shader cannot be
/// resolved are skipped.
#[must_use]
pub fn enumerate_materials(
    db: &dyn AssetDatabase,
    root: &str,
    blacklist: &[String],
    shader_filter: &FxHashSet<String>,
    policy: &KeywordPolicy,
) -> Vec<MaterialEntry> {
    let mut entries = Vec::new();
    for path in db.find_materials(root) {
        if is_blacklisted(&path, blacklist) {
            continue;
        }
        let Some(shader) = db.material_shader(&path) else {
            log::warn!("Skipping material without a resolvable shader: {path}");
            continue;
        };
        if shader_filter.contains(&shader.name) {
            continue;
        }

        entries.push(MaterialEntry {
            asset_path: path.clone(),
            keyword: None,
        });
        for keyword in policy.keywords_for(&shader.name) {
            entries.push(MaterialEntry {
                asset_path: path.clone(),
                keyword: Some(keyword.to_string()),
            });
        }
    }
    entries
}

/// Enumerate scene paths under `root`, honoring the blacklist.
#[must_use]
pub fn enumerate_scenes(db: &dyn AssetDatabase, root: &str, blacklist: &[String]) -> Vec<String> {
    db.find_scenes(root)
        .into_iter()
        .filter(|path| !is_blacklisted(path, blacklist))
        .collect()
}
