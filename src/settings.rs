//! Profile Settings Store
//!
//! Per-profile configuration the UI collaborator writes and a collection run
//! reads once at start: the global keyword sweep list, the per-shader local
//! keyword table, and the output toggles. Persisted as one JSON document
//! mapping profile name → settings.

use std::fs;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::keywords::LocalKeywordTable;

/// Settings of one named profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorProfile {
    /// Global keyword entries, in sweep order.
    pub global_keywords: Vec<String>,
    /// Declared per-shader local keywords.
    pub local_keywords: LocalKeywordTable,
    /// Whether the run also visits scenes after the material sweep.
    pub collect_scene_variants: bool,
    /// Whether a human-readable JSON mirror is written next to the
    /// combined document.
    pub save_readable_json: bool,
}

/// All profiles, keyed by name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileStore {
    profiles: FxHashMap<String, CollectorProfile>,
}

impl ProfileStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the store from a JSON document. A missing file is an empty
    /// store, not an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Write the store back to disk.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Settings for a profile name; defaults for unknown names.
    #[must_use]
    pub fn profile(&self, name: &str) -> CollectorProfile {
        self.profiles.get(name).cloned().unwrap_or_default()
    }

    pub fn set_profile(&mut self, name: &str, profile: CollectorProfile) {
        self.profiles.insert(name.to_string(), profile);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_profile_yields_defaults() {
        let store = ProfileStore::new();
        let profile = store.profile("Nope");
        assert!(profile.global_keywords.is_empty());
        assert!(!profile.collect_scene_variants);
    }

    #[test]
    fn test_json_round_trip() {
        let mut store = ProfileStore::new();
        let mut profile = CollectorProfile {
            global_keywords: vec!["_MAIN_LIGHT_SHADOWS".to_string()],
            collect_scene_variants: true,
            ..Default::default()
        };
        profile.local_keywords.add("Universal/Lit", "_EMISSION");
        store.set_profile("Default", profile.clone());

        let json = serde_json::to_string(&store).unwrap();
        let parsed: ProfileStore = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.profile("Default"), profile);
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let parsed: ProfileStore =
            serde_json::from_str(r#"{"Default":{"collect_scene_variants":true}}"#).unwrap();
        let profile = parsed.profile("Default");
        assert!(profile.collect_scene_variants);
        assert!(profile.global_keywords.is_empty());
    }
}
