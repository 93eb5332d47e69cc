//! Keyword Policy
//!
//! Holds the configured global keyword list (sweep order matters) and the
//! per-shader local keyword table, and performs the actual enable/disable
//! calls against the backend.
//!
//! One configured "keyword" entry may contain several space-separated tokens;
//! each token is toggled independently. This is a deliberate convenience so a
//! single entry can flip a compound feature. Unknown tokens are passed
//! through untouched — validation is the backend's concern.

use serde::{Deserialize, Serialize};

use crate::backend::{MaterialInstanceId, RenderBackend};

// ─── Local Keyword Table ─────────────────────────────────────────────────────

/// One declared `(shader, local keyword)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalKeyword {
    pub shader_name: String,
    pub keyword: String,
}

/// Declared local keywords, grouped per shader name.
///
/// Entries are unique per `(shader, keyword)` pair; re-adding an existing
/// pair is a silent no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalKeywordTable {
    entries: Vec<LocalKeyword>,
}

impl LocalKeywordTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `(shader, keyword)` pair. Idempotent.
    pub fn add(&mut self, shader_name: &str, keyword: &str) {
        let exists = self
            .entries
            .iter()
            .any(|e| e.shader_name == shader_name && e.keyword == keyword);
        if !exists {
            self.entries.push(LocalKeyword {
                shader_name: shader_name.to_string(),
                keyword: keyword.to_string(),
            });
        }
    }

    /// Remove a `(shader, keyword)` pair if present.
    pub fn remove(&mut self, shader_name: &str, keyword: &str) {
        self.entries
            .retain(|e| !(e.shader_name == shader_name && e.keyword == keyword));
    }

    /// Declared local keywords for a shader name, empty if none declared.
    pub fn keywords_for<'a>(&'a self, shader_name: &'a str) -> impl Iterator<Item = &'a str> {
        self.entries
            .iter()
            .filter(move |e| e.shader_name == shader_name)
            .map(|e| e.keyword.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

// ─── Keyword Policy ──────────────────────────────────────────────────────────

/// Read-only keyword configuration for one collection run.
#[derive(Debug, Clone, Default)]
pub struct KeywordPolicy {
    /// Global keyword entries in sweep order.
    globals: Vec<String>,
    locals: LocalKeywordTable,
}

impl KeywordPolicy {
    #[must_use]
    pub fn new(globals: Vec<String>, locals: LocalKeywordTable) -> Self {
        Self { globals, locals }
    }

    /// Global keyword entries in sweep order.
    #[must_use]
    pub fn globals(&self) -> &[String] {
        &self.globals
    }

    /// Declared local keywords for a shader name.
    pub fn keywords_for<'a>(&'a self, shader_name: &'a str) -> impl Iterator<Item = &'a str> {
        self.locals.keywords_for(shader_name)
    }

    /// Enable every token of one global keyword entry.
    pub fn enable_global(backend: &mut dyn RenderBackend, entry: &str) {
        for token in tokens(entry) {
            backend.enable_global_keyword(token);
        }
    }

    /// Disable every token of one global keyword entry.
    pub fn disable_global(backend: &mut dyn RenderBackend, entry: &str) {
        for token in tokens(entry) {
            backend.disable_global_keyword(token);
        }
    }

    /// Disable every configured global keyword. Always executed when
    /// leaving a sweep so no process-wide state dangles.
    pub fn reset_globals(&self, backend: &mut dyn RenderBackend) {
        for entry in &self.globals {
            Self::disable_global(backend, entry);
        }
    }

    /// Enable every token of one local keyword entry on a material instance.
    pub fn enable_local(backend: &mut dyn RenderBackend, instance: MaterialInstanceId, entry: &str) {
        for token in tokens(entry) {
            backend.enable_local_keyword(instance, token);
        }
    }

    /// Disable every token of one local keyword entry on a material instance.
    pub fn disable_local(
        backend: &mut dyn RenderBackend,
        instance: MaterialInstanceId,
        entry: &str,
    ) {
        for token in tokens(entry) {
            backend.disable_local_keyword(instance, token);
        }
    }
}

/// Split a keyword entry into trimmed, non-empty tokens.
fn tokens(entry: &str) -> impl Iterator<Item = &str> {
    entry.split(' ').map(str::trim).filter(|t| !t.is_empty())
}
