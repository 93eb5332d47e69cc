//! Canonical Variant Keys
//!
//! A shader variant is identified by its `(shader name, pass type, keyword
//! set)` triple. This module canonicalizes that triple into an
//! order-independent [`VariantKey`] used for set membership both by the
//! collector's manifest dedup and by the build-time stripper — the two sides
//! must agree on the key shape, so it lives here and nowhere else.
//!
//! Keyword order never affects equality: tokens are trimmed, empty tokens
//! dropped, duplicates removed, and the survivors sorted with a plain
//! case-sensitive lexicographic sort before joining.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

// ─── Pass Type ───────────────────────────────────────────────────────────────

/// The render pass a variant belongs to.
///
/// Two passes of the same shader can legitimately need different keyword
/// sets, so pass identity participates in [`VariantKey`] uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PassType {
    Normal,
    Vertex,
    ForwardBase,
    ForwardAdd,
    Deferred,
    ShadowCaster,
    DepthOnly,
    Meta,
    MotionVectors,
    ScriptableRenderPipeline,
}

impl fmt::Display for PassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Normal => "Normal",
            Self::Vertex => "Vertex",
            Self::ForwardBase => "ForwardBase",
            Self::ForwardAdd => "ForwardAdd",
            Self::Deferred => "Deferred",
            Self::ShadowCaster => "ShadowCaster",
            Self::DepthOnly => "DepthOnly",
            Self::Meta => "Meta",
            Self::MotionVectors => "MotionVectors",
            Self::ScriptableRenderPipeline => "ScriptableRenderPipeline",
        };
        f.write_str(name)
    }
}

// ─── Variant Key ─────────────────────────────────────────────────────────────

/// Canonical, order-independent identity of one shader variant.
///
/// Built only through [`VariantKey::canonicalize`]; the inner string is
/// `shader|pass|kw1+kw2+…` with keywords sorted. Pure value type — equality
/// and hashing are plain string equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariantKey(String);

impl VariantKey {
    /// Canonicalize a `(shader, pass, keywords)` triple.
    ///
    /// Tokens are trimmed, empties dropped, duplicates collapsed, and the
    /// rest sorted case-sensitively so any permutation of the same keyword
    /// set yields an identical key.
    #[must_use]
    pub fn canonicalize<'a, I>(shader_name: &str, pass: PassType, keywords: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut tokens: SmallVec<[&str; 8]> = keywords
            .into_iter()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect();
        tokens.sort_unstable();
        tokens.dedup();

        let mut key = String::with_capacity(shader_name.len() + 24);
        key.push_str(shader_name);
        key.push('|');
        key.push_str(&pass.to_string());
        key.push('|');
        for (i, token) in tokens.iter().enumerate() {
            if i > 0 {
                key.push('+');
            }
            key.push_str(token);
        }
        Self(key)
    }

    /// The canonical string form (diagnostics only).
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VariantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_independent() {
        let a = VariantKey::canonicalize("S", PassType::ForwardBase, ["B", "A"]);
        let b = VariantKey::canonicalize("S", PassType::ForwardBase, ["A", "B"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_trims_and_drops_empty_tokens() {
        let a = VariantKey::canonicalize("S", PassType::Normal, [" FOG ", "", "  "]);
        let b = VariantKey::canonicalize("S", PassType::Normal, ["FOG"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_duplicates_collapse() {
        let a = VariantKey::canonicalize("S", PassType::Normal, ["FOG", "FOG"]);
        let b = VariantKey::canonicalize("S", PassType::Normal, ["FOG"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_pass_type_participates() {
        let a = VariantKey::canonicalize("S", PassType::ForwardBase, ["FOG"]);
        let b = VariantKey::canonicalize("S", PassType::ShadowCaster, ["FOG"]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_no_partial_matching() {
        let a = VariantKey::canonicalize("S", PassType::Normal, ["FOG"]);
        let b = VariantKey::canonicalize("S", PassType::Normal, ["FOG", "LIGHTMAP_ON"]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_sort_is_case_sensitive() {
        // Uppercase sorts before lowercase; just pin the canonical form.
        let key = VariantKey::canonicalize("S", PassType::Normal, ["b", "A"]);
        assert_eq!(key.as_str(), "S|Normal|A+b");
    }
}
