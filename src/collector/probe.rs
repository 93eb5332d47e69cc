//! Probe Rendering
//!
//! Creates one visible renderable per material entry so the backend is
//! forced to compile the corresponding variant. Probes are laid out on a
//! unit grid sized to the capture view's aspect, so a single orthographic
//! camera sees all of them at once.
//!
//! Every probe owns an exclusive material instance; enabling a local keyword
//! on it can never leak onto the shared asset. Teardown reverts the keyword,
//! releases the instance and asks the backend to reclaim resources.

use glam::Vec3;

use crate::backend::{MaterialInstanceId, ProbeId, RenderBackend};
use crate::enumerate::MaterialEntry;
use crate::errors::{Result, VaricullError};
use crate::keywords::KeywordPolicy;

/// A transient renderable bound to one material entry.
#[derive(Debug)]
pub struct Probe {
    pub id: ProbeId,
    pub material: MaterialInstanceId,
    /// Local keyword entry enabled on the instance, reverted at teardown.
    pub keyword: Option<String>,
}

// ─── Grid Layout ─────────────────────────────────────────────────────────────

/// Near-square probe grid sized from `sqrt(count / aspect)`, centered at
/// the origin.
#[derive(Debug, Clone, Copy)]
pub struct GridLayout {
    half_width: f32,
    half_height: f32,
    columns: u32,
}

impl GridLayout {
    #[must_use]
    pub fn new(count: usize, aspect: f32) -> Self {
        let side = (count as f32 / aspect).sqrt();
        let height = side + 1.0;
        let width = side * aspect + 1.0;
        Self {
            half_width: (width / 2.0).ceil(),
            half_height: (height / 2.0).ceil(),
            columns: (width as u32).max(1),
        }
    }

    /// Orthographic half height that keeps every row visible.
    #[must_use]
    pub fn ortho_half_height(&self) -> f32 {
        self.half_height
    }

    /// Unit-grid position of the probe at `index`.
    #[must_use]
    pub fn position(&self, index: usize) -> Vec3 {
        let x = (index as u32 % self.columns) as f32;
        let y = (index as u32 / self.columns) as f32;
        Vec3::new(x - self.half_width + 1.0, y - self.half_height + 1.0, 0.0)
    }
}

// ─── Batch Lifecycle ─────────────────────────────────────────────────────────

/// Create one probe per entry, laid out for the active capture view.
///
/// Entries whose material cannot be instantiated are skipped (their grid
/// cell stays empty). Fails only when no capture view is available —
/// without one nothing the probes do is ever rendered.
pub fn create_batch(
    backend: &mut dyn RenderBackend,
    entries: &[MaterialEntry],
) -> Result<Vec<Probe>> {
    let layout = {
        let view = backend
            .capture_view()
            .ok_or(VaricullError::CaptureViewMissing)?;
        let layout = GridLayout::new(entries.len(), view.aspect());
        view.set_orthographic(layout.ortho_half_height());
        view.set_position(Vec3::new(0.0, 0.0, -10.0));
        layout
    };

    let mut probes = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let Some(material) = backend.instantiate_material(&entry.asset_path) else {
            log::warn!("Failed to instantiate material: {}", entry.asset_path);
            continue;
        };
        if let Some(keyword) = &entry.keyword {
            KeywordPolicy::enable_local(backend, material, keyword);
        }
        let id = backend.spawn_probe(material, layout.position(index));
        probes.push(Probe {
            id,
            material,
            keyword: entry.keyword.clone(),
        });
    }

    log::debug!("Created probe batch: {} probes", probes.len());
    Ok(probes)
}

/// Tear down every probe, reverting instance-scoped keyword state, then
/// trigger a backend resource reclamation pass.
pub fn destroy_all(backend: &mut dyn RenderBackend, probes: &mut Vec<Probe>) {
    for probe in probes.drain(..) {
        if let Some(keyword) = &probe.keyword {
            KeywordPolicy::disable_local(backend, probe.material, keyword);
        }
        backend.destroy_probe(probe.id);
        backend.release_material(probe.material);
    }
    backend.reclaim_unused_resources();
}
