//! Backend Collaborator Traits
//!
//! The collector never compiles shaders itself — it triggers compilation by
//! rendering and reads back what the backend accumulated. Everything it needs
//! from the host engine is behind the traits in this module:
//!
//! - [`AssetDatabase`] — directory-style asset queries (find materials /
//!   scenes under a root, resolve a material's shader).
//! - [`RenderBackend`] — keyword toggles, probe lifecycle, scene loading and
//!   the accumulated compiled-variant collection.
//! - [`CaptureView`] — the camera the probe grid is laid out for.
//!
//! Handles are opaque integer newtypes; the backend owns the actual objects.

use glam::Vec3;

use crate::key::PassType;

// ─── Handles ─────────────────────────────────────────────────────────────────

/// Handle to an exclusive, instantiated copy of a material asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialInstanceId(pub u64);

/// Handle to one transient renderable probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProbeId(pub u64);

/// Handle to an additively opened scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneId(pub u64);

// ─── Readback Records ────────────────────────────────────────────────────────

/// A material's shader as resolved by the asset database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderRef {
    pub name: String,
    /// Path of the shader asset itself (not the material).
    pub asset_path: String,
}

/// One `(shader, pass, keyword set)` entry observed as compiled.
///
/// Read back from the backend's accumulated collection after a run settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledVariant {
    pub shader_name: String,
    pub shader_asset_path: String,
    pub pass: PassType,
    pub keywords: Vec<String>,
}

// ─── Capture View ────────────────────────────────────────────────────────────

/// The camera every probe must be visible to.
pub trait CaptureView {
    /// Width / height ratio, used to size the probe grid.
    fn aspect(&self) -> f32;

    /// Switch to an orthographic projection with the given half height.
    fn set_orthographic(&mut self, half_height: f32);

    fn set_position(&mut self, position: Vec3);

    fn look_at(&mut self, target: Vec3);
}

// ─── Asset Database ──────────────────────────────────────────────────────────

/// Directory-style asset queries, consumed as an opaque collaborator.
pub trait AssetDatabase {
    /// All material asset paths under `root`, in stable enumeration order.
    fn find_materials(&self, root: &str) -> Vec<String>;

    /// All scene asset paths under `root`, in stable enumeration order.
    fn find_scenes(&self, root: &str) -> Vec<String>;

    /// Resolve the shader a material uses. `None` if the material or its
    /// shader cannot be loaded; such materials are skipped.
    fn material_shader(&self, material_path: &str) -> Option<ShaderRef>;

    /// Shader names force-included by the host regardless of configuration.
    /// These compile anyway and only add noise to the manifest.
    fn always_included_shaders(&self) -> Vec<String>;

    /// Engine-internal "Hidden/" shader names shipped by the render
    /// pipeline package. Excluded from the manifest for the same reason.
    fn pipeline_hidden_shaders(&self) -> Vec<String>;
}

// ─── Render Backend ──────────────────────────────────────────────────────────

/// Rendering-side operations the collector drives.
///
/// All methods are expected to be cheap; the backend compiles shader
/// permutations asynchronously as a side effect of probes being rendered,
/// which is why the scheduler waits empirically after every mutation.
pub trait RenderBackend {
    // ── Keywords ─────────────────────────────────────────────────────────────

    /// Enable one keyword token in the process-wide keyword table.
    fn enable_global_keyword(&mut self, token: &str);

    /// Disable one keyword token in the process-wide keyword table.
    fn disable_global_keyword(&mut self, token: &str);

    /// Enable one keyword token on a single material instance.
    fn enable_local_keyword(&mut self, instance: MaterialInstanceId, token: &str);

    /// Disable one keyword token on a single material instance.
    fn disable_local_keyword(&mut self, instance: MaterialInstanceId, token: &str);

    // ── Probes ───────────────────────────────────────────────────────────────

    /// Instantiate an exclusive (non-shared) copy of a material asset, so
    /// keyword toggles cannot leak onto the original. `None` if the asset
    /// cannot be loaded.
    fn instantiate_material(&mut self, material_path: &str) -> Option<MaterialInstanceId>;

    /// Release an instance created by [`Self::instantiate_material`].
    fn release_material(&mut self, instance: MaterialInstanceId);

    /// Spawn a renderable probe bound to a material instance.
    fn spawn_probe(&mut self, instance: MaterialInstanceId, position: Vec3) -> ProbeId;

    fn destroy_probe(&mut self, probe: ProbeId);

    /// Ask the backend to reclaim unused resources. Bounded effort — not
    /// guaranteed to free anything same-tick.
    fn reclaim_unused_resources(&mut self);

    // ── Scenes & View ────────────────────────────────────────────────────────

    /// Replace the current content with a fresh staging scene.
    fn reset_staging_scene(&mut self);

    /// Open a scene additively. `None` if it fails to open; the sweep
    /// skips it and continues.
    fn open_scene_additive(&mut self, scene_path: &str) -> Option<SceneId>;

    fn close_scene(&mut self, scene: SceneId);

    /// The active capture view, if any. Probe creation is impossible
    /// without one.
    fn capture_view(&mut self) -> Option<&mut dyn CaptureView>;

    // ── Compiled Collection ──────────────────────────────────────────────────

    /// Drop everything accumulated so far (run starts from a clean slate).
    fn clear_compiled_variants(&mut self);

    /// Snapshot of every variant observed as compiled so far.
    fn compiled_variants(&self) -> Vec<CompiledVariant>;
}

/// Everything the collection scheduler needs from the host, as one object.
pub trait CollectorWorld: AssetDatabase + RenderBackend {}

impl<T: AssetDatabase + RenderBackend> CollectorWorld for T {}
