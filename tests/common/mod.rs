//! Shared mock host for collector integration tests.
//!
//! `MockWorld` implements both backend traits with the one behavior the
//! collector relies on: a variant is observed as compiled whenever a probe
//! is visible with a keyword combination active — at spawn, and again every
//! time the process-wide keyword table changes while probes are live.

use glam::Vec3;
use rustc_hash::{FxHashMap, FxHashSet};

use varicull::key::PassType;
use varicull::{
    AssetDatabase, CaptureView, CompiledVariant, MaterialInstanceId, ProbeId, RenderBackend,
    SceneId, ShaderRef,
};

#[derive(Default)]
pub struct MockView {
    pub aspect: f32,
    pub ortho_half_height: Option<f32>,
    pub positions: Vec<Vec3>,
    pub look_targets: Vec<Vec3>,
}

impl CaptureView for MockView {
    fn aspect(&self) -> f32 {
        if self.aspect == 0.0 { 1.0 } else { self.aspect }
    }

    fn set_orthographic(&mut self, half_height: f32) {
        self.ortho_half_height = Some(half_height);
    }

    fn set_position(&mut self, position: Vec3) {
        self.positions.push(position);
    }

    fn look_at(&mut self, target: Vec3) {
        self.look_targets.push(target);
    }
}

struct InstanceState {
    material_path: String,
    local_tokens: Vec<String>,
}

#[derive(Default)]
pub struct MockWorld {
    // Content
    pub materials: Vec<(String, ShaderRef)>,
    pub scenes: Vec<String>,
    pub scene_variants: FxHashMap<String, Vec<CompiledVariant>>,
    pub always_included: Vec<String>,
    pub hidden_shaders: Vec<String>,

    // View
    pub view: MockView,
    pub capture_view_present: bool,

    // Observed state
    pub active_globals: FxHashSet<String>,
    pub live_probes: FxHashSet<u64>,
    pub open_scenes: Vec<u64>,
    pub compiled: Vec<CompiledVariant>,
    pub staging_resets: usize,
    pub reclaim_calls: usize,
    pub clear_calls: usize,
    pub disabled_local_tokens: Vec<String>,

    instances: FxHashMap<u64, InstanceState>,
    probe_instances: FxHashMap<u64, u64>,
    next_id: u64,
}

impl MockWorld {
    pub fn new() -> Self {
        Self {
            capture_view_present: true,
            ..Default::default()
        }
    }

    pub fn with_material(mut self, path: &str, shader_name: &str) -> Self {
        self.materials.push((
            path.to_string(),
            ShaderRef {
                name: shader_name.to_string(),
                asset_path: format!("Shaders/{shader_name}.shader"),
            },
        ));
        self
    }

    pub fn with_scene(mut self, path: &str, shader_name: &str) -> Self {
        self.scenes.push(path.to_string());
        self.scene_variants.insert(
            path.to_string(),
            vec![CompiledVariant {
                shader_name: shader_name.to_string(),
                shader_asset_path: format!("Shaders/{shader_name}.shader"),
                pass: PassType::ForwardBase,
                keywords: Vec::new(),
            }],
        );
        self
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    fn alloc_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Record what the given live probe would compile right now.
    fn record_probe(&mut self, probe: u64) {
        let Some(instance_id) = self.probe_instances.get(&probe) else {
            return;
        };
        let Some(instance) = self.instances.get(instance_id) else {
            return;
        };
        let Some((_, shader)) = self
            .materials
            .iter()
            .find(|(path, _)| *path == instance.material_path)
        else {
            return;
        };

        let mut keywords: Vec<String> = self
            .active_globals
            .iter()
            .chain(instance.local_tokens.iter())
            .cloned()
            .collect();
        keywords.sort();
        let variant = CompiledVariant {
            shader_name: shader.name.clone(),
            shader_asset_path: shader.asset_path.clone(),
            pass: PassType::ForwardBase,
            keywords,
        };
        self.compiled.push(variant);
    }

    fn record_all_live(&mut self) {
        let probes: Vec<u64> = self.live_probes.iter().copied().collect();
        for probe in probes {
            self.record_probe(probe);
        }
    }
}

impl AssetDatabase for MockWorld {
    fn find_materials(&self, root: &str) -> Vec<String> {
        self.materials
            .iter()
            .filter(|(path, _)| path.starts_with(root))
            .map(|(path, _)| path.clone())
            .collect()
    }

    fn find_scenes(&self, root: &str) -> Vec<String> {
        self.scenes
            .iter()
            .filter(|path| path.starts_with(root))
            .cloned()
            .collect()
    }

    fn material_shader(&self, material_path: &str) -> Option<ShaderRef> {
        self.materials
            .iter()
            .find(|(path, _)| path == material_path)
            .map(|(_, shader)| shader.clone())
    }

    fn always_included_shaders(&self) -> Vec<String> {
        self.always_included.clone()
    }

    fn pipeline_hidden_shaders(&self) -> Vec<String> {
        self.hidden_shaders.clone()
    }
}

impl RenderBackend for MockWorld {
    fn enable_global_keyword(&mut self, token: &str) {
        if self.active_globals.insert(token.to_string()) {
            self.record_all_live();
        }
    }

    fn disable_global_keyword(&mut self, token: &str) {
        if self.active_globals.remove(token) {
            self.record_all_live();
        }
    }

    fn enable_local_keyword(&mut self, instance: MaterialInstanceId, token: &str) {
        if let Some(state) = self.instances.get_mut(&instance.0) {
            state.local_tokens.push(token.to_string());
        }
    }

    fn disable_local_keyword(&mut self, instance: MaterialInstanceId, token: &str) {
        if let Some(state) = self.instances.get_mut(&instance.0) {
            state.local_tokens.retain(|t| t != token);
        }
        self.disabled_local_tokens.push(token.to_string());
    }

    fn instantiate_material(&mut self, material_path: &str) -> Option<MaterialInstanceId> {
        if !self.materials.iter().any(|(path, _)| path == material_path) {
            return None;
        }
        let id = self.alloc_id();
        self.instances.insert(
            id,
            InstanceState {
                material_path: material_path.to_string(),
                local_tokens: Vec::new(),
            },
        );
        Some(MaterialInstanceId(id))
    }

    fn release_material(&mut self, instance: MaterialInstanceId) {
        self.instances.remove(&instance.0);
    }

    fn spawn_probe(&mut self, instance: MaterialInstanceId, _position: Vec3) -> ProbeId {
        let id = self.alloc_id();
        self.live_probes.insert(id);
        self.probe_instances.insert(id, instance.0);
        self.record_probe(id);
        ProbeId(id)
    }

    fn destroy_probe(&mut self, probe: ProbeId) {
        self.live_probes.remove(&probe.0);
        self.probe_instances.remove(&probe.0);
    }

    fn reclaim_unused_resources(&mut self) {
        self.reclaim_calls += 1;
    }

    fn reset_staging_scene(&mut self) {
        self.staging_resets += 1;
    }

    fn open_scene_additive(&mut self, scene_path: &str) -> Option<SceneId> {
        if !self.scenes.iter().any(|path| path == scene_path) {
            return None;
        }
        let id = self.alloc_id();
        self.open_scenes.push(id);
        if let Some(variants) = self.scene_variants.get(scene_path) {
            self.compiled.extend(variants.iter().cloned());
        }
        Some(SceneId(id))
    }

    fn close_scene(&mut self, scene: SceneId) {
        self.open_scenes.retain(|id| *id != scene.0);
    }

    fn capture_view(&mut self) -> Option<&mut dyn CaptureView> {
        if self.capture_view_present {
            Some(&mut self.view)
        } else {
            None
        }
    }

    fn clear_compiled_variants(&mut self) {
        self.clear_calls += 1;
        self.compiled.clear();
    }

    fn compiled_variants(&self) -> Vec<CompiledVariant> {
        self.compiled.clone()
    }
}
