//! Collection Scheduler
//!
//! The central state machine of a collection run. It is cooperative,
//! single-threaded and tick-driven: the host calls [`Collector::tick`] once
//! per frame, at most one phase transition is evaluated, and nothing ever
//! blocks. All "waiting" is an elapsed-time check against the phase's start
//! instant — the backend compiles variants asynchronously with no completion
//! signal, so elapsed wall-clock time is the only observable proxy for "the
//! backend has settled".
//!
//! Phase flow:
//!
//! ```text
//! Idle → Prepare → GatherMaterials → GatherScenes → RenderBatch
//! RenderBatch ──(globals configured)──→ GlobalSweepArm → ApplyGlobalKeyword
//!                                        ⇅ GlobalSweepSettle (re-render batch per keyword)
//! RenderBatch ──(more materials)──→ BatchSettle → RenderBatch
//! RenderBatch ──(done)──→ SceneHandoff → VisitScene ⇄ SceneSettle
//! VisitScene ──(no scenes left)──→ Finalize → Idle (+ completion callback)
//! ```
//!
//! Local and global keyword axes are swept independently: local keywords are
//! baked into the material entries at enumeration time, global keywords are
//! swept by destroying and recreating the *same* probe batch once per entry
//! so every probe is observed with exactly one combination active.

use std::path::PathBuf;
use std::time::Instant;

use glam::Vec3;
use rustc_hash::FxHashSet;

use crate::backend::{CollectorWorld, RenderBackend, SceneId};
use crate::collector::config::{CollectRequest, Timings, normalize_save_path};
use crate::collector::probe::{self, Probe};
use crate::enumerate::{self, MaterialEntry};
use crate::errors::{Result, VaricullError};
use crate::keywords::KeywordPolicy;
use crate::manifest::{self, Manifest};
use crate::settings::CollectorProfile;

/// Capture view travel path while a scene is open.
const SCENE_TRAVEL_START: Vec3 = Vec3::new(0.0, 100.0, 0.0);
const SCENE_TRAVEL_END: Vec3 = Vec3::new(1000.0, 100.0, 1000.0);

// ─── Phases & Outcomes ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Prepare,
    GatherMaterials,
    GatherScenes,
    RenderBatch,
    GlobalSweepArm,
    ApplyGlobalKeyword,
    GlobalSweepSettle,
    BatchSettle,
    SceneHandoff,
    VisitScene,
    SceneSettle,
    Finalize,
}

/// What one tick did.
#[derive(Debug)]
pub enum TickOutcome {
    /// No run in progress.
    Idle,
    /// A run is in progress and advanced (or waited).
    Running,
    /// The run just finished; the manifest has been persisted.
    Completed(CollectReport),
}

/// Summary of a finished run.
#[derive(Debug, Clone)]
pub struct CollectReport {
    pub shader_count: usize,
    pub variant_count: usize,
    /// Every document written, in write order.
    pub files: Vec<PathBuf>,
}

type CompletionCallback = Box<dyn FnOnce(&CollectReport)>;

// ─── Run State ───────────────────────────────────────────────────────────────

struct RunState {
    save_path: PathBuf,
    material_root: String,
    scene_root: String,
    blacklist: Vec<String>,
    shader_filter: FxHashSet<String>,
    batch_size: usize,
    split_by_shader_name: bool,
    collect_scene_variants: bool,
    save_readable_json: bool,

    policy: KeywordPolicy,
    materials: Vec<MaterialEntry>,
    batch: Vec<MaterialEntry>,
    probes: Vec<Probe>,
    keyword_index: usize,
    scenes: Vec<String>,
    open_scene: Option<SceneId>,
    phase_started: Instant,
    on_complete: Option<CompletionCallback>,
}

// ─── Collector ───────────────────────────────────────────────────────────────

/// Tick-driven shader variant collector.
pub struct Collector {
    phase: Phase,
    timings: Timings,
    run: Option<RunState>,
}

impl Default for Collector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector {
    #[must_use]
    pub fn new() -> Self {
        Self::with_timings(Timings::default())
    }

    #[must_use]
    pub fn with_timings(timings: Timings) -> Self {
        Self {
            phase: Phase::Idle,
            timings,
            run: None,
        }
    }

    /// `true` while a run is in progress.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Begin a collection run.
    ///
    /// A no-op while another run is in progress. The save path is validated
    /// before any state is mutated; the staging scene is recreated and all
    /// mutable run state starts fresh.
    pub fn start(
        &mut self,
        backend: &mut dyn RenderBackend,
        request: CollectRequest,
        profile: &CollectorProfile,
        on_complete: Option<CompletionCallback>,
    ) -> Result<()> {
        if self.is_running() {
            log::warn!("Shader variant collection already in progress; start ignored");
            return Ok(());
        }

        let save_path = normalize_save_path(&request.save_path)?;

        backend.reset_staging_scene();

        self.run = Some(RunState {
            save_path,
            material_root: request.material_root,
            scene_root: request.scene_root,
            blacklist: request.blacklist,
            shader_filter: request.shader_filter.into_iter().collect(),
            batch_size: request.batch_size.max(1),
            split_by_shader_name: request.split_by_shader_name,
            collect_scene_variants: profile.collect_scene_variants,
            save_readable_json: profile.save_readable_json,
            policy: KeywordPolicy::new(
                profile.global_keywords.clone(),
                profile.local_keywords.clone(),
            ),
            materials: Vec::new(),
            batch: Vec::new(),
            probes: Vec::new(),
            keyword_index: 0,
            scenes: Vec::new(),
            open_scene: None,
            phase_started: Instant::now(),
            on_complete,
        });
        self.phase = Phase::Prepare;
        log::info!("Shader variant collection started (profile {})", request.profile);
        Ok(())
    }

    /// Advance the state machine by at most one transition.
    pub fn tick(&mut self, world: &mut dyn CollectorWorld) -> Result<TickOutcome> {
        self.tick_at(world, Instant::now())
    }

    /// [`Self::tick`] with an explicit clock reading.
    pub fn tick_at(&mut self, world: &mut dyn CollectorWorld, now: Instant) -> Result<TickOutcome> {
        let outcome = self.step(world, now);
        if outcome.is_err() {
            // A fatal error aborts the whole run; probes and scenes are
            // recreated idempotently at the next start.
            self.run = None;
            self.phase = Phase::Idle;
        }
        outcome
    }

    // ── Phase Transitions ────────────────────────────────────────────────────

    fn step(&mut self, world: &mut dyn CollectorWorld, now: Instant) -> Result<TickOutcome> {
        let Some(run) = self.run.as_mut() else {
            return Ok(TickOutcome::Idle);
        };

        match self.phase {
            Phase::Idle => return Ok(TickOutcome::Idle),

            Phase::Prepare => {
                world.clear_compiled_variants();
                self.phase = Phase::GatherMaterials;
            }

            Phase::GatherMaterials => {
                run.materials = enumerate::enumerate_materials(
                    &*world,
                    &run.material_root,
                    &run.blacklist,
                    &run.shader_filter,
                    &run.policy,
                );
                log::info!("Enumerated {} material entries", run.materials.len());
                self.phase = Phase::GatherScenes;
            }

            Phase::GatherScenes => {
                run.scenes = if run.collect_scene_variants {
                    enumerate::enumerate_scenes(&*world, &run.scene_root, &run.blacklist)
                } else {
                    Vec::new()
                };
                log::info!("Enumerated {} scenes", run.scenes.len());
                self.phase = Phase::RenderBatch;
            }

            Phase::RenderBatch => {
                let count = run.batch_size.min(run.materials.len());
                run.batch = run.materials.drain(..count).collect();
                let rendered = !run.batch.is_empty();
                if rendered {
                    let created = probe::create_batch(&mut *world, &run.batch)?;
                    run.probes.extend(created);
                }

                run.phase_started = now;
                if rendered && !run.policy.globals().is_empty() {
                    // Start the sweep from a clean process-wide state.
                    run.policy.reset_globals(&mut *world);
                    run.keyword_index = 0;
                    self.phase = Phase::GlobalSweepArm;
                } else if !run.materials.is_empty() {
                    self.phase = Phase::BatchSettle;
                } else {
                    self.phase = Phase::SceneHandoff;
                }
            }

            Phase::GlobalSweepArm => {
                if now.duration_since(run.phase_started) >= self.timings.batch_settle {
                    self.phase = Phase::ApplyGlobalKeyword;
                }
            }

            Phase::ApplyGlobalKeyword => {
                run.phase_started = now;
                if run.keyword_index >= run.policy.globals().len() {
                    // Sweep done: guaranteed release of everything enabled.
                    run.policy.reset_globals(&mut *world);
                    run.keyword_index = 0;
                    self.phase = Phase::RenderBatch;
                } else {
                    run.policy.reset_globals(&mut *world);
                    let entry = run.policy.globals()[run.keyword_index].clone();
                    KeywordPolicy::enable_global(&mut *world, &entry);
                    log::info!("Applied global keyword entry: {entry}");
                    run.keyword_index += 1;
                    self.phase = Phase::GlobalSweepSettle;
                }
            }

            Phase::GlobalSweepSettle => {
                if now.duration_since(run.phase_started) >= self.timings.batch_settle {
                    if run.keyword_index < run.policy.globals().len() {
                        // The same batch must be observed once per keyword,
                        // each time with exactly one combination active.
                        probe::destroy_all(&mut *world, &mut run.probes);
                        run.probes = probe::create_batch(&mut *world, &run.batch)?;
                        run.phase_started = now;
                    }
                    self.phase = Phase::ApplyGlobalKeyword;
                }
            }

            Phase::BatchSettle => {
                if now.duration_since(run.phase_started) >= self.timings.batch_settle {
                    probe::destroy_all(&mut *world, &mut run.probes);
                    self.phase = Phase::RenderBatch;
                }
            }

            Phase::SceneHandoff => {
                if now.duration_since(run.phase_started) >= self.timings.batch_settle {
                    probe::destroy_all(&mut *world, &mut run.probes);
                    self.phase = Phase::VisitScene;
                }
            }

            Phase::VisitScene => {
                if run.scenes.is_empty() {
                    if let Some(scene) = run.open_scene.take() {
                        world.close_scene(scene);
                    }
                    run.phase_started = now;
                    self.phase = Phase::Finalize;
                } else {
                    let scene_path = run.scenes.remove(0);
                    if let Some(scene) = world.open_scene_additive(&scene_path) {
                        run.open_scene = Some(scene);
                        let view = world
                            .capture_view()
                            .ok_or(VaricullError::CaptureViewMissing)?;
                        view.set_position(SCENE_TRAVEL_START);
                        view.look_at(Vec3::ZERO);
                        run.phase_started = now;
                        self.phase = Phase::SceneSettle;
                        log::info!("Visiting scene: {scene_path}");
                    } else {
                        log::warn!("Scene failed to open, skipping: {scene_path}");
                    }
                }
            }

            Phase::SceneSettle => {
                let elapsed = now.duration_since(run.phase_started);
                if elapsed >= self.timings.scene_settle {
                    if let Some(scene) = run.open_scene.take() {
                        world.close_scene(scene);
                    }
                    self.phase = Phase::VisitScene;
                } else {
                    let t = elapsed.as_secs_f32() / self.timings.scene_settle.as_secs_f32();
                    let view = world
                        .capture_view()
                        .ok_or(VaricullError::CaptureViewMissing)?;
                    view.set_position(SCENE_TRAVEL_START.lerp(SCENE_TRAVEL_END, t));
                }
            }

            Phase::Finalize => {
                if now.duration_since(run.phase_started) < self.timings.final_delay {
                    return Ok(TickOutcome::Running);
                }

                let compiled = world.compiled_variants();
                let mut result = Manifest::extract(&compiled);

                let mut excluded: FxHashSet<String> =
                    world.always_included_shaders().into_iter().collect();
                excluded.extend(world.pipeline_hidden_shaders());
                excluded.extend(run.shader_filter.iter().cloned());
                result.apply_exclusions(&excluded);

                let outputs = manifest::persist(
                    &result,
                    &run.save_path,
                    run.split_by_shader_name,
                    run.save_readable_json,
                )?;
                let report = CollectReport {
                    shader_count: result.shader_variant_infos.len(),
                    variant_count: result.variant_count(),
                    files: outputs.files,
                };
                log::info!(
                    "Shader variant collection finished: {} shaders, {} variants",
                    report.shader_count,
                    report.variant_count
                );

                let callback = run.on_complete.take();
                self.run = None;
                self.phase = Phase::Idle;
                if let Some(callback) = callback {
                    callback(&report);
                }
                return Ok(TickOutcome::Completed(report));
            }
        }

        Ok(TickOutcome::Running)
    }
}
