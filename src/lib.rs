#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod backend;
pub mod collector;
pub mod enumerate;
pub mod errors;
pub mod key;
pub mod keywords;
pub mod manifest;
pub mod settings;
pub mod stripper;

pub use backend::{
    AssetDatabase, CaptureView, CollectorWorld, CompiledVariant, MaterialInstanceId, ProbeId,
    RenderBackend, SceneId, ShaderRef,
};
pub use collector::{CollectReport, CollectRequest, Collector, TickOutcome, Timings};
pub use enumerate::MaterialEntry;
pub use errors::{Result, VaricullError};
pub use key::{PassType, VariantKey};
pub use keywords::{KeywordPolicy, LocalKeyword, LocalKeywordTable};
pub use manifest::{MANIFEST_EXTENSION, Manifest, ShaderVariantInfo, VariantElement};
pub use settings::{CollectorProfile, ProfileStore};
pub use stripper::{CandidateVariant, ShaderSnippet, StripperConfig, VariantStripper};
