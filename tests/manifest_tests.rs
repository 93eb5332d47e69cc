//! Manifest Persistence Tests
//!
//! On-disk behavior of combined / split / mirrored manifest output.

use std::fs;

use anyhow::Result;

use varicull::key::PassType;
use varicull::manifest::{self, MANIFEST_EXTENSION, Manifest};
use varicull::CompiledVariant;

fn sample_manifest() -> Manifest {
    let compiled = vec![
        CompiledVariant {
            shader_name: "Universal/Lit".to_string(),
            shader_asset_path: "Shaders/Lit.shader".to_string(),
            pass: PassType::ForwardBase,
            keywords: vec!["FOG".to_string()],
        },
        CompiledVariant {
            shader_name: "Unlit".to_string(),
            shader_asset_path: "Shaders/Unlit.shader".to_string(),
            pass: PassType::Normal,
            keywords: vec![],
        },
    ];
    Manifest::extract(&compiled)
}

#[test]
fn combined_mode_writes_one_loadable_document() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let save_path = dir.path().join(format!("variants.{MANIFEST_EXTENSION}"));

    let outputs = manifest::persist(&sample_manifest(), &save_path, false, false)?;
    assert_eq!(outputs.files, vec![save_path.clone()]);
    assert!(outputs.shader_file_names.is_empty());

    let loaded = Manifest::load(&save_path)?;
    assert_eq!(loaded, sample_manifest());
    Ok(())
}

#[test]
fn readable_mirror_is_written_next_to_the_document() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let save_path = dir.path().join(format!("variants.{MANIFEST_EXTENSION}"));

    manifest::persist(&sample_manifest(), &save_path, false, true)?;
    let mirror = dir.path().join("variants.json");
    assert!(mirror.is_file());
    // Pretty-printed, but the same document.
    let loaded: Manifest = serde_json::from_str(&fs::read_to_string(&mirror)?)?;
    assert_eq!(loaded, sample_manifest());
    Ok(())
}

#[test]
fn split_mode_produces_per_shader_files_and_an_index() {
    let dir = tempfile::tempdir().unwrap();
    let save_path = dir.path().join(format!("variants.{MANIFEST_EXTENSION}"));

    let outputs = manifest::persist(&sample_manifest(), &save_path, true, false).unwrap();
    assert_eq!(outputs.shader_file_names, vec!["Universal_Lit", "Unlit"]);

    // One file per distinct shader, no combined file left on disk.
    assert!(dir.path().join(format!("Universal_Lit.{MANIFEST_EXTENSION}")).is_file());
    assert!(dir.path().join(format!("Unlit.{MANIFEST_EXTENSION}")).is_file());
    assert!(!save_path.exists());

    let index = fs::read_to_string(dir.path().join("variants_shader_names.txt")).unwrap();
    let lines: Vec<_> = index.lines().collect();
    assert_eq!(lines, vec!["Universal_Lit", "Unlit"]);
}

#[test]
fn split_mode_wipes_stale_split_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let stale = dir.path().join(format!("Gone.{MANIFEST_EXTENSION}"));
    fs::write(&stale, "{}").unwrap();

    let save_path = dir.path().join(format!("variants.{MANIFEST_EXTENSION}"));
    manifest::persist(&sample_manifest(), &save_path, true, false).unwrap();
    assert!(!stale.exists());
}

#[test]
fn split_documents_contain_exactly_one_shader() {
    let dir = tempfile::tempdir().unwrap();
    let save_path = dir.path().join(format!("variants.{MANIFEST_EXTENSION}"));
    manifest::persist(&sample_manifest(), &save_path, true, false).unwrap();

    let subset =
        Manifest::load(&dir.path().join(format!("Unlit.{MANIFEST_EXTENSION}"))).unwrap();
    assert_eq!(subset.shader_variant_infos.len(), 1);
    assert_eq!(subset.shader_variant_infos[0].shader_name, "Unlit");
}

#[test]
fn missing_parent_directories_are_created() {
    let dir = tempfile::tempdir().unwrap();
    let save_path = dir
        .path()
        .join("nested/deeper")
        .join(format!("variants.{MANIFEST_EXTENSION}"));
    manifest::persist(&sample_manifest(), &save_path, false, false).unwrap();
    assert!(save_path.is_file());
}
