//! File-level round-trip tests for the patch format.

use polivoz_config::{PATCH_VERSION, Patch, PatchError};
use polivoz_core::{ControlStore, ControlTag};

#[test]
fn save_and_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bright_lead.toml");

    let mut store = ControlStore::new();
    store.set(ControlTag::FilterCutoff, 8000.0);
    store.set(ControlTag::FilterResonance, 4.0);
    store.set(ControlTag::Eg1AttackMs, 2.0);
    store.set(ControlTag::Lfo1PitchIntensity, 0.3);
    store.set(ControlTag::Osc2DetuneCents, 7.0);

    Patch::from_store(&store).save(&path).unwrap();
    let loaded = Patch::load(&path).unwrap();

    let mut restored = ControlStore::new();
    assert_eq!(loaded.apply_to(&mut restored), ControlTag::COUNT);
    for tag in ControlTag::ALL {
        assert_eq!(restored.get(tag), store.get(tag), "{:?}", tag);
    }
}

#[test]
fn load_missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does_not_exist.toml");

    match Patch::load(&path) {
        Err(PatchError::ReadFile { path: reported, .. }) => {
            assert_eq!(reported, path);
        }
        other => panic!("expected ReadFile, got {other:?}"),
    }
}

#[test]
fn save_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no_such_dir").join("patch.toml");

    let patch = Patch::from_store(&ControlStore::new());
    assert!(matches!(
        patch.save(&path),
        Err(PatchError::WriteFile { .. })
    ));
}

#[test]
fn hand_written_patch_loads() {
    // The format is editable by hand: version plus [[controls]] entries
    let text = r#"
version = 1

[[controls]]
id = "filter_cutoff"
value = 640.0

[[controls]]
id = "output_gain"
value = -12.0
"#;
    let patch = Patch::from_toml(text).unwrap();
    assert_eq!(patch.version, PATCH_VERSION);

    let mut store = ControlStore::new();
    assert_eq!(patch.apply_to(&mut store), 2);
    assert_eq!(store.get(ControlTag::FilterCutoff), 640.0);
    assert_eq!(store.get(ControlTag::OutputGainDb), -12.0);
}
