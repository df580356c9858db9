use std::collections::BTreeMap;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use tuneforge::fields::{self, FieldKind, SettingValue};
use tuneforge::runtime::{NullMemoryProbe, RecordingRuntime, RuntimeValue};
use tuneforge::settings::{Category, SettingsDocument, UpscalingMode};
use tuneforge::storage::MemoryStorage;
use tuneforge::store::{Collaborators, SettingsStore};

const PATH: &str = "Saved/Settings.json";

fn store(defaults: SettingsDocument, recorder: &RecordingRuntime, storage: Arc<MemoryStorage>) -> SettingsStore {
    SettingsStore::with_defaults(
        defaults,
        Collaborators {
            runtime: Box::new(recorder.clone()),
            memory: Box::new(NullMemoryProbe),
            storage,
        },
        PATH,
    )
}

#[test]
fn frame_rate_limit_survives_reload_with_other_defaults() {
    let storage = Arc::new(MemoryStorage::new());
    let recorder = RecordingRuntime::new();
    let mut first = store(SettingsDocument::default(), &recorder, storage.clone());

    assert_eq!(first.performance().frame_rate_limit, 0.0);
    first.set_frame_rate_limit(-10.0);
    assert_eq!(first.performance().frame_rate_limit, 0.0);
    first.set_frame_rate_limit(9999.0);
    assert_eq!(first.performance().frame_rate_limit, 9999.0);
    assert!(first.save_settings());

    let mut other_defaults = SettingsDocument::default();
    other_defaults.performance.frame_rate_limit = 30.0;
    other_defaults.performance.vsync = false;
    let mut second = store(other_defaults, &RecordingRuntime::new(), storage);
    assert!(second.load_settings());
    assert_eq!(second.performance().frame_rate_limit, 9999.0);
    // Present in the saved file, so the saved value wins over the new default.
    assert!(second.performance().vsync);
}

#[test]
fn every_numeric_field_clamps_extreme_input() {
    let recorder = RecordingRuntime::new();
    let mut store = store(SettingsDocument::default(), &recorder, Arc::new(MemoryStorage::new()));

    for spec in fields::FIELDS {
        let inputs: &[f64] = match spec.kind {
            FieldKind::Int(_) => &[-1e12, 1e12, 2.0],
            FieldKind::Float(_) => &[-1e30, 1e30, f64::NAN, f64::INFINITY, f64::NEG_INFINITY],
            _ => continue,
        };
        for &input in inputs {
            let stored = store
                .set_field(spec.category, spec.key, SettingValue::Float(input))
                .unwrap();
            let read_back = store.get_field(spec.category, spec.key).unwrap();
            assert_eq!(stored, read_back, "{} with {}", spec, input);
            match (spec.kind, read_back) {
                (FieldKind::Int(range), SettingValue::Int(v)) => {
                    assert!(range.contains(v as i32), "{} = {} out of range", spec, v)
                }
                (FieldKind::Float(range), SettingValue::Float(v)) => {
                    assert!(v.is_finite(), "{} not finite", spec);
                    assert!(range.contains(v as f32), "{} = {} out of range", spec, v)
                }
                other => panic!("unexpected kind/value {:?}", other),
            }
        }
    }
}

#[test]
fn typed_setters_repair_non_finite_input() {
    let recorder = RecordingRuntime::new();
    let mut store = store(SettingsDocument::default(), &recorder, Arc::new(MemoryStorage::new()));

    store.set_fov(f32::NAN);
    assert_eq!(store.gameplay().fov, 60.0);
    store.set_fov(f32::INFINITY);
    assert_eq!(store.gameplay().fov, 120.0);
    store.set_fov(f32::NEG_INFINITY);
    assert_eq!(store.gameplay().fov, 60.0);

    store.set_frame_rate_limit(f32::INFINITY);
    assert_eq!(store.performance().frame_rate_limit, f32::MAX);
    store.set_frame_rate_limit(f32::NAN);
    assert_eq!(store.performance().frame_rate_limit, 0.0);

    store.set_master_volume(f32::NAN);
    assert_eq!(store.audio().master_volume, 0.0);
    store.set_mouse_sensitivity(f32::NEG_INFINITY);
    assert_eq!(store.gameplay().mouse_sensitivity, 0.1);

    assert_eq!(recorder.last("game.FieldOfView"), Some(RuntimeValue::Float(60.0)));
    assert_eq!(recorder.last("t.MaxFPS"), Some(RuntimeValue::Float(0.0)));
}

#[test]
fn in_range_values_pass_through_unchanged() {
    let recorder = RecordingRuntime::new();
    let mut store = store(SettingsDocument::default(), &recorder, Arc::new(MemoryStorage::new()));
    store.set_mouse_sensitivity(2.25);
    store.set_controller_dead_zone(0.2);
    store.set_shadow_quality(2);
    store.set_hdr_max_nits(4000.0);
    assert_eq!(store.gameplay().mouse_sensitivity, 2.25);
    assert_eq!(store.gameplay().controller_dead_zone, 0.2);
    assert_eq!(store.graphics().shadow_quality, 2);
    assert_eq!(store.display().hdr_max_nits, 4000.0);
}

#[test]
fn apply_all_is_idempotent_and_runs_every_category_once() {
    let recorder = RecordingRuntime::new();
    let mut store = store(SettingsDocument::default(), &recorder, Arc::new(MemoryStorage::new()));
    store.set_upscaling_mode(UpscalingMode::Dlss);
    store.set_photosensitivity_mode(true);
    recorder.take();

    store.apply_all();
    let first = recorder.take();
    store.apply_all();
    let second = recorder.take();
    assert_eq!(first, second);

    // Collapse to name -> final value; both passes must agree.
    let collapse = |calls: &[(String, RuntimeValue)]| {
        calls
            .iter()
            .map(|(name, value)| (name.clone(), format!("{}", value)))
            .collect::<BTreeMap<_, _>>()
    };
    assert_eq!(collapse(&first), collapse(&second));

    for knob in ["sg.ShadowQuality", "r.VSync", "au.MasterVolume", "net.Crossplay", "stat.FPS"] {
        assert!(first.iter().any(|(name, _)| name == knob), "{} not applied", knob);
    }
}

#[test]
fn setters_only_apply_their_own_category() {
    let recorder = RecordingRuntime::new();
    let mut store = store(SettingsDocument::default(), &recorder, Arc::new(MemoryStorage::new()));
    store.set_master_volume(0.5);
    let calls = recorder.take();
    assert!(calls.iter().all(|(name, _)| name.starts_with("au.") || name.starts_with("ui.")));
    assert_eq!(store.dirty_categories(), vec![Category::Audio]);
}

#[test]
fn load_failure_keeps_last_known_good() {
    let storage = Arc::new(MemoryStorage::new());
    storage.insert(PATH, "not json at all");
    let recorder = RecordingRuntime::new();
    let mut store = store(SettingsDocument::default(), &recorder, storage);
    store.set_music_volume(0.1);
    let before = store.get_all_settings();
    assert!(!store.load_settings());
    assert_eq!(store.get_all_settings(), before);
}
