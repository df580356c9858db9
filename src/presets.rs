//! Quick operations that fan out into several fields. Each one stores its
//! categories through the category setters, so every touched category is
//! clamped and applied exactly once.

use crate::settings::{GraphicsSettings, RenderingSettings, Resolution, WindowMode, limits};
use crate::store::SettingsStore;

/// Rendering fields driven by a quality preset level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RenderingTier {
    lumen: bool,
    ray_tracing: bool,
    ssao: bool,
    ssr: bool,
    volumetric_fog: bool,
    contact_shadows: bool,
    ssgi: bool,
}

const fn tier(
    lumen: bool,
    ray_tracing: bool,
    ssao: bool,
    ssr: bool,
    volumetric_fog: bool,
    contact_shadows: bool,
    ssgi: bool,
) -> RenderingTier {
    RenderingTier {
        lumen,
        ray_tracing,
        ssao,
        ssr,
        volumetric_fog,
        contact_shadows,
        ssgi,
    }
}

const PRESET_TIERS: [RenderingTier; 5] = [
    tier(false, false, false, false, false, false, false),
    tier(false, false, true, false, false, false, false),
    tier(true, false, true, true, true, false, false),
    tier(true, false, true, true, true, true, false),
    tier(true, true, true, true, true, true, true),
];

fn preset_rendering(mut rendering: RenderingSettings, level: i32) -> RenderingSettings {
    let tier = PRESET_TIERS[level as usize];
    rendering.lumen = tier.lumen;
    rendering.ray_tracing = tier.ray_tracing;
    rendering.ssao = tier.ssao;
    rendering.ssr = tier.ssr;
    rendering.volumetric_fog = tier.volumetric_fog;
    rendering.contact_shadows = tier.contact_shadows;
    rendering.ssgi = tier.ssgi;
    rendering.anisotropic_filtering = level;
    rendering.global_illumination_quality = level;
    rendering.reflection_quality = level;
    rendering
}

impl SettingsStore {
    pub fn set_overall_graphics_quality(&mut self, level: i32) {
        self.set_graphics(GraphicsSettings::uniform(level));
    }

    /// Graphics scalability plus the matching rendering feature tier, 0 (low)
    /// to 4 (epic).
    pub fn apply_quality_preset(&mut self, level: i32) {
        let level = limits::QUALITY.clamp(level);
        let rendering = preset_rendering(self.rendering(), level);
        self.set_graphics(GraphicsSettings::uniform(level));
        self.set_rendering(rendering);
    }

    pub fn set_all_post_process_effects(&mut self, enabled: bool) {
        let mut rendering = self.rendering();
        rendering.motion_blur = enabled;
        rendering.bloom = enabled;
        rendering.depth_of_field = enabled;
        rendering.lens_flares = enabled;
        rendering.chromatic_aberration = enabled;
        rendering.film_grain = enabled;
        rendering.vignette = enabled;
        self.set_rendering(rendering);
    }

    /// Trade image quality for frame rate. Turning it off restores graphics,
    /// rendering and performance defaults.
    pub fn enable_performance_mode(&mut self, enable: bool) {
        if !enable {
            let defaults = self.defaults().clone();
            self.set_graphics(defaults.graphics);
            self.set_rendering(defaults.rendering);
            self.set_performance(defaults.performance);
            return;
        }

        let mut graphics = self.graphics();
        graphics.shadow_quality = 1;
        graphics.post_process = 1;
        graphics.effects = 1;

        let mut rendering = self.rendering();
        rendering.ray_tracing = false;
        rendering.lumen = false;
        rendering.ssgi = false;
        rendering.global_illumination_quality = 1;
        rendering.reflection_quality = 1;
        rendering.motion_blur = false;
        rendering.depth_of_field = false;
        rendering.volumetric_fog = false;
        rendering.chromatic_aberration = false;
        rendering.film_grain = false;

        let mut performance = self.performance();
        performance.dynamic_resolution = true;

        self.set_graphics(graphics);
        self.set_rendering(rendering);
        self.set_performance(performance);
    }

    /// Maximum image quality. Turning it off restores graphics and rendering
    /// defaults.
    pub fn enable_quality_mode(&mut self, enable: bool) {
        if !enable {
            let defaults = self.defaults().clone();
            self.set_graphics(defaults.graphics);
            self.set_rendering(defaults.rendering);
            return;
        }

        let mut rendering = self.rendering();
        rendering.lumen = true;
        rendering.ray_tracing = true;
        rendering.ssao = true;
        rendering.ssr = true;
        rendering.bloom = true;
        rendering.depth_of_field = true;
        rendering.lens_flares = true;
        rendering.vignette = true;
        rendering.volumetric_fog = true;
        rendering.taa = true;
        rendering.ssgi = true;
        rendering.contact_shadows = true;
        rendering.anisotropic_filtering = 4;
        rendering.global_illumination_quality = 4;
        rendering.reflection_quality = 4;

        self.set_graphics(GraphicsSettings::uniform(4));
        self.set_rendering(rendering);
    }

    pub fn set_max_frame_rate(&mut self, fps: f32) {
        self.set_frame_rate_limit(fps);
    }

    pub fn set_ray_tracing(&mut self, enabled: bool) {
        self.set_ray_tracing_enabled(enabled);
    }

    pub fn set_resolution_simple(&mut self, width: i32, height: i32) {
        self.set_resolution(Resolution::new(width, height));
    }

    pub fn set_fullscreen(&mut self, fullscreen: bool) {
        self.set_window_mode(if fullscreen {
            WindowMode::Fullscreen
        } else {
            WindowMode::Windowed
        });
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.set_master_volume(volume);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{NullMemoryProbe, RecordingRuntime};
    use crate::settings::Category;
    use crate::storage::MemoryStorage;
    use crate::store::Collaborators;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn store(recorder: &RecordingRuntime) -> SettingsStore {
        SettingsStore::new(
            Collaborators {
                runtime: Box::new(recorder.clone()),
                memory: Box::new(NullMemoryProbe),
                storage: Arc::new(MemoryStorage::new()),
            },
            "Settings.json",
        )
    }

    fn pushes_of(recorder: &RecordingRuntime, knob: &str) -> usize {
        recorder.calls().iter().filter(|(name, _)| name == knob).count()
    }

    #[test]
    fn preset_levels_follow_table() {
        let recorder = RecordingRuntime::new();
        let mut store = store(&recorder);

        store.apply_quality_preset(0);
        let rendering = store.rendering();
        assert!(!rendering.lumen && !rendering.ssao && !rendering.ray_tracing);
        assert_eq!(rendering.anisotropic_filtering, 0);
        assert_eq!(store.graphics(), GraphicsSettings::uniform(0));

        store.apply_quality_preset(7);
        let rendering = store.rendering();
        assert!(rendering.ray_tracing && rendering.ssgi);
        assert_eq!(rendering.reflection_quality, 4);
        assert_eq!(store.graphics().texture, 4);
    }

    #[test]
    fn preset_leaves_post_process_toggles_alone() {
        let recorder = RecordingRuntime::new();
        let mut store = store(&recorder);
        store.set_film_grain_enabled(true);
        store.apply_quality_preset(2);
        assert!(store.rendering().film_grain);
    }

    #[test]
    fn quick_ops_apply_each_category_once() {
        let recorder = RecordingRuntime::new();
        let mut store = store(&recorder);
        store.enable_performance_mode(true);
        assert_eq!(pushes_of(&recorder, "sg.ShadowQuality"), 1);
        assert_eq!(pushes_of(&recorder, "r.RayTracing"), 1);
        assert_eq!(pushes_of(&recorder, "r.DynamicRes.OperationMode"), 1);
        assert_eq!(pushes_of(&recorder, "au.MasterVolume"), 0);
    }

    #[test]
    fn performance_mode_round_trip_restores_defaults() {
        let recorder = RecordingRuntime::new();
        let mut store = store(&recorder);
        store.enable_performance_mode(true);
        assert!(store.performance().dynamic_resolution);
        assert_eq!(store.graphics().shadow_quality, 1);
        assert!(!store.rendering().lumen);

        store.enable_performance_mode(false);
        assert_eq!(store.graphics(), store.defaults().graphics);
        assert_eq!(store.rendering(), store.defaults().rendering);
        assert_eq!(store.performance(), store.defaults().performance);
    }

    #[test]
    fn quality_mode_keeps_film_grain_choice() {
        let recorder = RecordingRuntime::new();
        let mut store = store(&recorder);
        store.enable_quality_mode(true);
        let rendering = store.rendering();
        assert!(rendering.ray_tracing && rendering.ssgi && rendering.taa);
        assert!(!rendering.film_grain && !rendering.chromatic_aberration);
        assert_eq!(store.graphics(), GraphicsSettings::uniform(4));
    }

    #[test]
    fn post_process_switch_covers_all_effects() {
        let recorder = RecordingRuntime::new();
        let mut store = store(&recorder);
        store.set_all_post_process_effects(false);
        let rendering = store.rendering();
        assert!(!rendering.bloom && !rendering.vignette && !rendering.lens_flares);
        assert!(rendering.ssao);
        assert_eq!(store.dirty_categories(), vec![Category::Rendering]);
    }

    #[test]
    fn convenience_wrappers() {
        let recorder = RecordingRuntime::new();
        let mut store = store(&recorder);
        store.set_fullscreen(false);
        store.set_resolution_simple(0, 720);
        store.set_volume(1.5);
        store.set_max_frame_rate(-1.0);
        let display = store.display();
        assert_eq!(display.window_mode, WindowMode::Windowed);
        assert_eq!(display.resolution, Resolution::new(1, 720));
        assert_eq!(store.audio().master_volume, 1.0);
        assert_eq!(store.performance().frame_rate_limit, 0.0);
    }
}
