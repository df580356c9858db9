//! Field registry.
//!
//! Every scalar setting is declared once in [`define_fields!`] with its
//! category, on-disk key and kind (range). The declaration produces the
//! static [`FIELDS`] table, used by the codec, the dynamic `set_field` path and
//! document sanitizing, and one typed setter per field on
//! [`SettingsStore`]. All of them normalize through [`FieldKind::normalize`],
//! so a value is clamped the same way no matter how it arrives.

use std::fmt;

use tracing::debug;

use crate::settings::{
    Category, ColorblindMode, FloatRange, IntRange, ProcessPriority, SettingsDocument,
    UpscalingMode, WindowMode, limits,
};
use crate::store::SettingsStore;

use FieldKind::{Bool, Enum, Float, Int, Text};

/// A loosely typed setting value, as read from a document or a command line.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl SettingValue {
    /// Whether `stored` is this value after kind conversion alone, compared at
    /// the `f32`/`i32` precision fields are stored with. A clamp makes it false.
    pub fn matches_stored(&self, stored: &SettingValue) -> bool {
        match (self, stored) {
            (SettingValue::Int(requested), SettingValue::Float(stored)) => {
                *requested as f32 == *stored as f32
            }
            (SettingValue::Float(requested), SettingValue::Float(stored)) => {
                *requested as f32 == *stored as f32
            }
            (SettingValue::Float(requested), SettingValue::Int(stored)) => {
                requested.round() == *stored as f64
            }
            (requested, stored) => requested == stored,
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Int(v) => write!(f, "{}", v),
            SettingValue::Float(v) => write!(f, "{}", v),
            SettingValue::Bool(v) => write!(f, "{}", v),
            SettingValue::Text(v) => write!(f, "{:?}", v),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Int(IntRange),
    Float(FloatRange),
    Bool,
    /// Stored as the ordinal into the label list.
    Enum(&'static [&'static str]),
    Text,
}

impl FieldKind {
    /// Coerce `value` into this kind and clamp it into range.
    ///
    /// Returns `None` when the value has the wrong shape (e.g. a string for a
    /// numeric field); numbers are interchangeable between int and float
    /// kinds.
    pub fn normalize(&self, value: &SettingValue) -> Option<SettingValue> {
        match (self, value) {
            (Int(range), SettingValue::Int(v)) => {
                Some(SettingValue::Int(i64::from(range.clamp_wide(*v))))
            }
            (Int(range), SettingValue::Float(v)) => {
                let clamped = if v.is_nan() {
                    range.min
                } else {
                    range.clamp_wide(v.round() as i64)
                };
                Some(SettingValue::Int(i64::from(clamped)))
            }
            (Float(range), SettingValue::Float(v)) => {
                Some(SettingValue::Float(f64::from(range.clamp(*v as f32))))
            }
            (Float(range), SettingValue::Int(v)) => {
                Some(SettingValue::Float(f64::from(range.clamp(*v as f32))))
            }
            (Bool, SettingValue::Bool(v)) => Some(SettingValue::Bool(*v)),
            (Enum(labels), SettingValue::Int(v)) => Some(SettingValue::Int(ordinal(labels, *v))),
            (Enum(labels), SettingValue::Float(v)) => {
                Some(SettingValue::Int(ordinal(labels, v.round() as i64)))
            }
            (Text, SettingValue::Text(v)) => Some(SettingValue::Text(v.clone())),
            _ => None,
        }
    }

    /// Parse user input (CLI, panel text boxes) for this kind.
    pub fn parse(&self, raw: &str) -> Option<SettingValue> {
        let raw = raw.trim();
        match self {
            Int(_) => raw
                .parse::<i64>()
                .map(SettingValue::Int)
                .or_else(|_| raw.parse::<f64>().map(SettingValue::Float))
                .ok(),
            Float(_) => raw.parse::<f64>().map(SettingValue::Float).ok(),
            Bool => match raw.to_ascii_lowercase().as_str() {
                "true" | "on" | "yes" | "1" => Some(SettingValue::Bool(true)),
                "false" | "off" | "no" | "0" => Some(SettingValue::Bool(false)),
                _ => None,
            },
            Enum(labels) => raw.parse::<i64>().map(SettingValue::Int).ok().or_else(|| {
                labels
                    .iter()
                    .position(|label| label.eq_ignore_ascii_case(raw))
                    .map(|index| SettingValue::Int(index as i64))
            }),
            Text => Some(SettingValue::Text(raw.to_string())),
        }
    }

    pub fn expected(&self) -> &'static str {
        match self {
            Int(_) => "an integer",
            Float(_) => "a number",
            Bool => "a boolean",
            Enum(_) => "an enum ordinal or label",
            Text => "a string",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Int(range) if range.max == i32::MAX => write!(f, "int >= {}", range.min),
            Int(range) => write!(f, "int {}..={}", range.min, range.max),
            Float(range) if range.max == f32::MAX => write!(f, "float >= {}", range.min),
            Float(range) => write!(f, "float {}..={}", range.min, range.max),
            Bool => write!(f, "bool"),
            Enum(labels) => write!(f, "enum [{}]", labels.join(", ")),
            Text => write!(f, "text"),
        }
    }
}

fn ordinal(labels: &[&str], index: i64) -> i64 {
    if index >= 0 && (index as usize) < labels.len() {
        index
    } else {
        0
    }
}

/// Conversion between a document field's Rust type and [`SettingValue`].
pub trait FieldValue: Sized + PartialEq {
    fn to_setting(&self) -> SettingValue;
    fn from_setting(value: SettingValue) -> Option<Self>;
}

impl FieldValue for i32 {
    fn to_setting(&self) -> SettingValue {
        SettingValue::Int(i64::from(*self))
    }

    fn from_setting(value: SettingValue) -> Option<Self> {
        match value {
            SettingValue::Int(v) => i32::try_from(v).ok(),
            _ => None,
        }
    }
}

impl FieldValue for f32 {
    fn to_setting(&self) -> SettingValue {
        SettingValue::Float(f64::from(*self))
    }

    fn from_setting(value: SettingValue) -> Option<Self> {
        match value {
            SettingValue::Float(v) => Some(v as f32),
            _ => None,
        }
    }
}

impl FieldValue for bool {
    fn to_setting(&self) -> SettingValue {
        SettingValue::Bool(*self)
    }

    fn from_setting(value: SettingValue) -> Option<Self> {
        match value {
            SettingValue::Bool(v) => Some(v),
            _ => None,
        }
    }
}

impl FieldValue for String {
    fn to_setting(&self) -> SettingValue {
        SettingValue::Text(self.clone())
    }

    fn from_setting(value: SettingValue) -> Option<Self> {
        match value {
            SettingValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

macro_rules! ordinal_field_value {
    ($($name:ty),+) => {
        $(
            impl FieldValue for $name {
                fn to_setting(&self) -> SettingValue {
                    SettingValue::Int(self.index())
                }

                fn from_setting(value: SettingValue) -> Option<Self> {
                    match value {
                        SettingValue::Int(v) => Some(<$name>::from_index(v)),
                        _ => None,
                    }
                }
            }
        )+
    };
}

ordinal_field_value!(UpscalingMode, ProcessPriority, WindowMode, ColorblindMode);

pub struct FieldSpec {
    pub category: Category,
    /// Key inside the category object of the persisted document.
    pub key: &'static str,
    pub kind: FieldKind,
    read: fn(&SettingsDocument) -> SettingValue,
    write: fn(&mut SettingsDocument, SettingValue),
}

impl FieldSpec {
    pub fn read(&self, document: &SettingsDocument) -> SettingValue {
        (self.read)(document)
    }

    /// Normalize `value` and store it. Returns the stored value, or `None`
    /// when the value has the wrong shape (document left untouched).
    pub fn write(&self, document: &mut SettingsDocument, value: &SettingValue) -> Option<SettingValue> {
        let normalized = self.kind.normalize(value)?;
        (self.write)(document, normalized.clone());
        Some(normalized)
    }

    fn sanitize(&self, document: &mut SettingsDocument) {
        let current = self.read(document);
        if let Some(normalized) = self.kind.normalize(&current) {
            if normalized != current {
                debug!(field = %self, from = %current, to = %normalized, "Clamped setting");
                (self.write)(document, normalized);
            }
        }
    }
}

impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.category.key(), self.key)
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("category", &self.category)
            .field("key", &self.key)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Look up a field by category and key (keys match case-insensitively).
pub fn find(category: Category, key: &str) -> Option<&'static FieldSpec> {
    FIELDS
        .iter()
        .find(|spec| spec.category == category && spec.key.eq_ignore_ascii_case(key))
}

/// Look up a dotted `Category.Key` path.
pub fn find_path(path: &str) -> Option<&'static FieldSpec> {
    let (category, key) = path.split_once('.')?;
    find(Category::from_key(category)?, key)
}

pub fn fields_of(category: Category) -> impl Iterator<Item = &'static FieldSpec> {
    FIELDS.iter().filter(move |spec| spec.category == category)
}

impl SettingsDocument {
    /// Clamp every field into its declared range.
    pub fn sanitize(&mut self) {
        for spec in FIELDS {
            spec.sanitize(self);
        }
    }

    pub fn sanitize_category(&mut self, category: Category) {
        for spec in fields_of(category) {
            spec.sanitize(self);
        }
    }

    pub fn sanitized(mut self) -> Self {
        self.sanitize();
        self
    }
}

macro_rules! define_fields {
    ($( $setter:ident($ty:ty) => $category:ident : $($path:ident).+ , $key:literal , $kind:expr ; )*) => {
        pub static FIELDS: &[FieldSpec] = &[
            $(
                FieldSpec {
                    category: Category::$category,
                    key: $key,
                    kind: $kind,
                    read: |doc: &SettingsDocument| FieldValue::to_setting(&doc.$($path).+),
                    write: |doc: &mut SettingsDocument, value: SettingValue| {
                        if let Some(value) = <$ty as FieldValue>::from_setting(value) {
                            doc.$($path).+ = value;
                        }
                    },
                },
            )*
        ];

        impl SettingsStore {
            $(
                #[doc = concat!("Clamp and store `", stringify!($category), ".", $key, "`, then apply the category.")]
                pub fn $setter(&mut self, value: $ty) {
                    let kind: FieldKind = $kind;
                    let raw = FieldValue::to_setting(&value);
                    if let Some(stored) = kind.normalize(&raw).and_then(<$ty as FieldValue>::from_setting) {
                        if stored != value {
                            debug!(field = concat!(stringify!($category), ".", $key), from = %raw, "Clamped setting");
                        }
                        self.document.$($path).+ = stored;
                    }
                    self.touch(Category::$category);
                }
            )*
        }
    };
}

define_fields! {
    set_anti_aliasing_quality(i32) => Graphics: graphics.anti_aliasing, "AntiAliasingQuality", Int(limits::QUALITY);
    set_shadow_quality(i32) => Graphics: graphics.shadow_quality, "ShadowQuality", Int(limits::QUALITY);
    set_view_distance_quality(i32) => Graphics: graphics.view_distance, "ViewDistanceQuality", Int(limits::QUALITY);
    set_post_process_quality(i32) => Graphics: graphics.post_process, "PostProcessQuality", Int(limits::QUALITY);
    set_texture_quality(i32) => Graphics: graphics.texture, "TextureQuality", Int(limits::QUALITY);
    set_effects_quality(i32) => Graphics: graphics.effects, "EffectsQuality", Int(limits::QUALITY);
    set_foliage_quality(i32) => Graphics: graphics.foliage, "FoliageQuality", Int(limits::QUALITY);
    set_shading_quality(i32) => Graphics: graphics.shading, "ShadingQuality", Int(limits::QUALITY);

    set_lumen_enabled(bool) => Rendering: rendering.lumen, "EnableLumen", Bool;
    set_ray_tracing_enabled(bool) => Rendering: rendering.ray_tracing, "EnableRayTracing", Bool;
    set_ssao_enabled(bool) => Rendering: rendering.ssao, "EnableSSAO", Bool;
    set_ssr_enabled(bool) => Rendering: rendering.ssr, "EnableSSR", Bool;
    set_motion_blur_enabled(bool) => Rendering: rendering.motion_blur, "EnableMotionBlur", Bool;
    set_bloom_enabled(bool) => Rendering: rendering.bloom, "EnableBloom", Bool;
    set_depth_of_field_enabled(bool) => Rendering: rendering.depth_of_field, "EnableDepthOfField", Bool;
    set_lens_flares_enabled(bool) => Rendering: rendering.lens_flares, "EnableLensFlares", Bool;
    set_chromatic_aberration_enabled(bool) => Rendering: rendering.chromatic_aberration, "EnableChromaticAberration", Bool;
    set_film_grain_enabled(bool) => Rendering: rendering.film_grain, "EnableFilmGrain", Bool;
    set_vignette_enabled(bool) => Rendering: rendering.vignette, "EnableVignette", Bool;
    set_volumetric_fog_enabled(bool) => Rendering: rendering.volumetric_fog, "EnableVolumetricFog", Bool;
    set_anisotropic_filtering(i32) => Rendering: rendering.anisotropic_filtering, "AnisotropicFiltering", Int(limits::ANISOTROPY);
    set_taa_enabled(bool) => Rendering: rendering.taa, "EnableTAA", Bool;
    set_upscaling_mode(UpscalingMode) => Rendering: rendering.upscaling_mode, "UpscalingMode", Enum(UpscalingMode::LABELS);
    set_global_illumination_quality(i32) => Rendering: rendering.global_illumination_quality, "GlobalIlluminationQuality", Int(limits::QUALITY);
    set_reflection_quality(i32) => Rendering: rendering.reflection_quality, "ReflectionQuality", Int(limits::QUALITY);
    set_ssgi_enabled(bool) => Rendering: rendering.ssgi, "EnableSSGI", Bool;
    set_contact_shadows_enabled(bool) => Rendering: rendering.contact_shadows, "EnableContactShadows", Bool;

    set_vsync_enabled(bool) => Performance: performance.vsync, "EnableVSync", Bool;
    set_frame_rate_limit(f32) => Performance: performance.frame_rate_limit, "FrameRateLimit", Float(limits::FRAME_RATE_LIMIT);
    set_dynamic_resolution_enabled(bool) => Performance: performance.dynamic_resolution, "EnableDynamicResolution", Bool;
    set_min_frame_rate_for_dynamic_res(f32) => Performance: performance.min_frame_rate_for_dynamic_res, "MinFrameRateForDynamicRes", Float(limits::DYNAMIC_RES_MIN_FPS);
    set_triple_buffering_enabled(bool) => Performance: performance.triple_buffering, "EnableTripleBuffering", Bool;
    set_async_compute_enabled(bool) => Performance: performance.async_compute, "EnableAsyncCompute", Bool;
    set_lod_distance_multiplier(f32) => Performance: performance.lod_distance_multiplier, "LODDistanceMultiplier", Float(limits::LOD_DISTANCE);
    set_process_priority(ProcessPriority) => Performance: performance.process_priority, "ProcessPriority", Enum(ProcessPriority::LABELS);

    set_resolution_width(i32) => Display: display.resolution.width, "ResolutionX", Int(limits::RESOLUTION_AXIS);
    set_resolution_height(i32) => Display: display.resolution.height, "ResolutionY", Int(limits::RESOLUTION_AXIS);
    set_window_mode(WindowMode) => Display: display.window_mode, "WindowMode", Enum(WindowMode::LABELS);
    set_brightness(f32) => Display: display.brightness, "Brightness", Float(limits::BRIGHTNESS);
    set_contrast(f32) => Display: display.contrast, "Contrast", Float(limits::CONTRAST);
    set_hdr_enabled(bool) => Display: display.hdr_enabled, "EnableHDR", Bool;
    set_hdr_max_nits(f32) => Display: display.hdr_max_nits, "HDRMaxNits", Float(limits::HDR_MAX_NITS);
    set_monitor_index(i32) => Display: display.monitor_index, "MonitorIndex", Int(limits::MONITOR_INDEX);
    set_borderless_window(bool) => Display: display.borderless, "BorderlessWindow", Bool;
    set_screen_percentage(f32) => Display: display.screen_percentage, "ScreenPercentage", Float(limits::SCREEN_PERCENTAGE);
    set_menu_field_of_view(f32) => Display: display.menu_fov, "MenuFieldOfView", Float(limits::FIELD_OF_VIEW);
    set_aspect_ratio_override(f32) => Display: display.aspect_ratio_override, "AspectRatioOverride", Float(limits::ASPECT_RATIO);
    set_safe_zone_scale(f32) => Display: display.safe_zone_scale, "SafeZoneScale", Float(limits::SAFE_ZONE);

    set_master_volume(f32) => Audio: audio.master_volume, "MasterVolume", Float(limits::UNIT);
    set_sfx_volume(f32) => Audio: audio.sfx_volume, "SFXVolume", Float(limits::UNIT);
    set_music_volume(f32) => Audio: audio.music_volume, "MusicVolume", Float(limits::UNIT);
    set_voice_dialog_volume(f32) => Audio: audio.voice_dialog_volume, "VoiceDialogVolume", Float(limits::UNIT);
    set_ambient_volume(f32) => Audio: audio.ambient_volume, "AmbientVolume", Float(limits::UNIT);
    set_ui_sound_volume(f32) => Audio: audio.ui_sound_volume, "UISoundVolume", Float(limits::UNIT);
    set_voice_chat_volume(f32) => Audio: audio.voice_chat_volume, "VoiceChatVolume", Float(limits::UNIT);
    set_audio_quality(i32) => Audio: audio.audio_quality, "AudioQuality", Int(limits::AUDIO_QUALITY);
    set_surround_sound_mode(i32) => Audio: audio.surround_mode, "SurroundSoundMode", Int(limits::SURROUND_MODE);
    set_spatial_audio_enabled(bool) => Audio: audio.spatial_audio, "EnableSpatialAudio", Bool;
    set_dynamic_range(f32) => Audio: audio.dynamic_range, "DynamicRange", Float(limits::UNIT);
    set_subtitle_text_size(f32) => Audio: audio.subtitle_text_size, "SubtitleTextSize", Float(limits::TEXT_SCALE);
    set_subtitle_background_opacity(f32) => Audio: audio.subtitle_bg_opacity, "SubtitleBackgroundOpacity", Float(limits::UNIT);

    set_fov(f32) => Gameplay: gameplay.fov, "FOV", Float(limits::FIELD_OF_VIEW);
    set_mouse_sensitivity(f32) => Gameplay: gameplay.mouse_sensitivity, "MouseSensitivity", Float(limits::SENSITIVITY);
    set_invert_mouse_y(bool) => Gameplay: gameplay.invert_mouse_y, "InvertMouseY", Bool;
    set_controller_sensitivity(f32) => Gameplay: gameplay.controller_sensitivity, "ControllerSensitivity", Float(limits::SENSITIVITY);
    set_controller_dead_zone(f32) => Gameplay: gameplay.controller_dead_zone, "ControllerDeadZone", Float(limits::DEAD_ZONE);
    set_aim_assist_strength(f32) => Gameplay: gameplay.aim_assist, "AimAssistStrength", Float(limits::UNIT);
    set_camera_shake_intensity(f32) => Gameplay: gameplay.camera_shake, "CameraShakeIntensity", Float(limits::UNIT);
    set_head_bob_intensity(f32) => Gameplay: gameplay.head_bob, "HeadBobIntensity", Float(limits::UNIT);
    set_vibration_enabled(bool) => Gameplay: gameplay.vibration, "EnableVibration", Bool;
    set_crouch_toggle(bool) => Gameplay: gameplay.crouch_toggle, "CrouchToggle", Bool;
    set_sprint_toggle(bool) => Gameplay: gameplay.sprint_toggle, "SprintToggle", Bool;
    set_auto_run_enabled(bool) => Gameplay: gameplay.auto_run, "EnableAutoRun", Bool;
    set_camera_smoothing(f32) => Gameplay: gameplay.camera_smoothing, "CameraSmoothing", Float(limits::UNIT);

    set_colorblind_mode(ColorblindMode) => Accessibility: accessibility.colorblind_mode, "ColorblindMode", Enum(ColorblindMode::LABELS);
    set_ui_scale(f32) => Accessibility: accessibility.ui_scale, "UIScale", Float(limits::TEXT_SCALE);
    set_text_size(f32) => Accessibility: accessibility.text_size, "TextSize", Float(limits::TEXT_SCALE);
    set_high_contrast_mode(bool) => Accessibility: accessibility.high_contrast, "HighContrastMode", Bool;
    set_screen_reader_enabled(bool) => Accessibility: accessibility.screen_reader, "EnableScreenReader", Bool;
    set_reduced_motion(bool) => Accessibility: accessibility.reduced_motion, "ReducedMotion", Bool;
    set_photosensitivity_mode(bool) => Accessibility: accessibility.photosensitivity, "PhotosensitivityMode", Bool;

    set_max_ping_threshold(i32) => Network: network.max_ping_threshold, "MaxPingThreshold", Int(limits::NON_NEGATIVE);
    set_network_smoothing(f32) => Network: network.network_smoothing, "NetworkSmoothing", Float(limits::UNIT);
    set_bandwidth_limit(i32) => Network: network.bandwidth_limit_kbps, "BandwidthLimitKBps", Int(limits::NON_NEGATIVE);
    set_preferred_region(String) => Network: network.preferred_region, "PreferredRegion", Text;
    set_crossplay_enabled(bool) => Network: network.crossplay, "EnableCrossplay", Bool;

    set_performance_overlay_visible(bool) => Debug: debug.show_perf_overlay, "ShowPerformanceOverlay", Bool;
    set_network_stats_visible(bool) => Debug: debug.show_network_stats, "ShowNetworkStats", Bool;
    set_developer_mode(bool) => Debug: debug.developer_mode, "DeveloperMode", Bool;
    set_crash_reporting_enabled(bool) => Debug: debug.crash_reporting, "EnableCrashReporting", Bool;
    set_benchmark_mode(bool) => Debug: debug.benchmark_mode, "BenchmarkMode", Bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn keys_are_unique_within_each_category() {
        let mut seen = HashSet::new();
        for spec in FIELDS {
            assert!(seen.insert((spec.category, spec.key)), "duplicate field {}", spec);
        }
    }

    #[test]
    fn every_category_has_fields() {
        for category in Category::ALL {
            assert!(fields_of(category).count() > 0, "{} has no fields", category);
        }
        assert_eq!(fields_of(Category::Graphics).count(), 8);
        assert_eq!(fields_of(Category::Rendering).count(), 19);
    }

    #[test]
    fn normalize_clamps_and_converts_numbers() {
        let fov = Float(limits::FIELD_OF_VIEW);
        assert_eq!(fov.normalize(&SettingValue::Float(200.0)), Some(SettingValue::Float(120.0)));
        assert_eq!(fov.normalize(&SettingValue::Int(75)), Some(SettingValue::Float(75.0)));
        assert_eq!(fov.normalize(&SettingValue::Float(f64::NAN)), Some(SettingValue::Float(60.0)));
        assert_eq!(fov.normalize(&SettingValue::Bool(true)), None);

        let quality = Int(limits::QUALITY);
        assert_eq!(quality.normalize(&SettingValue::Int(-3)), Some(SettingValue::Int(0)));
        assert_eq!(quality.normalize(&SettingValue::Float(2.6)), Some(SettingValue::Int(3)));
        assert_eq!(quality.normalize(&SettingValue::Text("3".into())), None);
    }

    #[test]
    fn conversion_alone_is_not_a_clamp() {
        let fov = Float(limits::FIELD_OF_VIEW);
        let requested = SettingValue::Int(90);
        let stored = fov.normalize(&requested).expect("number");
        assert_eq!(stored, SettingValue::Float(90.0));
        assert!(requested.matches_stored(&stored));

        let volume = SettingValue::Float(0.1);
        assert!(volume.matches_stored(&Float(limits::UNIT).normalize(&volume).expect("number")));

        let quality = SettingValue::Float(2.0);
        assert!(quality.matches_stored(&Int(limits::QUALITY).normalize(&quality).expect("number")));

        let wide = SettingValue::Int(200);
        assert!(!wide.matches_stored(&fov.normalize(&wide).expect("number")));
        let nan = SettingValue::Float(f64::NAN);
        assert!(!nan.matches_stored(&fov.normalize(&nan).expect("number")));
    }

    #[test]
    fn malformed_enum_ordinal_maps_to_first_variant() {
        let kind = Enum(UpscalingMode::LABELS);
        assert_eq!(kind.normalize(&SettingValue::Int(9)), Some(SettingValue::Int(0)));
        assert_eq!(kind.normalize(&SettingValue::Int(3)), Some(SettingValue::Int(3)));
    }

    #[test]
    fn parse_accepts_labels_and_switch_words() {
        assert_eq!(Enum(UpscalingMode::LABELS).parse("fsr"), Some(SettingValue::Int(2)));
        assert_eq!(Bool.parse("on"), Some(SettingValue::Bool(true)));
        assert_eq!(Bool.parse("maybe"), None);
        assert_eq!(Int(limits::QUALITY).parse("2.0"), Some(SettingValue::Float(2.0)));
    }

    #[test]
    fn write_through_spec_clamps() {
        let mut document = SettingsDocument::default();
        let spec = find_path("Display.ScreenPercentage").expect("field exists");
        let stored = spec.write(&mut document, &SettingValue::Float(500.0));
        assert_eq!(stored, Some(SettingValue::Float(200.0)));
        assert_eq!(document.display.screen_percentage, 200.0);
    }

    #[test]
    fn sanitize_repairs_out_of_range_document() {
        let mut document = SettingsDocument::default();
        document.gameplay.fov = 10.0;
        document.audio.music_volume = f32::NAN;
        document.graphics.texture = 42;
        document.display.resolution.width = -5;
        document.sanitize();
        assert_eq!(document.gameplay.fov, 60.0);
        assert_eq!(document.audio.music_volume, 0.0);
        assert_eq!(document.graphics.texture, 4);
        assert_eq!(document.display.resolution.width, 1);
    }

    #[test]
    fn defaults_are_already_in_range() {
        let defaults = SettingsDocument::default();
        assert_eq!(defaults.clone().sanitized(), defaults);
    }

    #[test]
    fn find_is_case_insensitive() {
        assert!(find(Category::Gameplay, "fov").is_some());
        assert!(find_path("gameplay.MouseSensitivity").is_some());
        assert!(find_path("Gameplay").is_none());
        assert!(find_path("Gameplay.Nope").is_none());
    }
}
