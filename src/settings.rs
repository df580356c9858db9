//! Settings document: the nine setting categories, their enums, value ranges
//! and hard-coded defaults.
//!
//! Every numeric field has a declared range in [`limits`]. The store and the
//! persistence codec both push values through those ranges (see
//! [`crate::fields`]), so a document held by a store never carries an
//! out-of-range value.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Graphics,
    Rendering,
    Performance,
    Display,
    Audio,
    Gameplay,
    Accessibility,
    Network,
    Debug,
}

impl Category {
    /// Apply order used by `apply_all`.
    pub const ALL: [Category; 9] = [
        Category::Graphics,
        Category::Rendering,
        Category::Performance,
        Category::Display,
        Category::Audio,
        Category::Gameplay,
        Category::Accessibility,
        Category::Network,
        Category::Debug,
    ];

    /// Top-level key in the persisted document.
    pub fn key(self) -> &'static str {
        match self {
            Category::Graphics => "Graphics",
            Category::Rendering => "Rendering",
            Category::Performance => "Performance",
            Category::Display => "Display",
            Category::Audio => "Audio",
            Category::Gameplay => "Gameplay",
            Category::Accessibility => "Accessibility",
            Category::Network => "Network",
            Category::Debug => "Debug",
        }
    }

    pub fn from_key(key: &str) -> Option<Category> {
        Category::ALL
            .into_iter()
            .find(|category| category.key().eq_ignore_ascii_case(key))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Closed float range. NaN maps to `min`, infinities to the nearest bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatRange {
    pub min: f32,
    pub max: f32,
}

impl FloatRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Floor-only range; the ceiling is the largest finite f32 so the value
    /// stays representable as a JSON number.
    pub const fn at_least(min: f32) -> Self {
        Self { min, max: f32::MAX }
    }

    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.min
        } else {
            value.clamp(self.min, self.max)
        }
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntRange {
    pub min: i32,
    pub max: i32,
}

impl IntRange {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub const fn at_least(min: i32) -> Self {
        Self { min, max: i32::MAX }
    }

    pub fn clamp(&self, value: i32) -> i32 {
        value.clamp(self.min, self.max)
    }

    /// Clamp a wide integer (e.g. a JSON number) without wrapping.
    pub fn clamp_wide(&self, value: i64) -> i32 {
        value.clamp(i64::from(self.min), i64::from(self.max)) as i32
    }

    pub fn contains(&self, value: i32) -> bool {
        value >= self.min && value <= self.max
    }
}

pub mod limits {
    use super::{FloatRange, IntRange};

    pub const QUALITY: IntRange = IntRange::new(0, 4);
    pub const ANISOTROPY: IntRange = IntRange::new(0, 4);

    pub const FRAME_RATE_LIMIT: FloatRange = FloatRange::at_least(0.0);
    pub const DYNAMIC_RES_MIN_FPS: FloatRange = FloatRange::new(15.0, 60.0);
    pub const LOD_DISTANCE: FloatRange = FloatRange::new(0.25, 4.0);

    pub const RESOLUTION_AXIS: IntRange = IntRange::at_least(1);
    pub const BRIGHTNESS: FloatRange = FloatRange::new(0.0, 2.0);
    pub const CONTRAST: FloatRange = FloatRange::new(0.0, 2.0);
    pub const HDR_MAX_NITS: FloatRange = FloatRange::new(1000.0, 10000.0);
    pub const MONITOR_INDEX: IntRange = IntRange::at_least(0);
    pub const SCREEN_PERCENTAGE: FloatRange = FloatRange::new(50.0, 200.0);
    pub const FIELD_OF_VIEW: FloatRange = FloatRange::new(60.0, 120.0);
    pub const ASPECT_RATIO: FloatRange = FloatRange::at_least(0.0);
    pub const SAFE_ZONE: FloatRange = FloatRange::new(0.8, 1.0);

    pub const UNIT: FloatRange = FloatRange::new(0.0, 1.0);
    pub const AUDIO_QUALITY: IntRange = IntRange::new(0, 3);
    pub const SURROUND_MODE: IntRange = IntRange::new(0, 2);
    pub const TEXT_SCALE: FloatRange = FloatRange::new(0.5, 2.0);

    pub const SENSITIVITY: FloatRange = FloatRange::new(0.1, 5.0);
    pub const DEAD_ZONE: FloatRange = FloatRange::new(0.0, 0.5);

    pub const NON_NEGATIVE: IntRange = IntRange::at_least(0);
}

macro_rules! ordinal_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
            pub const LABELS: &'static [&'static str] = &[$($label),+];

            /// Ordinal used on disk.
            pub fn index(self) -> i64 {
                self as i64
            }

            /// Out-of-range ordinals fall back to the first variant.
            pub fn from_index(index: i64) -> Self {
                usize::try_from(index)
                    .ok()
                    .and_then(|i| Self::ALL.get(i).copied())
                    .unwrap_or(Self::ALL[0])
            }

            pub fn label(self) -> &'static str {
                Self::LABELS[self as usize]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

ordinal_enum! {
    UpscalingMode {
        None => "None",
        Dlss => "DLSS",
        Fsr => "FSR",
        XeSS => "XeSS",
        Tsr => "TSR",
    }
}

ordinal_enum! {
    ProcessPriority {
        Normal => "Normal",
        High => "High",
        Realtime => "Realtime",
    }
}

ordinal_enum! {
    WindowMode {
        Fullscreen => "Fullscreen",
        WindowedFullscreen => "Windowed Fullscreen",
        Windowed => "Windowed",
    }
}

ordinal_enum! {
    ColorblindMode {
        None => "None",
        Deuteranopia => "Deuteranopia",
        Protanopia => "Protanopia",
        Tritanopia => "Tritanopia",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: i32,
    pub height: i32,
}

impl Resolution {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Scalability levels, 0 (low) to 4 (epic).
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicsSettings {
    pub anti_aliasing: i32,
    pub shadow_quality: i32,
    pub view_distance: i32,
    pub post_process: i32,
    pub texture: i32,
    pub effects: i32,
    pub foliage: i32,
    pub shading: i32,
}

impl GraphicsSettings {
    pub fn uniform(level: i32) -> Self {
        let level = limits::QUALITY.clamp(level);
        Self {
            anti_aliasing: level,
            shadow_quality: level,
            view_distance: level,
            post_process: level,
            texture: level,
            effects: level,
            foliage: level,
            shading: level,
        }
    }
}

impl Default for GraphicsSettings {
    fn default() -> Self {
        Self::uniform(3)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderingSettings {
    pub lumen: bool,
    pub ray_tracing: bool,
    pub ssao: bool,
    pub ssr: bool,
    pub motion_blur: bool,
    pub bloom: bool,
    pub depth_of_field: bool,
    pub lens_flares: bool,
    pub chromatic_aberration: bool,
    pub film_grain: bool,
    pub vignette: bool,
    pub volumetric_fog: bool,
    /// 0=off, n => 2^n x
    pub anisotropic_filtering: i32,
    pub taa: bool,
    pub upscaling_mode: UpscalingMode,
    pub global_illumination_quality: i32,
    pub reflection_quality: i32,
    pub ssgi: bool,
    pub contact_shadows: bool,
}

impl Default for RenderingSettings {
    fn default() -> Self {
        Self {
            lumen: true,
            ray_tracing: false,
            ssao: true,
            ssr: true,
            motion_blur: true,
            bloom: true,
            depth_of_field: true,
            lens_flares: true,
            chromatic_aberration: false,
            film_grain: false,
            vignette: true,
            volumetric_fog: true,
            anisotropic_filtering: 4,
            taa: true,
            upscaling_mode: UpscalingMode::Tsr,
            global_illumination_quality: 3,
            reflection_quality: 3,
            ssgi: false,
            contact_shadows: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceSettings {
    pub vsync: bool,
    /// 0 = unlimited
    pub frame_rate_limit: f32,
    pub dynamic_resolution: bool,
    pub min_frame_rate_for_dynamic_res: f32,
    pub triple_buffering: bool,
    pub async_compute: bool,
    pub lod_distance_multiplier: f32,
    pub process_priority: ProcessPriority,
}

impl Default for PerformanceSettings {
    fn default() -> Self {
        Self {
            vsync: true,
            frame_rate_limit: 0.0,
            dynamic_resolution: false,
            min_frame_rate_for_dynamic_res: 30.0,
            triple_buffering: false,
            async_compute: true,
            lod_distance_multiplier: 1.0,
            process_priority: ProcessPriority::Normal,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySettings {
    pub resolution: Resolution,
    pub window_mode: WindowMode,
    pub brightness: f32,
    pub contrast: f32,
    pub hdr_enabled: bool,
    pub hdr_max_nits: f32,
    pub monitor_index: i32,
    pub borderless: bool,
    pub screen_percentage: f32,
    pub menu_fov: f32,
    /// 0 = automatic
    pub aspect_ratio_override: f32,
    pub safe_zone_scale: f32,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            resolution: Resolution::new(1920, 1080),
            window_mode: WindowMode::Fullscreen,
            brightness: 1.0,
            contrast: 1.0,
            hdr_enabled: false,
            hdr_max_nits: 1000.0,
            monitor_index: 0,
            borderless: false,
            screen_percentage: 100.0,
            menu_fov: 90.0,
            aspect_ratio_override: 0.0,
            safe_zone_scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AudioSettings {
    pub master_volume: f32,
    pub sfx_volume: f32,
    pub music_volume: f32,
    pub voice_dialog_volume: f32,
    pub ambient_volume: f32,
    pub ui_sound_volume: f32,
    pub voice_chat_volume: f32,
    /// 0=low .. 3=ultra
    pub audio_quality: i32,
    /// 0=stereo, 1=5.1, 2=7.1
    pub surround_mode: i32,
    pub spatial_audio: bool,
    pub dynamic_range: f32,
    pub subtitle_text_size: f32,
    pub subtitle_bg_opacity: f32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            sfx_volume: 1.0,
            music_volume: 0.8,
            voice_dialog_volume: 1.0,
            ambient_volume: 0.7,
            ui_sound_volume: 0.9,
            voice_chat_volume: 1.0,
            audio_quality: 2,
            surround_mode: 0,
            spatial_audio: false,
            dynamic_range: 0.5,
            subtitle_text_size: 1.0,
            subtitle_bg_opacity: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameplaySettings {
    pub fov: f32,
    pub mouse_sensitivity: f32,
    pub invert_mouse_y: bool,
    pub controller_sensitivity: f32,
    pub controller_dead_zone: f32,
    pub aim_assist: f32,
    pub camera_shake: f32,
    pub head_bob: f32,
    pub vibration: bool,
    pub crouch_toggle: bool,
    pub sprint_toggle: bool,
    pub auto_run: bool,
    pub camera_smoothing: f32,
}

impl Default for GameplaySettings {
    fn default() -> Self {
        Self {
            fov: 90.0,
            mouse_sensitivity: 1.0,
            invert_mouse_y: false,
            controller_sensitivity: 1.0,
            controller_dead_zone: 0.15,
            aim_assist: 0.5,
            camera_shake: 1.0,
            head_bob: 0.5,
            vibration: true,
            crouch_toggle: false,
            sprint_toggle: false,
            auto_run: false,
            camera_smoothing: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccessibilitySettings {
    pub colorblind_mode: ColorblindMode,
    pub ui_scale: f32,
    pub text_size: f32,
    pub high_contrast: bool,
    pub screen_reader: bool,
    pub reduced_motion: bool,
    pub photosensitivity: bool,
}

impl Default for AccessibilitySettings {
    fn default() -> Self {
        Self {
            colorblind_mode: ColorblindMode::None,
            ui_scale: 1.0,
            text_size: 1.0,
            high_contrast: false,
            screen_reader: false,
            reduced_motion: false,
            photosensitivity: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NetworkSettings {
    /// Milliseconds.
    pub max_ping_threshold: i32,
    pub network_smoothing: f32,
    /// 0 = unlimited
    pub bandwidth_limit_kbps: i32,
    pub preferred_region: String,
    pub crossplay: bool,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            max_ping_threshold: 150,
            network_smoothing: 0.5,
            bandwidth_limit_kbps: 0,
            preferred_region: "Auto".to_string(),
            crossplay: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DebugSettings {
    pub show_perf_overlay: bool,
    pub show_network_stats: bool,
    pub developer_mode: bool,
    pub crash_reporting: bool,
    pub benchmark_mode: bool,
}

impl Default for DebugSettings {
    fn default() -> Self {
        Self {
            show_perf_overlay: false,
            show_network_stats: false,
            developer_mode: false,
            crash_reporting: true,
            benchmark_mode: false,
        }
    }
}

/// The complete settings record. Category membership is fixed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SettingsDocument {
    pub graphics: GraphicsSettings,
    pub rendering: RenderingSettings,
    pub performance: PerformanceSettings,
    pub display: DisplaySettings,
    pub audio: AudioSettings,
    pub gameplay: GameplaySettings,
    pub accessibility: AccessibilitySettings,
    pub network: NetworkSettings,
    pub debug: DebugSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_range_maps_non_finite_to_bounds() {
        let range = limits::FIELD_OF_VIEW;
        assert_eq!(range.clamp(f32::NAN), 60.0);
        assert_eq!(range.clamp(f32::INFINITY), 120.0);
        assert_eq!(range.clamp(f32::NEG_INFINITY), 60.0);
        assert_eq!(range.clamp(75.5), 75.5);
    }

    #[test]
    fn floor_only_range_keeps_large_values() {
        let range = limits::FRAME_RATE_LIMIT;
        assert_eq!(range.clamp(-10.0), 0.0);
        assert_eq!(range.clamp(9999.0), 9999.0);
        assert_eq!(range.clamp(f32::INFINITY), f32::MAX);
    }

    #[test]
    fn int_range_clamps_wide_values_without_wrapping() {
        assert_eq!(limits::QUALITY.clamp_wide(i64::MAX), 4);
        assert_eq!(limits::QUALITY.clamp_wide(i64::MIN), 0);
        assert_eq!(limits::NON_NEGATIVE.clamp_wide(1 << 40), i32::MAX);
    }

    #[test]
    fn enum_ordinals_fall_back_to_first_variant() {
        assert_eq!(UpscalingMode::from_index(2), UpscalingMode::Fsr);
        assert_eq!(UpscalingMode::from_index(17), UpscalingMode::None);
        assert_eq!(UpscalingMode::from_index(-1), UpscalingMode::None);
        assert_eq!(WindowMode::from_index(2), WindowMode::Windowed);
        assert_eq!(ProcessPriority::Realtime.index(), 2);
        assert_eq!(ColorblindMode::Tritanopia.label(), "Tritanopia");
    }

    #[test]
    fn category_keys_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_key(category.key()), Some(category));
        }
        assert_eq!(Category::from_key("audio"), Some(Category::Audio));
        assert_eq!(Category::from_key("Telemetry"), None);
    }

    #[test]
    fn uniform_graphics_clamps_level() {
        let graphics = GraphicsSettings::uniform(9);
        assert_eq!(graphics.shadow_quality, 4);
        assert_eq!(graphics.shading, 4);
    }
}
