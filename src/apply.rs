//! Category apply hooks: translate a category of the document into the engine
//! knobs pushed through [`RuntimeSink`](crate::runtime::RuntimeSink).
//!
//! Each hook reads only its own category, so the same document always yields
//! the same knob list.

use crate::runtime::RuntimeValue::{self, Bool, Float, Int};
use crate::settings::{
    AccessibilitySettings, AudioSettings, Category, DebugSettings, DisplaySettings,
    GameplaySettings, GraphicsSettings, NetworkSettings, PerformanceSettings, RenderingSettings,
    SettingsDocument, UpscalingMode,
};

pub type Knob = (&'static str, RuntimeValue);

pub fn knobs(category: Category, document: &SettingsDocument) -> Vec<Knob> {
    match category {
        Category::Graphics => graphics(&document.graphics),
        Category::Rendering => rendering(&document.rendering),
        Category::Performance => performance(&document.performance),
        Category::Display => display(&document.display),
        Category::Audio => audio(&document.audio),
        Category::Gameplay => gameplay(&document.gameplay),
        Category::Accessibility => accessibility(&document.accessibility),
        Category::Network => network(&document.network),
        Category::Debug => debug(&document.debug),
    }
}

fn level(enabled: bool, on: i32) -> RuntimeValue {
    Int(if enabled { on } else { 0 })
}

fn amount(enabled: bool, on: f32) -> RuntimeValue {
    Float(if enabled { on } else { 0.0 })
}

fn graphics(s: &GraphicsSettings) -> Vec<Knob> {
    vec![
        ("sg.AntiAliasingQuality", Int(s.anti_aliasing)),
        ("sg.ShadowQuality", Int(s.shadow_quality)),
        ("sg.ViewDistanceQuality", Int(s.view_distance)),
        ("sg.PostProcessQuality", Int(s.post_process)),
        ("sg.TextureQuality", Int(s.texture)),
        ("sg.EffectsQuality", Int(s.effects)),
        ("sg.FoliageQuality", Int(s.foliage)),
        ("sg.ShadingQuality", Int(s.shading)),
    ]
}

fn rendering(s: &RenderingSettings) -> Vec<Knob> {
    let upscaler = s.upscaling_mode;
    vec![
        ("r.Lumen.DiffuseIndirect.Allow", level(s.lumen, 1)),
        ("r.RayTracing", Bool(s.ray_tracing)),
        ("r.AmbientOcclusionLevels", level(s.ssao, 3)),
        ("r.SSR.Quality", level(s.ssr, 3)),
        ("r.MotionBlurQuality", level(s.motion_blur, 4)),
        ("r.BloomQuality", level(s.bloom, 5)),
        ("r.DepthOfFieldQuality", level(s.depth_of_field, 2)),
        ("r.LensFlareQuality", level(s.lens_flares, 2)),
        ("r.SceneColorFringe.Max", amount(s.chromatic_aberration, 5.0)),
        ("r.Tonemapper.GrainQuantization", amount(s.film_grain, 1.0)),
        ("r.Tonemapper.Vignette", amount(s.vignette, 0.4)),
        ("r.VolumetricFog", Bool(s.volumetric_fog)),
        (
            "r.MaxAnisotropy",
            Int(if s.anisotropic_filtering > 0 { 1 << s.anisotropic_filtering } else { 0 }),
        ),
        ("r.TemporalAA.Quality", level(s.taa, 2)),
        ("r.NGX.DLSS.Enable", Bool(upscaler == UpscalingMode::Dlss)),
        ("r.FidelityFX.FSR.Enabled", Bool(upscaler == UpscalingMode::Fsr)),
        ("r.XeSS.Enabled", Bool(upscaler == UpscalingMode::XeSS)),
        ("r.TemporalSuperResolution", level(upscaler == UpscalingMode::Tsr, 1)),
        ("r.Lumen.Reflections.ScreenTraces", Int(s.global_illumination_quality)),
        ("r.ReflectionEnvironment", level(s.reflection_quality > 0, 1)),
        ("r.SSGI.Enable", Bool(s.ssgi)),
        ("r.ContactShadows", Bool(s.contact_shadows)),
    ]
}

fn performance(s: &PerformanceSettings) -> Vec<Knob> {
    vec![
        ("r.VSync", Bool(s.vsync)),
        ("t.MaxFPS", Float(s.frame_rate_limit)),
        ("r.DynamicRes.OperationMode", level(s.dynamic_resolution, 2)),
        (
            "r.DynamicRes.MinResolutionChangesPerSecond",
            Float(1000.0 / (s.min_frame_rate_for_dynamic_res + 0.01)),
        ),
        ("r.MaxFrameLatency", Int(if s.triple_buffering { 3 } else { 2 })),
        ("r.AsyncCompute", Bool(s.async_compute)),
        ("r.ViewDistanceScale", Float(s.lod_distance_multiplier)),
        ("process.Priority", Int(s.process_priority.index() as i32)),
    ]
}

fn display(s: &DisplaySettings) -> Vec<Knob> {
    vec![
        ("r.SetRes.Width", Int(s.resolution.width)),
        ("r.SetRes.Height", Int(s.resolution.height)),
        ("r.FullScreenMode", Int(s.window_mode.index() as i32)),
        // Neutral brightness (1.0) means no sharpening offset.
        ("r.Tonemapper.Sharpen", Float(s.brightness - 1.0)),
        ("r.Tonemapper.Contrast", Float(s.contrast)),
        ("r.HDR.EnableHDROutput", Bool(s.hdr_enabled)),
        ("r.HDR.Display.OutputDevice", Float(s.hdr_max_nits)),
        ("r.Display.MonitorIndex", Int(s.monitor_index)),
        ("r.Borderless", Bool(s.borderless)),
        ("r.ScreenPercentage", Float(s.screen_percentage)),
        ("ui.MenuFieldOfView", Float(s.menu_fov)),
        ("r.AspectRatioOverride", Float(s.aspect_ratio_override)),
        ("ui.SafeZoneScale", Float(s.safe_zone_scale)),
    ]
}

fn audio(s: &AudioSettings) -> Vec<Knob> {
    vec![
        ("au.MasterVolume", Float(s.master_volume)),
        ("au.SFXVolume", Float(s.sfx_volume)),
        ("au.MusicVolume", Float(s.music_volume)),
        ("au.VoiceDialogVolume", Float(s.voice_dialog_volume)),
        ("au.AmbientVolume", Float(s.ambient_volume)),
        ("au.UIVolume", Float(s.ui_sound_volume)),
        ("au.VoiceChatVolume", Float(s.voice_chat_volume)),
        ("au.Quality", Int(s.audio_quality)),
        ("au.SurroundMode", Int(s.surround_mode)),
        ("au.SpatialAudio", Bool(s.spatial_audio)),
        ("au.DynamicRange", Float(s.dynamic_range)),
        ("ui.SubtitleTextSize", Float(s.subtitle_text_size)),
        ("ui.SubtitleBackgroundOpacity", Float(s.subtitle_bg_opacity)),
    ]
}

fn gameplay(s: &GameplaySettings) -> Vec<Knob> {
    vec![
        ("game.FieldOfView", Float(s.fov)),
        ("input.MouseSensitivity", Float(s.mouse_sensitivity)),
        ("input.InvertMouseY", Bool(s.invert_mouse_y)),
        ("input.ControllerSensitivity", Float(s.controller_sensitivity)),
        ("input.ControllerDeadZone", Float(s.controller_dead_zone)),
        ("input.AimAssistStrength", Float(s.aim_assist)),
        ("camera.ShakeScale", Float(s.camera_shake)),
        ("camera.HeadBobScale", Float(s.head_bob)),
        ("input.Vibration", Bool(s.vibration)),
        ("input.CrouchToggle", Bool(s.crouch_toggle)),
        ("input.SprintToggle", Bool(s.sprint_toggle)),
        ("input.AutoRun", Bool(s.auto_run)),
        ("camera.Smoothing", Float(s.camera_smoothing)),
    ]
}

fn accessibility(s: &AccessibilitySettings) -> Vec<Knob> {
    let mut knobs = vec![
        ("r.ColorBlind.Mode", Int(s.colorblind_mode.index() as i32)),
        ("ui.Scale", Float(s.ui_scale)),
        ("ui.TextSize", Float(s.text_size)),
        ("ui.HighContrast", Bool(s.high_contrast)),
        ("ui.ScreenReader", Bool(s.screen_reader)),
    ];
    if s.photosensitivity {
        knobs.push(("r.BloomQuality", Int(0)));
        knobs.push(("r.MotionBlurQuality", Int(0)));
        knobs.push(("r.LensFlareQuality", Int(0)));
    }
    if s.reduced_motion {
        knobs.push(("r.MotionBlurQuality", Int(0)));
        knobs.push(("camera.ShakeScale", Float(0.0)));
    }
    knobs
}

fn network(s: &NetworkSettings) -> Vec<Knob> {
    vec![
        ("net.MaxPingThreshold", Int(s.max_ping_threshold)),
        ("p.NetClientInterpolation", Float(s.network_smoothing)),
        ("net.MaxBandwidthKBps", Int(s.bandwidth_limit_kbps)),
        ("net.Crossplay", Bool(s.crossplay)),
    ]
}

fn debug(s: &DebugSettings) -> Vec<Knob> {
    let mut knobs = vec![
        ("stat.FPS", Bool(s.show_perf_overlay)),
        ("stat.Unit", Bool(s.show_perf_overlay)),
        ("stat.Net", Bool(s.show_network_stats)),
        ("dev.Mode", Bool(s.developer_mode)),
        ("crash.Reporting", Bool(s.crash_reporting)),
        ("bench.Mode", Bool(s.benchmark_mode)),
    ];
    if s.benchmark_mode {
        knobs.push(("r.VSync", Bool(false)));
    }
    knobs
}
