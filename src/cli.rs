use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tuneforge::autosave;
use tuneforge::codec;
use tuneforge::config::AppConfig;
use tuneforge::facade::OverlayController;
use tuneforge::fields::{self, FieldKind, FieldSpec, SettingValue};
use tuneforge::metrics::PerformanceMetrics;
use tuneforge::settings::Category;
use tuneforge::store::{Collaborators, SettingsStore};

#[derive(Parser)]
#[command(
    name = "tune",
    author,
    version,
    about = "TuneForge - game settings store and frame-rate telemetry",
    long_about = "Inspect and edit a game's persisted settings document, apply presets, and run the rolling FPS monitor"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, env = "TUNEFORGE_CONFIG", help = "Path to config file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Path to the settings document (overrides config)")]
    pub settings: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Show current settings")]
    Show {
        #[arg(long, help = "Only show one category (e.g. Audio)")]
        category: Option<String>,

        #[arg(long, help = "Print as JSON")]
        json: bool,
    },

    #[command(about = "Get one setting")]
    Get {
        #[arg(help = "Setting path, e.g. Gameplay.FOV")]
        path: String,
    },

    #[command(about = "Set one setting (out-of-range values are clamped)")]
    Set {
        #[arg(help = "Setting path, e.g. Gameplay.FOV")]
        path: String,

        #[arg(help = "New value; enums accept a label or ordinal")]
        value: String,
    },

    #[command(about = "Apply a quality preset")]
    Preset {
        #[arg(help = "Level 0 (low) to 4 (epic)")]
        level: i32,
    },

    #[command(about = "Switch performance or quality mode")]
    Mode {
        #[arg(value_enum, help = "Mode to switch")]
        mode: ModeKind,

        #[arg(long, help = "Turn the mode off and restore defaults")]
        off: bool,
    },

    #[command(about = "Reset all settings to defaults")]
    Reset {
        #[arg(long, help = "Confirm reset")]
        yes: bool,
    },

    #[command(about = "List every setting with its type and range")]
    Fields {
        #[arg(long, help = "Only list one category")]
        category: Option<String>,
    },

    #[command(about = "Feed synthetic frames through the metrics window")]
    Bench {
        #[arg(long, default_value_t = 60.0, help = "Simulated frame rate")]
        fps: f32,

        #[arg(long, default_value_t = 3.0, help = "Simulated duration in seconds")]
        seconds: f32,

        #[arg(long, help = "Print the final metrics as JSON")]
        json: bool,
    },

    #[command(about = "Run the live FPS overlay for a while")]
    Monitor {
        #[arg(long, default_value_t = 5, help = "How long to run, in seconds")]
        seconds: u64,

        #[arg(long, default_value_t = 60, help = "Tick rate in Hz")]
        rate: u32,
    },

    #[command(about = "Show where settings and config are stored")]
    Path,

    #[command(about = "Manage TuneForge configuration")]
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ModeKind {
    Performance,
    Quality,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    #[command(about = "Show current configuration")]
    Show,

    #[command(about = "Set a configuration value")]
    Set {
        #[arg(help = "Configuration key")]
        key: String,

        #[arg(help = "Configuration value")]
        value: String,
    },

    #[command(about = "Reset configuration to defaults")]
    Reset {
        #[arg(long, help = "Confirm reset")]
        yes: bool,
    },
}

impl Cli {
    /// Config from `--config`, or the default location (created on first run).
    pub fn load_config(&self) -> Result<AppConfig> {
        let config = match &self.config {
            Some(path) if path.exists() => AppConfig::load_from(path)?,
            Some(_) => AppConfig::default(),
            None => AppConfig::load()?,
        };
        Ok(config)
    }

    fn config_path(&self) -> Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => Ok(AppConfig::config_path()?),
        }
    }

    fn open_store(&self, config: &AppConfig) -> SettingsStore {
        let path = self.settings.clone().unwrap_or_else(|| config.settings_path());
        let mut store = SettingsStore::new(Collaborators::system(), path);
        store.initialize();
        store
    }

    pub async fn execute(self, config: AppConfig) -> Result<()> {
        match &self.command {
            Commands::Show { category, json } => {
                handle_show(&self.open_store(&config), category.as_deref(), *json)
            }
            Commands::Get { path } => handle_get(&self.open_store(&config), path),
            Commands::Set { path, value } => handle_set(&mut self.open_store(&config), path, value),
            Commands::Preset { level } => {
                let mut store = self.open_store(&config);
                store.apply_quality_preset(*level);
                save(&mut store)?;
                // Level is clamped, so report what was stored.
                let applied = store.graphics().shading;
                println!("✅ Applied quality preset {}", applied.to_string().green());
                Ok(())
            }
            Commands::Mode { mode, off } => {
                let mut store = self.open_store(&config);
                let name = match mode {
                    ModeKind::Performance => {
                        store.enable_performance_mode(!off);
                        "Performance"
                    }
                    ModeKind::Quality => {
                        store.enable_quality_mode(!off);
                        "Quality"
                    }
                };
                save(&mut store)?;
                let state = if *off { "off".red() } else { "on".green() };
                println!("✅ {} mode {}", name.bold(), state);
                Ok(())
            }
            Commands::Reset { yes } => {
                if *yes {
                    let mut store = self.open_store(&config);
                    store.reset_to_defaults();
                    save(&mut store)?;
                    println!("✅ Settings reset to defaults");
                    println!("Settings file: {}", store.settings_path().display().to_string().dimmed());
                } else {
                    println!("⚠️ This will reset ALL settings to defaults.");
                    println!("Use --yes to confirm the reset.");
                }
                Ok(())
            }
            Commands::Fields { category } => handle_fields(category.as_deref()),
            Commands::Bench { fps, seconds, json } => {
                handle_bench(&mut self.open_store(&config), *fps, *seconds, *json)
            }
            Commands::Monitor { seconds, rate } => {
                handle_monitor(self.open_store(&config), &config, *seconds, *rate).await
            }
            Commands::Path => {
                let settings = self.settings.clone().unwrap_or_else(|| config.settings_path());
                println!("{}", "📁 TuneForge Paths".bold().cyan());
                println!("  Settings: {}", settings.display().to_string().yellow());
                println!("  Config:   {}", self.config_path()?.display().to_string().yellow());
                Ok(())
            }
            Commands::Config { action } => handle_config_command(action, config, &self.config_path()?),
        }
    }
}

fn save(store: &mut SettingsStore) -> Result<()> {
    store
        .try_save()
        .with_context(|| format!("saving settings to {}", store.settings_path().display()))
}

fn parse_category(name: &str) -> Result<Category> {
    Category::from_key(name).ok_or_else(|| {
        let known: Vec<_> = Category::ALL.iter().map(|c| c.key()).collect();
        anyhow!("Unknown category '{}'. Available: {}", name, known.join(", "))
    })
}

fn find_field(path: &str) -> Result<&'static FieldSpec> {
    fields::find_path(path)
        .ok_or_else(|| anyhow!("Unknown setting '{}'. Run `tune fields` for the full list", path))
}

/// Enums print as `Label (ordinal)`.
fn describe(spec: &FieldSpec, value: &SettingValue) -> String {
    match (&spec.kind, value) {
        (FieldKind::Enum(labels), SettingValue::Int(index)) => {
            let label = usize::try_from(*index)
                .ok()
                .and_then(|i| labels.get(i))
                .copied()
                .unwrap_or("?");
            format!("{} ({})", label, index)
        }
        (FieldKind::Bool, SettingValue::Bool(true)) => "✅ Yes".to_string(),
        (FieldKind::Bool, SettingValue::Bool(false)) => "❌ No".to_string(),
        _ => value.to_string(),
    }
}

fn handle_show(store: &SettingsStore, category: Option<&str>, json: bool) -> Result<()> {
    let categories = match category {
        Some(name) => vec![parse_category(name)?],
        None => Category::ALL.to_vec(),
    };

    if json {
        let value = match categories.as_slice() {
            [single] => codec::category_value(store.settings(), *single),
            _ => codec::to_value(store.settings()),
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", "⚙️  TuneForge Settings".bold().cyan());
    println!("  File: {}", store.settings_path().display().to_string().dimmed());
    for category in categories {
        println!();
        println!("{}", format!("{}:", category).bold());
        for spec in fields::fields_of(category) {
            let value = spec.read(store.settings());
            println!("  {}: {}", spec.key, describe(spec, &value).yellow());
        }
    }
    Ok(())
}

fn handle_get(store: &SettingsStore, path: &str) -> Result<()> {
    let spec = find_field(path)?;
    let value = store.get_field(spec.category, spec.key)?;
    println!("{}: {}", spec.to_string().cyan(), describe(spec, &value).yellow());
    Ok(())
}

fn handle_set(store: &mut SettingsStore, path: &str, raw: &str) -> Result<()> {
    let spec = find_field(path)?;
    let value = spec
        .kind
        .parse(raw)
        .ok_or_else(|| anyhow!("Invalid value '{}' for {}: expected {}", raw, spec, spec.kind.expected()))?;
    let stored = store.set_field(spec.category, spec.key, value.clone())?;
    save(store)?;

    println!("✅ Set {} = {}", spec.to_string().cyan(), describe(spec, &stored).green());
    if !value.matches_stored(&stored) {
        println!("  {} clamped into {}", "note:".yellow(), spec.kind);
    }
    println!("Settings saved to: {}", store.settings_path().display().to_string().dimmed());
    Ok(())
}

fn handle_fields(category: Option<&str>) -> Result<()> {
    let filter = category.map(parse_category).transpose()?;
    let mut current = None;
    for spec in fields::FIELDS {
        if filter.is_some_and(|c| c != spec.category) {
            continue;
        }
        if current != Some(spec.category) {
            current = Some(spec.category);
            println!("{}", format!("{}:", spec.category).bold());
        }
        println!("  {:<28} {}", spec.key, spec.kind.to_string().dimmed());
    }
    Ok(())
}

fn print_metrics(metrics: &PerformanceMetrics) {
    println!(
        "  FPS {} (avg {:.1}, min {:.1}, max {:.1})",
        format!("{:.1}", metrics.fps_current).bold().green(),
        metrics.fps_average,
        metrics.fps_min,
        metrics.fps_max
    );
    println!(
        "  Frame {:.2} ms CPU / {:.2} ms GPU (est.)  RAM {:.0} MB  VRAM {}",
        metrics.cpu_frame_time_ms,
        metrics.gpu_frame_time_ms,
        metrics.ram_usage_mb,
        if metrics.vram_usage_mb > 0.0 {
            format!("{:.0} MB", metrics.vram_usage_mb)
        } else {
            "n/a".to_string()
        }
    );
    println!(
        "  Load game {:.0}%  render {:.0}%  RHI {:.0}%",
        metrics.game_thread_load * 100.0,
        metrics.render_thread_load * 100.0,
        metrics.rhi_thread_load * 100.0
    );
}

fn handle_bench(store: &mut SettingsStore, fps: f32, seconds: f32, json: bool) -> Result<()> {
    if !(fps > 0.0) || !(seconds > 0.0) {
        bail!("--fps and --seconds must be positive");
    }
    let frames = (fps * seconds).round() as usize;
    let delta = 1.0 / fps;

    store.reset_performance_stats();
    for _ in 0..frames {
        store.update_performance_metrics(delta);
    }

    let metrics = store.get_performance_metrics();
    if json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
        return Ok(());
    }

    println!("{}", "📊 Synthetic Benchmark".bold().cyan());
    println!("  Frames: {}  Window: {} samples", frames, store.metrics().history_len());
    print_metrics(&metrics);
    Ok(())
}

async fn handle_monitor(store: SettingsStore, config: &AppConfig, seconds: u64, rate: u32) -> Result<()> {
    if rate == 0 {
        bail!("--rate must be positive");
    }

    let store = store.into_shared();
    let autosave = config
        .autosave_interval()
        .map(|interval| autosave::spawn(store.clone(), interval));

    let mut overlay = OverlayController::new(config.overlay.update_interval_secs);
    let mut ticker = tokio::time::interval(Duration::from_secs_f64(1.0 / f64::from(rate)));
    let deadline = Instant::now() + Duration::from_secs(seconds);
    let mut last = Instant::now();

    println!("{}", "🔍 Monitoring frame rate (Ctrl+C to stop)".bold().cyan());
    while Instant::now() < deadline {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => break,
        }
        let now = Instant::now();
        let delta = now.duration_since(last).as_secs_f32();
        last = now;

        let snapshot = overlay.tick(&mut store.lock(), delta);
        if let Some(metrics) = snapshot {
            println!();
            print_metrics(&metrics);
        }
    }

    if let Some(handle) = autosave {
        handle.stop();
        if store.lock().is_dirty() && !autosave::save_if_dirty(&store).await {
            println!("❌ Final autosave failed");
        }
    }
    Ok(())
}

fn handle_config_command(action: &ConfigCommands, mut config: AppConfig, config_path: &Path) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            println!("{}", "⚙️  TuneForge Configuration".bold().cyan());
            println!();
            println!("{}", "Storage:".bold());
            println!("  Settings Dir: {}", config.storage.settings_dir.display().to_string().yellow());
            println!("  File Name: {}", config.storage.file_name.yellow());
            println!("{}", "Autosave:".bold());
            println!(
                "  Enabled: {}",
                if config.autosave.enabled { "✅ Yes".green() } else { "❌ No".red() }
            );
            println!("  Interval: {}s", config.autosave.interval_secs);
            println!("{}", "Overlay:".bold());
            println!("  Update Interval: {}s", config.overlay.update_interval_secs);
            println!("{}", "Logging:".bold());
            println!("  Level: {}", config.logging.level.yellow());
            Ok(())
        }
        ConfigCommands::Set { key, value } => {
            config.set_value(key, value)?;
            config.save_to(config_path)?;
            println!("✅ Set {} = {}", key.cyan(), value.green());
            println!("Configuration saved to: {}", config_path.display().to_string().dimmed());
            Ok(())
        }
        ConfigCommands::Reset { yes } => {
            if *yes {
                AppConfig::default().save_to(config_path)?;
                println!("✅ Configuration reset to defaults");
                println!("Configuration file: {}", config_path.display().to_string().dimmed());
            } else {
                println!("⚠️ This will reset ALL configuration to defaults.");
                println!("Use --yes to confirm the reset.");
            }
            Ok(())
        }
    }
}
