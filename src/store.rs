//! The settings store: owns the validated document and the metrics window,
//! dispatches apply hooks and drives save/load through the storage
//! collaborator.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::apply;
use crate::codec;
use crate::error::{Result, TuneForgeError};
use crate::fields::{self, SettingValue};
use crate::metrics::{MetricsAggregator, PerformanceMetrics};
use crate::runtime::{MemoryProbe, RuntimeSink, SystemMemoryProbe, TracingRuntime};
use crate::settings::{
    AccessibilitySettings, AudioSettings, Category, DebugSettings, DisplaySettings,
    GameplaySettings, GraphicsSettings, NetworkSettings, PerformanceSettings, RenderingSettings,
    Resolution, SettingsDocument,
};
use crate::storage::{FsStorage, SettingsStorage};

/// Store shared with background tasks (autosave).
pub type SharedStore = Arc<Mutex<SettingsStore>>;

/// External services the store calls into.
pub struct Collaborators {
    pub runtime: Box<dyn RuntimeSink>,
    pub memory: Box<dyn MemoryProbe>,
    pub storage: Arc<dyn SettingsStorage>,
}

impl Collaborators {
    /// Tracing runtime, sysinfo memory probe and the local filesystem.
    pub fn system() -> Self {
        Self {
            runtime: Box::new(TracingRuntime),
            memory: Box::new(SystemMemoryProbe::new()),
            storage: Arc::new(FsStorage),
        }
    }
}

pub struct SettingsStore {
    pub(crate) document: SettingsDocument,
    defaults: SettingsDocument,
    metrics: MetricsAggregator,
    dirty: BTreeSet<Category>,
    settings_path: PathBuf,
    runtime: Box<dyn RuntimeSink>,
    memory: Box<dyn MemoryProbe>,
    storage: Arc<dyn SettingsStorage>,
}

macro_rules! category_accessors {
    ($($category:ident => $field:ident : $ty:ty, $setter:ident;)+) => {
        $(
            pub fn $field(&self) -> $ty {
                self.document.$field.clone()
            }

            /// Replace the whole category (fields are clamped) and apply it.
            pub fn $setter(&mut self, value: $ty) {
                self.document.$field = value;
                self.document.sanitize_category(Category::$category);
                self.touch(Category::$category);
            }
        )+
    };
}

impl SettingsStore {
    pub fn new(collaborators: Collaborators, settings_path: impl Into<PathBuf>) -> Self {
        Self::with_defaults(SettingsDocument::default(), collaborators, settings_path)
    }

    /// Start from `defaults` instead of the built-in values. The defaults are
    /// also the fallback for fields missing from a loaded document.
    pub fn with_defaults(
        defaults: SettingsDocument,
        collaborators: Collaborators,
        settings_path: impl Into<PathBuf>,
    ) -> Self {
        let defaults = defaults.sanitized();
        Self {
            document: defaults.clone(),
            defaults,
            metrics: MetricsAggregator::new(),
            dirty: BTreeSet::new(),
            settings_path: settings_path.into(),
            runtime: collaborators.runtime,
            memory: collaborators.memory,
            storage: collaborators.storage,
        }
    }

    pub fn into_shared(self) -> SharedStore {
        Arc::new(Mutex::new(self))
    }

    /// Load the saved document, or push the current values if there is none.
    pub fn initialize(&mut self) {
        if !self.load_settings() {
            self.apply_all();
        }
    }

    category_accessors! {
        Graphics => graphics: GraphicsSettings, set_graphics;
        Rendering => rendering: RenderingSettings, set_rendering;
        Performance => performance: PerformanceSettings, set_performance;
        Display => display: DisplaySettings, set_display;
        Audio => audio: AudioSettings, set_audio;
        Gameplay => gameplay: GameplaySettings, set_gameplay;
        Accessibility => accessibility: AccessibilitySettings, set_accessibility;
        Network => network: NetworkSettings, set_network;
        Debug => debug: DebugSettings, set_debug;
    }

    pub fn set_resolution(&mut self, resolution: Resolution) {
        self.document.display.resolution = resolution;
        self.document.sanitize_category(Category::Display);
        self.touch(Category::Display);
    }

    /// Set a field by category and key. Numbers are converted to the field's
    /// kind and clamped; returns the stored value.
    pub fn set_field(&mut self, category: Category, key: &str, value: SettingValue) -> Result<SettingValue> {
        let spec = fields::find(category, key)
            .ok_or_else(|| TuneForgeError::UnknownField(format!("{}.{}", category, key)))?;
        let stored = spec
            .write(&mut self.document, &value)
            .ok_or_else(|| TuneForgeError::InvalidValue {
                field: spec.to_string(),
                expected: spec.kind.expected(),
            })?;
        if !value.matches_stored(&stored) {
            debug!(field = %spec, from = %value, to = %stored, "Clamped setting");
        }
        self.touch(category);
        Ok(stored)
    }

    pub fn get_field(&self, category: Category, key: &str) -> Result<SettingValue> {
        fields::find(category, key)
            .map(|spec| spec.read(&self.document))
            .ok_or_else(|| TuneForgeError::UnknownField(format!("{}.{}", category, key)))
    }

    pub fn settings(&self) -> &SettingsDocument {
        &self.document
    }

    pub fn get_all_settings(&self) -> SettingsDocument {
        self.document.clone()
    }

    pub fn defaults(&self) -> &SettingsDocument {
        &self.defaults
    }

    pub fn reset_to_defaults(&mut self) {
        self.document = self.defaults.clone();
        self.dirty.extend(Category::ALL);
        self.apply_all();
    }

    pub(crate) fn touch(&mut self, category: Category) {
        self.dirty.insert(category);
        self.apply(category);
    }

    pub fn apply(&mut self, category: Category) {
        for (knob, value) in apply::knobs(category, &self.document) {
            self.runtime.apply_setting(knob, value);
        }
    }

    pub fn apply_all(&mut self) {
        for category in Category::ALL {
            self.apply(category);
        }
    }

    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    pub fn dirty_categories(&self) -> Vec<Category> {
        self.dirty.iter().copied().collect()
    }

    pub fn update_performance_metrics(&mut self, delta_seconds: f32) {
        if self.metrics.update(delta_seconds) {
            let used = self.memory.used_physical_bytes();
            let graphics = self.memory.graphics_memory_bytes();
            self.metrics.record_memory(used, graphics);
        }
    }

    pub fn get_performance_metrics(&self) -> PerformanceMetrics {
        self.metrics.snapshot()
    }

    pub fn reset_performance_stats(&mut self) {
        self.metrics.reset();
    }

    pub fn metrics(&self) -> &MetricsAggregator {
        &self.metrics
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    pub fn set_settings_path(&mut self, path: impl Into<PathBuf>) {
        self.settings_path = path.into();
    }

    /// Snapshot everything a save needs so the write can happen without
    /// holding the store.
    pub fn prepare_save(&self) -> PendingSave {
        PendingSave {
            path: self.settings_path.clone(),
            document: self.document.clone(),
            storage: Arc::clone(&self.storage),
        }
    }

    /// Clear the dirty set after a committed save, unless the document moved
    /// on while the write was in flight.
    pub fn finish_save(&mut self, saved: &SettingsDocument) {
        if &self.document == saved {
            self.dirty.clear();
        }
    }

    pub fn try_save(&mut self) -> Result<()> {
        let pending = self.prepare_save();
        pending.commit()?;
        self.finish_save(pending.document());
        Ok(())
    }

    pub fn save_settings(&mut self) -> bool {
        match self.try_save() {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to save settings to {}: {}", self.settings_path.display(), e);
                false
            }
        }
    }

    /// Read and merge the saved document. The in-memory document is only
    /// replaced after a successful decode.
    pub fn try_load(&mut self) -> Result<()> {
        let bytes = self.storage.read(&self.settings_path)?;
        let document = codec::decode(&bytes, &self.defaults)?;
        self.document = document;
        self.dirty.clear();
        self.apply_all();
        info!("Loaded settings from {}", self.settings_path.display());
        Ok(())
    }

    pub fn load_settings(&mut self) -> bool {
        match self.try_load() {
            Ok(()) => true,
            Err(TuneForgeError::NotFound(path)) => {
                warn!("No saved settings at {}, using defaults", path.display());
                false
            }
            Err(e) => {
                error!("Failed to load settings from {}: {}", self.settings_path.display(), e);
                false
            }
        }
    }
}

/// A save snapshot taken by [`SettingsStore::prepare_save`].
pub struct PendingSave {
    path: PathBuf,
    document: SettingsDocument,
    storage: Arc<dyn SettingsStorage>,
}

impl PendingSave {
    pub fn document(&self) -> &SettingsDocument {
        &self.document
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Encode and write. May block on the storage backend.
    pub fn commit(&self) -> Result<()> {
        let bytes = codec::encode(&self.document)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.storage.ensure_dir(parent)?;
        }
        self.storage.write(&self.path, &bytes)?;
        info!("Saved settings to {}", self.path.display());
        Ok(())
    }
}
