//! Thin UI facades over [`SettingsStore`]: the performance overlay and the
//! settings panel.

use crate::metrics::PerformanceMetrics;
use crate::settings::{Resolution, SettingsDocument};
use crate::store::SettingsStore;

pub const DEFAULT_OVERLAY_INTERVAL: f32 = 0.1;

/// Feeds the metrics window every tick and hands out a snapshot at a fixed
/// refresh interval.
#[derive(Debug, Clone)]
pub struct OverlayController {
    visible: bool,
    update_interval: f32,
    elapsed: f32,
}

impl Default for OverlayController {
    fn default() -> Self {
        Self::new(DEFAULT_OVERLAY_INTERVAL)
    }
}

impl OverlayController {
    pub fn new(update_interval: f32) -> Self {
        Self {
            visible: true,
            update_interval: if update_interval > 0.0 {
                update_interval
            } else {
                DEFAULT_OVERLAY_INTERVAL
            },
            elapsed: 0.0,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.elapsed = 0.0;
    }

    pub fn toggle(&mut self) {
        self.set_visible(!self.visible);
    }

    pub fn update_interval(&self) -> f32 {
        self.update_interval
    }

    /// Returns a snapshot when the refresh interval elapsed. A hidden overlay
    /// does not feed the metrics window.
    pub fn tick(&mut self, store: &mut SettingsStore, delta_seconds: f32) -> Option<PerformanceMetrics> {
        if !self.visible {
            return None;
        }
        store.update_performance_metrics(delta_seconds);
        if delta_seconds > 0.0 {
            self.elapsed += delta_seconds;
        }
        if self.elapsed >= self.update_interval {
            self.elapsed = 0.0;
            Some(store.get_performance_metrics())
        } else {
            None
        }
    }

    pub fn reset_stats(&mut self, store: &mut SettingsStore) {
        store.reset_performance_stats();
        self.elapsed = 0.0;
    }
}

pub const COMMON_RESOLUTIONS: [Resolution; 10] = [
    Resolution::new(1280, 720),
    Resolution::new(1280, 800),
    Resolution::new(1600, 900),
    Resolution::new(1680, 1050),
    Resolution::new(1920, 1080),
    Resolution::new(1920, 1200),
    Resolution::new(2560, 1080),
    Resolution::new(2560, 1440),
    Resolution::new(3440, 1440),
    Resolution::new(3840, 2160),
];

/// Settings panel bound to a store for the duration of an edit session.
pub struct PanelController<'a> {
    store: &'a mut SettingsStore,
    shown: SettingsDocument,
}

impl<'a> PanelController<'a> {
    pub fn new(store: &'a mut SettingsStore) -> Self {
        let shown = store.get_all_settings();
        Self { store, shown }
    }

    /// The values last pulled from the store.
    pub fn current_settings(&self) -> &SettingsDocument {
        &self.shown
    }

    pub fn refresh(&mut self) {
        self.shown = self.store.get_all_settings();
    }

    /// Run a setter against the store and refresh the shown values.
    pub fn edit(&mut self, change: impl FnOnce(&mut SettingsStore)) {
        change(&mut *self.store);
        self.refresh();
    }

    pub fn apply(&mut self) {
        self.store.apply_all();
    }

    pub fn save(&mut self) -> bool {
        self.store.save_settings()
    }

    pub fn load(&mut self) -> bool {
        let loaded = self.store.load_settings();
        self.refresh();
        loaded
    }

    pub fn reset_to_defaults(&mut self) {
        self.store.reset_to_defaults();
        self.refresh();
    }

    pub fn available_resolutions(&self) -> &'static [Resolution] {
        &COMMON_RESOLUTIONS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{NullMemoryProbe, RecordingRuntime};
    use crate::storage::MemoryStorage;
    use crate::store::Collaborators;
    use std::sync::Arc;

    fn store() -> SettingsStore {
        SettingsStore::new(
            Collaborators {
                runtime: Box::new(RecordingRuntime::new()),
                memory: Box::new(NullMemoryProbe),
                storage: Arc::new(MemoryStorage::new()),
            },
            "Settings.json",
        )
    }

    #[test]
    fn overlay_reports_on_interval() {
        let mut store = store();
        let mut overlay = OverlayController::new(0.05);
        assert!(overlay.tick(&mut store, 0.02).is_none());
        assert!(overlay.tick(&mut store, 0.02).is_none());
        let snapshot = overlay.tick(&mut store, 0.02).expect("interval elapsed");
        assert!((snapshot.fps_average - 50.0).abs() < 1e-3);
    }

    #[test]
    fn hidden_overlay_does_not_feed_metrics() {
        let mut store = store();
        let mut overlay = OverlayController::default();
        overlay.toggle();
        assert!(!overlay.is_visible());
        assert!(overlay.tick(&mut store, 0.5).is_none());
        assert_eq!(store.metrics().history_len(), 0);
    }

    #[test]
    fn panel_edits_refresh_shown_values() {
        let mut store = store();
        let mut panel = PanelController::new(&mut store);
        panel.edit(|store| store.set_mouse_sensitivity(9.0));
        assert_eq!(panel.current_settings().gameplay.mouse_sensitivity, 5.0);
        assert!(panel.save());
        panel.reset_to_defaults();
        assert_eq!(panel.current_settings().gameplay.mouse_sensitivity, 1.0);
        assert!(panel.load());
        assert_eq!(panel.current_settings().gameplay.mouse_sensitivity, 5.0);
        assert!(panel.available_resolutions().contains(&Resolution::new(2560, 1440)));
    }
}
