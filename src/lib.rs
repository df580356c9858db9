//! TuneForge: a validated game settings store with engine knob dispatch,
//! JSON persistence and a rolling frame-rate monitor.
//!
//! The usual entry point is [`store::SettingsStore`]:
//!
//! ```no_run
//! use tuneforge::store::{Collaborators, SettingsStore};
//!
//! let mut store = SettingsStore::new(Collaborators::system(), "Saved/Settings.json");
//! store.initialize();
//! store.set_fov(105.0);
//! store.update_performance_metrics(1.0 / 60.0);
//! store.save_settings();
//! ```

pub mod apply;
pub mod autosave;
pub mod codec;
pub mod config;
pub mod error;
pub mod facade;
pub mod fields;
pub mod metrics;
pub mod presets;
pub mod runtime;
pub mod settings;
pub mod storage;
pub mod store;

pub use error::{Result, TuneForgeError};
pub use metrics::{MetricsAggregator, PerformanceMetrics};
pub use settings::{Category, SettingsDocument};
pub use store::{Collaborators, SettingsStore, SharedStore};
