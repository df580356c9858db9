//! Collaborators the store talks to: the engine's runtime knob sink and the
//! memory probe used by the metrics tick.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use sysinfo::System;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RuntimeValue {
    Int(i32),
    Float(f32),
    Bool(bool),
}

impl fmt::Display for RuntimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeValue::Int(v) => write!(f, "{}", v),
            RuntimeValue::Float(v) => write!(f, "{}", v),
            RuntimeValue::Bool(v) => write!(f, "{}", u8::from(*v)),
        }
    }
}

/// Receives named engine knobs when a category is applied.
pub trait RuntimeSink: Send {
    fn apply_setting(&mut self, name: &str, value: RuntimeValue);
}

/// Logs each knob instead of driving a real engine.
#[derive(Debug, Default)]
pub struct TracingRuntime;

impl RuntimeSink for TracingRuntime {
    fn apply_setting(&mut self, name: &str, value: RuntimeValue) {
        debug!(target: "tuneforge::runtime", knob = name, %value, "apply");
    }
}

/// Records every knob it receives. Clones share the same log, so a test can
/// keep one handle and give the other to a store.
#[derive(Debug, Clone, Default)]
pub struct RecordingRuntime {
    calls: Arc<Mutex<Vec<(String, RuntimeValue)>>>,
}

impl RecordingRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<(String, RuntimeValue)> {
        self.calls.lock().clone()
    }

    pub fn take(&self) -> Vec<(String, RuntimeValue)> {
        std::mem::take(&mut *self.calls.lock())
    }

    /// Last value pushed for `name`, if any.
    pub fn last(&self, name: &str) -> Option<RuntimeValue> {
        self.calls
            .lock()
            .iter()
            .rev()
            .find(|(knob, _)| knob == name)
            .map(|(_, value)| *value)
    }
}

impl RuntimeSink for RecordingRuntime {
    fn apply_setting(&mut self, name: &str, value: RuntimeValue) {
        self.calls.lock().push((name.to_string(), value));
    }
}

/// Memory usage source for the metrics tick. Both values are bytes; a graphics
/// value of 0 means "unknown".
#[cfg_attr(test, mockall::automock)]
pub trait MemoryProbe: Send {
    fn used_physical_bytes(&mut self) -> u64;
    fn graphics_memory_bytes(&mut self) -> u64;
}

const MEMORY_REFRESH: Duration = Duration::from_millis(500);

/// Host memory via sysinfo. Refreshes at most twice a second since the tick
/// runs once per frame.
pub struct SystemMemoryProbe {
    system: System,
    last_refresh: Option<Instant>,
}

impl SystemMemoryProbe {
    pub fn new() -> Self {
        Self {
            system: System::new(),
            last_refresh: None,
        }
    }
}

impl Default for SystemMemoryProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryProbe for SystemMemoryProbe {
    fn used_physical_bytes(&mut self) -> u64 {
        let stale = self
            .last_refresh
            .is_none_or(|at| at.elapsed() >= MEMORY_REFRESH);
        if stale {
            self.system.refresh_memory();
            self.last_refresh = Some(Instant::now());
        }
        self.system.used_memory()
    }

    fn graphics_memory_bytes(&mut self) -> u64 {
        // No portable source for dedicated video memory.
        0
    }
}

/// Reports nothing; for headless hosts and tests.
#[derive(Debug, Default)]
pub struct NullMemoryProbe;

impl MemoryProbe for NullMemoryProbe {
    fn used_physical_bytes(&mut self) -> u64 {
        0
    }

    fn graphics_memory_bytes(&mut self) -> u64 {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn recording_runtime_clones_share_log() {
        let recorder = RecordingRuntime::new();
        let mut sink = recorder.clone();
        sink.apply_setting("r.VSync", RuntimeValue::Int(1));
        sink.apply_setting("r.VSync", RuntimeValue::Int(0));
        assert_eq!(recorder.calls().len(), 2);
        assert_eq!(recorder.last("r.VSync"), Some(RuntimeValue::Int(0)));
        assert_eq!(recorder.take().len(), 2);
        assert!(recorder.calls().is_empty());
    }

    #[test]
    fn bool_values_print_as_switches() {
        assert_eq!(RuntimeValue::Bool(true).to_string(), "1");
        assert_eq!(RuntimeValue::Float(0.5).to_string(), "0.5");
    }

    #[test]
    fn system_probe_reports_no_graphics_memory() {
        let mut probe = SystemMemoryProbe::new();
        assert_eq!(probe.graphics_memory_bytes(), 0);
    }
}
