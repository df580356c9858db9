use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Seconds of frame history the window represents.
const WINDOW_SECONDS: f32 = 2.0;
const MAX_SAMPLES: usize = 120;
/// Trimming only kicks in once the window holds at least this many samples.
const MIN_SAMPLES_BEFORE_TRIM: usize = 60;
/// Frame budget at 60 Hz used for the thread-load estimates.
const FRAME_BUDGET_SECONDS: f32 = 0.0166;
const GPU_TIME_ESTIMATE: f32 = 0.8;
const RENDER_THREAD_SCALE: f32 = 0.9;
const RHI_THREAD_SCALE: f32 = 0.7;
const BYTES_PER_MB: f32 = 1024.0 * 1024.0;

/// Frame statistics. Frame times and thread loads are estimates derived from
/// the tick delta, not measured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub fps_current: f32,
    pub fps_average: f32,
    pub fps_min: f32,
    pub fps_max: f32,
    pub cpu_frame_time_ms: f32,
    pub gpu_frame_time_ms: f32,
    pub ram_usage_mb: f32,
    /// 0 when the platform can't report it.
    pub vram_usage_mb: f32,
    pub game_thread_load: f32,
    pub render_thread_load: f32,
    pub rhi_thread_load: f32,
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self {
            fps_current: 0.0,
            fps_average: 0.0,
            fps_min: 999.0,
            fps_max: 0.0,
            cpu_frame_time_ms: 0.0,
            gpu_frame_time_ms: 0.0,
            ram_usage_mb: 0.0,
            vram_usage_mb: 0.0,
            game_thread_load: 0.0,
            render_thread_load: 0.0,
            rhi_thread_load: 0.0,
        }
    }
}

/// Rolling frame-rate window fed once per tick.
#[derive(Debug, Clone, Default)]
pub struct MetricsAggregator {
    history: VecDeque<f32>,
    accumulator: f32,
    current: PerformanceMetrics,
}

impl MetricsAggregator {
    pub fn new() -> Self {
        Self {
            history: VecDeque::with_capacity(MAX_SAMPLES + 1),
            accumulator: 0.0,
            current: PerformanceMetrics::default(),
        }
    }

    /// Record one tick. Returns `false` (and changes nothing) for a zero,
    /// negative or NaN delta.
    pub fn update(&mut self, delta_seconds: f32) -> bool {
        if !(delta_seconds > 0.0) {
            return false;
        }

        let fps = 1.0 / delta_seconds;
        self.current.fps_current = fps;
        self.history.push_back(fps);
        self.accumulator += delta_seconds;

        if self.accumulator > WINDOW_SECONDS {
            if self.history.len() > MIN_SAMPLES_BEFORE_TRIM {
                let excess = self.history.len().saturating_sub(MAX_SAMPLES);
                self.history.drain(..excess);
            }
            self.accumulator = WINDOW_SECONDS;
        }

        let mut sum = 0.0;
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        for &sample in &self.history {
            sum += sample;
            min = min.min(sample);
            max = max.max(sample);
        }
        self.current.fps_average = sum / self.history.len() as f32;
        self.current.fps_min = min;
        self.current.fps_max = max;

        self.current.cpu_frame_time_ms = delta_seconds * 1000.0;
        self.current.gpu_frame_time_ms = self.current.cpu_frame_time_ms * GPU_TIME_ESTIMATE;

        let load = (delta_seconds / FRAME_BUDGET_SECONDS).clamp(0.0, 1.0);
        self.current.game_thread_load = load;
        self.current.render_thread_load = load * RENDER_THREAD_SCALE;
        self.current.rhi_thread_load = load * RHI_THREAD_SCALE;
        true
    }

    /// Store memory readings from the platform probe. A graphics reading of 0
    /// means "unknown" and keeps the previous value.
    pub fn record_memory(&mut self, used_physical_bytes: u64, graphics_bytes: u64) {
        self.current.ram_usage_mb = used_physical_bytes as f32 / BYTES_PER_MB;
        if graphics_bytes > 0 {
            self.current.vram_usage_mb = graphics_bytes as f32 / BYTES_PER_MB;
        }
    }

    pub fn snapshot(&self) -> PerformanceMetrics {
        self.current.clone()
    }

    /// Clear the window and the aggregate stats. `fps_current` and the frame
    /// time estimates keep their last values until the next update.
    pub fn reset(&mut self) {
        self.history.clear();
        self.accumulator = 0.0;
        self.current.fps_min = 999.0;
        self.current.fps_max = 0.0;
        self.current.fps_average = 0.0;
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn first_update_sets_all_stats_to_sample() {
        let mut metrics = MetricsAggregator::new();
        assert!(metrics.update(0.02));
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.fps_current, 50.0);
        assert_eq!(snapshot.fps_min, 50.0);
        assert_eq!(snapshot.fps_max, 50.0);
        assert_eq!(snapshot.fps_average, 50.0);
        assert_eq!(snapshot.cpu_frame_time_ms, 20.0);
        assert_eq!(snapshot.gpu_frame_time_ms, 16.0);
        assert_eq!(snapshot.game_thread_load, 1.0);
        assert_eq!(metrics.history_len(), 1);
    }

    #[test]
    fn degenerate_deltas_are_ignored() {
        let mut metrics = MetricsAggregator::new();
        metrics.update(1.0 / 30.0);
        let before = metrics.snapshot();
        assert!(!metrics.update(0.0));
        assert!(!metrics.update(-5.0));
        assert!(!metrics.update(f32::NAN));
        assert_eq!(metrics.snapshot(), before);
        assert_eq!(metrics.history_len(), 1);
    }

    #[test]
    fn window_is_capped_after_two_seconds() {
        let mut metrics = MetricsAggregator::new();
        for _ in 0..300 {
            metrics.update(1.0 / 60.0);
        }
        assert!(metrics.history_len() <= MAX_SAMPLES);
    }

    #[test]
    fn slow_ticks_never_trim_below_sixty_samples() {
        let mut metrics = MetricsAggregator::new();
        for _ in 0..10 {
            metrics.update(0.5);
        }
        // Accumulator exceeded 2s long ago but the window is tiny.
        assert_eq!(metrics.history_len(), 10);
        assert_eq!(metrics.snapshot().fps_average, 2.0);
    }

    #[test]
    fn min_and_max_track_window() {
        let mut metrics = MetricsAggregator::new();
        metrics.update(1.0 / 30.0);
        metrics.update(1.0 / 120.0);
        let snapshot = metrics.snapshot();
        assert!((snapshot.fps_min - 30.0).abs() < 1e-3);
        assert!((snapshot.fps_max - 120.0).abs() < 1e-3);
        assert!((snapshot.fps_average - 75.0).abs() < 1e-3);
    }

    #[test]
    fn reset_restores_sentinels_but_keeps_current() {
        let mut metrics = MetricsAggregator::new();
        metrics.update(0.01);
        metrics.reset();
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.fps_min, 999.0);
        assert_eq!(snapshot.fps_max, 0.0);
        assert_eq!(snapshot.fps_average, 0.0);
        assert_eq!(snapshot.fps_current, 100.0);
        assert_eq!(metrics.history_len(), 0);
    }

    #[test]
    fn memory_readings_convert_to_megabytes() {
        let mut metrics = MetricsAggregator::new();
        metrics.record_memory(512 * 1024 * 1024, 256 * 1024 * 1024);
        metrics.record_memory(1024 * 1024 * 1024, 0);
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.ram_usage_mb, 1024.0);
        assert_eq!(snapshot.vram_usage_mb, 256.0);
    }
}
