//! 性能统计模块
//!
//! 按一秒窗口统计帧率与平均帧时间。

use std::time::{Duration, Instant};

const WINDOW: Duration = Duration::from_secs(1);

/// 性能统计（帧率、帧时间）
pub struct PerformanceMetrics {
    frame_count: u32,
    window_start: Instant,
    fps: f32,
    frame_time_ms: f32,
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl PerformanceMetrics {
    pub fn new() -> Self {
        Self {
            frame_count: 0,
            window_start: Instant::now(),
            fps: 0.0,
            frame_time_ms: 0.0,
        }
    }

    /// 记录一帧
    pub fn record_frame(&mut self) {
        self.record_frame_at(Instant::now());
    }

    fn record_frame_at(&mut self, now: Instant) {
        self.frame_count += 1;
        let elapsed = now.duration_since(self.window_start);

        if elapsed >= WINDOW {
            self.fps = self.frame_count as f32 / elapsed.as_secs_f32();
            self.frame_time_ms = 1000.0 / self.fps;
            self.frame_count = 0;
            self.window_start = now;
        }
    }

    /// 获取当前 FPS
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// 获取当前帧时间（毫秒）
    pub fn frame_time_ms(&self) -> f32 {
        self.frame_time_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_updates_once_per_window() {
        let mut metrics = PerformanceMetrics::new();
        let start = metrics.window_start;

        for i in 1..60 {
            metrics.record_frame_at(start + Duration::from_millis(i * 10));
        }
        assert_eq!(metrics.fps(), 0.0);

        metrics.record_frame_at(start + Duration::from_secs(2));
        assert!((metrics.fps() - 30.0).abs() < 1e-3);
        assert!((metrics.frame_time_ms() - 1000.0 / 30.0).abs() < 1e-2);
    }
}
