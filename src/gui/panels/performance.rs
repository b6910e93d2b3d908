//! 性能监控面板
//!
//! 显示 FPS、帧时间等性能指标。

use crate::gui::state::OverlayState;

const TARGET_FRAME_TIME_MS: f32 = 1000.0 / 60.0;

/// 渲染性能面板
pub fn render(ui: &mut egui::Ui, state: &OverlayState) {
    ui.collapsing("Performance", |ui| {
        ui.label(format!("FPS: {:.1}", state.fps));
        ui.label(format!("Frame time: {:.2} ms", state.frame_time_ms));

        if state.frame_time_ms > 0.0 {
            if state.frame_time_ms <= TARGET_FRAME_TIME_MS {
                ui.colored_label(egui::Color32::GREEN, "✓ 60 FPS");
            } else {
                ui.colored_label(egui::Color32::RED, "⚠ below 60 FPS");
            }
        }
    });
}
