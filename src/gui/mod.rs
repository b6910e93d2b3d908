//! 调试面板模块
//!
//! 基于 egui + wgpu 的即时模式界面，F1 开关，绘制在后处理结果之上。

mod manager;
mod state;
mod metrics;
pub mod panels;

pub use manager::GuiManager;
pub use metrics::PerformanceMetrics;
pub use state::OverlayState;
