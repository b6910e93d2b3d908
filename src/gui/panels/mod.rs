//! GUI 面板模块
//!
//! 每个面板只负责绘制，数据来自 `OverlayState` 与 `ProgramState`。

pub mod performance;
pub mod scene;
pub mod camera;
