//! Scene Viewer - wgpu 场景查看器
//!
//! 加载一组 OBJ 模型与天空盒，使用点光源、聚光灯和一个带全向阴影的光源着色，
//! 可选 HDR 泛光，并提供 egui 调试面板。相机位置、背景色与面板开关保存在
//! 文本状态文件中，下次启动时恢复。
//!
//! # 模块结构
//!
//! - `core`: 配置、场景描述、日志、错误处理、输入和程序状态
//! - `math`: 向量矩阵类型与变换辅助函数
//! - `component`: 相机、模型变换与光源
//! - `geometry`: 顶点、网格与 OBJ 加载
//! - `gfx`: wgpu 设备与纹理
//! - `renderer`: 渲染通道（阴影、模型、天空盒、后处理）
//! - `gui`: 调试面板
//! - `app`: 事件循环

pub mod core;
pub mod math;
pub mod component;
pub mod geometry;
pub mod gfx;
pub mod renderer;
pub mod gui;
pub mod app;
