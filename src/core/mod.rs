//! 核心功能模块
//!
//! 与图形 API 无关的基础功能：日志、配置、场景描述、错误处理、输入和程序状态。
//!
//! # 模块组织
//!
//! - `log`：日志系统
//! - `config`：程序配置（窗口、图形、输入、路径）
//! - `scene`：场景描述（模型、光源、天空盒、阴影、泛光）
//! - `error`：统一的错误类型
//! - `input`：键盘与鼠标输入
//! - `state`：可持久化的程序状态

pub mod log;
pub mod config;
pub mod scene;
pub mod error;
pub mod input;
pub mod state;

pub use config::Config;
pub use error::{Result, ViewerError};
pub use input::{InputAction, InputSystem};
pub use scene::SceneConfig;
pub use state::ProgramState;
