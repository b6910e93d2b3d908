//! Scene Viewer 入口
//!
//! ```bash
//! # 使用默认配置
//! cargo run
//!
//! # 覆盖窗口尺寸与状态文件
//! cargo run -- --width 1280 --height 720 --state /tmp/state.txt
//! ```

use anyhow::Context;
use tracing::{error, info};

use scene_viewer::app;
use scene_viewer::core::{log, Config};

/// 初始化流程
///
/// 1. 加载配置文件（config.toml）并应用命令行参数
/// 2. 初始化日志系统
/// 3. 运行查看器，场景与状态文件由 `app` 加载
fn main() -> anyhow::Result<()> {
    // 日志初始化之前加载配置
    let mut config = Config::from_file_or_default("config.toml");
    config.apply_args(std::env::args());
    config.validate().context("Invalid configuration")?;

    let log_file = config.logging.file_output.then(|| config.logging.log_file.clone());
    log::init_logger(config.logging.level, config.logging.file_output, log_file.as_deref());

    info!(version = env!("CARGO_PKG_VERSION"), "Scene viewer starting...");
    info!(
        width = config.window.width,
        height = config.window.height,
        vsync = config.graphics.vsync,
        state_file = %config.paths.state_file.display(),
        "Configuration loaded"
    );

    app::run(config)
        .map_err(|e| {
            error!("Scene viewer failed: {}", e);
            e
        })
        .context("Scene viewer terminated with an error")
}
