//! 配置管理模块
//!
//! 提供查看器配置的加载、解析和管理功能。
//! 支持从 TOML 配置文件加载，也支持命令行参数覆盖。
//!
//! # 配置文件格式 (config.toml)
//!
//! ```toml
//! [window]
//! width = 800
//! height = 600
//! title = "LearnOpenGL"
//! resizable = true
//!
//! [graphics]
//! vsync = true
//! msaa_samples = 1
//! shadow_map_size = 1024
//! power_preference = "high"   # high, low
//!
//! [logging]
//! level = "info"      # trace, debug, info, warn, error
//! file_output = false
//!
//! [input]
//! move_speed = 2.5
//! mouse_sensitivity = 0.1
//! turn_speed = 60.0
//!
//! [paths]
//! state_file = "resources/program_state.txt"
//! scene_file = "scene.toml"
//! resources_dir = "resources"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::error::{ConfigError, Result};

/// 查看器配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// 窗口配置
    #[serde(default)]
    pub window: WindowConfig,

    /// 图形配置
    #[serde(default)]
    pub graphics: GraphicsConfig,

    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,

    /// 输入配置
    #[serde(default)]
    pub input: InputSettings,

    /// 文件路径
    #[serde(default)]
    pub paths: PathsConfig,
}

/// 窗口配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// 窗口宽度
    #[serde(default = "default_width")]
    pub width: u32,

    /// 窗口高度
    #[serde(default = "default_height")]
    pub height: u32,

    /// 窗口标题
    #[serde(default = "default_title")]
    pub title: String,

    /// 是否可调整大小
    #[serde(default = "default_resizable")]
    pub resizable: bool,
}

/// 图形配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphicsConfig {
    /// 垂直同步
    #[serde(default = "default_vsync")]
    pub vsync: bool,

    /// MSAA 采样数（目前只使用 1）
    #[serde(default = "default_msaa")]
    pub msaa_samples: u32,

    /// 阴影立方体贴图每个面的边长
    #[serde(default = "default_shadow_map_size")]
    pub shadow_map_size: u32,

    /// GPU 选择偏好
    #[serde(default = "default_power_preference")]
    pub power_preference: PowerPreference,
}

/// GPU 选择偏好
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerPreference {
    /// 优先独立显卡
    High,
    /// 优先集成显卡
    Low,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// 是否输出到文件
    #[serde(default = "default_file_output")]
    pub file_output: bool,

    /// 日志文件路径
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// 相机输入参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputSettings {
    /// 移动速度（单位/秒）
    #[serde(default = "default_move_speed")]
    pub move_speed: f32,

    /// 鼠标灵敏度（度/像素）
    #[serde(default = "default_mouse_sensitivity")]
    pub mouse_sensitivity: f32,

    /// F/H 键的转向速度（度/秒）
    #[serde(default = "default_turn_speed")]
    pub turn_speed: f32,
}

/// 文件路径配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// 程序状态文件
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,

    /// 场景配置文件
    #[serde(default = "default_scene_file")]
    pub scene_file: PathBuf,

    /// 资源根目录（模型、天空盒的相对路径以此为基准）
    #[serde(default = "default_resources_dir")]
    pub resources_dir: PathBuf,
}

// 默认值函数
fn default_width() -> u32 { 800 }
fn default_height() -> u32 { 600 }
fn default_title() -> String { "LearnOpenGL".to_string() }
fn default_resizable() -> bool { true }
fn default_vsync() -> bool { true }
fn default_msaa() -> u32 { 1 }
fn default_shadow_map_size() -> u32 { 1024 }
fn default_power_preference() -> PowerPreference { PowerPreference::High }
fn default_log_level() -> LogLevel { LogLevel::Info }
fn default_file_output() -> bool { false }
fn default_log_file() -> String { "scene_viewer.log".to_string() }
fn default_move_speed() -> f32 { 2.5 }
fn default_mouse_sensitivity() -> f32 { 0.1 }
fn default_turn_speed() -> f32 { 60.0 }
fn default_state_file() -> PathBuf { PathBuf::from("resources/program_state.txt") }
fn default_scene_file() -> PathBuf { PathBuf::from("scene.toml") }
fn default_resources_dir() -> PathBuf { PathBuf::from("resources") }

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            title: default_title(),
            resizable: default_resizable(),
        }
    }
}

impl Default for GraphicsConfig {
    fn default() -> Self {
        Self {
            vsync: default_vsync(),
            msaa_samples: default_msaa(),
            shadow_map_size: default_shadow_map_size(),
            power_preference: default_power_preference(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_output: default_file_output(),
            log_file: default_log_file(),
        }
    }
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            move_speed: default_move_speed(),
            mouse_sensitivity: default_mouse_sensitivity(),
            turn_speed: default_turn_speed(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
            scene_file: default_scene_file(),
            resources_dir: default_resources_dir(),
        }
    }
}

impl Config {
    /// 从配置文件加载
    ///
    /// # 示例
    ///
    /// ```no_run
    /// use scene_viewer::core::Config;
    ///
    /// let config = Config::from_file("config.toml")?;
    /// # Ok::<(), scene_viewer::core::ViewerError>(())
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let contents = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path_str.clone()))?;

        Self::from_toml_str(&contents)
    }

    /// 从 TOML 字符串解析
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()).into())
    }

    /// 从配置文件加载，如果文件不存在则使用默认配置
    ///
    /// 此时日志系统尚未初始化，解析失败只能写到 stderr。
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}, using default configuration", e);
                Self::default()
            }
        }
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, contents)?;
        Ok(())
    }

    /// 从命令行参数覆盖配置
    ///
    /// 支持的参数：
    /// - `--width <value>` / `--height <value>`: 窗口尺寸
    /// - `--no-vsync`: 关闭垂直同步
    /// - `--state <path>`: 程序状态文件
    /// - `--scene <path>`: 场景配置文件
    pub fn apply_args<I>(&mut self, args: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        fn value_of<'a>(args: &'a [String], flag: &str) -> Option<&'a String> {
            args.iter()
                .position(|a| a == flag)
                .and_then(|idx| args.get(idx + 1))
        }

        if let Some(width) = value_of(&args, "--width").and_then(|v| v.parse().ok()) {
            self.window.width = width;
        }

        if let Some(height) = value_of(&args, "--height").and_then(|v| v.parse().ok()) {
            self.window.height = height;
        }

        if args.iter().any(|a| a == "--no-vsync") {
            self.graphics.vsync = false;
        }

        if let Some(path) = value_of(&args, "--state") {
            self.paths.state_file = PathBuf::from(path);
        }

        if let Some(path) = value_of(&args, "--scene") {
            self.paths.scene_file = PathBuf::from(path);
        }
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::InvalidValue {
                field: "window.width/height".to_string(),
                reason: "Window dimensions must be greater than 0".to_string(),
            }.into());
        }

        if !matches!(self.graphics.msaa_samples, 1 | 2 | 4 | 8 | 16) {
            return Err(ConfigError::InvalidValue {
                field: "graphics.msaa_samples".to_string(),
                reason: "MSAA samples must be 1, 2, 4, 8, or 16".to_string(),
            }.into());
        }

        if !self.graphics.shadow_map_size.is_power_of_two() || self.graphics.shadow_map_size > 8192 {
            return Err(ConfigError::InvalidValue {
                field: "graphics.shadow_map_size".to_string(),
                reason: "Shadow map size must be a power of two no larger than 8192".to_string(),
            }.into());
        }

        if self.input.move_speed <= 0.0 || self.input.mouse_sensitivity <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "input".to_string(),
                reason: "Move speed and mouse sensitivity must be positive".to_string(),
            }.into());
        }

        Ok(())
    }
}

impl PowerPreference {
    /// 转换为 wgpu 的适配器偏好
    pub fn to_wgpu(self) -> wgpu::PowerPreference {
        match self {
            PowerPreference::High => wgpu::PowerPreference::HighPerformance,
            PowerPreference::Low => wgpu::PowerPreference::LowPower,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.window.title, "LearnOpenGL");
        assert_eq!(config.paths.state_file, PathBuf::from("resources/program_state.txt"));
        assert_eq!(config.input.move_speed, 2.5);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.window.width = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.graphics.shadow_map_size = 1000;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.graphics.msaa_samples = 3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = Config::from_toml_str(
            r#"
            [window]
            width = 1280

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.window.width, 1280);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert!(config.graphics.vsync);
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let result = Config::from_toml_str("[window\nwidth = ");
        assert!(matches!(
            result,
            Err(crate::core::error::ViewerError::Config(ConfigError::ParseError(_)))
        ));
    }

    #[test]
    fn test_apply_args() {
        let mut config = Config::default();
        config.apply_args([
            "scene_viewer",
            "--width",
            "1024",
            "--height",
            "768",
            "--no-vsync",
            "--state",
            "/tmp/state.txt",
        ]);

        assert_eq!(config.window.width, 1024);
        assert_eq!(config.window.height, 768);
        assert!(!config.graphics.vsync);
        assert_eq!(config.paths.state_file, PathBuf::from("/tmp/state.txt"));
        assert_eq!(config.paths.scene_file, PathBuf::from("scene.toml"));
    }

    #[test]
    fn test_apply_args_ignores_bad_numbers() {
        let mut config = Config::default();
        config.apply_args(["scene_viewer", "--width", "wide"]);
        assert_eq!(config.window.width, 800);
    }

    #[test]
    fn test_save_and_reload() {
        let path = std::env::temp_dir().join("scene_viewer_config_roundtrip.toml");
        let mut config = Config::default();
        config.window.title = "Night Street".to_string();
        config.graphics.shadow_map_size = 2048;
        config.save_to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.window.title, "Night Street");
        assert_eq!(loaded.graphics.shadow_map_size, 2048);
        let _ = std::fs::remove_file(&path);
    }
}
