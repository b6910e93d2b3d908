//! 错误处理模块
//!
//! 定义了查看器中使用的统一错误类型。
//!
//! # 设计原则
//!
//! - 手写 `Display` 与 `Error` 实现，保持依赖精简
//! - 为每种错误类型提供清晰的上下文信息
//! - 通过 `From` 实现支持 `?` 运算符自动转换

use std::fmt;
use std::path::PathBuf;

/// 查看器统一的 Result 类型
pub type Result<T> = std::result::Result<T, ViewerError>;

/// 查看器的错误类型
#[derive(Debug)]
pub enum ViewerError {
    /// 配置错误
    Config(ConfigError),

    /// 图形 API 错误
    Graphics(GraphicsError),

    /// 资源（模型、纹理）加载错误
    Asset(AssetError),

    /// 状态文件错误
    State(StateError),

    /// IO 错误
    Io(std::io::Error),

    /// 初始化错误
    Initialization(String),
}

/// 配置相关的错误
#[derive(Debug)]
pub enum ConfigError {
    /// 配置文件未找到
    FileNotFound(String),

    /// 配置文件解析失败
    ParseError(String),

    /// 配置值无效
    InvalidValue { field: String, reason: String },
}

/// 图形 API 相关的错误
#[derive(Debug)]
pub enum GraphicsError {
    /// 窗口或设备创建失败
    DeviceCreation(String),

    /// 交换链错误
    SwapchainError(String),
}

/// 资源加载相关的错误
#[derive(Debug)]
pub enum AssetError {
    /// 文件不存在
    FileNotFound(PathBuf),

    /// 不支持的文件格式
    UnsupportedFormat(String),

    /// 解析失败
    ParseError(String),

    /// 数据验证失败
    ValidationError(String),

    /// 图像解码失败
    ImageDecode { path: PathBuf, reason: String },
}

/// 状态文件相关的错误
#[derive(Debug)]
pub enum StateError {
    /// 字段无法解析为数值
    InvalidField { index: usize, name: &'static str, value: String },

    /// 字段数量不足
    MissingField { index: usize, name: &'static str },
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewerError::Config(e) => write!(f, "Configuration error: {}", e),
            ViewerError::Graphics(e) => write!(f, "Graphics error: {}", e),
            ViewerError::Asset(e) => write!(f, "Asset error: {}", e),
            ViewerError::State(e) => write!(f, "State file error: {}", e),
            ViewerError::Io(e) => write!(f, "IO error: {}", e),
            ViewerError::Initialization(msg) => write!(f, "Initialization error: {}", msg),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {}", path),
            ConfigError::ParseError(msg) => write!(f, "Failed to parse config: {}", msg),
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl fmt::Display for GraphicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphicsError::DeviceCreation(msg) => write!(f, "Device creation failed: {}", msg),
            GraphicsError::SwapchainError(msg) => write!(f, "Swapchain error: {}", msg),
        }
    }
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::FileNotFound(path) => write!(f, "Asset file not found: {}", path.display()),
            AssetError::UnsupportedFormat(msg) => write!(f, "Unsupported asset format: {}", msg),
            AssetError::ParseError(msg) => write!(f, "Failed to parse asset: {}", msg),
            AssetError::ValidationError(msg) => write!(f, "Asset validation failed: {}", msg),
            AssetError::ImageDecode { path, reason } => {
                write!(f, "Failed to decode image '{}': {}", path.display(), reason)
            }
        }
    }
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::InvalidField { index, name, value } => {
                write!(f, "Field {} ({}) is not a number: '{}'", index, name, value)
            }
            StateError::MissingField { index, name } => {
                write!(f, "Field {} ({}) is missing", index, name)
            }
        }
    }
}

impl std::error::Error for ViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViewerError::Io(e) => Some(e),
            ViewerError::Config(e) => Some(e),
            ViewerError::Graphics(e) => Some(e),
            ViewerError::Asset(e) => Some(e),
            ViewerError::State(e) => Some(e),
            ViewerError::Initialization(_) => None,
        }
    }
}

impl std::error::Error for ConfigError {}
impl std::error::Error for GraphicsError {}
impl std::error::Error for AssetError {}
impl std::error::Error for StateError {}

impl From<std::io::Error> for ViewerError {
    fn from(err: std::io::Error) -> Self {
        ViewerError::Io(err)
    }
}

impl From<ConfigError> for ViewerError {
    fn from(err: ConfigError) -> Self {
        ViewerError::Config(err)
    }
}

impl From<GraphicsError> for ViewerError {
    fn from(err: GraphicsError) -> Self {
        ViewerError::Graphics(err)
    }
}

impl From<AssetError> for ViewerError {
    fn from(err: AssetError) -> Self {
        ViewerError::Asset(err)
    }
}

impl From<StateError> for ViewerError {
    fn from(err: StateError) -> Self {
        ViewerError::State(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_includes_context() {
        let err: ViewerError = ConfigError::InvalidValue {
            field: "window.width".to_string(),
            reason: "must be greater than 0".to_string(),
        }
        .into();
        let text = err.to_string();
        assert!(text.starts_with("Configuration error"));
        assert!(text.contains("window.width"));
    }

    #[test]
    fn test_state_error_names_field() {
        let err = StateError::InvalidField { index: 4, name: "camera.position.x", value: "abc".into() };
        assert_eq!(err.to_string(), "Field 4 (camera.position.x) is not a number: 'abc'");
    }

    #[test]
    fn test_io_error_has_source() {
        use std::error::Error;
        let err = ViewerError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(err.source().is_some());
    }
}
