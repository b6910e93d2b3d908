//! 图形后端模块
//!
//! 基于 wgpu 的设备初始化与纹理资源。wgpu 会在 Vulkan、Metal、DX12 或 OpenGL 中选择可用的后端。

pub mod backend;
pub mod texture;

pub use backend::WgpuBackend;
pub use texture::{DepthCubeTexture, Texture, TextureCache, TextureKind, DEPTH_FORMAT, HDR_FORMAT};
