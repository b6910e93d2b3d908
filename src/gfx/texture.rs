//! 纹理资源
//!
//! 图像纹理（漫反射 / 镜面贴图）、天空盒立方体贴图以及渲染目标（深度、HDR、阴影立方体）。
//!
//! 图像加载失败时不会中断程序：2D 纹理退化为 1×1 占位纹理，
//! 立方体贴图中缺失的面以黑色填充。

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::{imageops::FilterType, Rgba, RgbaImage};
use tracing::{debug, warn};

use crate::core::error::{AssetError, Result};

/// 主深度缓冲格式
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// HDR 场景颜色格式
pub const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

/// 材质贴图类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    /// 漫反射贴图（sRGB）
    Diffuse,
    /// 镜面贴图（线性）
    Specular,
}

impl TextureKind {
    /// 加载失败时使用的颜色：漫反射为白色，镜面为黑色（无高光）
    pub fn placeholder_color(self) -> [u8; 4] {
        match self {
            TextureKind::Diffuse => [255, 255, 255, 255],
            TextureKind::Specular => [0, 0, 0, 255],
        }
    }

    pub fn format(self) -> wgpu::TextureFormat {
        match self {
            TextureKind::Diffuse => wgpu::TextureFormat::Rgba8UnormSrgb,
            TextureKind::Specular => wgpu::TextureFormat::Rgba8Unorm,
        }
    }
}

/// GPU 纹理及其默认视图
pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl Texture {
    /// 从 RGBA8 图像创建 2D 纹理
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &RgbaImage,
        format: wgpu::TextureFormat,
        label: &str,
    ) -> Self {
        let (width, height) = image.dimensions();
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        write_layer(queue, &texture, image, 0);

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }

    /// 从文件加载 2D 纹理
    pub fn load(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: &Path,
        kind: TextureKind,
    ) -> Result<Self> {
        let image = decode_rgba(path)?;
        debug!(path = %path.display(), width = image.width(), height = image.height(), "Texture loaded");
        Ok(Self::from_image(device, queue, &image, kind.format(), &path.to_string_lossy()))
    }

    /// 1×1 纯色占位纹理
    pub fn placeholder(device: &wgpu::Device, queue: &wgpu::Queue, kind: TextureKind) -> Self {
        let image = RgbaImage::from_pixel(1, 1, Rgba(kind.placeholder_color()));
        let label = match kind {
            TextureKind::Diffuse => "Placeholder Diffuse",
            TextureKind::Specular => "Placeholder Specular",
        };
        Self::from_image(device, queue, &image, kind.format(), label)
    }

    /// 加载纹理，失败时记录警告并返回占位纹理
    pub fn load_or_placeholder(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: &Path,
        kind: TextureKind,
    ) -> Self {
        match Self::load(device, queue, path, kind) {
            Ok(texture) => texture,
            Err(e) => {
                warn!("Texture failed to load, using placeholder: {}", e);
                Self::placeholder(device, queue, kind)
            }
        }
    }

    /// 加载天空盒立方体贴图
    ///
    /// `faces` 顺序为 +X, -X, +Y, -Y, +Z, -Z。
    pub fn load_cube(device: &wgpu::Device, queue: &wgpu::Queue, faces: &[PathBuf]) -> Self {
        let decoded: Vec<Option<RgbaImage>> = faces
            .iter()
            .map(|path| match decode_rgba(path) {
                Ok(image) => Some(image),
                Err(e) => {
                    warn!("Cubemap face failed to load, filling with black: {}", e);
                    None
                }
            })
            .collect();

        let (size, images) = normalize_cube_faces(decoded);
        debug!(size, "Cubemap assembled");

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Skybox Cubemap"),
            size: wgpu::Extent3d { width: size, height: size, depth_or_array_layers: 6 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        for (layer, image) in images.iter().enumerate() {
            write_layer(queue, &texture, image, layer as u32);
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("Skybox Cubemap View"),
            dimension: Some(wgpu::TextureViewDimension::Cube),
            array_layer_count: Some(6),
            ..Default::default()
        });
        Self { texture, view }
    }

    /// 屏幕尺寸的深度缓冲
    pub fn depth(device: &wgpu::Device, width: u32, height: u32) -> Self {
        Self::render_target(device, width, height, DEPTH_FORMAT, "Depth Texture")
    }

    /// 可采样的渲染目标
    pub fn render_target(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
        label: &str,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }
}

/// 点光源阴影用的深度立方体贴图
pub struct DepthCubeTexture {
    pub texture: wgpu::Texture,
    /// 采样用的立方体视图
    pub cube_view: wgpu::TextureView,
    /// 每个面一个渲染视图
    pub face_views: Vec<wgpu::TextureView>,
    pub size: u32,
}

impl DepthCubeTexture {
    pub fn new(device: &wgpu::Device, size: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Shadow Cubemap"),
            size: wgpu::Extent3d { width: size, height: size, depth_or_array_layers: 6 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });

        let cube_view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("Shadow Cubemap View"),
            dimension: Some(wgpu::TextureViewDimension::Cube),
            array_layer_count: Some(6),
            ..Default::default()
        });

        let face_views = (0..6)
            .map(|face| {
                texture.create_view(&wgpu::TextureViewDescriptor {
                    label: Some("Shadow Cubemap Face"),
                    dimension: Some(wgpu::TextureViewDimension::D2),
                    base_array_layer: face,
                    array_layer_count: Some(1),
                    ..Default::default()
                })
            })
            .collect();

        Self { texture, cube_view, face_views, size }
    }
}

/// 按路径缓存的材质纹理
///
/// 同一张图片被多个材质引用时只上传一次。
#[derive(Default)]
pub struct TextureCache {
    entries: HashMap<(PathBuf, TextureKind), Texture>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 未缓存时加载纹理（失败时缓存占位纹理）
    pub fn load(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: &Path,
        kind: TextureKind,
    ) {
        self.entries
            .entry((path.to_path_buf(), kind))
            .or_insert_with(|| Texture::load_or_placeholder(device, queue, path, kind));
    }

    pub fn get(&self, path: &Path, kind: TextureKind) -> Option<&Texture> {
        self.entries.get(&(path.to_path_buf(), kind))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn decode_rgba(path: &Path) -> Result<RgbaImage> {
    if !path.exists() {
        return Err(AssetError::FileNotFound(path.to_path_buf()).into());
    }
    let image = image::open(path).map_err(|e| AssetError::ImageDecode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(image.to_rgba8())
}

fn write_layer(queue: &wgpu::Queue, texture: &wgpu::Texture, image: &RgbaImage, layer: u32) {
    let (width, height) = image.dimensions();
    queue.write_texture(
        wgpu::ImageCopyTexture {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d { x: 0, y: 0, z: layer },
            aspect: wgpu::TextureAspect::All,
        },
        image.as_raw(),
        wgpu::ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
    );
}

/// 把六个面统一为相同的正方形尺寸
///
/// 尺寸取第一个成功加载的面的宽度；尺寸不符的面被缩放，缺失的面填充黑色。
/// 全部缺失时返回 1×1 的黑色面。
pub fn normalize_cube_faces(faces: Vec<Option<RgbaImage>>) -> (u32, Vec<RgbaImage>) {
    let size = faces
        .iter()
        .flatten()
        .map(|image| image.width())
        .next()
        .unwrap_or(1)
        .max(1);

    let black = Rgba([0, 0, 0, 255]);
    let mut images: Vec<RgbaImage> = faces
        .into_iter()
        .take(6)
        .map(|face| match face {
            Some(image) if image.dimensions() == (size, size) => image,
            Some(image) => image::imageops::resize(&image, size, size, FilterType::Triangle),
            None => RgbaImage::from_pixel(size, size, black),
        })
        .collect();

    while images.len() < 6 {
        images.push(RgbaImage::from_pixel(size, size, black));
    }

    (size, images)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_colors() {
        assert_eq!(TextureKind::Diffuse.placeholder_color(), [255, 255, 255, 255]);
        assert_eq!(TextureKind::Specular.placeholder_color(), [0, 0, 0, 255]);
        assert!(TextureKind::Diffuse.format().is_srgb());
        assert!(!TextureKind::Specular.format().is_srgb());
    }

    #[test]
    fn test_cube_faces_fill_missing_with_black() {
        let red = RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255]));
        let faces = vec![None, Some(red), None, None, None, None];

        let (size, images) = normalize_cube_faces(faces);
        assert_eq!(size, 4);
        assert_eq!(images.len(), 6);
        assert_eq!(images[0].get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
        assert_eq!(images[1].get_pixel(3, 3), &Rgba([255, 0, 0, 255]));
        assert!(images.iter().all(|image| image.dimensions() == (4, 4)));
    }

    #[test]
    fn test_cube_faces_are_resized() {
        let big = RgbaImage::from_pixel(8, 8, Rgba([0, 255, 0, 255]));
        let small = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 255, 255]));
        let (size, images) = normalize_cube_faces(vec![Some(big), Some(small)]);

        assert_eq!(size, 8);
        assert_eq!(images.len(), 6);
        assert_eq!(images[1].dimensions(), (8, 8));
        assert_eq!(images[1].get_pixel(4, 4), &Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_all_faces_missing() {
        let (size, images) = normalize_cube_faces(vec![None; 6]);
        assert_eq!(size, 1);
        assert!(images.iter().all(|image| image.dimensions() == (1, 1)));
    }

    #[test]
    fn test_decode_missing_file() {
        let err = decode_rgba(Path::new("definitely/not/here.png")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
