/// 模型加载器模块
///
/// 提供统一的模型加载接口。目前场景中的模型全部是 Wavefront OBJ。
///
/// # 使用示例
///
/// ```rust,no_run
/// use scene_viewer::geometry::loaders::load_mesh;
/// use std::path::Path;
///
/// let mesh = load_mesh(Path::new("resources/objects/backpack/backpack.obj"))?;
/// println!("{} triangles", mesh.triangle_count());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
use crate::core::error::{AssetError, Result};
use crate::geometry::mesh::MeshData;
use std::path::Path;

pub mod obj_loader;

pub use obj_loader::ObjLoader;

/// 网格加载器 trait
///
/// 加载器是无状态的，返回 CPU 侧的 `MeshData`，不涉及 GPU 资源。
pub trait MeshLoader {
    /// 从文件路径加载网格
    fn load_from_file(path: &Path) -> Result<MeshData>;

    /// 从内存数据加载网格
    fn load_from_memory(data: &[u8]) -> Result<MeshData>;

    /// 支持的文件扩展名列表（小写，不含点号）
    fn supported_extensions() -> &'static [&'static str];
}

/// 根据文件扩展名选择合适的加载器
pub fn load_mesh(path: &Path) -> Result<MeshData> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or_else(|| {
            AssetError::UnsupportedFormat(format!("no file extension: {}", path.display()))
        })?;

    if ObjLoader::supported_extensions().contains(&extension.as_str()) {
        ObjLoader::load_from_file(path)
    } else {
        Err(AssetError::UnsupportedFormat(format!("unsupported mesh format: .{}", extension)).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ViewerError;

    #[test]
    fn test_unknown_extension_is_rejected() {
        let result = load_mesh(Path::new("model.fbx"));
        assert!(matches!(
            result,
            Err(ViewerError::Asset(AssetError::UnsupportedFormat(_)))
        ));
    }

    #[test]
    fn test_missing_extension_is_rejected() {
        assert!(load_mesh(Path::new("model")).is_err());
    }

    #[test]
    fn test_extension_match_is_case_insensitive() {
        // 扩展名匹配后进入 OBJ 加载器，文件不存在
        let result = load_mesh(Path::new("missing_model.OBJ"));
        assert!(matches!(
            result,
            Err(ViewerError::Asset(AssetError::FileNotFound(_)))
        ));
    }
}
