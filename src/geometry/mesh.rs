/// 网格数据结构模块
///
/// CPU 侧的网格数据容器，保存从文件加载的原始几何与材质信息。

use std::path::PathBuf;

use super::vertex::Vertex;

/// 子网格描述符
///
/// 一个子网格对应 OBJ 中的一个对象，使用同一个材质绘制。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subset {
    /// 子网格ID
    pub id: u32,

    /// 起始顶点索引
    pub vertex_start: u32,

    /// 顶点数量
    pub vertex_count: u32,

    /// 起始面索引（以三角形为单位）
    pub face_start: u32,

    /// 面数量（三角形数量）
    pub face_count: u32,

    /// 材质索引（指向 `MeshData::materials`）
    pub material: Option<usize>,
}

impl Subset {
    /// 创建一个新的子网格描述符
    #[inline]
    pub fn new(
        id: u32,
        vertex_start: u32,
        vertex_count: u32,
        face_start: u32,
        face_count: u32,
    ) -> Self {
        Self {
            id,
            vertex_start,
            vertex_count,
            face_start,
            face_count,
            material: None,
        }
    }

    /// 指定材质
    pub fn with_material(mut self, material: Option<usize>) -> Self {
        self.material = material;
        self
    }

    /// 索引起始位置（以索引数量计）
    #[inline]
    pub fn index_start(&self) -> u32 {
        self.face_start * 3
    }

    /// 索引数量
    #[inline]
    pub fn index_count(&self) -> u32 {
        self.face_count * 3
    }
}

/// 材质数据
///
/// 只保留光照着色器需要的两张贴图，路径已相对 OBJ 所在目录解析。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialData {
    pub name: String,
    pub diffuse_texture: Option<PathBuf>,
    pub specular_texture: Option<PathBuf>,
}

/// CPU侧网格数据
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// 顶点数组
    pub vertices: Vec<Vertex>,

    /// 索引数组，每3个索引定义一个三角形
    pub indices: Vec<u32>,

    /// 子网格列表
    pub subsets: Vec<Subset>,

    /// 材质列表
    pub materials: Vec<MaterialData>,

    /// 网格名称（可选）
    pub name: Option<String>,
}

impl MeshData {
    /// 创建一个空的网格数据
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建一个指定名称的空网格数据
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// 获取顶点数量
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// 获取索引数量
    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// 获取三角形数量
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// 子网格使用的材质
    pub fn material_of(&self, subset: &Subset) -> Option<&MaterialData> {
        subset.material.and_then(|index| self.materials.get(index))
    }

    /// 验证网格数据的有效性
    ///
    /// 检查：
    /// - 索引数量是3的倍数
    /// - 所有索引都在有效范围内
    /// - 子网格描述符的范围有效
    pub fn validate(&self) -> Result<(), String> {
        if self.indices.len() % 3 != 0 {
            return Err(format!(
                "index count must be a multiple of 3, got {}",
                self.indices.len()
            ));
        }

        let vertex_count = self.vertices.len() as u32;
        if let Some((i, &index)) = self
            .indices
            .iter()
            .enumerate()
            .find(|&(_, &index)| index >= vertex_count)
        {
            return Err(format!(
                "index {} at position {} is out of range (vertex count {})",
                index, i, vertex_count
            ));
        }

        let triangle_count = self.triangle_count() as u32;
        for (i, subset) in self.subsets.iter().enumerate() {
            if subset.vertex_start + subset.vertex_count > vertex_count {
                return Err(format!(
                    "subset {} vertex range out of bounds: start={}, count={}, total={}",
                    i, subset.vertex_start, subset.vertex_count, vertex_count
                ));
            }

            if subset.face_start + subset.face_count > triangle_count {
                return Err(format!(
                    "subset {} face range out of bounds: start={}, count={}, total={}",
                    i, subset.face_start, subset.face_count, triangle_count
                ));
            }

            if let Some(material) = subset.material {
                if material >= self.materials.len() {
                    return Err(format!(
                        "subset {} refers to material {} but only {} are loaded",
                        i,
                        material,
                        self.materials.len()
                    ));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> MeshData {
        let mut mesh = MeshData::with_name("Triangle");
        mesh.vertices = vec![Vertex::default(); 3];
        mesh.indices = vec![0, 1, 2];
        mesh.subsets.push(Subset::new(0, 0, 3, 0, 1));
        mesh
    }

    #[test]
    fn test_subset_index_helpers() {
        let subset = Subset::new(0, 0, 100, 10, 20);

        assert_eq!(subset.index_start(), 30);
        assert_eq!(subset.index_count(), 60);
        assert_eq!(subset.material, None);
    }

    #[test]
    fn test_mesh_data_counts() {
        let mesh = triangle();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.index_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_index_count() {
        let mut mesh = triangle();
        mesh.indices.pop();
        assert!(mesh.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_index_range() {
        let mut mesh = triangle();
        mesh.indices[2] = 5;
        let err = mesh.validate().unwrap_err();
        assert!(err.contains("out of range"));
    }

    #[test]
    fn test_material_lookup() {
        let mut mesh = triangle();
        mesh.subsets[0] = Subset::new(0, 0, 3, 0, 1).with_material(Some(0));
        assert!(mesh.validate().is_err());

        mesh.materials.push(MaterialData {
            name: "wood".into(),
            diffuse_texture: Some(PathBuf::from("wood.png")),
            specular_texture: None,
        });
        assert!(mesh.validate().is_ok());
        assert_eq!(mesh.material_of(&mesh.subsets[0]).map(|m| m.name.as_str()), Some("wood"));
    }
}
