/// 几何体加载和处理模块
///
/// # 模块结构
///
/// - `vertex`: 顶点数据结构定义
/// - `mesh`: 网格、子网格与材质数据
/// - `skybox`: 天空盒立方体顶点
/// - `loaders`: 模型加载器
///
/// ```text
/// 文件 (OBJ + MTL)
///     ↓
/// ObjLoader
///     ↓
/// MeshData (CPU侧数据)
///     ↓
/// Renderer (上传到GPU)
/// ```

pub mod vertex;
pub mod mesh;
pub mod skybox;
pub mod loaders;

pub use vertex::{PositionVertex, Vertex};
pub use mesh::{MaterialData, MeshData, Subset};
