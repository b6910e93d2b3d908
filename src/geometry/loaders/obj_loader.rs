/// OBJ 文件加载器
///
/// 使用 tobj crate 加载 Wavefront OBJ 模型及其 MTL 材质。
use super::MeshLoader;
use crate::core::error::{AssetError, Result};
use crate::geometry::mesh::{MaterialData, MeshData, Subset};
use crate::geometry::vertex::Vertex;
use crate::math::geometry::{bounding_radius, reconstruct_normals};
use std::io::{BufReader, Cursor};
use std::path::Path;

/// OBJ 格式加载器
///
/// # 特性
///
/// - 自动三角化，单一索引
/// - UV 坐标翻转（V轴：1.0 - v）
/// - 缺失法线时从面重建
/// - 读取 MTL 中的漫反射与高光贴图路径
pub struct ObjLoader;

impl ObjLoader {
    fn load_options() -> tobj::LoadOptions {
        tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        }
    }

    /// 把 tobj 的结果整理为 `MeshData`
    ///
    /// `base_dir` 用来解析材质中的相对贴图路径。
    fn build_mesh(
        name: &str,
        models: Vec<tobj::Model>,
        materials: Vec<tobj::Material>,
        base_dir: &Path,
    ) -> Result<MeshData> {
        if models.is_empty() {
            return Err(AssetError::ValidationError("OBJ file contains no objects".to_string()).into());
        }

        let mut mesh_data = MeshData::with_name(name);
        mesh_data.materials = materials
            .into_iter()
            .map(|material| MaterialData {
                diffuse_texture: material.diffuse_texture.map(|t| base_dir.join(t)),
                specular_texture: material.specular_texture.map(|t| base_dir.join(t)),
                name: material.name,
            })
            .collect();

        for (mesh_idx, model) in models.iter().enumerate() {
            let mesh = &model.mesh;
            let positions = &mesh.positions;
            let normals = &mesh.normals;
            let texcoords = &mesh.texcoords;

            if positions.len() % 3 != 0 {
                return Err(AssetError::ValidationError(format!(
                    "object '{}' has incomplete position data: {} floats",
                    model.name,
                    positions.len()
                ))
                .into());
            }

            let vertex_start = mesh_data.vertices.len() as u32;
            let face_start = mesh_data.triangle_count() as u32;
            let vertex_count = positions.len() / 3;

            let mut vertices = Vec::with_capacity(vertex_count);
            for i in 0..vertex_count {
                let position = [positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2]];

                let normal = if normals.len() >= (i + 1) * 3 {
                    [normals[i * 3], normals[i * 3 + 1], normals[i * 3 + 2]]
                } else {
                    [0.0, 0.0, 0.0]
                };

                let texcoord = if texcoords.len() >= (i + 1) * 2 {
                    [texcoords[i * 2], 1.0 - texcoords[i * 2 + 1]]
                } else {
                    [0.0, 0.0]
                };

                vertices.push(Vertex::new(position, normal, texcoord));
            }

            // 只重建缺法线的对象，其它对象保留文件中的法线
            if normals.len() < positions.len() {
                tracing::debug!(mesh = name, object = %model.name, "Object has no normals, reconstructing from faces");
                reconstruct_normals(&mut vertices, &mesh.indices);
            }
            mesh_data.vertices.extend(vertices);

            mesh_data
                .indices
                .extend(mesh.indices.iter().map(|&index| vertex_start + index));

            let material = mesh
                .material_id
                .filter(|&id| id < mesh_data.materials.len());
            mesh_data.subsets.push(
                Subset::new(
                    mesh_idx as u32,
                    vertex_start,
                    vertex_count as u32,
                    face_start,
                    (mesh.indices.len() / 3) as u32,
                )
                .with_material(material),
            );
        }

        mesh_data.validate().map_err(AssetError::ValidationError)?;

        tracing::info!(
            mesh = name,
            vertices = mesh_data.vertex_count(),
            triangles = mesh_data.triangle_count(),
            subsets = mesh_data.subsets.len(),
            materials = mesh_data.materials.len(),
            radius = bounding_radius(&mesh_data.vertices),
            "Loaded OBJ"
        );

        Ok(mesh_data)
    }
}

impl MeshLoader for ObjLoader {
    fn load_from_file(path: &Path) -> Result<MeshData> {
        if !path.exists() {
            return Err(AssetError::FileNotFound(path.to_path_buf()).into());
        }

        let (models, materials) = tobj::load_obj(path, &Self::load_options())
            .map_err(|e| AssetError::ParseError(format!("{}: {}", path.display(), e)))?;

        let materials = materials.unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), "Failed to load MTL: {}, using placeholder textures", e);
            Vec::new()
        });

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Unnamed");
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

        Self::build_mesh(name, models, materials, base_dir)
    }

    /// 内存中的 OBJ 不会加载 MTL 文件
    fn load_from_memory(data: &[u8]) -> Result<MeshData> {
        let mut reader = BufReader::new(Cursor::new(data));
        let (models, _) = tobj::load_obj_buf(&mut reader, &Self::load_options(), |_| {
            Err(tobj::LoadError::OpenFileFailed)
        })
        .map_err(|e| AssetError::ParseError(e.to_string()))?;

        Self::build_mesh("memory", models, Vec::new(), Path::new("."))
    }

    fn supported_extensions() -> &'static [&'static str] {
        &["obj"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD_OBJ: &str = "\
o quad
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 1.0 1.0
vt 0.0 1.0
f 1/1 2/2 3/3 4/4
";

    #[test]
    fn test_supported_extensions() {
        assert_eq!(ObjLoader::supported_extensions(), &["obj"]);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ObjLoader::load_from_file(Path::new("nonexistent.obj"));
        assert!(result.is_err());
    }

    #[test]
    fn test_quad_is_triangulated() {
        let mesh = ObjLoader::load_from_memory(QUAD_OBJ.as_bytes()).unwrap();

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.subsets.len(), 1);
        assert_eq!(mesh.subsets[0].material, None);
    }

    #[test]
    fn test_texcoords_are_flipped() {
        let mesh = ObjLoader::load_from_memory(QUAD_OBJ.as_bytes()).unwrap();

        let origin = mesh
            .vertices
            .iter()
            .find(|v| v.position == [0.0, 0.0, 0.0])
            .unwrap();
        assert_eq!(origin.texcoord, [0.0, 1.0]);
    }

    #[test]
    fn test_missing_normals_are_reconstructed() {
        let mesh = ObjLoader::load_from_memory(QUAD_OBJ.as_bytes()).unwrap();

        for vertex in &mesh.vertices {
            assert!((vertex.normal[2] - 1.0).abs() < 1e-5, "{:?}", vertex.normal);
        }
    }

    #[test]
    fn test_file_normals_are_kept() {
        let obj = "\
v 0 0 0
v 1 0 0
v 0 1 0
vn 1 0 0
f 1//1 2//1 3//1
";
        let mesh = ObjLoader::load_from_memory(obj.as_bytes()).unwrap();
        assert!(mesh.vertices.iter().all(|v| v.normal == [1.0, 0.0, 0.0]));
    }

    #[test]
    fn test_reconstruction_leaves_other_objects_alone() {
        let obj = "\
o lit
v 0 0 0
v 1 0 0
v 0 1 0
vn 1 0 0
f 1//1 2//1 3//1
o bare
v 0 0 1
v 1 0 1
v 0 1 1
f 4 5 6
";
        let mesh = ObjLoader::load_from_memory(obj.as_bytes()).unwrap();
        assert_eq!(mesh.subsets.len(), 2);

        let range = |subset: &Subset| {
            let start = subset.vertex_start as usize;
            start..start + subset.vertex_count as usize
        };

        let lit = &mesh.vertices[range(&mesh.subsets[0])];
        assert_eq!(lit.len(), 3);
        assert!(lit.iter().all(|v| v.normal == [1.0, 0.0, 0.0]), "{:?}", lit);

        let bare = &mesh.vertices[range(&mesh.subsets[1])];
        assert_eq!(bare.len(), 3);
        for vertex in bare {
            assert!((vertex.normal[2] - 1.0).abs() < 1e-5, "{:?}", vertex.normal);
        }
    }

    #[test]
    fn test_materials_resolve_relative_to_obj() {
        let dir = std::env::temp_dir().join("scene_viewer_obj_material_test");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("box.mtl"),
            "newmtl wood\nmap_Kd wood_diffuse.png\nmap_Ks wood_specular.png\n",
        )
        .unwrap();
        std::fs::write(
            dir.join("box.obj"),
            "mtllib box.mtl\nv 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl wood\nf 1 2 3\n",
        )
        .unwrap();

        let mesh = ObjLoader::load_from_file(&dir.join("box.obj")).unwrap();
        let material = mesh.material_of(&mesh.subsets[0]).unwrap();
        assert_eq!(material.name, "wood");
        assert_eq!(material.diffuse_texture.as_deref(), Some(dir.join("wood_diffuse.png").as_path()));
        assert_eq!(material.specular_texture.as_deref(), Some(dir.join("wood_specular.png").as_path()));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
