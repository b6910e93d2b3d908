//! 几何数学工具模块
//!
//! 网格后处理用到的数学函数。

use super::Vector3;
use crate::geometry::vertex::Vertex;

/// 从三角形面重建顶点法线
///
/// 每个面的法线（未归一化，按面积加权）累加到它的三个顶点上，最后统一归一化。
/// 越界的索引所在的三角形会被跳过。
///
/// # 示例
///
/// ```rust
/// use scene_viewer::math::geometry::reconstruct_normals;
/// use scene_viewer::geometry::vertex::Vertex;
///
/// let mut vertices = vec![
///     Vertex::new([0.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0]),
///     Vertex::new([1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [1.0, 0.0]),
///     Vertex::new([0.0, 1.0, 0.0], [0.0, 0.0, 0.0], [0.0, 1.0]),
/// ];
/// reconstruct_normals(&mut vertices, &[0, 1, 2]);
/// assert_eq!(vertices[0].normal, [0.0, 0.0, 1.0]);
/// ```
pub fn reconstruct_normals(vertices: &mut [Vertex], indices: &[u32]) {
    let mut accumulated = vec![Vector3::zeros(); vertices.len()];

    for triangle in indices.chunks_exact(3) {
        let [i0, i1, i2] = [triangle[0] as usize, triangle[1] as usize, triangle[2] as usize];
        if i0 >= vertices.len() || i1 >= vertices.len() || i2 >= vertices.len() {
            continue;
        }

        let p0 = Vector3::from(vertices[i0].position);
        let p1 = Vector3::from(vertices[i1].position);
        let p2 = Vector3::from(vertices[i2].position);

        let face_normal = (p1 - p0).cross(&(p2 - p0));

        accumulated[i0] += face_normal;
        accumulated[i1] += face_normal;
        accumulated[i2] += face_normal;
    }

    for (vertex, normal) in vertices.iter_mut().zip(accumulated) {
        vertex.normal = normal
            .try_normalize(1e-12)
            .map(Into::into)
            .unwrap_or([0.0, 0.0, 0.0]);
    }
}

/// 计算顶点的包围球半径（以原点为中心）
pub fn bounding_radius(vertices: &[Vertex]) -> f32 {
    vertices
        .iter()
        .map(|v| Vector3::from(v.position).norm())
        .fold(0.0, f32::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconstruct_normals_simple_triangle() {
        // XZ 平面上的三角形
        let mut vertices = vec![
            Vertex::new([0.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0]),
            Vertex::new([1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [1.0, 0.0]),
            Vertex::new([0.0, 0.0, 1.0], [0.0, 0.0, 0.0], [0.0, 1.0]),
        ];

        reconstruct_normals(&mut vertices, &[0, 1, 2]);

        // 逆时针绕序 (x, z) 得到 -Y
        for vertex in &vertices {
            assert!((vertex.normal[1] + 1.0).abs() < 1e-6, "{:?}", vertex.normal);
        }
    }

    #[test]
    fn test_shared_vertex_averages_faces() {
        // 两个互相垂直的面共享顶点 0 和 1
        let mut vertices = vec![
            Vertex::new([0.0, 0.0, 0.0], [0.0; 3], [0.0; 2]),
            Vertex::new([1.0, 0.0, 0.0], [0.0; 3], [0.0; 2]),
            Vertex::new([0.0, 1.0, 0.0], [0.0; 3], [0.0; 2]),
            Vertex::new([0.0, 0.0, -1.0], [0.0; 3], [0.0; 2]),
        ];

        reconstruct_normals(&mut vertices, &[0, 1, 2, 0, 1, 3]);

        let n = vertices[0].normal;
        let expected = 1.0 / 2.0_f32.sqrt();
        assert!((n[1] - expected).abs() < 1e-5, "{:?}", n);
        assert!((n[2] - expected).abs() < 1e-5, "{:?}", n);
        assert_eq!(vertices[2].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_out_of_range_triangle_is_skipped() {
        let mut vertices = vec![Vertex::default(); 3];
        reconstruct_normals(&mut vertices, &[0, 1, 7]);
        assert!(vertices.iter().all(|v| v.normal == [0.0, 0.0, 0.0]));
    }

    #[test]
    fn test_bounding_radius() {
        let vertices = vec![
            Vertex::new([3.0, 4.0, 0.0], [0.0; 3], [0.0; 2]),
            Vertex::new([1.0, 0.0, 0.0], [0.0; 3], [0.0; 2]),
        ];
        assert!((bounding_radius(&vertices) - 5.0).abs() < 1e-6);
        assert_eq!(bounding_radius(&[]), 0.0);
    }
}
