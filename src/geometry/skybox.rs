/// 天空盒立方体
///
/// 36 个顶点（12 个三角形）的单位立方体，边长为 2，中心在原点。
/// 从内部观察时为逆时针绕序。

use super::vertex::PositionVertex;

#[rustfmt::skip]
const SKYBOX_POSITIONS: [[f32; 3]; 36] = [
    // -Z
    [-1.0,  1.0, -1.0], [-1.0, -1.0, -1.0], [ 1.0, -1.0, -1.0],
    [ 1.0, -1.0, -1.0], [ 1.0,  1.0, -1.0], [-1.0,  1.0, -1.0],
    // -X
    [-1.0, -1.0,  1.0], [-1.0, -1.0, -1.0], [-1.0,  1.0, -1.0],
    [-1.0,  1.0, -1.0], [-1.0,  1.0,  1.0], [-1.0, -1.0,  1.0],
    // +X
    [ 1.0, -1.0, -1.0], [ 1.0, -1.0,  1.0], [ 1.0,  1.0,  1.0],
    [ 1.0,  1.0,  1.0], [ 1.0,  1.0, -1.0], [ 1.0, -1.0, -1.0],
    // +Z
    [-1.0, -1.0,  1.0], [-1.0,  1.0,  1.0], [ 1.0,  1.0,  1.0],
    [ 1.0,  1.0,  1.0], [ 1.0, -1.0,  1.0], [-1.0, -1.0,  1.0],
    // +Y
    [-1.0,  1.0, -1.0], [ 1.0,  1.0, -1.0], [ 1.0,  1.0,  1.0],
    [ 1.0,  1.0,  1.0], [-1.0,  1.0,  1.0], [-1.0,  1.0, -1.0],
    // -Y
    [-1.0, -1.0, -1.0], [-1.0, -1.0,  1.0], [ 1.0, -1.0, -1.0],
    [ 1.0, -1.0, -1.0], [-1.0, -1.0,  1.0], [ 1.0, -1.0,  1.0],
];

/// 天空盒顶点
pub fn skybox_vertices() -> Vec<PositionVertex> {
    SKYBOX_POSITIONS
        .iter()
        .map(|&position| PositionVertex { position })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vector3;

    #[test]
    fn test_skybox_is_closed_cube() {
        let vertices = skybox_vertices();
        assert_eq!(vertices.len(), 36);
        assert!(vertices
            .iter()
            .all(|v| v.position.iter().all(|c| c.abs() == 1.0)));
    }

    #[test]
    fn test_faces_point_inward() {
        // 每个三角形的法线都指向立方体中心
        for tri in skybox_vertices().chunks_exact(3) {
            let p0 = Vector3::from(tri[0].position);
            let p1 = Vector3::from(tri[1].position);
            let p2 = Vector3::from(tri[2].position);
            let normal = (p1 - p0).cross(&(p2 - p0));
            let centroid = (p0 + p1 + p2) / 3.0;
            assert!(normal.dot(&centroid) < 0.0, "{:?}", tri);
        }
    }
}
