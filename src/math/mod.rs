//! 数学库模块
//!
//! 基于 `nalgebra`，提供简洁的类型别名与矩阵辅助函数。
//!
//! # 模块组织
//!
//! - **基础类型**：Vector2/3/4, Matrix3/4, Point3
//! - **工具函数**：deg_to_rad, approx_eq 等
//! - **矩阵辅助函数**：平移、缩放、旋转、透视投影、look-at
//! - **几何处理**：法线重建、切线空间计算（见 geometry 子模块）

pub use nalgebra::{
    Matrix3 as Mat3, Matrix4 as Mat4, Point3 as Pt3, Vector2 as Vec2, Vector3 as Vec3,
    Vector4 as Vec4,
};

// 类型别名
pub type Vector2 = Vec2<f32>;
pub type Vector3 = Vec3<f32>;
pub type Vector4 = Vec4<f32>;
pub type Matrix3 = Mat3<f32>;
pub type Matrix4 = Mat4<f32>;
pub type Point3 = Pt3<f32>;

/// 数学常量
pub mod constants {
    /// π
    pub const PI: f32 = std::f32::consts::PI;

    /// 角度转弧度的系数
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// 弧度转角度的系数
    pub const RAD_TO_DEG: f32 = 180.0 / PI;

    /// 浮点数比较的 epsilon
    pub const EPSILON: f32 = 1e-6;
}

/// 数学工具函数
pub mod utils {
    use super::constants;

    /// 角度转弧度
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// 弧度转角度
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// 检查两个浮点数是否近似相等
    pub fn approx_eq(a: f32, b: f32, epsilon: f32) -> bool {
        (a - b).abs() < epsilon
    }
}

/// 矩阵辅助函数
pub mod matrix {
    use super::*;

    /// OpenGL 风格的裁剪空间深度 [-1, 1] 转换到 wgpu 的 [0, 1]
    ///
    /// `nalgebra` 的透视矩阵按 OpenGL 约定生成，左乘此矩阵后才能交给 wgpu。
    #[rustfmt::skip]
    pub fn opengl_to_wgpu() -> Matrix4 {
        Matrix4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 0.5, 0.5,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// 创建平移矩阵
    pub fn translation(x: f32, y: f32, z: f32) -> Matrix4 {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    /// 创建缩放矩阵
    pub fn scaling(x: f32, y: f32, z: f32) -> Matrix4 {
        Matrix4::new_nonuniform_scaling(&Vector3::new(x, y, z))
    }

    /// 创建绕 X 轴旋转的矩阵
    pub fn rotation_x(angle: f32) -> Matrix4 {
        Matrix4::from_axis_angle(&Vector3::x_axis(), angle)
    }

    /// 创建绕 Y 轴旋转的矩阵
    pub fn rotation_y(angle: f32) -> Matrix4 {
        Matrix4::from_axis_angle(&Vector3::y_axis(), angle)
    }

    /// 创建绕 Z 轴旋转的矩阵
    pub fn rotation_z(angle: f32) -> Matrix4 {
        Matrix4::from_axis_angle(&Vector3::z_axis(), angle)
    }

    /// 创建透视投影矩阵（wgpu 深度范围）
    pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Matrix4 {
        opengl_to_wgpu() * Matrix4::new_perspective(aspect, fov_y, near, far)
    }

    /// 创建 Look-At 视图矩阵
    pub fn look_at(eye: &Vector3, target: &Vector3, up: &Vector3) -> Matrix4 {
        Matrix4::look_at_rh(&Point3::from(*eye), &Point3::from(*target), up)
    }

    /// 去掉平移分量的视图矩阵（天空盒使用）
    pub fn strip_translation(view: &Matrix4) -> Matrix4 {
        let rotation: Matrix3 = view.fixed_view::<3, 3>(0, 0).into_owned();
        rotation.to_homogeneous()
    }

    /// 转换为列主序数组，供 uniform 使用
    pub fn to_cols_array(m: &Matrix4) -> [[f32; 4]; 4] {
        (*m).into()
    }
}

// 几何处理模块（网格法线、切线等）
pub mod geometry;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_translation() {
        let mat = matrix::translation(1.0, 2.0, 3.0);
        let point = Vector4::new(0.0, 0.0, 0.0, 1.0);
        let result = mat * point;

        assert!((result.x - 1.0).abs() < 1e-6);
        assert!((result.y - 2.0).abs() < 1e-6);
        assert!((result.z - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_perspective_maps_near_far_to_unit_depth() {
        let proj = matrix::perspective(utils::deg_to_rad(45.0), 4.0 / 3.0, 0.1, 100.0);

        let near = proj * Vector4::new(0.0, 0.0, -0.1, 1.0);
        let far = proj * Vector4::new(0.0, 0.0, -100.0, 1.0);
        assert!(utils::approx_eq(near.z / near.w, 0.0, 1e-4));
        assert!(utils::approx_eq(far.z / far.w, 1.0, 1e-4));
    }

    #[test]
    fn test_strip_translation() {
        let view = matrix::look_at(
            &Vector3::new(3.0, 4.0, 5.0),
            &Vector3::new(3.0, 4.0, 4.0),
            &Vector3::y(),
        );
        let stripped = matrix::strip_translation(&view);
        assert_eq!(stripped[(0, 3)], 0.0);
        assert_eq!(stripped[(1, 3)], 0.0);
        assert_eq!(stripped[(2, 3)], 0.0);
        assert_eq!(stripped[(3, 3)], 1.0);
    }

    #[test]
    fn test_cols_array_is_column_major() {
        let m = matrix::translation(1.0, 2.0, 3.0);
        let cols = matrix::to_cols_array(&m);
        assert_eq!(cols[3], [1.0, 2.0, 3.0, 1.0]);
    }
}
