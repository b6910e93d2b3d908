//! Transform 组件
//!
//! 管理场景模型的位置、旋转和统一缩放。
//! 两种组合顺序都保留，因为场景中的模型数值是按各自的顺序调出来的。

use serde::{Deserialize, Serialize};

use super::Component;
use crate::core::scene::ModelConfig;
use crate::math::{matrix, utils::deg_to_rad, Matrix3, Matrix4, Vector3};

/// 缩放与平移的组合顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformOrder {
    /// M = S · T · R：先缩放坐标系，再在缩放后的空间中平移
    #[default]
    ScaleThenTranslate,
    /// M = T · S · R：平移以世界单位计
    TranslateThenScale,
}

/// Transform 组件
pub struct Transform {
    /// 组件名称
    name: String,

    /// 位置
    pub position: Vector3,

    /// 欧拉角（度数）
    pub euler_angle: Vector3,

    /// 统一缩放
    pub scale: f32,

    /// 组合顺序
    pub order: TransformOrder,
}

impl Transform {
    /// 创建新的 Transform 组件
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: Vector3::zeros(),
            euler_angle: Vector3::zeros(),
            scale: 1.0,
            order: TransformOrder::default(),
        }
    }

    /// 从模型配置创建
    pub fn from_config(config: &ModelConfig) -> Self {
        Self {
            name: config.name.clone(),
            position: Vector3::from(config.position),
            euler_angle: Vector3::from(config.rotation),
            scale: config.scale,
            order: config.order,
        }
    }

    /// 旋转矩阵（Rz · Ry · Rx）
    pub fn rotation_matrix(&self) -> Matrix4 {
        matrix::rotation_z(deg_to_rad(self.euler_angle.z))
            * matrix::rotation_y(deg_to_rad(self.euler_angle.y))
            * matrix::rotation_x(deg_to_rad(self.euler_angle.x))
    }

    /// 世界矩阵
    pub fn world_matrix(&self) -> Matrix4 {
        let translation = matrix::translation(self.position.x, self.position.y, self.position.z);
        let scaling = matrix::scaling(self.scale, self.scale, self.scale);
        let rotation = self.rotation_matrix();

        match self.order {
            TransformOrder::ScaleThenTranslate => scaling * translation * rotation,
            TransformOrder::TranslateThenScale => translation * scaling * rotation,
        }
    }

    /// 法线矩阵（世界矩阵左上 3x3 的逆转置）
    ///
    /// 缩放为 0 时矩阵不可逆，此时返回单位矩阵。
    pub fn normal_matrix(&self) -> Matrix4 {
        let upper: Matrix3 = self.world_matrix().fixed_view::<3, 3>(0, 0).into_owned();
        let normal = upper
            .try_inverse()
            .map(|inv| inv.transpose())
            .unwrap_or_else(Matrix3::identity);
        normal.to_homogeneous()
    }
}

impl Component for Transform {
    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vector4;

    fn apply(m: &Matrix4, p: [f32; 3]) -> Vector3 {
        let r = m * Vector4::new(p[0], p[1], p[2], 1.0);
        Vector3::new(r.x, r.y, r.z)
    }

    #[test]
    fn test_scale_then_translate_scales_offset() {
        let mut t = Transform::new("car");
        t.position = Vector3::new(-3.0, 1.2, 2.0);
        t.scale = 0.8;
        t.order = TransformOrder::ScaleThenTranslate;

        // 原点被平移后再整体缩放
        let origin = apply(&t.world_matrix(), [0.0, 0.0, 0.0]);
        assert!((origin - Vector3::new(-2.4, 0.96, 1.6)).norm() < 1e-5);
    }

    #[test]
    fn test_translate_then_scale_keeps_world_offset() {
        let mut t = Transform::new("table");
        t.position = Vector3::new(5.0, 1.0, 4.5);
        t.scale = 0.006;
        t.order = TransformOrder::TranslateThenScale;

        let origin = apply(&t.world_matrix(), [0.0, 0.0, 0.0]);
        assert!((origin - Vector3::new(5.0, 1.0, 4.5)).norm() < 1e-5);

        let p = apply(&t.world_matrix(), [100.0, 0.0, 0.0]);
        assert!((p - Vector3::new(5.6, 1.0, 4.5)).norm() < 1e-4);
    }

    #[test]
    fn test_grass_rotation_lays_patch_flat() {
        let mut t = Transform::new("grass");
        t.euler_angle = Vector3::new(-90.0, 0.0, 0.0);
        t.scale = 0.05;

        // 模型空间 +Z 转到世界空间 +Y
        let up = apply(&t.world_matrix(), [0.0, 0.0, 20.0]);
        assert!((up - Vector3::new(0.0, 1.0, 0.0)).norm() < 1e-5);
    }

    #[test]
    fn test_normal_matrix_undoes_uniform_scale() {
        let mut t = Transform::new("flower");
        t.scale = 2.0;
        let n = t.normal_matrix();
        assert!((n[(0, 0)] - 0.5).abs() < 1e-6);
        assert!((n[(3, 3)] - 1.0).abs() < 1e-6);

        t.scale = 0.0;
        assert_eq!(t.normal_matrix(), Matrix4::identity());
    }

    #[test]
    fn test_from_config() {
        let scene = crate::core::scene::SceneConfig::default();
        let t = Transform::from_config(&scene.models[1]);
        assert_eq!(t.name(), "grass");
        assert_eq!(t.scale, 0.05);
    }
}
