//! 光照组件模块
//!
//! Phong 光照模型使用的点光源与聚光灯。
//! 颜色分量不做范围限制，场景中的调参值可以为负数或大于 1。

use crate::component::Component;
use crate::core::scene::{PointLightConfig, SpotLightConfig};
use crate::math::{utils::deg_to_rad, Vector3};

/// 距离衰减系数
///
/// 衰减 = 1 / (constant + linear * d + quadratic * d²)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Attenuation {
    pub fn new(constant: f32, linear: f32, quadratic: f32) -> Self {
        Self { constant, linear, quadratic }
    }

    /// 计算距离 `distance` 处的衰减
    pub fn at(&self, distance: f32) -> f32 {
        1.0 / (self.constant + self.linear * distance + self.quadratic * distance * distance)
    }
}

impl From<[f32; 3]> for Attenuation {
    fn from(values: [f32; 3]) -> Self {
        Self::new(values[0], values[1], values[2])
    }
}

/// Phong 三分量颜色
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhongColors {
    pub ambient: Vector3,
    pub diffuse: Vector3,
    pub specular: Vector3,
}

/// 光源基础 trait
pub trait Light: Component {
    /// 光源位置
    fn position(&self) -> Vector3;

    /// Phong 颜色
    fn colors(&self) -> &PhongColors;

    /// 衰减系数
    fn attenuation(&self) -> &Attenuation;
}

/// 点光源
#[derive(Debug, Clone)]
pub struct PointLight {
    name: String,
    pub position: Vector3,
    pub colors: PhongColors,
    pub attenuation: Attenuation,
}

impl PointLight {
    /// 从场景配置创建
    pub fn from_config(name: impl Into<String>, config: &PointLightConfig) -> Self {
        Self {
            name: name.into(),
            position: Vector3::from(config.position),
            colors: PhongColors {
                ambient: Vector3::from(config.ambient),
                diffuse: Vector3::from(config.diffuse),
                specular: Vector3::from(config.specular),
            },
            attenuation: Attenuation::from(config.attenuation),
        }
    }
}

impl Component for PointLight {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Light for PointLight {
    fn position(&self) -> Vector3 {
        self.position
    }

    fn colors(&self) -> &PhongColors {
        &self.colors
    }

    fn attenuation(&self) -> &Attenuation {
        &self.attenuation
    }
}

/// 聚光灯
///
/// 切光角以度数保存，`cut_off_cosines` 给出着色器使用的余弦值。
#[derive(Debug, Clone)]
pub struct SpotLight {
    name: String,
    pub position: Vector3,
    pub direction: Vector3,
    pub colors: PhongColors,
    pub attenuation: Attenuation,
    /// 内切光角（度）
    pub cut_off: f32,
    /// 外切光角（度）
    pub outer_cut_off: f32,
}

impl SpotLight {
    /// 从场景配置创建，位置取自同序号的点光源
    pub fn from_config(name: impl Into<String>, position: Vector3, config: &SpotLightConfig) -> Self {
        Self {
            name: name.into(),
            position,
            direction: Vector3::from(config.direction),
            colors: PhongColors {
                ambient: Vector3::from(config.ambient),
                diffuse: Vector3::from(config.diffuse),
                specular: Vector3::from(config.specular),
            },
            attenuation: Attenuation::from(config.attenuation),
            cut_off: config.cut_off,
            outer_cut_off: config.outer_cut_off,
        }
    }

    /// (cos(内切光角), cos(外切光角))
    pub fn cut_off_cosines(&self) -> (f32, f32) {
        (deg_to_rad(self.cut_off).cos(), deg_to_rad(self.outer_cut_off).cos())
    }
}

impl Component for SpotLight {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Light for SpotLight {
    fn position(&self) -> Vector3 {
        self.position
    }

    fn colors(&self) -> &PhongColors {
        &self.colors
    }

    fn attenuation(&self) -> &Attenuation {
        &self.attenuation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scene::SceneConfig;

    #[test]
    fn test_attenuation() {
        let att = Attenuation::new(1.0, 1.0, 0.2);
        assert_eq!(att.at(0.0), 1.0);
        assert!((att.at(2.0) - 1.0 / 3.8).abs() < 1e-6);
    }

    #[test]
    fn test_cut_off_uploaded_as_cosines() {
        let scene = SceneConfig::default();
        let spot = SpotLight::from_config("spot0", Vector3::zeros(), &scene.spot_lights[0]);
        let (inner, outer) = spot.cut_off_cosines();
        assert!((inner - 1.0_f32.to_radians().cos()).abs() < 1e-6);
        assert!((outer - 50.0_f32.to_radians().cos()).abs() < 1e-6);
        assert!(inner > outer);
    }

    #[test]
    fn test_light_trait_objects() {
        let scene = SceneConfig::default();
        let point = PointLight::from_config("point0", &scene.point_lights[0]);
        let spot = SpotLight::from_config("spot0", point.position, &scene.spot_lights[0]);

        let lights: Vec<&dyn Light> = vec![&point, &spot];
        assert_eq!(lights[0].colors().diffuse, point.colors.diffuse);
        assert_eq!(lights[1].position(), Vector3::new(4.8, 4.0, 0.9));
        assert_eq!(lights[1].name(), "spot0");
    }
}
