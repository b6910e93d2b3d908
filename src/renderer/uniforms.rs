//! Uniform 数据结构
//!
//! 这些结构体会被写入 GPU 的 uniform buffer，布局与 WGSL 中的同名结构一致。
//! 所有字段都是 `vec4` 或 `mat4x4`，不需要额外的对齐填充。

use bytemuck::{Pod, Zeroable};

use crate::component::{Camera, Light, SpotLight, Transform};
use crate::core::scene::MAX_LIGHTS;
use crate::core::state::ProgramState;
use crate::math::{matrix, Matrix4, Vector3};

fn vec4(v: Vector3, w: f32) -> [f32; 4] {
    [v.x, v.y, v.z, w]
}

/// 相机矩阵与观察位置
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub view_position: [f32; 4],
}

impl CameraUniform {
    pub fn new(camera: &Camera, aspect: f32) -> Self {
        Self {
            view: matrix::to_cols_array(&camera.view_matrix()),
            projection: matrix::to_cols_array(&camera.projection_matrix(aspect)),
            view_position: vec4(camera.position(), 1.0),
        }
    }
}

/// 点光源
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct PointLightUniform {
    pub position: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    /// (constant, linear, quadratic, 0)
    pub attenuation: [f32; 4],
}

impl PointLightUniform {
    pub fn from_light(light: &dyn Light) -> Self {
        let colors = light.colors();
        let attenuation = light.attenuation();
        Self {
            position: vec4(light.position(), 1.0),
            ambient: vec4(colors.ambient, 0.0),
            diffuse: vec4(colors.diffuse, 0.0),
            specular: vec4(colors.specular, 0.0),
            attenuation: [attenuation.constant, attenuation.linear, attenuation.quadratic, 0.0],
        }
    }
}

/// 聚光灯
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct SpotLightUniform {
    pub position: [f32; 4],
    pub direction: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub attenuation: [f32; 4],
    /// (cos(内切光角), cos(外切光角), 0, 0)
    pub cut_off: [f32; 4],
}

impl SpotLightUniform {
    pub fn from_spot(spot: &SpotLight) -> Self {
        let point = PointLightUniform::from_light(spot);
        let (inner, outer) = spot.cut_off_cosines();
        Self {
            position: point.position,
            direction: vec4(spot.direction, 0.0),
            ambient: point.ambient,
            diffuse: point.diffuse,
            specular: point.specular,
            attenuation: point.attenuation,
            cut_off: [inner, outer, 0.0, 0.0],
        }
    }
}

/// 场景中全部光源与材质参数
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct LightsUniform {
    pub point_lights: [PointLightUniform; MAX_LIGHTS],
    pub spot_lights: [SpotLightUniform; MAX_LIGHTS],
    /// 阴影投射光源
    pub shadow_light: PointLightUniform,
    /// (点光源数量, 聚光灯数量, 阴影开关, 0)
    pub counts: [u32; 4],
    /// (远平面, 深度偏移, 高光指数, 0)
    pub params: [f32; 4],
}

impl LightsUniform {
    /// 超过 `MAX_LIGHTS` 的光源被忽略
    pub fn new(state: &ProgramState, far_plane: f32, bias: f32) -> Self {
        let mut uniform = Self::zeroed();

        let num_point = state.point_lights.len().min(MAX_LIGHTS);
        for (slot, light) in uniform.point_lights.iter_mut().zip(&state.point_lights) {
            *slot = PointLightUniform::from_light(light);
        }

        let num_spot = state.spot_lights.len().min(MAX_LIGHTS);
        for (slot, spot) in uniform.spot_lights.iter_mut().zip(&state.spot_lights) {
            *slot = SpotLightUniform::from_spot(spot);
        }

        uniform.shadow_light = PointLightUniform::from_light(&state.shadow_light);
        uniform.counts = [num_point as u32, num_spot as u32, state.shadows_enabled as u32, 0];
        uniform.params = [far_plane, bias, state.shininess, 0.0];
        uniform
    }
}

/// 模型矩阵与法线矩阵
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ModelUniform {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
}

impl ModelUniform {
    pub fn from_transform(transform: &Transform) -> Self {
        Self {
            model: matrix::to_cols_array(&transform.world_matrix()),
            normal_matrix: matrix::to_cols_array(&transform.normal_matrix()),
        }
    }
}

/// 阴影立方体的单个面
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ShadowFaceUniform {
    pub light_space: [[f32; 4]; 4],
    /// (光源位置, 远平面)
    pub light_position: [f32; 4],
}

impl ShadowFaceUniform {
    pub fn new(light_space: &Matrix4, light_position: Vector3, far_plane: f32) -> Self {
        Self {
            light_space: matrix::to_cols_array(light_space),
            light_position: vec4(light_position, far_plane),
        }
    }
}

/// 天空盒视图投影（去掉平移）
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct SkyboxUniform {
    pub view_projection: [[f32; 4]; 4],
}

impl SkyboxUniform {
    pub fn new(camera: &Camera, aspect: f32) -> Self {
        let view = matrix::strip_translation(&camera.view_matrix());
        Self {
            view_projection: matrix::to_cols_array(&(camera.projection_matrix(aspect) * view)),
        }
    }
}

/// 后处理参数
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct PostUniform {
    /// (曝光, 亮度阈值, 泛光开关, 0)
    pub params: [f32; 4],
    /// 模糊方向 (1,0) 水平 / (0,1) 垂直
    pub direction: [f32; 4],
}

impl PostUniform {
    pub fn composite(exposure: f32, threshold: f32, bloom_enabled: bool) -> Self {
        Self {
            params: [exposure, threshold, if bloom_enabled { 1.0 } else { 0.0 }, 0.0],
            direction: [0.0; 4],
        }
    }

    pub fn blur(horizontal: bool) -> Self {
        Self {
            params: [0.0; 4],
            direction: if horizontal { [1.0, 0.0, 0.0, 0.0] } else { [0.0, 1.0, 0.0, 0.0] },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::InputSettings;
    use crate::core::scene::SceneConfig;
    use std::mem::size_of;

    fn state() -> ProgramState {
        ProgramState::new(&SceneConfig::default(), &InputSettings::default())
    }

    #[test]
    fn test_uniform_sizes_are_vec4_aligned() {
        assert_eq!(size_of::<CameraUniform>(), 144);
        assert_eq!(size_of::<PointLightUniform>(), 80);
        assert_eq!(size_of::<SpotLightUniform>(), 112);
        assert_eq!(size_of::<LightsUniform>() % 16, 0);
        assert_eq!(size_of::<ModelUniform>(), 128);
        assert_eq!(size_of::<PostUniform>(), 32);
    }

    #[test]
    fn test_lights_uniform_packs_scene_lights() {
        let s = state();
        let uniform = LightsUniform::new(&s, 25.0, 0.05);

        assert_eq!(uniform.counts, [3, 3, 1, 0]);
        assert_eq!(uniform.params, [25.0, 0.05, 32.0, 0.0]);
        assert_eq!(uniform.point_lights[3].position, [0.0; 4]);

        let spot = &uniform.spot_lights[0];
        assert!((spot.cut_off[0] - 1.0_f32.to_radians().cos()).abs() < 1e-6);
        assert!((spot.cut_off[1] - 50.0_f32.to_radians().cos()).abs() < 1e-6);
        assert_eq!(spot.position, uniform.point_lights[0].position);
        assert_eq!(uniform.shadow_light.position, [-4.0, 2.7, -1.6, 1.0]);
    }

    #[test]
    fn test_shadow_toggle_is_uploaded() {
        let mut s = state();
        s.shadows_enabled = false;
        assert_eq!(LightsUniform::new(&s, 25.0, 0.05).counts[2], 0);
    }

    #[test]
    fn test_extra_lights_are_dropped() {
        let mut s = state();
        let extra = s.point_lights[0].clone();
        s.point_lights.extend(std::iter::repeat(extra).take(3));
        assert_eq!(LightsUniform::new(&s, 25.0, 0.05).counts[0], MAX_LIGHTS as u32);
    }

    #[test]
    fn test_skybox_ignores_camera_translation() {
        let mut s = state();
        let before = SkyboxUniform::new(&s.camera, 1.0);
        s.camera.set_position(Vector3::new(10.0, -3.0, 7.0));
        let after = SkyboxUniform::new(&s.camera, 1.0);
        for (a, b) in before.view_projection.iter().flatten().zip(after.view_projection.iter().flatten()) {
            assert!((a - b).abs() < 1e-5);
        }
    }

    #[test]
    fn test_post_uniform_flags() {
        assert_eq!(PostUniform::composite(2.0, 1.0, true).params, [2.0, 1.0, 1.0, 0.0]);
        assert_eq!(PostUniform::blur(false).direction, [0.0, 1.0, 0.0, 0.0]);
    }
}
