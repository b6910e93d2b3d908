//! 场景配置模块
//!
//! 定义场景中的模型、光源、天空盒、阴影与泛光参数。
//! `scene.toml` 不存在时使用内置的默认场景（九个模型、三个点光源、三个聚光灯）。

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::component::TransformOrder;
use crate::core::error::{ConfigError, Result};

/// 模型配置
///
/// 每个模型使用统一缩放，`order` 决定缩放与平移的组合顺序。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelConfig {
    /// 显示名称（GUI 中使用）
    pub name: String,

    /// 模型文件路径（相对于资源目录）
    pub path: String,

    /// 位置 (x, y, z)
    #[serde(default)]
    pub position: [f32; 3],

    /// 旋转（欧拉角，度数）
    #[serde(default)]
    pub rotation: [f32; 3],

    /// 统一缩放
    #[serde(default = "default_scale")]
    pub scale: f32,

    /// 变换顺序
    #[serde(default)]
    pub order: TransformOrder,
}

fn default_scale() -> f32 {
    1.0
}

impl ModelConfig {
    fn new(name: &str, path: &str, position: [f32; 3], scale: f32, order: TransformOrder) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            position,
            rotation: [0.0, 0.0, 0.0],
            scale,
            order,
        }
    }

    fn with_rotation(mut self, rotation: [f32; 3]) -> Self {
        self.rotation = rotation;
        self
    }
}

/// 点光源配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PointLightConfig {
    pub position: [f32; 3],
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    /// 衰减系数 (constant, linear, quadratic)
    pub attenuation: [f32; 3],
}

/// 聚光灯配置
///
/// 聚光灯 i 与点光源 i 共用位置，因此这里不单独保存位置。
/// 切光角以度数给出，上传时转换为余弦值。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpotLightConfig {
    pub direction: [f32; 3],
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub attenuation: [f32; 3],
    /// 内切光角（度）
    pub cut_off: f32,
    /// 外切光角（度）
    pub outer_cut_off: f32,
}

/// 天空盒配置
///
/// 六个面的顺序：右、左、上、下、前、后（+X, -X, +Y, -Y, +Z, -Z）。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkyboxConfig {
    #[serde(default = "default_skybox_faces")]
    pub faces: Vec<String>,
}

fn default_skybox_faces() -> Vec<String> {
    ["right", "left", "top", "bottom", "front", "back"]
        .iter()
        .map(|face| format!("objects/skybox/{}.jpg", face))
        .collect()
}

impl Default for SkyboxConfig {
    fn default() -> Self {
        Self { faces: default_skybox_faces() }
    }
}

/// 阴影配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShadowConfig {
    /// 启动时是否开启阴影
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// 近平面
    #[serde(default = "default_shadow_near")]
    pub near_plane: f32,

    /// 远平面
    #[serde(default = "default_shadow_far")]
    pub far_plane: f32,

    /// 深度比较偏移（世界单位）
    #[serde(default = "default_shadow_bias")]
    pub bias: f32,

    /// 阴影投射光源（点光源记录）
    #[serde(default = "default_shadow_light")]
    pub light: PointLightConfig,
}

fn default_true() -> bool { true }
fn default_shadow_near() -> f32 { 1.0 }
fn default_shadow_far() -> f32 { 25.0 }
fn default_shadow_bias() -> f32 { 0.05 }

fn default_shadow_light() -> PointLightConfig {
    PointLightConfig {
        position: [-4.0, 2.7, -1.6],
        ambient: [0.5, 0.1, 0.1],
        diffuse: [0.95, 1.0, 1.0],
        specular: [1.0, 1.0, 1.0],
        attenuation: [0.6, 1.0, 0.0],
    }
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            near_plane: default_shadow_near(),
            far_plane: default_shadow_far(),
            bias: default_shadow_bias(),
            light: default_shadow_light(),
        }
    }
}

/// 泛光 / HDR 配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BloomConfig {
    /// 默认关闭
    #[serde(default)]
    pub enabled: bool,

    /// 色调映射曝光
    #[serde(default = "default_exposure")]
    pub exposure: f32,

    /// 亮度提取阈值
    #[serde(default = "default_threshold")]
    pub threshold: f32,

    /// 高斯模糊次数（水平、垂直交替）
    #[serde(default = "default_blur_passes")]
    pub blur_passes: u32,
}

fn default_exposure() -> f32 { 1.0 }
fn default_threshold() -> f32 { 1.0 }
fn default_blur_passes() -> u32 { 10 }

impl Default for BloomConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            exposure: default_exposure(),
            threshold: default_threshold(),
            blur_passes: default_blur_passes(),
        }
    }
}

/// 场景配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SceneConfig {
    /// 背景颜色
    #[serde(default)]
    pub clear_color: [f32; 3],

    /// 材质高光指数
    #[serde(default = "default_shininess")]
    pub shininess: f32,

    #[serde(default = "default_models")]
    pub models: Vec<ModelConfig>,

    #[serde(default = "default_point_lights")]
    pub point_lights: Vec<PointLightConfig>,

    #[serde(default = "default_spot_lights")]
    pub spot_lights: Vec<SpotLightConfig>,

    #[serde(default)]
    pub skybox: SkyboxConfig,

    #[serde(default)]
    pub shadow: ShadowConfig,

    #[serde(default)]
    pub bloom: BloomConfig,
}

fn default_shininess() -> f32 {
    32.0
}

fn default_models() -> Vec<ModelConfig> {
    use TransformOrder::{ScaleThenTranslate, TranslateThenScale};

    vec![
        ModelConfig::new(
            "backpack",
            "objects/backpack/backpack.obj",
            [0.0, 0.0, 0.0],
            1.0,
            TranslateThenScale,
        ),
        ModelConfig::new(
            "grass",
            "objects/grass/10450_Rectangular_Grass_Patch_v1_iterations-2.obj",
            [0.0, 0.0, 0.0],
            0.05,
            ScaleThenTranslate,
        )
        .with_rotation([-90.0, 0.0, 0.0]),
        ModelConfig::new("car", "objects/car/S15_bonnet.obj", [-3.0, 1.2, 2.0], 0.8, ScaleThenTranslate),
        ModelConfig::new(
            "lamp",
            "objects/Street Lamp/StreetLamp.obj",
            [-20.0, 1.0, 13.0],
            0.2,
            ScaleThenTranslate,
        ),
        ModelConfig::new(
            "lamp2",
            "objects/lamp2/source/street-lamp-obj/farola1.obj",
            [4.0, 0.0, 0.0],
            1.2,
            ScaleThenTranslate,
        ),
        ModelConfig::new(
            "cat",
            "objects/cat/source/cat-obj/cat.obj",
            [-160.0, 50.0, -223.0],
            0.015,
            ScaleThenTranslate,
        ),
        ModelConfig::new(
            "table",
            "objects/table/source/table/table.obj",
            [5.0, 1.0, 4.5],
            0.006,
            TranslateThenScale,
        ),
        ModelConfig::new("flower", "objects/flower/Scaniverse.obj", [5.0, 1.1, 5.5], 2.0, TranslateThenScale),
        ModelConfig::new(
            "tree",
            "objects/coconutTree/coconutTreeBended.obj",
            [4.5, 0.0, -4.5],
            0.008,
            TranslateThenScale,
        ),
    ]
}

fn default_point_lights() -> Vec<PointLightConfig> {
    vec![
        PointLightConfig {
            position: [4.8, 4.0, 0.9],
            ambient: [0.0, 4.0, 10.0],
            diffuse: [0.5, 0.0, -2.5],
            specular: [-1.0, 5.0, 16.0],
            attenuation: [1.0, 1.0, 0.2],
        },
        PointLightConfig {
            position: [-2.3, 1.0, -0.3],
            ambient: [2.0, 2.0, -2.0],
            diffuse: [5.5, 3.0, -14.5],
            specular: [21.0, 0.0, 0.0],
            attenuation: [2.4, 0.75, 0.7],
        },
        PointLightConfig {
            position: [-3.3, 4.0, 3.2],
            ambient: [22.0, -48.0, 0.0],
            diffuse: [0.0, 10.0, -2.0],
            specular: [41.0, 4.0, -22.0],
            attenuation: [0.9, 1.6, 2.5],
        },
    ]
}

fn default_spot_lights() -> Vec<SpotLightConfig> {
    vec![
        SpotLightConfig {
            direction: [0.0, -1.0, 0.0],
            ambient: [0.0, -4.0, -1.0],
            diffuse: [-1.0, 0.0, 1.0],
            specular: [2.0, 0.0, 0.0],
            attenuation: [1.0, 1.0, 0.35],
            cut_off: 1.0,
            outer_cut_off: 50.0,
        },
        SpotLightConfig {
            direction: [0.0, 0.0, 1.0],
            ambient: [10.0, -1.0, 2.0],
            diffuse: [34.0, 4.0, 12.0],
            specular: [-6.0, 15.0, 9.0],
            attenuation: [2.7, 0.0, 5.1],
            cut_off: 0.75,
            outer_cut_off: 90.0,
        },
        SpotLightConfig {
            direction: [0.0, -1.0, 0.0],
            ambient: [9.0, 1.0, 0.0],
            diffuse: [25.0, 36.0, -5.0],
            specular: [2.0, 1.0, -5.0],
            attenuation: [0.5, 0.65, 0.2],
            cut_off: 1.0,
            outer_cut_off: 40.0,
        },
    ]
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.0, 0.0, 0.0],
            shininess: default_shininess(),
            models: default_models(),
            point_lights: default_point_lights(),
            spot_lights: default_spot_lights(),
            skybox: SkyboxConfig::default(),
            shadow: ShadowConfig::default(),
            bloom: BloomConfig::default(),
        }
    }
}

/// 着色器中光源数组的容量
pub const MAX_LIGHTS: usize = 4;

impl SceneConfig {
    /// 从文件加载场景配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            ConfigError::FileNotFound(format!(
                "Failed to read scene config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_toml_str(&contents)
    }

    /// 从 TOML 字符串解析场景配置
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let scene: SceneConfig = toml::from_str(contents)
            .map_err(|e| ConfigError::ParseError(format!("Failed to parse scene config: {}", e)))?;
        scene.validate()?;
        Ok(scene)
    }

    /// 从文件加载，如果文件不存在则返回默认场景
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!(path = %path.display(), "Scene file not found, using built-in scene");
            return Self::default();
        }

        match Self::from_file(path) {
            Ok(scene) => scene,
            Err(e) => {
                tracing::warn!("{}, using built-in scene", e);
                Self::default()
            }
        }
    }

    /// 保存场景配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(format!("Failed to serialize scene config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// 验证场景配置
    pub fn validate(&self) -> Result<()> {
        if self.point_lights.len() > MAX_LIGHTS {
            return Err(invalid("point_lights", format!("at most {} lights are supported", MAX_LIGHTS)));
        }
        if self.spot_lights.len() > MAX_LIGHTS {
            return Err(invalid("spot_lights", format!("at most {} lights are supported", MAX_LIGHTS)));
        }
        if self.spot_lights.len() > self.point_lights.len() {
            return Err(invalid(
                "spot_lights",
                "each spot light shares the position of the point light with the same index".to_string(),
            ));
        }
        if self.skybox.faces.len() != 6 {
            return Err(invalid("skybox.faces", format!("expected 6 faces, got {}", self.skybox.faces.len())));
        }
        if self.shadow.near_plane <= 0.0 || self.shadow.far_plane <= self.shadow.near_plane {
            return Err(invalid("shadow", "require 0 < near_plane < far_plane".to_string()));
        }
        if self.bloom.exposure <= 0.0 {
            return Err(invalid("bloom.exposure", "must be positive".to_string()));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: String) -> crate::core::error::ViewerError {
    ConfigError::InvalidValue { field: field.to_string(), reason }.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scene_matches_builtin_table() {
        let scene = SceneConfig::default();
        assert_eq!(scene.models.len(), 9);
        assert_eq!(scene.point_lights.len(), 3);
        assert_eq!(scene.spot_lights.len(), 3);
        assert_eq!(scene.shininess, 32.0);
        assert!(!scene.bloom.enabled);
        assert!(scene.validate().is_ok());

        let grass = scene.models.iter().find(|m| m.name == "grass").unwrap();
        assert_eq!(grass.rotation, [-90.0, 0.0, 0.0]);
        assert_eq!(grass.order, TransformOrder::ScaleThenTranslate);

        let tree = scene.models.iter().find(|m| m.name == "tree").unwrap();
        assert_eq!(tree.order, TransformOrder::TranslateThenScale);
        assert_eq!(tree.scale, 0.008);
    }

    #[test]
    fn test_partial_toml_keeps_builtin_lights() {
        let scene = SceneConfig::from_toml_str(
            r#"
            clear_color = [0.1, 0.2, 0.3]

            [bloom]
            enabled = true
            "#,
        )
        .unwrap();

        assert_eq!(scene.clear_color, [0.1, 0.2, 0.3]);
        assert!(scene.bloom.enabled);
        assert_eq!(scene.bloom.blur_passes, 10);
        assert_eq!(scene.point_lights, default_point_lights());
        assert_eq!(scene.models.len(), 9);
    }

    #[test]
    fn test_model_entry_defaults() {
        let scene = SceneConfig::from_toml_str(
            r#"
            [[models]]
            name = "box"
            path = "objects/box.obj"
            "#,
        )
        .unwrap();

        assert_eq!(scene.models.len(), 1);
        assert_eq!(scene.models[0].scale, 1.0);
        assert_eq!(scene.models[0].order, TransformOrder::ScaleThenTranslate);
    }

    #[test]
    fn test_validation_rejects_orphan_spot_light() {
        let mut scene = SceneConfig::default();
        scene.point_lights.truncate(1);
        assert!(scene.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_skybox() {
        let mut scene = SceneConfig::default();
        scene.skybox.faces.pop();
        assert!(scene.validate().is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let path = std::env::temp_dir().join("scene_viewer_scene_roundtrip.toml");
        let mut scene = SceneConfig::default();
        scene.shadow.enabled = false;
        scene.save_to_file(&path).unwrap();

        let loaded = SceneConfig::from_file(&path).unwrap();
        assert_eq!(loaded, scene);
        let _ = std::fs::remove_file(&path);
    }
}
