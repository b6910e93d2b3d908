//! 程序状态模块
//!
//! `ProgramState` 是运行期唯一的可变场景状态：背景色、调试面板开关、相机、
//! 模型变换、光源参数与后处理开关。
//!
//! 其中十个字段持久化到纯文本文件，每行一个数值：
//!
//! ```text
//! 背景色 R
//! 背景色 G
//! 背景色 B
//! 调试面板开关 (0/1)
//! 相机位置 X
//! 相机位置 Y
//! 相机位置 Z
//! 相机朝向 X
//! 相机朝向 Y
//! 相机朝向 Z
//! ```
//!
//! 文件没有版本号。读取时遇到第一个无法解析的字段就停止，后续字段保留默认值。

use std::fs;
use std::path::Path;

use crate::component::{Camera, PointLight, SpotLight, Transform};
use crate::core::config::InputSettings;
use crate::core::error::{Result, StateError};
use crate::core::scene::SceneConfig;
use crate::math::Vector3;

/// 持久化字段名称（顺序即文件中的行序）
pub const STATE_FIELDS: [&str; 10] = [
    "clear_color.r",
    "clear_color.g",
    "clear_color.b",
    "overlay_enabled",
    "camera.position.x",
    "camera.position.y",
    "camera.position.z",
    "camera.front.x",
    "camera.front.y",
    "camera.front.z",
];

/// 状态文件中的十个字段
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateRecord {
    pub clear_color: [f32; 3],
    pub overlay_enabled: bool,
    pub camera_position: [f32; 3],
    pub camera_front: [f32; 3],
}

impl StateRecord {
    /// 序列化为文本（每行一个字段，末尾换行）
    pub fn to_text(&self) -> String {
        let values = self.values();
        let mut text = String::new();
        for (index, value) in values.iter().enumerate() {
            if index == 3 {
                text.push_str(if self.overlay_enabled { "1" } else { "0" });
            } else {
                text.push_str(&value.to_string());
            }
            text.push('\n');
        }
        text
    }

    /// 从文本解析
    ///
    /// 字段以任意空白分隔。返回解析后的记录，以及第一个出错字段的错误（如果有）。
    /// 出错字段及其后的字段保留 `defaults` 中的值。
    pub fn parse(text: &str, defaults: StateRecord) -> (StateRecord, Option<StateError>) {
        let mut values = defaults.values();
        let mut tokens = text.split_whitespace();

        for (index, &name) in STATE_FIELDS.iter().enumerate() {
            let Some(token) = tokens.next() else {
                let error = StateError::MissingField { index, name };
                return (StateRecord::from_values(values), Some(error));
            };

            let parsed = if index == 3 {
                parse_flag(token)
            } else {
                token.parse::<f32>().ok().filter(|v| v.is_finite())
            };

            match parsed {
                Some(value) => values[index] = value,
                None => {
                    let error = StateError::InvalidField {
                        index,
                        name,
                        value: token.to_string(),
                    };
                    return (StateRecord::from_values(values), Some(error));
                }
            }
        }

        (StateRecord::from_values(values), None)
    }

    fn values(&self) -> [f32; 10] {
        [
            self.clear_color[0],
            self.clear_color[1],
            self.clear_color[2],
            if self.overlay_enabled { 1.0 } else { 0.0 },
            self.camera_position[0],
            self.camera_position[1],
            self.camera_position[2],
            self.camera_front[0],
            self.camera_front[1],
            self.camera_front[2],
        ]
    }

    fn from_values(v: [f32; 10]) -> Self {
        Self {
            clear_color: [v[0], v[1], v[2]],
            overlay_enabled: v[3] != 0.0,
            camera_position: [v[4], v[5], v[6]],
            camera_front: [v[7], v[8], v[9]],
        }
    }
}

/// 开关字段只接受 0 或 1
fn parse_flag(token: &str) -> Option<f32> {
    match token {
        "0" => Some(0.0),
        "1" => Some(1.0),
        _ => None,
    }
}

/// 程序状态
pub struct ProgramState {
    /// 背景颜色
    pub clear_color: [f32; 3],

    /// 调试面板是否打开
    pub overlay_enabled: bool,

    /// 主相机
    pub camera: Camera,

    /// 鼠标是否驱动相机（不持久化）
    pub camera_mouse_update_enabled: bool,

    /// 模型变换（顺序与场景配置一致）
    pub models: Vec<Transform>,

    /// 点光源
    pub point_lights: Vec<PointLight>,

    /// 聚光灯（位置跟随同序号的点光源）
    pub spot_lights: Vec<SpotLight>,

    /// 阴影投射光源
    pub shadow_light: PointLight,

    /// 材质高光指数
    pub shininess: f32,

    /// 是否渲染阴影
    pub shadows_enabled: bool,

    /// HDR 曝光
    pub exposure: f32,

    /// 是否启用泛光
    pub bloom_enabled: bool,
}

/// 曝光下限
pub const MIN_EXPOSURE: f32 = 0.05;

impl ProgramState {
    /// 从场景配置创建初始状态
    pub fn new(scene: &SceneConfig, input: &InputSettings) -> Self {
        let point_lights: Vec<PointLight> = scene
            .point_lights
            .iter()
            .enumerate()
            .map(|(i, config)| PointLight::from_config(format!("pointLight[{}]", i), config))
            .collect();

        let spot_lights = scene
            .spot_lights
            .iter()
            .zip(&point_lights)
            .enumerate()
            .map(|(i, (config, point))| {
                SpotLight::from_config(format!("spotLight[{}]", i), point.position, config)
            })
            .collect();

        Self {
            clear_color: scene.clear_color,
            overlay_enabled: false,
            camera: Camera::main_camera().with_input_settings(input),
            camera_mouse_update_enabled: true,
            models: scene.models.iter().map(Transform::from_config).collect(),
            point_lights,
            spot_lights,
            shadow_light: PointLight::from_config("shadowLight", &scene.shadow.light),
            shininess: scene.shininess,
            shadows_enabled: scene.shadow.enabled,
            exposure: scene.bloom.exposure,
            bloom_enabled: scene.bloom.enabled,
        }
    }

    /// 当前状态的持久化记录
    pub fn record(&self) -> StateRecord {
        StateRecord {
            clear_color: self.clear_color,
            overlay_enabled: self.overlay_enabled,
            camera_position: self.camera.position().into(),
            camera_front: self.camera.front().into(),
        }
    }

    /// 应用持久化记录
    pub fn apply_record(&mut self, record: &StateRecord) {
        self.clear_color = record.clear_color;
        self.overlay_enabled = record.overlay_enabled;
        self.camera.set_position(Vector3::from(record.camera_position));
        if !self.camera.set_front(Vector3::from(record.camera_front)) {
            tracing::warn!(front = ?record.camera_front, "Ignoring degenerate camera front from state file");
        }
        if self.overlay_enabled {
            self.camera_mouse_update_enabled = false;
        }
    }

    /// 从状态文件加载
    ///
    /// 文件不存在时保持默认值。部分损坏时保留已读出的字段，
    /// 并返回 `ViewerError::State` 交给调用方记录。
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!(path = %path.display(), "State file not found, using defaults");
            return Ok(());
        }

        let text = fs::read_to_string(path)?;
        let (record, error) = StateRecord::parse(&text, self.record());
        self.apply_record(&record);

        if let Some(e) = error {
            return Err(e.into());
        }
        tracing::info!(path = %path.display(), "Program state loaded");
        Ok(())
    }

    /// 保存到状态文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.record().to_text())?;
        tracing::info!(path = %path.display(), "Program state saved");
        Ok(())
    }

    /// 切换调试面板
    ///
    /// 打开时停止鼠标驱动相机；关闭时恢复。返回新的开关状态。
    pub fn toggle_overlay(&mut self) -> bool {
        self.overlay_enabled = !self.overlay_enabled;
        self.camera_mouse_update_enabled = !self.overlay_enabled;
        self.overlay_enabled
    }

    /// 调整曝光，结果不低于 `MIN_EXPOSURE`
    pub fn adjust_exposure(&mut self, delta: f32) {
        self.exposure = (self.exposure + delta).max(MIN_EXPOSURE);
    }

    /// 聚光灯位置跟随同序号点光源
    pub fn sync_spot_positions(&mut self) {
        for (spot, point) in self.spot_lights.iter_mut().zip(&self.point_lights) {
            spot.position = point.position;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ViewerError;

    fn state() -> ProgramState {
        ProgramState::new(&SceneConfig::default(), &InputSettings::default())
    }

    fn sample_record() -> StateRecord {
        StateRecord {
            clear_color: [0.1, 0.25, 1.0],
            overlay_enabled: true,
            camera_position: [1.5, -2.0, 3.25],
            camera_front: [0.0, 0.0, -1.0],
        }
    }

    #[test]
    fn test_record_text_round_trip() {
        let record = sample_record();
        let text = record.to_text();
        assert_eq!(text.lines().count(), 10);
        assert_eq!(text.lines().nth(3), Some("1"));

        let (parsed, error) = StateRecord::parse(&text, state().record());
        assert!(error.is_none());
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_truncated_file_keeps_defaults() {
        let defaults = state().record();
        let (parsed, error) = StateRecord::parse("0.5\n0.5\n0.5\n1\n7\n", defaults);

        assert_eq!(parsed.clear_color, [0.5, 0.5, 0.5]);
        assert!(parsed.overlay_enabled);
        assert_eq!(parsed.camera_position, [7.0, defaults.camera_position[1], defaults.camera_position[2]]);
        assert_eq!(parsed.camera_front, defaults.camera_front);
        assert!(matches!(error, Some(StateError::MissingField { index: 5, .. })));
    }

    #[test]
    fn test_malformed_field_stops_parsing() {
        let defaults = state().record();
        let (parsed, error) = StateRecord::parse("0.2 0.3 abc 0 9 9 9 1 0 0", defaults);

        assert_eq!(parsed.clear_color, [0.2, 0.3, defaults.clear_color[2]]);
        assert_eq!(parsed.camera_position, defaults.camera_position);
        match error {
            Some(StateError::InvalidField { index, name, value }) => {
                assert_eq!(index, 2);
                assert_eq!(name, "clear_color.b");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_flag_must_be_zero_or_one() {
        let defaults = state().record();
        let (parsed, error) = StateRecord::parse("0 0 0 2 0 0 0 0 0 -1", defaults);
        assert!(!parsed.overlay_enabled);
        assert!(matches!(error, Some(StateError::InvalidField { index: 3, .. })));
    }

    #[test]
    fn test_file_round_trip_restores_camera() {
        let path = std::env::temp_dir().join("scene_viewer_state_roundtrip.txt");
        let mut original = state();
        original.apply_record(&sample_record());
        original.camera.set_position(Vector3::new(4.0, 5.0, 6.0));
        original.save_to_file(&path).unwrap();

        let mut loaded = state();
        loaded.load_from_file(&path).unwrap();
        assert_eq!(loaded.clear_color, [0.1, 0.25, 1.0]);
        assert!(loaded.overlay_enabled);
        assert!(!loaded.camera_mouse_update_enabled);
        assert_eq!(loaded.camera.position(), Vector3::new(4.0, 5.0, 6.0));
        assert!((loaded.camera.front() - Vector3::new(0.0, 0.0, -1.0)).norm() < 1e-5);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_damaged_file_applies_prefix_and_reports() {
        let path = std::env::temp_dir().join("scene_viewer_state_damaged.txt");
        std::fs::write(&path, "0.3\n0.4\n0.5\n1\n2.5\n").unwrap();

        let mut loaded = state();
        let result = loaded.load_from_file(&path);
        assert!(matches!(
            result,
            Err(ViewerError::State(StateError::MissingField { index: 5, .. }))
        ));
        assert_eq!(loaded.clear_color, [0.3, 0.4, 0.5]);
        assert!(loaded.overlay_enabled);
        assert_eq!(loaded.camera.position(), Vector3::new(2.5, 0.0, 3.0));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_keeps_defaults() {
        let mut loaded = state();
        loaded
            .load_from_file(std::env::temp_dir().join("scene_viewer_no_such_state.txt"))
            .unwrap();
        assert_eq!(loaded.camera.position(), Vector3::new(0.0, 0.0, 3.0));
        assert!(!loaded.overlay_enabled);
    }

    #[test]
    fn test_overlay_toggle_controls_mouse_look() {
        let mut s = state();
        assert!(s.camera_mouse_update_enabled);
        assert!(s.toggle_overlay());
        assert!(!s.camera_mouse_update_enabled);
        assert!(!s.toggle_overlay());
        assert!(s.camera_mouse_update_enabled);
    }

    #[test]
    fn test_exposure_has_floor() {
        let mut s = state();
        s.adjust_exposure(-10.0);
        assert_eq!(s.exposure, MIN_EXPOSURE);
        s.adjust_exposure(0.5);
        assert!((s.exposure - 0.55).abs() < 1e-6);
    }

    #[test]
    fn test_spot_lights_follow_point_lights() {
        let mut s = state();
        assert_eq!(s.spot_lights.len(), 3);
        s.point_lights[2].position = Vector3::new(1.0, 2.0, 3.0);
        s.sync_spot_positions();
        assert_eq!(s.spot_lights[2].position, Vector3::new(1.0, 2.0, 3.0));
    }
}
