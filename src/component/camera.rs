//! Camera 组件
//!
//! 基于偏航角 / 俯仰角的第一人称相机。
//! 默认朝向 -Z（yaw = -90°），俯仰角限制在 ±89° 以避免翻转，缩放（FOV）限制在 [1°, 45°]。

use super::Component;
use crate::core::config::InputSettings;
use crate::math::{matrix, utils::{deg_to_rad, rad_to_deg}, Matrix4, Vector3};

const DEFAULT_YAW: f32 = -90.0;
const DEFAULT_PITCH: f32 = 0.0;
const DEFAULT_ZOOM: f32 = 45.0;
const PITCH_LIMIT: f32 = 89.0;
const MIN_ZOOM: f32 = 1.0;
const MAX_ZOOM: f32 = 45.0;

/// 近裁剪面距离
pub const NEAR_Z: f32 = 0.1;
/// 远裁剪面距离
pub const FAR_Z: f32 = 100.0;

/// 相机移动方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
    /// 原地向左转（偏航角减小）
    TurnLeft,
    /// 原地向右转（偏航角增大）
    TurnRight,
}

/// Camera 组件
#[derive(Debug, Clone)]
pub struct Camera {
    name: String,

    position: Vector3,
    front: Vector3,
    up: Vector3,
    right: Vector3,
    world_up: Vector3,

    /// 偏航角（度）
    yaw: f32,
    /// 俯仰角（度）
    pitch: f32,

    /// 移动速度（单位/秒）
    pub movement_speed: f32,
    /// 鼠标灵敏度（度/像素）
    pub mouse_sensitivity: f32,
    /// 转向速度（度/秒）
    pub turn_speed: f32,
    /// 垂直视场角（度）
    zoom: f32,
}

impl Camera {
    /// 在指定位置创建相机，朝向 -Z
    pub fn new(name: impl Into<String>, position: Vector3) -> Self {
        let mut camera = Self {
            name: name.into(),
            position,
            front: Vector3::new(0.0, 0.0, -1.0),
            up: Vector3::y(),
            right: Vector3::x(),
            world_up: Vector3::y(),
            yaw: DEFAULT_YAW,
            pitch: DEFAULT_PITCH,
            movement_speed: 2.5,
            mouse_sensitivity: 0.1,
            turn_speed: 60.0,
            zoom: DEFAULT_ZOOM,
        };
        camera.update_camera_vectors();
        camera
    }

    /// 主相机，位于 (0, 0, 3)
    pub fn main_camera() -> Self {
        Self::new("MainCamera", Vector3::new(0.0, 0.0, 3.0))
    }

    /// 应用输入配置中的速度与灵敏度
    pub fn with_input_settings(mut self, settings: &InputSettings) -> Self {
        self.movement_speed = settings.move_speed;
        self.mouse_sensitivity = settings.mouse_sensitivity;
        self.turn_speed = settings.turn_speed;
        self
    }

    // ========== 访问器 ==========

    pub fn position(&self) -> Vector3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vector3) {
        self.position = position;
    }

    pub fn front(&self) -> Vector3 {
        self.front
    }

    pub fn right(&self) -> Vector3 {
        self.right
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// 设置朝向向量
    ///
    /// 偏航角与俯仰角从向量反推，因此之后的鼠标输入会从这个朝向继续。
    /// 零向量或非有限值会被忽略，返回 false。
    pub fn set_front(&mut self, front: Vector3) -> bool {
        if !front.iter().all(|c| c.is_finite()) {
            return false;
        }
        let Some(front) = front.try_normalize(1e-6) else {
            return false;
        };

        self.yaw = rad_to_deg(front.z.atan2(front.x));
        self.pitch = rad_to_deg(front.y.clamp(-1.0, 1.0).asin()).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_camera_vectors();
        true
    }

    // ========== 矩阵 ==========

    /// 视图矩阵
    pub fn view_matrix(&self) -> Matrix4 {
        matrix::look_at(&self.position, &(self.position + self.front), &self.up)
    }

    /// 投影矩阵（wgpu 深度范围）
    pub fn projection_matrix(&self, aspect: f32) -> Matrix4 {
        matrix::perspective(deg_to_rad(self.zoom), aspect, NEAR_Z, FAR_Z)
    }

    // ========== 输入处理 ==========

    /// 键盘移动
    pub fn process_keyboard(&mut self, direction: CameraMovement, delta_time: f32) {
        let velocity = self.movement_speed * delta_time;

        match direction {
            CameraMovement::Forward => self.position += self.front * velocity,
            CameraMovement::Backward => self.position -= self.front * velocity,
            CameraMovement::Left => self.position -= self.right * velocity,
            CameraMovement::Right => self.position += self.right * velocity,
            CameraMovement::Up => self.position += self.world_up * velocity,
            CameraMovement::Down => self.position -= self.world_up * velocity,
            CameraMovement::TurnLeft => {
                self.yaw -= self.turn_speed * delta_time;
                self.update_camera_vectors();
            }
            CameraMovement::TurnRight => {
                self.yaw += self.turn_speed * delta_time;
                self.update_camera_vectors();
            }
        }
    }

    /// 鼠标移动（偏移量以像素计，y 向上为正）
    pub fn process_mouse_movement(&mut self, x_offset: f32, y_offset: f32, constrain_pitch: bool) {
        self.yaw += x_offset * self.mouse_sensitivity;
        self.pitch += y_offset * self.mouse_sensitivity;

        if constrain_pitch {
            self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }

        self.update_camera_vectors();
    }

    /// 滚轮缩放
    pub fn process_mouse_scroll(&mut self, y_offset: f32) {
        self.zoom = (self.zoom - y_offset).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    fn update_camera_vectors(&mut self) {
        let yaw = deg_to_rad(self.yaw);
        let pitch = deg_to_rad(self.pitch);

        self.front = Vector3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalize();
        self.right = self.front.cross(&self.world_up).normalize();
        self.up = self.right.cross(&self.front).normalize();
    }
}

impl Component for Camera {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::main_camera()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vector3, b: Vector3) -> bool {
        (a - b).norm() < 1e-5
    }

    #[test]
    fn test_default_camera_looks_down_negative_z() {
        let camera = Camera::default();
        assert_eq!(camera.position(), Vector3::new(0.0, 0.0, 3.0));
        assert!(approx(camera.front(), Vector3::new(0.0, 0.0, -1.0)));
        assert!(approx(camera.right(), Vector3::new(1.0, 0.0, 0.0)));
        assert_eq!(camera.zoom(), 45.0);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = Camera::default();
        camera.process_mouse_movement(0.0, 10_000.0, true);
        assert_eq!(camera.pitch(), 89.0);

        camera.process_mouse_movement(0.0, -100_000.0, true);
        assert_eq!(camera.pitch(), -89.0);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut camera = Camera::default();
        camera.process_mouse_scroll(100.0);
        assert_eq!(camera.zoom(), 1.0);
        camera.process_mouse_scroll(-100.0);
        assert_eq!(camera.zoom(), 45.0);
    }

    #[test]
    fn test_keyboard_movement() {
        let mut camera = Camera::default();
        camera.process_keyboard(CameraMovement::Forward, 1.0);
        assert!(approx(camera.position(), Vector3::new(0.0, 0.0, 0.5)));

        camera.process_keyboard(CameraMovement::Up, 2.0);
        assert!(approx(camera.position(), Vector3::new(0.0, 5.0, 0.5)));

        camera.process_keyboard(CameraMovement::Right, 1.0);
        assert!(approx(camera.position(), Vector3::new(2.5, 5.0, 0.5)));
    }

    #[test]
    fn test_turning_changes_yaw_only() {
        let mut camera = Camera::default();
        camera.process_keyboard(CameraMovement::TurnRight, 1.5);
        assert!((camera.yaw() - 0.0).abs() < 1e-4);
        assert!(approx(camera.front(), Vector3::new(1.0, 0.0, 0.0)));
        assert_eq!(camera.position(), Vector3::new(0.0, 0.0, 3.0));
    }

    #[test]
    fn test_set_front_recovers_angles() {
        let mut camera = Camera::default();
        let front = Vector3::new(1.0, 1.0, 0.0).normalize();
        assert!(camera.set_front(front));
        assert!((camera.yaw() - 0.0).abs() < 1e-4);
        assert!((camera.pitch() - 45.0).abs() < 1e-4);
        assert!(approx(camera.front(), front));

        assert!(!camera.set_front(Vector3::zeros()));
        assert!(approx(camera.front(), front));
    }

    #[test]
    fn test_view_matrix_moves_eye_to_origin() {
        let camera = Camera::default();
        let eye = camera.view_matrix() * crate::math::Vector4::new(0.0, 0.0, 3.0, 1.0);
        assert!(eye.xyz().norm() < 1e-6);
    }
}
