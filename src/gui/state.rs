//! 调试面板状态
//!
//! 只保存面板自身的选择与统计，场景数据直接编辑 `ProgramState`。

/// 调试面板状态
pub struct OverlayState {
    // 性能监控
    pub fps: f32,
    pub frame_time_ms: f32,

    /// "Float slider" 的值，不参与渲染
    pub demo_value: f32,

    // 当前编辑的对象
    pub selected_point_light: usize,
    pub selected_spot_light: usize,
    pub selected_model: usize,

    /// 模型名称（顺序与 `ProgramState::models` 一致）
    pub model_names: Vec<String>,
}

impl OverlayState {
    pub fn new(model_names: Vec<String>) -> Self {
        Self {
            fps: 0.0,
            frame_time_ms: 0.0,
            demo_value: 0.0,
            selected_point_light: 0,
            selected_spot_light: 0,
            selected_model: 0,
            model_names,
        }
    }

    /// 更新性能统计
    pub fn update_performance(&mut self, fps: f32, frame_time_ms: f32) {
        self.fps = fps;
        self.frame_time_ms = frame_time_ms;
    }

    /// 把选择下标限制在集合长度内
    ///
    /// 集合为空时返回 None。
    pub fn clamp_selection(selected: &mut usize, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        *selected = (*selected).min(len - 1);
        Some(*selected)
    }

    /// 模型显示名称，越界时使用序号
    pub fn model_label(&self, index: usize) -> String {
        self.model_names
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("model {}", index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_selection() {
        let mut selected = 5;
        assert_eq!(OverlayState::clamp_selection(&mut selected, 3), Some(2));
        assert_eq!(selected, 2);

        let mut selected = 1;
        assert_eq!(OverlayState::clamp_selection(&mut selected, 3), Some(1));

        assert_eq!(OverlayState::clamp_selection(&mut selected, 0), None);
    }

    #[test]
    fn test_model_label_falls_back_to_index() {
        let state = OverlayState::new(vec!["backpack".to_string()]);
        assert_eq!(state.model_label(0), "backpack");
        assert_eq!(state.model_label(4), "model 4");
    }
}
