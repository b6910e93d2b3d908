//! 相机信息窗口

use crate::core::ProgramState;

/// "Camera info" 窗口内容
pub fn render(ui: &mut egui::Ui, state: &mut ProgramState) {
    let camera = &state.camera;
    let position = camera.position();
    let front = camera.front();

    ui.label(format!("Camera position: ({:.3}, {:.3}, {:.3})", position.x, position.y, position.z));
    ui.label(format!("(Yaw, Pitch): ({:.2}, {:.2})", camera.yaw(), camera.pitch()));
    ui.label(format!("Camera front: ({:.3}, {:.3}, {:.3})", front.x, front.y, front.z));
    ui.label(format!("Zoom: {:.1}°", camera.zoom()));

    ui.checkbox(&mut state.camera_mouse_update_enabled, "Camera mouse update");
}
