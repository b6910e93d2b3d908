//! 场景控制窗口
//!
//! 直接编辑 `ProgramState` 中的背景色、光源、材质与模型变换。

use crate::component::{Attenuation, PhongColors};
use crate::core::ProgramState;
use crate::gui::state::OverlayState;
use crate::math::Vector3;

/// 三分量拖动编辑
fn vector_editor(ui: &mut egui::Ui, label: &str, value: &mut Vector3, speed: f64) -> bool {
    ui.horizontal(|ui| {
        ui.label(label);
        let mut changed = false;
        for component in value.iter_mut() {
            changed |= ui.add(egui::DragValue::new(component).speed(speed)).changed();
        }
        changed
    })
    .inner
}

fn colors_editor(ui: &mut egui::Ui, colors: &mut PhongColors) {
    vector_editor(ui, "ambient", &mut colors.ambient, 0.05);
    vector_editor(ui, "diffuse", &mut colors.diffuse, 0.05);
    vector_editor(ui, "specular", &mut colors.specular, 0.05);
}

fn attenuation_editor(ui: &mut egui::Ui, attenuation: &mut Attenuation) {
    ui.horizontal(|ui| {
        ui.label("constant");
        ui.add(egui::DragValue::new(&mut attenuation.constant).speed(0.05).clamp_range(0.0..=10.0));
        ui.label("linear");
        ui.add(egui::DragValue::new(&mut attenuation.linear).speed(0.01).clamp_range(0.0..=10.0));
        ui.label("quadratic");
        ui.add(egui::DragValue::new(&mut attenuation.quadratic).speed(0.01).clamp_range(0.0..=10.0));
    });
}

fn index_selector(ui: &mut egui::Ui, id: &str, selected: &mut usize, labels: impl Iterator<Item = String>) {
    let labels: Vec<String> = labels.collect();
    let current = labels.get(*selected).cloned().unwrap_or_default();
    egui::ComboBox::from_id_source(id)
        .selected_text(current)
        .show_ui(ui, |ui| {
            for (i, label) in labels.iter().enumerate() {
                ui.selectable_value(selected, i, label.as_str());
            }
        });
}

/// "Scene" 窗口内容
pub fn render(ui: &mut egui::Ui, overlay: &mut OverlayState, state: &mut ProgramState) {
    ui.label("Hello text");
    ui.add(egui::Slider::new(&mut overlay.demo_value, 0.0..=1.0).text("Float slider"));

    ui.horizontal(|ui| {
        ui.label("Background color");
        ui.color_edit_button_rgb(&mut state.clear_color);
    });

    // 第三个点光源位于路灯处，单独给出位置编辑
    if let Some(light) = state.point_lights.get_mut(2) {
        vector_editor(ui, "Light 3 position", &mut light.position, 0.05);
    }

    ui.separator();

    ui.collapsing("Point lights", |ui| {
        let count = state.point_lights.len();
        if let Some(index) = OverlayState::clamp_selection(&mut overlay.selected_point_light, count) {
            index_selector(ui, "point_light_selector", &mut overlay.selected_point_light, (0..count).map(|i| format!("pointLight[{}]", i)));
            let light = &mut state.point_lights[index];
            vector_editor(ui, "position", &mut light.position, 0.05);
            colors_editor(ui, &mut light.colors);
            attenuation_editor(ui, &mut light.attenuation);
        } else {
            ui.label("No point lights");
        }
    });

    ui.collapsing("Spot lights", |ui| {
        let count = state.spot_lights.len();
        if let Some(index) = OverlayState::clamp_selection(&mut overlay.selected_spot_light, count) {
            index_selector(ui, "spot_light_selector", &mut overlay.selected_spot_light, (0..count).map(|i| format!("spotLight[{}]", i)));
            let spot = &mut state.spot_lights[index];
            ui.label("position follows the point light with the same index");
            vector_editor(ui, "direction", &mut spot.direction, 0.02);
            colors_editor(ui, &mut spot.colors);
            attenuation_editor(ui, &mut spot.attenuation);
            ui.add(egui::Slider::new(&mut spot.cut_off, 0.0..=360.0).text("cutOff"));
            ui.add(egui::Slider::new(&mut spot.outer_cut_off, 0.0..=360.0).text("outerCutOff"));
        } else {
            ui.label("No spot lights");
        }
    });

    ui.collapsing("Models", |ui| {
        let count = state.models.len();
        if let Some(index) = OverlayState::clamp_selection(&mut overlay.selected_model, count) {
            let labels: Vec<String> = (0..count).map(|i| overlay.model_label(i)).collect();
            index_selector(ui, "model_selector", &mut overlay.selected_model, labels.into_iter());
            let transform = &mut state.models[index];
            vector_editor(ui, "position", &mut transform.position, 0.05);
            vector_editor(ui, "rotation", &mut transform.euler_angle, 1.0);
            ui.horizontal(|ui| {
                ui.label("scale");
                ui.add(egui::DragValue::new(&mut transform.scale).speed(0.001).clamp_range(0.0001..=100.0));
            });
        } else {
            ui.label("No models");
        }
    });

    ui.separator();

    ui.add(egui::Slider::new(&mut state.shininess, 0.0..=100.0).text("material.shininess"));
    ui.checkbox(&mut state.shadows_enabled, "Shadows (Space)");
    ui.checkbox(&mut state.bloom_enabled, "Bloom (B)");
    ui.add(egui::Slider::new(&mut state.exposure, crate::core::state::MIN_EXPOSURE..=10.0).text("Exposure (Q/E)"));

    state.sync_spot_positions();
}
