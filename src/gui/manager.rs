//! GUI 管理器
//!
//! GuiManager 负责集成 egui 和 wgpu，
//! 处理输入事件，构建调试窗口，并把界面绘制到交换链上。

use egui_wgpu::{Renderer as EguiRenderer, ScreenDescriptor};
use egui_winit::State as EguiState;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::core::error::Result;
use crate::core::ProgramState;
use crate::gui::metrics::PerformanceMetrics;
use crate::gui::panels;
use crate::gui::state::OverlayState;

/// GUI 管理器（使用 egui + wgpu）
pub struct GuiManager {
    // egui 核心组件
    context: egui::Context,
    state: EguiState,
    renderer: EguiRenderer,

    // 面板状态和统计
    overlay: OverlayState,
    metrics: PerformanceMetrics,
}

impl GuiManager {
    /// 创建 GUI 管理器
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        window: &Window,
        model_names: Vec<String>,
    ) -> Self {
        let context = egui::Context::default();
        let state = EguiState::new(context.clone(), context.viewport_id(), window, None, None);
        let renderer = EguiRenderer::new(device, surface_format, None, 1);

        Self {
            context,
            state,
            renderer,
            overlay: OverlayState::new(model_names),
            metrics: PerformanceMetrics::new(),
        }
    }

    /// 处理输入事件
    /// 返回 true 如果事件被 GUI 消费
    pub fn handle_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    /// 记录一帧（面板关闭时也统计）
    pub fn record_frame(&mut self) {
        self.metrics.record_frame();
        self.overlay
            .update_performance(self.metrics.fps(), self.metrics.frame_time_ms());
    }

    /// 构建本帧的调试窗口
    pub fn update(&mut self, window: &Window, program: &mut ProgramState) {
        let raw_input = self.state.take_egui_input(window);
        self.context.begin_frame(raw_input);

        let overlay = &mut self.overlay;

        egui::Window::new("Scene")
            .default_pos([10.0, 10.0])
            .default_width(320.0)
            .show(&self.context, |ui| {
                panels::scene::render(ui, overlay, program);
                ui.separator();
                panels::performance::render(ui, overlay);
            });

        egui::Window::new("Camera info")
            .default_pos([350.0, 10.0])
            .show(&self.context, |ui| {
                panels::camera::render(ui, program);
            });
    }

    /// 渲染 GUI（绘制到 wgpu）
    ///
    /// 返回 egui 绘制回调产生的命令缓冲，需要先于 `encoder` 提交。
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        window: &Window,
    ) -> Result<Vec<wgpu::CommandBuffer>> {
        // 结束帧，获取输出
        let full_output = self.context.end_frame();

        // 处理平台输出（光标、复制粘贴等）
        self.state.handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self.context.tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = screen_descriptor(window.inner_size(), full_output.pixels_per_point);

        for (id, image_delta) in &full_output.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, image_delta);
        }

        let callback_buffers = self
            .renderer
            .update_buffers(device, queue, encoder, &paint_jobs, &screen_descriptor);

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("GUI Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,  // 保留场景渲染结果
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.renderer.render(&mut render_pass, &paint_jobs, &screen_descriptor);
        }

        // 清理释放的纹理
        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }

        Ok(callback_buffers)
    }
}

/// 窗口物理尺寸对应的 egui 屏幕描述
fn screen_descriptor(size: PhysicalSize<u32>, pixels_per_point: f32) -> ScreenDescriptor {
    ScreenDescriptor {
        size_in_pixels: [size.width, size.height],
        pixels_per_point,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_descriptor_uses_physical_size() {
        let descriptor = screen_descriptor(PhysicalSize::new(1600, 900), 2.0);
        assert_eq!(descriptor.size_in_pixels, [1600, 900]);
        assert_eq!(descriptor.pixels_per_point, 2.0);
    }
}
