//! 渲染器模块
//!
//! `Renderer` 持有 wgpu 设备与所有渲染通道，每帧按以下顺序录制命令：
//!
//! ```text
//! 阴影通道（6 个面） ─▶ 主通道（模型 + 天空盒，HDR） ─▶ 后处理（泛光 / 合成） ─▶ GUI
//! ```
//!
//! 各通道只依赖 `ProgramState` 中的数据，不保存场景状态。

pub mod uniforms;
pub mod gpu_model;
pub mod model_pass;
pub mod shadow_pass;
pub mod skybox_pass;
pub mod bloom_pass;

use std::path::PathBuf;

use tracing::{debug, error, info, warn};
use winit::event_loop::EventLoop;
use winit::window::Window;

use crate::core::error::{GraphicsError, Result};
use crate::core::scene::{BloomConfig, ShadowConfig};
use crate::core::{Config, ProgramState, SceneConfig};
use crate::geometry::loaders::load_mesh;
use crate::gfx::{Texture, TextureCache, WgpuBackend};
use crate::gui::GuiManager;

use bloom_pass::BloomPass;
use gpu_model::{model_bind_group_layout, GpuModel};
use model_pass::ModelPass;
use shadow_pass::ShadowPass;
use skybox_pass::SkyboxPass;
use uniforms::{CameraUniform, LightsUniform, SkyboxUniform};

pub struct Renderer {
    gfx: WgpuBackend,
    depth: Texture,

    model_pass: ModelPass,
    shadow_pass: ShadowPass,
    skybox_pass: SkyboxPass,
    bloom_pass: BloomPass,

    /// 与 `ProgramState::models` 一一对应，加载失败的位置为 None
    models: Vec<Option<GpuModel>>,
    /// 保持纹理存活，模型绑定组引用其中的视图
    _textures: TextureCache,

    shadow: ShadowConfig,
    bloom: BloomConfig,

    gui: GuiManager,
}

impl Renderer {
    pub fn new(
        event_loop: &EventLoop<()>,
        config: &Config,
        scene: &SceneConfig,
        state: &ProgramState,
    ) -> Result<Self> {
        info!("Creating renderer");

        let gfx = WgpuBackend::new(event_loop, config)?;
        let (width, height) = gfx.size();
        let resources = &config.paths.resources_dir;

        let depth = Texture::depth(&gfx.device, width, height);

        // 主通道的帧绑定组引用阴影立方体，阴影通道先创建
        let model_layout = model_bind_group_layout(&gfx.device);
        let shadow_pass = ShadowPass::new(&gfx.device, config.graphics.shadow_map_size, &model_layout);
        let model_pass = ModelPass::new(&gfx.device, &gfx.queue, shadow_pass.cube_view(), model_layout);

        let faces: Vec<PathBuf> = scene.skybox.faces.iter().map(|face| resources.join(face)).collect();
        let skybox_pass = SkyboxPass::new(&gfx.device, &gfx.queue, &faces);

        let bloom_pass = BloomPass::new(&gfx.device, gfx.surface_config.format, width, height);

        let mut textures = TextureCache::new();
        let mut models = Vec::with_capacity(scene.models.len());
        {
            let ctx = model_pass.material_context(&gfx.device, &gfx.queue);
            for (model, transform) in scene.models.iter().zip(&state.models) {
                let path = resources.join(&model.path);
                match load_mesh(&path) {
                    Ok(mesh) => {
                        info!(
                            model = %model.name,
                            vertices = mesh.vertices.len(),
                            indices = mesh.indices.len(),
                            "Model loaded"
                        );
                        models.push(Some(GpuModel::upload(
                            &ctx,
                            &mut textures,
                            model_pass.model_layout(),
                            &mesh,
                            transform,
                            &model.name,
                        )));
                    }
                    Err(e) => {
                        warn!(model = %model.name, path = %path.display(), "Failed to load model: {}", e);
                        models.push(None);
                    }
                }
            }
        }
        debug!(textures = textures.len(), "Texture cache populated");

        let model_names = scene.models.iter().map(|m| m.name.clone()).collect();
        let gui = GuiManager::new(&gfx.device, gfx.surface_config.format, gfx.window(), model_names);

        info!("Renderer created successfully");

        Ok(Self {
            gfx,
            depth,
            model_pass,
            shadow_pass,
            skybox_pass,
            bloom_pass,
            models,
            _textures: textures,
            shadow: scene.shadow.clone(),
            bloom: scene.bloom.clone(),
            gui,
        })
    }

    /// 处理窗口大小调整
    pub fn resize(&mut self, width: u32, height: u32) {
        if !self.gfx.reconfigure_surface(width, height) {
            debug!("Ignoring resize to zero-sized window");
            return;
        }
        debug!("Resizing to {}x{}", width, height);
        self.depth = Texture::depth(&self.gfx.device, width, height);
        self.bloom_pass.resize(&self.gfx.device, width, height);
    }

    /// 绘制一帧
    ///
    /// GUI 在此构建，面板对 `state` 的修改从下一帧开始生效。
    pub fn render(&mut self, state: &mut ProgramState) -> Result<()> {
        // 1. 获取交换链纹理
        let output = match self.gfx.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("Surface lost or outdated, reconfiguring");
                self.gfx.restore_surface();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("Timed out acquiring surface texture, skipping frame");
                return Ok(());
            }
            Err(e) => {
                error!("Failed to acquire surface texture: {}", e);
                return Err(GraphicsError::SwapchainError(format!("Failed to acquire next image: {}", e)).into());
            }
        };
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        // 2. 更新 uniform
        let queue = &self.gfx.queue;
        let aspect = self.gfx.aspect_ratio();

        for (model, transform) in self.models.iter().zip(&state.models) {
            if let Some(model) = model {
                model.write_transform(queue, transform);
            }
        }

        self.model_pass.write_frame(
            queue,
            &CameraUniform::new(&state.camera, aspect),
            &LightsUniform::new(state, self.shadow.far_plane, self.shadow.bias),
        );
        self.skybox_pass.write(queue, &SkyboxUniform::new(&state.camera, aspect));
        self.bloom_pass.write(queue, state.exposure, self.bloom.threshold, state.bloom_enabled);

        let mut encoder = self.gfx.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        // 3. 阴影通道
        if state.shadows_enabled {
            self.shadow_pass.write_faces(
                queue,
                state.shadow_light.position,
                self.shadow.near_plane,
                self.shadow.far_plane,
            );
            let casters: Vec<&GpuModel> = self.models.iter().flatten().collect();
            self.shadow_pass.render(&mut encoder, &casters);
        }

        // 4. 主通道：模型 + 天空盒
        {
            let [r, g, b] = state.clear_color;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: self.bloom_pass.hdr_view(),
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.model_pass.draw(&mut render_pass, self.models.iter().flatten());
            self.skybox_pass.draw(&mut render_pass);
        }

        // 5. 后处理输出到交换链
        self.bloom_pass.render(&mut encoder, &view, state.bloom_enabled, self.bloom.blur_passes);

        // 6. 调试面板
        self.gui.record_frame();
        let gui_buffers = if state.overlay_enabled {
            let window = self.gfx.window();
            self.gui.update(window, state);
            self.gui.render(&self.gfx.device, &self.gfx.queue, &mut encoder, &view, window)?
        } else {
            Vec::new()
        };

        // 7. 提交命令
        self.gfx.queue.submit(submission_order(gui_buffers, encoder.finish()));
        output.present();

        Ok(())
    }

    /// 处理 GUI 事件
    /// 返回 true 如果事件被 GUI 消费
    pub fn handle_gui_event(&mut self, event: &winit::event::WindowEvent) -> bool {
        self.gui.handle_event(self.gfx.window(), event)
    }

    /// 获取窗口引用
    pub fn window(&self) -> &Window {
        self.gfx.window()
    }
}

/// 提交顺序：GUI 回调的命令缓冲在前，帧命令缓冲在后
fn submission_order<T>(callbacks: Vec<T>, frame: T) -> impl Iterator<Item = T> {
    callbacks.into_iter().chain(std::iter::once(frame))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gui_callbacks_submit_before_frame() {
        let order: Vec<&str> = submission_order(vec!["paint_a", "paint_b"], "frame").collect();
        assert_eq!(order, ["paint_a", "paint_b", "frame"]);
    }

    #[test]
    fn test_frame_alone_without_callbacks() {
        let order: Vec<u32> = submission_order(Vec::new(), 7).collect();
        assert_eq!(order, [7]);
    }
}
