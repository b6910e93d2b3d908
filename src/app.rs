//! 应用主循环
//!
//! 持有渲染器、程序状态与输入系统，把 winit 事件分发给它们。

use std::time::Instant;

use tracing::{debug, error, info};
use winit::event::{DeviceEvent, ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::core::error::{Result, ViewerError};
use crate::core::{Config, InputAction, InputSystem, ProgramState, SceneConfig};
use crate::renderer::Renderer;
use crate::{viewer_info, viewer_warn};

/// 场景查看器
pub struct Viewer {
    config: Config,
    renderer: Renderer,
    state: ProgramState,
    input: InputSystem,
    last_frame: Instant,
}

impl Viewer {
    /// 加载场景与状态文件，创建窗口和渲染器
    pub fn new(event_loop: &EventLoop<()>, config: Config) -> Result<Self> {
        let scene = SceneConfig::from_file_or_default(&config.paths.scene_file);
        scene.validate()?;

        info!(
            models = scene.models.len(),
            point_lights = scene.point_lights.len(),
            spot_lights = scene.spot_lights.len(),
            shadows = scene.shadow.enabled,
            bloom = scene.bloom.enabled,
            "Scene configuration"
        );

        let mut state = ProgramState::new(&scene, &config.input);
        if let Err(e) = state.load_from_file(&config.paths.state_file) {
            viewer_warn!(path = %config.paths.state_file.display(), "Failed to read state file: {}", e);
        }

        let renderer = Renderer::new(event_loop, &config, &scene, &state)?;

        let mut input = InputSystem::new();
        if !state.overlay_enabled {
            input.lock_cursor(renderer.window());
        }

        Ok(Self {
            config,
            renderer,
            state,
            input,
            last_frame: Instant::now(),
        })
    }

    fn handle_window_event(&mut self, event: WindowEvent, elwt: &EventLoopWindowTarget<()>) {
        // 面板打开时先交给 egui
        let consumed = self.state.overlay_enabled && self.renderer.handle_gui_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down...");
                elwt.exit();
            }
            WindowEvent::Resized(size) => {
                debug!(width = size.width, height = size.height, "Window resized");
                self.renderer.resize(size.width, size.height);
            }
            WindowEvent::Focused(false) => {
                self.input.reset();
            }
            WindowEvent::KeyboardInput {
                event: KeyEvent {
                    physical_key: PhysicalKey::Code(code),
                    state,
                    repeat,
                    ..
                },
                ..
            } => {
                // 释放事件总是处理，避免按键卡住；F1 不受 egui 焦点影响
                if consumed && state == ElementState::Pressed && code != KeyCode::F1 {
                    return;
                }
                if let Some(action) = self.input.on_keyboard_input(code, state, repeat) {
                    self.handle_action(action, elwt);
                }
            }
            WindowEvent::MouseWheel { delta, .. } if !consumed => {
                self.input.on_mouse_wheel(delta);
            }
            WindowEvent::RedrawRequested => {
                self.frame(elwt);
            }
            _ => (),
        }
    }

    fn handle_action(&mut self, action: InputAction, elwt: &EventLoopWindowTarget<()>) {
        match action {
            InputAction::ToggleOverlay => {
                let enabled = self.state.toggle_overlay();
                if enabled {
                    self.input.unlock_cursor(self.renderer.window());
                } else {
                    self.input.lock_cursor(self.renderer.window());
                }
                viewer_info!(enabled, "Debug overlay toggled");
            }
            InputAction::ToggleShadows => {
                self.state.shadows_enabled = !self.state.shadows_enabled;
                viewer_info!(enabled = self.state.shadows_enabled, "Shadows toggled");
            }
            InputAction::ToggleBloom => {
                self.state.bloom_enabled = !self.state.bloom_enabled;
                viewer_info!(enabled = self.state.bloom_enabled, exposure = self.state.exposure, "Bloom toggled");
            }
            InputAction::Quit => {
                info!("Escape pressed, shutting down...");
                elwt.exit();
            }
        }
    }

    fn frame(&mut self, elwt: &EventLoopWindowTarget<()>) {
        let now = Instant::now();
        let delta_time = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        self.input.update(&mut self.state, delta_time);

        if let Err(e) = self.renderer.render(&mut self.state) {
            error!("Draw failed: {}", e);
            elwt.exit();
        }
    }

    /// 退出前保存状态
    fn shutdown(&mut self) {
        self.input.unlock_cursor(self.renderer.window());
        if let Err(e) = self.state.save_to_file(&self.config.paths.state_file) {
            error!(path = %self.config.paths.state_file.display(), "Failed to save program state: {}", e);
        }
    }
}

/// 创建事件循环并运行到窗口关闭
pub fn run(config: Config) -> Result<()> {
    let event_loop = EventLoop::new()
        .map_err(|e| ViewerError::Initialization(format!("Failed to create event loop: {}", e)))?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut viewer = Viewer::new(&event_loop, config)?;

    info!("Entering main loop...");

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { event, .. } => viewer.handle_window_event(event, elwt),
            Event::DeviceEvent {
                event: DeviceEvent::MouseMotion { delta },
                ..
            } => viewer.input.on_mouse_motion(delta),
            Event::AboutToWait => viewer.renderer.window().request_redraw(),
            Event::LoopExiting => viewer.shutdown(),
            _ => (),
        })
        .map_err(|e| ViewerError::Initialization(format!("Event loop terminated abnormally: {}", e)))
}
