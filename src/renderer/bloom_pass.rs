//! HDR / 泛光后处理
//!
//! 场景总是先渲染到 `Rgba16Float` 目标，再由合成通道输出到交换链：
//!
//! ```text
//! HDR ──亮度提取──▶ ping[0] ──水平模糊──▶ ping[1] ──垂直模糊──▶ ping[0] ... ──┐
//!  │                                                                       ▼
//!  └────────────────────────────────────────────────────────────────▶ 合成（曝光色调映射）
//! ```
//!
//! 泛光关闭时只执行合成通道，直接截断到 [0, 1]。

use tracing::debug;

use crate::gfx::{Texture, HDR_FORMAT};
use crate::renderer::uniforms::PostUniform;

/// 模糊结束后结果所在的 ping-pong 目标
///
/// 亮度提取写入 ping[0]，第 k 次模糊从 ping[k % 2] 读取、写入另一个。
pub fn final_ping_index(blur_passes: u32) -> usize {
    (blur_passes % 2) as usize
}

/// 与窗口尺寸相关的目标与绑定组
struct Targets {
    hdr: Texture,
    ping: [Texture; 2],
    bright_bind_group: wgpu::BindGroup,
    /// [水平：读 ping[0]，垂直：读 ping[1]]
    blur_bind_groups: [wgpu::BindGroup; 2],
    /// 分别以 ping[0] / ping[1] 作为泛光纹理
    composite_bind_groups: [wgpu::BindGroup; 2],
}

pub struct BloomPass {
    bright_pipeline: wgpu::RenderPipeline,
    blur_pipeline: wgpu::RenderPipeline,
    composite_pipeline: wgpu::RenderPipeline,
    layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    composite_buffer: wgpu::Buffer,
    blur_buffers: [wgpu::Buffer; 2],
    targets: Targets,
}

impl BloomPass {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat, width: u32, height: u32) -> Self {
        debug!(width, height, "Creating bloom pass");

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Bloom Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/bloom.wgsl").into()),
        });

        let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Post Bind Group Layout"),
            entries: &[
                texture_entry(0),
                texture_entry(1),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Post Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let uniform_buffer = |label, contents: PostUniform| {
            use wgpu::util::DeviceExt;
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(&[contents]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            })
        };
        let composite_buffer = uniform_buffer("Composite Uniform", PostUniform::composite(1.0, 1.0, false));
        let blur_buffers = [
            uniform_buffer("Horizontal Blur Uniform", PostUniform::blur(true)),
            uniform_buffer("Vertical Blur Uniform", PostUniform::blur(false)),
        ];

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Post Pipeline Layout"),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });

        let fullscreen_pipeline = |label, entry_point, format| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: "vs_fullscreen",
                    buffers: &[],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point,
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState::default(),
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
            })
        };

        let bright_pipeline = fullscreen_pipeline("Bright Pass Pipeline", "fs_bright", HDR_FORMAT);
        let blur_pipeline = fullscreen_pipeline("Blur Pipeline", "fs_blur", HDR_FORMAT);
        let composite_pipeline = fullscreen_pipeline("Composite Pipeline", "fs_composite", surface_format);

        let targets = Self::create_targets(device, &layout, &sampler, &composite_buffer, &blur_buffers, width, height);

        Self {
            bright_pipeline,
            blur_pipeline,
            composite_pipeline,
            layout,
            sampler,
            composite_buffer,
            blur_buffers,
            targets,
        }
    }

    fn create_targets(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        composite_buffer: &wgpu::Buffer,
        blur_buffers: &[wgpu::Buffer; 2],
        width: u32,
        height: u32,
    ) -> Targets {
        let hdr = Texture::render_target(device, width, height, HDR_FORMAT, "HDR Scene Target");
        let ping = [
            Texture::render_target(device, width, height, HDR_FORMAT, "Bloom Ping"),
            Texture::render_target(device, width, height, HDR_FORMAT, "Bloom Pong"),
        ];

        let bind_group = |label, scene: &Texture, bloom: &Texture, uniform: &wgpu::Buffer| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout,
                entries: &[
                    wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(&scene.view) },
                    wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::TextureView(&bloom.view) },
                    wgpu::BindGroupEntry { binding: 2, resource: wgpu::BindingResource::Sampler(sampler) },
                    wgpu::BindGroupEntry { binding: 3, resource: uniform.as_entire_binding() },
                ],
            })
        };

        // 第二个纹理槽不能绑定本通道的输出，未使用时绑定 HDR 目标
        let bright_bind_group = bind_group("Bright Pass Bind Group", &hdr, &ping[1], composite_buffer);
        let blur_bind_groups = [
            bind_group("Horizontal Blur Bind Group", &ping[0], &hdr, &blur_buffers[0]),
            bind_group("Vertical Blur Bind Group", &ping[1], &hdr, &blur_buffers[1]),
        ];
        let composite_bind_groups = [
            bind_group("Composite Bind Group 0", &hdr, &ping[0], composite_buffer),
            bind_group("Composite Bind Group 1", &hdr, &ping[1], composite_buffer),
        ];

        Targets {
            hdr,
            ping,
            bright_bind_group,
            blur_bind_groups,
            composite_bind_groups,
        }
    }

    /// 窗口尺寸变化时重建目标
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.targets = Self::create_targets(
            device,
            &self.layout,
            &self.sampler,
            &self.composite_buffer,
            &self.blur_buffers,
            width,
            height,
        );
    }

    /// 场景渲染目标
    pub fn hdr_view(&self) -> &wgpu::TextureView {
        &self.targets.hdr.view
    }

    pub fn write(&self, queue: &wgpu::Queue, exposure: f32, threshold: f32, enabled: bool) {
        let uniform = PostUniform::composite(exposure, threshold, enabled);
        queue.write_buffer(&self.composite_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    /// 执行后处理并把结果写入 `output`
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, output: &wgpu::TextureView, enabled: bool, blur_passes: u32) {
        let targets = &self.targets;

        if enabled {
            fullscreen_pass(encoder, "Bright Pass", &targets.ping[0].view, &self.bright_pipeline, &targets.bright_bind_group);

            for k in 0..blur_passes as usize {
                let source = k % 2;
                fullscreen_pass(
                    encoder,
                    "Blur Pass",
                    &targets.ping[1 - source].view,
                    &self.blur_pipeline,
                    &targets.blur_bind_groups[source],
                );
            }
        }

        let bloom = final_ping_index(blur_passes);
        fullscreen_pass(
            encoder,
            "Composite Pass",
            output,
            &self.composite_pipeline,
            &targets.composite_bind_groups[bloom],
        );
    }
}

fn fullscreen_pass(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    target: &wgpu::TextureView,
    pipeline: &wgpu::RenderPipeline,
    bind_group: &wgpu::BindGroup,
) {
    let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });
    pass.set_pipeline(pipeline);
    pass.set_bind_group(0, bind_group, &[]);
    pass.draw(0..3, 0..1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_ping_index() {
        // 亮度提取后结果在 ping[0]
        assert_eq!(final_ping_index(0), 0);
        assert_eq!(final_ping_index(1), 1);
        assert_eq!(final_ping_index(10), 0);
    }
}
