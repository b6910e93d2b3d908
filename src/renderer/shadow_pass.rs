//! 点光源阴影通道
//!
//! 从阴影光源位置向六个方向各渲染一次深度，写入深度立方体贴图。
//! 深度值为片元到光源的线性距离除以远平面。

use tracing::debug;

use crate::gfx::{DepthCubeTexture, DEPTH_FORMAT};
use crate::math::{matrix, utils::deg_to_rad, Matrix4, Vector3, Vector4};
use crate::renderer::gpu_model::GpuModel;
use crate::renderer::uniforms::ShadowFaceUniform;

/// 立方体六个面的观察方向与上方向（+X, -X, +Y, -Y, +Z, -Z）
const FACE_DIRECTIONS: [([f32; 3], [f32; 3]); 6] = [
    ([1.0, 0.0, 0.0], [0.0, -1.0, 0.0]),
    ([-1.0, 0.0, 0.0], [0.0, -1.0, 0.0]),
    ([0.0, 1.0, 0.0], [0.0, 0.0, 1.0]),
    ([0.0, -1.0, 0.0], [0.0, 0.0, -1.0]),
    ([0.0, 0.0, 1.0], [0.0, -1.0, 0.0]),
    ([0.0, 0.0, -1.0], [0.0, -1.0, 0.0]),
];

/// 六个面的光源空间矩阵
///
/// 渲染到纹理时行 0 对应裁剪空间 +Y，立方体采样时行 0 对应 t = 0，
/// 因此投影额外翻转 Y 轴。
pub fn face_view_projections(light_position: Vector3, near: f32, far: f32) -> [Matrix4; 6] {
    let flip_y = Matrix4::from_diagonal(&Vector4::new(1.0, -1.0, 1.0, 1.0));
    let projection = flip_y * matrix::perspective(deg_to_rad(90.0), 1.0, near, far);

    FACE_DIRECTIONS.map(|(direction, up)| {
        let target = light_position + Vector3::from(direction);
        projection * matrix::look_at(&light_position, &target, &Vector3::from(up))
    })
}

/// 阴影通道
pub struct ShadowPass {
    pipeline: wgpu::RenderPipeline,
    cube: DepthCubeTexture,
    face_buffers: Vec<wgpu::Buffer>,
    face_bind_groups: Vec<wgpu::BindGroup>,
}

impl ShadowPass {
    pub fn new(device: &wgpu::Device, size: u32, model_layout: &wgpu::BindGroupLayout) -> Self {
        debug!(size, "Creating shadow pass");

        let cube = DepthCubeTexture::new(device, size);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Shadow Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/shadow.wgsl").into()),
        });

        let face_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Shadow Face Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let face_buffers: Vec<wgpu::Buffer> = (0..6)
            .map(|_| {
                device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some("Shadow Face Uniform"),
                    size: std::mem::size_of::<ShadowFaceUniform>() as u64,
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                })
            })
            .collect();

        let face_bind_groups = face_buffers
            .iter()
            .map(|buffer| {
                device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("Shadow Face Bind Group"),
                    layout: &face_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: buffer.as_entire_binding(),
                    }],
                })
            })
            .collect();

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Shadow Pipeline Layout"),
            bind_group_layouts: &[&face_layout, model_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Shadow Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[super::model_pass::vertex_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        Self { pipeline, cube, face_buffers, face_bind_groups }
    }

    /// 采样用的立方体视图
    pub fn cube_view(&self) -> &wgpu::TextureView {
        &self.cube.cube_view
    }

    /// 写入六个面的矩阵
    pub fn write_faces(&self, queue: &wgpu::Queue, light_position: Vector3, near: f32, far: f32) {
        let faces = face_view_projections(light_position, near, far);
        for (buffer, light_space) in self.face_buffers.iter().zip(faces.iter()) {
            let uniform = ShadowFaceUniform::new(light_space, light_position, far);
            queue.write_buffer(buffer, 0, bytemuck::cast_slice(&[uniform]));
        }
    }

    /// 渲染六个面；`models` 为空时仍会清除深度
    pub fn render<'a>(&self, encoder: &mut wgpu::CommandEncoder, models: &[&'a GpuModel]) {
        for (face_view, bind_group) in self.cube.face_views.iter().zip(&self.face_bind_groups) {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shadow Pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: face_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, bind_group, &[]);
            for model in models {
                model.draw_depth(&mut pass);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(m: &Matrix4, p: Vector3) -> Vector3 {
        let clip = m * Vector4::new(p.x, p.y, p.z, 1.0);
        clip.xyz() / clip.w
    }

    #[test]
    fn test_each_face_looks_along_its_axis() {
        let light = Vector3::new(-4.0, 2.7, -1.6);
        let faces = face_view_projections(light, 1.0, 25.0);

        for (face, (direction, _)) in faces.iter().zip(FACE_DIRECTIONS.iter()) {
            let ndc = project(face, light + Vector3::from(*direction) * 5.0);
            assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4, "{:?}", ndc);
            assert!(ndc.z > 0.0 && ndc.z < 1.0);
        }
    }

    #[test]
    fn test_positive_x_face_matches_cube_sampling() {
        // +X 面：s = (-rz / |rx| + 1) / 2，t = (-ry / |rx| + 1) / 2
        let faces = face_view_projections(Vector3::zeros(), 0.1, 25.0);

        let ndc = project(&faces[0], Vector3::new(1.0, 0.5, 0.0));
        let v = (1.0 - ndc.y) / 2.0;
        assert!((v - 0.25).abs() < 1e-4);

        let ndc = project(&faces[0], Vector3::new(1.0, 0.0, 0.5));
        let u = (ndc.x + 1.0) / 2.0;
        assert!((u - 0.25).abs() < 1e-4);
    }

    #[test]
    fn test_positive_y_face_matches_cube_sampling() {
        // +Y 面：s = (rx / |ry| + 1) / 2，t = (rz / |ry| + 1) / 2
        let faces = face_view_projections(Vector3::zeros(), 0.1, 25.0);

        let ndc = project(&faces[2], Vector3::new(0.5, 1.0, 0.5));
        let u = (ndc.x + 1.0) / 2.0;
        let v = (1.0 - ndc.y) / 2.0;
        assert!((u - 0.75).abs() < 1e-4);
        assert!((v - 0.75).abs() < 1e-4);
    }
}
