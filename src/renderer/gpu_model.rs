//! GPU 侧模型
//!
//! 把 `MeshData` 上传为顶点 / 索引缓冲，并为每个材质创建贴图绑定组。

use tracing::debug;
use wgpu::util::DeviceExt;

use crate::component::Transform;
use crate::gfx::{Texture, TextureCache, TextureKind};
use crate::geometry::MeshData;
use crate::renderer::uniforms::ModelUniform;

/// 使用同一材质的一段索引
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawRange {
    pub index_start: u32,
    pub index_count: u32,
    /// 指向 `GpuModel::materials`；没有材质时指向默认材质（最后一个）
    pub material: usize,
}

/// 把子网格整理为绘制区间
///
/// 没有材质或材质索引越界的子网格使用 `default_material`，空子网格被跳过。
pub fn draw_ranges(mesh: &MeshData, default_material: usize) -> Vec<DrawRange> {
    mesh.subsets
        .iter()
        .filter(|subset| subset.face_count > 0)
        .map(|subset| DrawRange {
            index_start: subset.index_start(),
            index_count: subset.index_count(),
            material: subset
                .material
                .filter(|&index| index < mesh.materials.len())
                .unwrap_or(default_material),
        })
        .collect()
}

/// 材质贴图绑定组布局：漫反射、镜面、采样器
pub fn material_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
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

    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Material Bind Group Layout"),
        entries: &[
            texture_entry(0),
            texture_entry(1),
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

/// 模型矩阵绑定组布局（主通道和阴影通道共用）
pub fn model_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Model Bind Group Layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

/// 创建材质绑定组需要的共享资源
pub struct MaterialContext<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub layout: &'a wgpu::BindGroupLayout,
    pub sampler: &'a wgpu::Sampler,
    pub placeholder_diffuse: &'a Texture,
    pub placeholder_specular: &'a Texture,
}

impl MaterialContext<'_> {
    fn bind_group(&self, label: &str, diffuse: &Texture, specular: &Texture) -> wgpu::BindGroup {
        self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: self.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&diffuse.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&specular.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(self.sampler),
                },
            ],
        })
    }
}

/// 已上传到 GPU 的模型
pub struct GpuModel {
    pub name: String,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    ranges: Vec<DrawRange>,
    materials: Vec<wgpu::BindGroup>,
    uniform_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
}

impl GpuModel {
    pub fn upload(
        ctx: &MaterialContext<'_>,
        textures: &mut TextureCache,
        model_layout: &wgpu::BindGroupLayout,
        mesh: &MeshData,
        transform: &Transform,
        name: &str,
    ) -> Self {
        let device = ctx.device;

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", name)),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", name)),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        for material in &mesh.materials {
            if let Some(path) = &material.diffuse_texture {
                textures.load(device, ctx.queue, path, TextureKind::Diffuse);
            }
            if let Some(path) = &material.specular_texture {
                textures.load(device, ctx.queue, path, TextureKind::Specular);
            }
        }

        // 每个材质一个绑定组，最后追加默认材质
        let mut materials: Vec<wgpu::BindGroup> = mesh
            .materials
            .iter()
            .map(|material| {
                let diffuse = material
                    .diffuse_texture
                    .as_deref()
                    .and_then(|path| textures.get(path, TextureKind::Diffuse))
                    .unwrap_or(ctx.placeholder_diffuse);
                let specular = material
                    .specular_texture
                    .as_deref()
                    .and_then(|path| textures.get(path, TextureKind::Specular))
                    .unwrap_or(ctx.placeholder_specular);
                ctx.bind_group(&material.name, diffuse, specular)
            })
            .collect();
        materials.push(ctx.bind_group("Default Material", ctx.placeholder_diffuse, ctx.placeholder_specular));

        let ranges = draw_ranges(mesh, materials.len() - 1);

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Model Uniform", name)),
            contents: bytemuck::cast_slice(&[ModelUniform::from_transform(transform)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let model_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{} Model Bind Group", name)),
            layout: model_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        debug!(model = name, ranges = ranges.len(), materials = materials.len(), "Model uploaded");

        Self {
            name: name.to_string(),
            vertex_buffer,
            index_buffer,
            ranges,
            materials,
            uniform_buffer,
            model_bind_group,
        }
    }

    /// 更新模型矩阵
    pub fn write_transform(&self, queue: &wgpu::Queue, transform: &Transform) {
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::cast_slice(&[ModelUniform::from_transform(transform)]),
        );
    }

    /// 使用材质绘制（主通道，材质位于 group 2）
    pub fn draw<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_bind_group(1, &self.model_bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        for range in &self.ranges {
            pass.set_bind_group(2, &self.materials[range.material], &[]);
            pass.draw_indexed(range.index_start..range.index_start + range.index_count, 0, 0..1);
        }
    }

    /// 只绘制几何（阴影通道）
    pub fn draw_depth<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_bind_group(1, &self.model_bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        for range in &self.ranges {
            pass.draw_indexed(range.index_start..range.index_start + range.index_count, 0, 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{MaterialData, Subset, Vertex};

    fn mesh() -> MeshData {
        let mut mesh = MeshData::with_name("test");
        mesh.vertices = vec![Vertex::default(); 6];
        mesh.indices = vec![0, 1, 2, 3, 4, 5];
        mesh.materials = vec![MaterialData::default()];
        mesh.subsets = vec![
            Subset::new(0, 0, 3, 0, 1).with_material(Some(0)),
            Subset::new(1, 3, 3, 1, 1),
            Subset::new(2, 6, 0, 2, 0),
        ];
        mesh
    }

    #[test]
    fn test_draw_ranges() {
        let ranges = draw_ranges(&mesh(), 1);
        assert_eq!(
            ranges,
            vec![
                DrawRange { index_start: 0, index_count: 3, material: 0 },
                DrawRange { index_start: 3, index_count: 3, material: 1 },
            ]
        );
    }

    #[test]
    fn test_out_of_range_material_uses_default() {
        let mut m = mesh();
        m.subsets[0].material = Some(7);
        assert_eq!(draw_ranges(&m, 1)[0].material, 1);
    }
}
