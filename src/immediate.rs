//! Renders a [`DrawList`] with depth testing.
//!
//! Commands are tessellated on the CPU every frame into one line list and one
//! triangle list of colored vertices, then drawn with two pipelines sharing a
//! camera uniform.

use glam::{Mat4, Vec3};

use crate::draw::{Color, DrawCommand, DrawList};
use crate::gpu::{DEPTH_FORMAT, GpuContext};

/// Latitude bands per sphere.
pub const SPHERE_RINGS: u32 = 8;
/// Longitude slices per sphere.
pub const SPHERE_SEGMENTS: u32 = 12;
/// Sides per cylinder.
pub const CYLINDER_SEGMENTS: u32 = 12;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ColorVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl ColorVertex {
    fn new(position: Vec3, color: Color) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_array(),
        }
    }

    const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<ColorVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4],
    };
}

/// Vertex streams ready for upload.
#[derive(Debug, Default)]
pub struct Tessellation {
    /// Pairs of vertices, one pair per segment.
    pub lines: Vec<ColorVertex>,
    /// Triples of vertices, one triple per triangle.
    pub triangles: Vec<ColorVertex>,
}

impl Tessellation {
    pub fn from_list(list: &DrawList) -> Self {
        let mut out = Self::default();
        out.extend(list);
        out
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.triangles.clear();
    }

    pub fn extend(&mut self, list: &DrawList) {
        for command in list.commands() {
            match *command {
                DrawCommand::Line { start, end, color } => {
                    self.lines.push(ColorVertex::new(start, color));
                    self.lines.push(ColorVertex::new(end, color));
                }
                DrawCommand::Triangle { a, b, c, color } => self.triangle(a, b, c, color),
                DrawCommand::Sphere {
                    center,
                    radius,
                    color,
                } => self.sphere(center, radius, color),
                DrawCommand::Cylinder {
                    start,
                    end,
                    start_radius,
                    end_radius,
                    color,
                } => self.cylinder(start, end, start_radius, end_radius, color),
            }
        }
    }

    fn triangle(&mut self, a: Vec3, b: Vec3, c: Vec3, color: Color) {
        self.triangles.extend([
            ColorVertex::new(a, color),
            ColorVertex::new(b, color),
            ColorVertex::new(c, color),
        ]);
    }

    fn quad(&mut self, a: Vec3, b: Vec3, c: Vec3, d: Vec3, color: Color) {
        self.triangle(a, b, c, color);
        self.triangle(a, c, d, color);
    }

    fn sphere(&mut self, center: Vec3, radius: f32, color: Color) {
        if radius <= 0.0 {
            return;
        }
        let point = |ring: u32, segment: u32| {
            let theta = std::f32::consts::PI * ring as f32 / SPHERE_RINGS as f32;
            let phi = std::f32::consts::TAU * segment as f32 / SPHERE_SEGMENTS as f32;
            center
                + radius * Vec3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin())
        };

        for ring in 0..SPHERE_RINGS {
            for segment in 0..SPHERE_SEGMENTS {
                self.quad(
                    point(ring, segment),
                    point(ring, segment + 1),
                    point(ring + 1, segment + 1),
                    point(ring + 1, segment),
                    color,
                );
            }
        }
    }

    fn cylinder(&mut self, start: Vec3, end: Vec3, start_radius: f32, end_radius: f32, color: Color) {
        let Some(axis) = (end - start).try_normalize() else {
            return;
        };
        let u = axis.any_orthonormal_vector();
        let v = axis.cross(u);
        let rim = |origin: Vec3, radius: f32, segment: u32| {
            let angle = std::f32::consts::TAU * segment as f32 / CYLINDER_SEGMENTS as f32;
            origin + radius * (angle.cos() * u + angle.sin() * v)
        };

        for segment in 0..CYLINDER_SEGMENTS {
            let (s0, s1) = (rim(start, start_radius, segment), rim(start, start_radius, segment + 1));
            let (e0, e1) = (rim(end, end_radius, segment), rim(end, end_radius, segment + 1));
            self.quad(s0, s1, e1, e0, color);
            if start_radius > 0.0 {
                self.triangle(start, s1, s0, color);
            }
            if end_radius > 0.0 {
                self.triangle(end, e0, e1, color);
            }
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct CameraUniform {
    view_proj: [[f32; 4]; 4],
}

/// A vertex buffer that doubles when a frame outgrows it.
struct GrowableBuffer {
    buffer: wgpu::Buffer,
    capacity: usize,
    label: &'static str,
}

impl GrowableBuffer {
    fn new(gpu: &GpuContext, label: &'static str, capacity: usize) -> Self {
        Self {
            buffer: Self::create(gpu, label, capacity),
            capacity,
            label,
        }
    }

    fn create(gpu: &GpuContext, label: &'static str, capacity: usize) -> wgpu::Buffer {
        gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: (capacity * std::mem::size_of::<ColorVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn upload(&mut self, gpu: &GpuContext, vertices: &[ColorVertex]) {
        if vertices.len() > self.capacity {
            self.capacity = vertices.len().next_power_of_two();
            self.buffer = Self::create(gpu, self.label, self.capacity);
            log::debug!("{} grown to {} vertices", self.label, self.capacity);
        }
        if !vertices.is_empty() {
            gpu.queue
                .write_buffer(&self.buffer, 0, bytemuck::cast_slice(vertices));
        }
    }
}

/// GPU side of the 3D scene.
pub struct ImmediatePass {
    line_pipeline: wgpu::RenderPipeline,
    triangle_pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    line_buffer: GrowableBuffer,
    triangle_buffer: GrowableBuffer,
    tessellation: Tessellation,
}

impl ImmediatePass {
    pub fn new(gpu: &GpuContext) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Immediate Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/immediate.wgsl").into()),
        });

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Uniforms"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let camera_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Camera Layout"),
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
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Immediate Pipeline Layout"),
            bind_group_layouts: &[&camera_layout],
            push_constant_ranges: &[],
        });

        let pipeline = |label, topology| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs"),
                    buffers: &[ColorVertex::LAYOUT],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: gpu.config.format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::LessEqual,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        let line_pipeline = pipeline("Immediate Lines", wgpu::PrimitiveTopology::LineList);
        let triangle_pipeline =
            pipeline("Immediate Triangles", wgpu::PrimitiveTopology::TriangleList);

        Self {
            line_pipeline,
            triangle_pipeline,
            camera_buffer,
            camera_bind_group,
            line_buffer: GrowableBuffer::new(gpu, "Line Vertices", 4096),
            triangle_buffer: GrowableBuffer::new(gpu, "Triangle Vertices", 16384),
            tessellation: Tessellation::default(),
        }
    }

    /// Tessellates `list` and uploads it with the camera matrix.
    ///
    /// Call before the render pass that draws it begins.
    pub fn prepare(&mut self, gpu: &GpuContext, list: &DrawList, view_proj: Mat4) {
        let uniform = CameraUniform {
            view_proj: view_proj.to_cols_array_2d(),
        };
        gpu.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[uniform]));

        self.tessellation.clear();
        self.tessellation.extend(list);
        self.line_buffer.upload(gpu, &self.tessellation.lines);
        self.triangle_buffer.upload(gpu, &self.tessellation.triangles);
    }

    /// Draws what the last [`prepare`](Self::prepare) uploaded.
    pub fn render(&self, render_pass: &mut wgpu::RenderPass) {
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);

        let triangles = self.tessellation.triangles.len() as u32;
        if triangles > 0 {
            render_pass.set_pipeline(&self.triangle_pipeline);
            render_pass.set_vertex_buffer(0, self.triangle_buffer.buffer.slice(..));
            render_pass.draw(0..triangles, 0..1);
        }

        let lines = self.tessellation.lines.len() as u32;
        if lines > 0 {
            render_pass.set_pipeline(&self.line_pipeline);
            render_pass.set_vertex_buffer(0, self.line_buffer.buffer.slice(..));
            render_pass.draw(0..lines, 0..1);
        }
    }
}
