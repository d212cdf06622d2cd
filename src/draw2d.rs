use crate::assets::{FontAtlas, GlyphInfo};
use crate::draw::Color;
use crate::gpu::{DEPTH_FORMAT, GpuContext};
use crate::widgets::{Rect, UiShape};

/// Vertex for 2D panel and text rendering.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex2d {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex2d {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex2d>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x2,
            },
            // uv
            wgpu::VertexAttribute {
                offset: 8,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x2,
            },
            // color
            wgpu::VertexAttribute {
                offset: 16,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x4,
            },
        ],
    };
}

/// Uniforms for 2D rendering.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Draw2dUniforms {
    resolution: [f32; 2],
    _padding: [f32; 2],
}

const INITIAL_VERTICES: usize = 4096;

/// Two triangles covering `(x0, y0)..(x1, y1)` with matching UVs.
fn quad(x0: f32, y0: f32, x1: f32, y1: f32, uv: [f32; 4], color: [f32; 4]) -> [Vertex2d; 6] {
    let [u0, v0, u1, v1] = uv;
    let vert = |x, y, u, v| Vertex2d {
        position: [x, y],
        uv: [u, v],
        color,
    };
    [
        vert(x0, y0, u0, v0),
        vert(x1, y0, u1, v0),
        vert(x0, y1, u0, v1),
        vert(x1, y0, u1, v0),
        vert(x1, y1, u1, v1),
        vert(x0, y1, u0, v1),
    ]
}

/// Lays `text` out on one line with its top edge at `y`.
///
/// Characters without a glyph advance by half the font size.
fn layout_text(
    glyph: impl Fn(char) -> Option<GlyphInfo>,
    size: f32,
    x: f32,
    y: f32,
    text: &str,
    color: Color,
) -> Vec<Vertex2d> {
    let c = color.to_array();
    let mut vertices = Vec::with_capacity(text.len() * 6);
    let mut cursor_x = x;
    let baseline_y = y + size;

    for ch in text.chars() {
        let Some(glyph) = glyph(ch) else {
            cursor_x += size * 0.5;
            continue;
        };

        if glyph.width > 0 && glyph.height > 0 {
            // fontdue's ymin is measured up from the baseline to the glyph bottom.
            let gx = cursor_x + glyph.offset_x;
            let gy = baseline_y - glyph.offset_y - glyph.height as f32;
            let uv = [
                glyph.uv[0],
                glyph.uv[1],
                glyph.uv[0] + glyph.uv[2],
                glyph.uv[1] + glyph.uv[3],
            ];
            vertices.extend_from_slice(&quad(
                gx,
                gy,
                gx + glyph.width as f32,
                gy + glyph.height as f32,
                uv,
                c,
            ));
        }

        cursor_x += glyph.advance;
    }

    vertices
}

/// Immediate-mode 2D overlay for the control panel.
///
/// All draw calls are batched and rendered in a single pass at the end of the
/// frame, on top of the 3D scene. Text is dropped when no font is loaded.
pub struct Draw2d {
    colored_pipeline: wgpu::RenderPipeline,
    textured_pipeline: wgpu::RenderPipeline,

    vertex_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,

    font: Option<(FontAtlas, wgpu::BindGroup)>,

    colored_vertices: Vec<Vertex2d>,
    text_vertices: Vec<Vertex2d>,
}

impl Draw2d {
    pub fn new(gpu: &GpuContext, font: Option<FontAtlas>) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Draw2d Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/draw2d.wgsl").into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Draw2d Uniforms"),
            size: std::mem::size_of::<Draw2dUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // group 0
        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Draw2d Uniform Layout"),
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

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Draw2d Uniform Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        // group 1
        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Draw2d Texture Layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let colored_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Draw2d Colored Pipeline Layout"),
                bind_group_layouts: &[&uniform_bind_group_layout],
                push_constant_ranges: &[],
            });

        let textured_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Draw2d Textured Pipeline Layout"),
                bind_group_layouts: &[&uniform_bind_group_layout, &texture_bind_group_layout],
                push_constant_ranges: &[],
            });

        let pipeline = |label, layout: &wgpu::PipelineLayout, fragment_entry| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs"),
                    buffers: &[Vertex2d::LAYOUT],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(fragment_entry),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: gpu.config.format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    ..Default::default()
                },
                // Shares the scene pass, so it carries the depth format but ignores depth.
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: false,
                    depth_compare: wgpu::CompareFunction::Always,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        let colored_pipeline = pipeline(
            "Draw2d Colored Pipeline",
            &colored_pipeline_layout,
            "fs_colored",
        );
        let textured_pipeline = pipeline(
            "Draw2d Textured Pipeline",
            &textured_pipeline_layout,
            "fs_textured",
        );

        let font = font.map(|atlas| {
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Font Bind Group"),
                layout: &texture_bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&atlas.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&atlas.sampler),
                    },
                ],
            });
            (atlas, bind_group)
        });

        let vertex_buffer = Self::create_vertex_buffer(gpu, INITIAL_VERTICES);

        Self {
            colored_pipeline,
            textured_pipeline,
            vertex_buffer,
            vertex_capacity: INITIAL_VERTICES,
            uniform_buffer,
            uniform_bind_group,
            font,
            colored_vertices: Vec::with_capacity(1024),
            text_vertices: Vec::new(),
        }
    }

    fn create_vertex_buffer(gpu: &GpuContext, capacity: usize) -> wgpu::Buffer {
        gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Draw2d Vertex Buffer"),
            size: (capacity * std::mem::size_of::<Vertex2d>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Clear all draw calls for the new frame.
    pub fn clear(&mut self) {
        self.colored_vertices.clear();
        self.text_vertices.clear();
    }

    /// Draw a colored rectangle.
    pub fn rect(&mut self, rect: Rect, color: Color) {
        self.colored_vertices.extend_from_slice(&quad(
            rect.x,
            rect.y,
            rect.x + rect.width,
            rect.y + rect.height,
            [0.0; 4],
            color.to_array(),
        ));
    }

    /// Draw text with its top-left corner at `(x, y)`.
    pub fn text(&mut self, x: f32, y: f32, text: &str, color: Color) {
        let Some((font, _)) = &self.font else {
            return;
        };
        let vertices = layout_text(|c| font.glyph(c).copied(), font.size(), x, y, text, color);
        self.text_vertices.extend(vertices);
    }

    /// Queue the output of a [`Panel`](crate::widgets::Panel).
    pub fn shapes(&mut self, shapes: &[UiShape]) {
        for shape in shapes {
            match shape {
                UiShape::Rect { rect, color } => self.rect(*rect, *color),
                UiShape::Text { x, y, text, color } => self.text(*x, *y, text, *color),
            }
        }
    }

    /// Render all batched draw calls.
    pub fn render(&mut self, gpu: &GpuContext, render_pass: &mut wgpu::RenderPass) {
        let total = self.colored_vertices.len() + self.text_vertices.len();
        if total == 0 {
            return;
        }
        if total > self.vertex_capacity {
            self.vertex_capacity = total.next_power_of_two();
            self.vertex_buffer = Self::create_vertex_buffer(gpu, self.vertex_capacity);
        }

        let uniforms = Draw2dUniforms {
            resolution: [gpu.width() as f32, gpu.height() as f32],
            _padding: [0.0, 0.0],
        };
        gpu.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));

        let colored = self.colored_vertices.len();
        if colored > 0 {
            gpu.queue.write_buffer(
                &self.vertex_buffer,
                0,
                bytemuck::cast_slice(&self.colored_vertices),
            );

            render_pass.set_pipeline(&self.colored_pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.draw(0..colored as u32, 0..1);
        }

        if let Some((_, bind_group)) = &self.font
            && !self.text_vertices.is_empty()
        {
            gpu.queue.write_buffer(
                &self.vertex_buffer,
                (colored * std::mem::size_of::<Vertex2d>()) as u64,
                bytemuck::cast_slice(&self.text_vertices),
            );

            render_pass.set_pipeline(&self.textured_pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.set_bind_group(1, bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.draw(colored as u32..total as u32, 0..1);
        }
    }
}
