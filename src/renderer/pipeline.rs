//! WebGPU render pipeline setup
//!
//! Two programs share one vertex buffer and one scene uniform: `fs_dim` for
//! the floor and idle cubes, `fs_highlight` for whichever cube is lit.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::camera::Camera;
use super::mesh::{MeshBuffer, MeshRange};
use super::vertex::{Vertex, colors};
use crate::consts::FLOOR_MESH;
use crate::error::{BloomError, Result};
use crate::sim::CubeRegistry;

/// Light comes from above, slightly left and in front
const LIGHT_DIR: [f32; 4] = [-0.35, 1.0, 0.6, 0.0];

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct SceneUniform {
    view_proj: [[f32; 4]; 4],
    light_dir: [f32; 4],
    /// x = time in seconds
    params: [f32; 4],
}

impl SceneUniform {
    fn new(camera: &Camera, time: f32) -> Self {
        Self {
            view_proj: camera.view_proj().to_cols_array_2d(),
            light_dir: LIGHT_DIR,
            params: [time, 0.0, 0.0, 0.0],
        }
    }
}

/// Main render state
pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    dim_pipeline: wgpu::RenderPipeline,
    highlight_pipeline: wgpu::RenderPipeline,
    scene_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    meshes: MeshBuffer,
    camera: Camera,
    /// Viewport size in pixels
    pub size: (u32, u32),
}

impl RenderState {
    /// Set up the device and pipelines; fails if any cube has no mesh
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        cubes: &CubeRegistry,
    ) -> Result<Self> {
        let meshes = MeshBuffer::scene();
        meshes.lookup(FLOOR_MESH)?;
        for cube in cubes.cubes() {
            meshes.lookup(&cube.mesh)?;
        }

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("musical-bloom-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await
            .map_err(|e| BloomError::Gpu(e.to_string()))?;

        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| BloomError::Gpu("surface reports no formats".to_string()))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let camera = Camera::standard(width, height);
        let scene_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("scene"),
            contents: bytemuck::bytes_of(&SceneUniform::new(&camera, 0.0)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_bind_group_layout"),
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

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let make_pipeline = |label: &str, fragment_entry: &str| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[Vertex::desc()],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(fragment_entry),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: config.format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    // Convex cubes drawn after the floor need no depth buffer
                    cull_mode: Some(wgpu::Face::Back),
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            })
        };
        let dim_pipeline = make_pipeline("dim_pipeline", "fs_dim");
        let highlight_pipeline = make_pipeline("highlight_pipeline", "fs_highlight");

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("vertex_buffer"),
            contents: bytemuck::cast_slice(meshes.vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        });

        log::info!(
            "Renderer ready: {:?}, {} vertices",
            surface_format,
            meshes.vertices().len()
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            dim_pipeline,
            highlight_pipeline,
            scene_buffer,
            bind_group,
            vertex_buffer,
            meshes,
            camera,
            size: (width, height),
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
            self.camera.set_viewport(new_width, new_height);
        }
    }

    /// Draw the floor and cube row; lit cubes use the highlight program
    pub fn render(&mut self, cubes: &CubeRegistry, time: f32) -> std::result::Result<(), wgpu::SurfaceError> {
        self.queue.write_buffer(
            &self.scene_buffer,
            0,
            bytemuck::bytes_of(&SceneUniform::new(&self.camera, time)),
        );

        let mut dim: Vec<MeshRange> = self.meshes.lookup(FLOOR_MESH).into_iter().collect();
        let mut lit: Vec<MeshRange> = Vec::new();
        for cube in cubes.cubes() {
            match self.meshes.lookup(&cube.mesh) {
                Ok(range) if cube.active => lit.push(range),
                Ok(range) => dim.push(range),
                Err(e) => log::warn!("Skipping cube {}: {}", cube.index, e),
            }
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let [r, g, b, a] = colors::BACKGROUND.map(f64::from);
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));

            render_pass.set_pipeline(&self.dim_pipeline);
            for range in &dim {
                render_pass.draw(range.vertices(), 0..1);
            }

            render_pass.set_pipeline(&self.highlight_pipeline);
            for range in &lit {
                render_pass.draw(range.vertices(), 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
