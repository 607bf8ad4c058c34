use crate::constants::{AMBIENT_LIGHT, INITIAL_INSTANCE_CAPACITY, LIGHT_DIR};
use glam::Vec3;
use room_core::scene::Mesh;
use room_core::{Camera, SceneGraph};
use std::ops::Range;
use web_sys as web;
use wgpu::util::DeviceExt;

mod helpers;
mod mesh;

use mesh::{cube_vertices, quad_vertices, InstanceRaw, Vertex};

pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
    light: [f32; 4],
}

struct Geometry {
    buffer: wgpu::Buffer,
    count: u32,
}

impl Geometry {
    fn new(device: &wgpu::Device, label: &str, vertices: &[Vertex]) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Self {
            buffer,
            count: vertices.len() as u32,
        }
    }
}

/// Instances of one frame, grouped so each group is one draw call.
#[derive(Default)]
struct FrameInstances {
    mask_boxes: Vec<InstanceRaw>,
    mask_quads: Vec<InstanceRaw>,
    boxes: Vec<InstanceRaw>,
    quads: Vec<InstanceRaw>,
}

impl FrameInstances {
    fn collect(scene: &SceneGraph) -> Self {
        let mut out = Self::default();
        for id in scene.traverse() {
            let Some(inst) = scene.get(id).and_then(|n| n.mesh.as_ref()) else {
                continue;
            };
            if !inst.material.visible {
                continue;
            }
            let raw = InstanceRaw::new(scene.world_matrix(id), &inst.mesh, inst.material.color);
            let bucket = match (inst.material.mask, inst.mesh) {
                (true, Mesh::Box { .. }) => &mut out.mask_boxes,
                (true, Mesh::Quad { .. }) => &mut out.mask_quads,
                (false, Mesh::Box { .. }) => &mut out.boxes,
                (false, Mesh::Quad { .. }) => &mut out.quads,
            };
            bucket.push(raw);
        }
        out
    }

    /// Flattened instance data and the range of each group, masks first so
    /// they claim depth before anything behind them is drawn.
    fn flatten(self) -> (Vec<InstanceRaw>, [Range<u32>; 4]) {
        let mut all = Vec::with_capacity(
            self.mask_boxes.len() + self.mask_quads.len() + self.boxes.len() + self.quads.len(),
        );
        let mut ranges: [Range<u32>; 4] = Default::default();
        for (i, group) in [self.mask_boxes, self.mask_quads, self.boxes, self.quads]
            .into_iter()
            .enumerate()
        {
            let start = all.len() as u32;
            all.extend(group);
            ranges[i] = start..all.len() as u32;
        }
        (all, ranges)
    }
}

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    lit_pipeline: wgpu::RenderPipeline,
    mask_pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    cube: Geometry,
    quad: Geometry,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    depth_view: wgpu::TextureView,

    width: u32,
    height: u32,
}

fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("instances"),
        size: (capacity * std::mem::size_of::<InstanceRaw>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

impl<'a> GpuState<'a> {
    pub async fn new(canvas: &'a web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width();
        let height = canvas.height();

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Use default limits on web to avoid passing unknown fields to older WebGPU impls
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        // the CSS layer behind the canvas has to show through
        let alpha_mode = if caps
            .alpha_modes
            .contains(&wgpu::CompositeAlphaMode::PreMultiplied)
        {
            wgpu::CompositeAlphaMode::PreMultiplied
        } else {
            log::warn!("[render] premultiplied canvas alpha unavailable, TV panel will be hidden");
            caps.alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto)
        };
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(SCENE_WGSL.into()),
        });
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pl"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });
        let buffers = [Vertex::layout(), InstanceRaw::layout()];
        let lit_pipeline = helpers::make_scene_pipeline(
            &device,
            &pl,
            &shader,
            "lit_pipeline",
            "fs_lit",
            format,
            Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
            &buffers,
        );
        // no blending: the mask replaces whatever is under it with alpha 0
        let mask_pipeline = helpers::make_scene_pipeline(
            &device,
            &pl,
            &shader,
            "mask_pipeline",
            "fs_mask",
            format,
            None,
            &buffers,
        );
        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scene_globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_bg"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let cube = Geometry::new(&device, "cube_vertices", &cube_vertices());
        let quad = Geometry::new(&device, "quad_vertices", &quad_vertices());
        let instance_buffer = create_instance_buffer(&device, INITIAL_INSTANCE_CAPACITY);
        let (_, depth_view) = helpers::create_depth_texture(&device, config.width, config.height);

        log::info!("[render] WebGPU ready {}x{} {:?}", config.width, config.height, format);
        Ok(Self {
            surface,
            device,
            queue,
            config,
            lit_pipeline,
            mask_pipeline,
            globals_buffer,
            globals_bind_group,
            cube,
            quad,
            instance_buffer,
            instance_capacity: INITIAL_INSTANCE_CAPACITY,
            depth_view,
            width,
            height,
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            let (_, depth_view) = helpers::create_depth_texture(&self.device, width, height);
            self.depth_view = depth_view;
        }
    }

    fn upload_instances(&mut self, data: &[InstanceRaw]) {
        if data.len() > self.instance_capacity {
            self.instance_capacity = data.len().next_power_of_two();
            self.instance_buffer = create_instance_buffer(&self.device, self.instance_capacity);
            log::debug!("[render] instance buffer grown to {}", self.instance_capacity);
        }
        if !data.is_empty() {
            self.queue
                .write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(data));
        }
    }

    pub fn render(&mut self, scene: &SceneGraph, camera: &Camera) -> Result<(), wgpu::SurfaceError> {
        let (instances, ranges) = FrameInstances::collect(scene).flatten();
        self.upload_instances(&instances);
        let light = Vec3::from_array(LIGHT_DIR).normalize();
        let globals = Globals {
            view_proj: camera.view_projection().to_cols_array_2d(),
            light: light.extend(AMBIENT_LIGHT).to_array(),
        };
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_bind_group(0, &self.globals_bind_group, &[]);
            rpass.set_vertex_buffer(1, self.instance_buffer.slice(..));
            let draws = [
                (&self.mask_pipeline, &self.cube),
                (&self.mask_pipeline, &self.quad),
                (&self.lit_pipeline, &self.cube),
                (&self.lit_pipeline, &self.quad),
            ];
            for ((pipeline, geometry), range) in draws.into_iter().zip(ranges) {
                if range.is_empty() {
                    continue;
                }
                rpass.set_pipeline(pipeline);
                rpass.set_vertex_buffer(0, geometry.buffer.slice(..));
                rpass.draw(0..geometry.count, range);
            }
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
