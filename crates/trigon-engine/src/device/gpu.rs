use std::borrow::Cow;
use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::error::{DeviceLoadError, FrameError, LinkError};
use crate::frame::{FrameCommand, FrameCommands};
use crate::geometry::{ComponentType, VertexLayout};
use crate::pipeline::StageUnit;

use super::{surface, Device, FrameOutcome, GpuFrame, GpuInit, SurfaceErrorAction};

/// Owns wgpu core objects and the surface configuration.
///
/// This type is the low-level rendering context:
/// - creates and stores Adapter/Device/Queue
/// - creates and configures the Surface (swapchain)
/// - executes recorded frames and presents them
pub struct Gpu {
    /// Surface bound to the window. Holds its own `Arc` of the window.
    surface: wgpu::Surface<'static>,

    /// Logical device.
    device: wgpu::Device,

    /// Command queue.
    queue: wgpu::Queue,

    /// Active surface configuration. The window is not resizable, so this is
    /// only re-applied after the surface is lost or outdated.
    config: wgpu::SurfaceConfiguration,
}

impl Gpu {
    /// Loads the device for `window`.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu; drive it with
    /// `pollster::block_on`.
    pub async fn new(window: Arc<Window>, init: GpuInit) -> Result<Self, DeviceLoadError> {
        let size = window.inner_size();
        if size.width == 0 || size.height == 0 {
            return Err(DeviceLoadError::new("window has zero size"));
        }

        let GpuInit {
            prefer_srgb,
            present_mode,
            alpha_mode,
            power_preference,
            required_features,
            required_limits,
            desired_maximum_frame_latency,
        } = init;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .map_err(|e| DeviceLoadError::new(format!("failed to create wgpu surface: {e}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| DeviceLoadError::new(format!("failed to find a suitable GPU adapter: {e}")))?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("trigon device"),
                required_features,
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| DeviceLoadError::new(format!("failed to create wgpu device/queue: {e}")))?;

        let caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&caps, prefer_srgb)
            .ok_or_else(|| DeviceLoadError::new("surface reports no supported formats"))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: surface::choose_present_mode(&caps, present_mode),
            alpha_mode: surface::choose_alpha_mode(&caps, alpha_mode),
            view_formats: vec![],
            desired_maximum_frame_latency,
        };

        surface.configure(&device, &config);

        let info = adapter.get_info();
        log::info!(
            "device loaded: {} ({:?}), surface {}x{} {:?}",
            info.name,
            info.backend,
            config.width,
            config.height,
            config.format
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
        })
    }

    /// Acquires the next surface texture and creates an encoder.
    fn begin_frame(&self) -> Result<GpuFrame, wgpu::SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("trigon frame encoder"),
            });

        Ok(GpuFrame {
            surface_texture,
            view,
            encoder,
        })
    }

    /// Records `commands` into a single render pass over the frame's view.
    fn encode(&self, frame: &mut GpuFrame, commands: &FrameCommands<'_, Self>) {
        let load = match commands.clear_color() {
            Some(c) => wgpu::LoadOp::Clear(wgpu::Color {
                r: c.r as f64,
                g: c.g as f64,
                b: c.b as f64,
                a: c.a as f64,
            }),
            None => wgpu::LoadOp::Load,
        };

        let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("trigon frame pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &frame.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        // Full-surface viewport.
        rpass.set_viewport(
            0.0,
            0.0,
            self.config.width as f32,
            self.config.height as f32,
            0.0,
            1.0,
        );

        for cmd in commands.iter() {
            match cmd {
                // Folded into the pass load op above.
                FrameCommand::Clear(_) => {}
                FrameCommand::UseProgram(pipeline) => rpass.set_pipeline(pipeline),
                FrameCommand::BindGeometry { buffer, .. } => {
                    rpass.set_vertex_buffer(0, buffer.slice(..));
                }
                FrameCommand::Draw { vertices } => rpass.draw(vertices.clone(), 0..1),
                // Bindings are pass-scoped in wgpu.
                FrameCommand::UnbindGeometry => {}
            }
        }
    }

    /// Submits the recorded commands, then presents the surface texture.
    ///
    /// `pre_present` runs between submission and the swap.
    fn submit(&self, frame: GpuFrame, pre_present: impl FnOnce()) {
        self.queue.submit(std::iter::once(frame.encoder.finish()));
        drop(frame.view);
        pre_present();
        frame.surface_texture.present();
    }

    fn handle_surface_error(&self, err: wgpu::SurfaceError) -> SurfaceErrorAction {
        let action = surface::surface_error_action(&err);
        match action {
            SurfaceErrorAction::Reconfigured => {
                log::warn!("surface {err}; reconfiguring");
                self.surface.configure(&self.device, &self.config);
            }
            SurfaceErrorAction::SkipFrame => log::warn!("surface {err}; skipping frame"),
            SurfaceErrorAction::Fatal => log::error!("surface {err}"),
        }
        action
    }
}

impl Device for Gpu {
    type Buffer = wgpu::Buffer;
    type Program = wgpu::RenderPipeline;

    fn create_vertex_buffer(&mut self, label: &str, contents: &[u8]) -> wgpu::Buffer {
        self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents,
            usage: wgpu::BufferUsages::VERTEX,
        })
    }

    fn create_program(
        &mut self,
        vertex: &StageUnit,
        fragment: &StageUnit,
        layout: &VertexLayout,
    ) -> Result<wgpu::RenderPipeline, LinkError> {
        let format = vertex_format(layout).ok_or_else(|| {
            LinkError::new(format!(
                "vertex layout with {} x {:?} has no device format",
                layout.components, layout.component_type
            ))
        })?;

        // wgpu reports pipeline validation failures asynchronously; capture
        // them here instead of letting the uncaptured-error handler panic.
        let scope = self.device.push_error_scope(wgpu::ErrorFilter::Validation);

        // Stage modules only live until the pipeline has consumed them.
        let vs_module = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("trigon vertex stage"),
            source: wgpu::ShaderSource::Naga(Cow::Owned(vertex.module().clone())),
        });
        let fs_module = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("trigon fragment stage"),
            source: wgpu::ShaderSource::Naga(Cow::Owned(fragment.module().clone())),
        });

        let attributes = [wgpu::VertexAttribute {
            format,
            offset: layout.offset,
            shader_location: layout.attribute_index,
        }];

        let pipeline_layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("trigon pipeline layout"),
                bind_group_layouts: &[],
                immediate_size: 0,
            });

        let pipeline = self
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("trigon pipeline"),
                layout: Some(&pipeline_layout),

                vertex: wgpu::VertexState {
                    module: &vs_module,
                    entry_point: Some("main"),
                    compilation_options: Default::default(),
                    buffers: &[wgpu::VertexBufferLayout {
                        array_stride: layout.stride,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &attributes,
                    }],
                },

                fragment: Some(wgpu::FragmentState {
                    module: &fs_module,
                    entry_point: Some("main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: self.config.format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),

                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },

                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            });

        if let Some(err) = pollster::block_on(scope.pop()) {
            return Err(LinkError::new(format!("device rejected the pipeline: {err}")));
        }

        Ok(pipeline)
    }

    fn present(
        &mut self,
        commands: &FrameCommands<'_, Self>,
        pre_present: impl FnOnce(),
    ) -> Result<FrameOutcome, FrameError> {
        let mut frame = match self.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                let message = err.to_string();
                return match self.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => Err(FrameError::new(message)),
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                        Ok(FrameOutcome::Skipped)
                    }
                };
            }
        };

        self.encode(&mut frame, commands);
        self.submit(frame, pre_present);

        Ok(FrameOutcome::Presented)
    }
}

fn vertex_format(layout: &VertexLayout) -> Option<wgpu::VertexFormat> {
    match (layout.component_type, layout.components) {
        (ComponentType::Float32, 1) => Some(wgpu::VertexFormat::Float32),
        (ComponentType::Float32, 2) => Some(wgpu::VertexFormat::Float32x2),
        (ComponentType::Float32, 3) => Some(wgpu::VertexFormat::Float32x3),
        (ComponentType::Float32, 4) => Some(wgpu::VertexFormat::Float32x4),
        _ => None,
    }
}
