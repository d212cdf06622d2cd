use std::sync::Arc;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::error::EventLoopError;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::assets::FontAtlas;
use crate::camera::Camera;
use crate::config::AppConfig;
use crate::draw::{Color, DrawList};
use crate::draw2d::Draw2d;
use crate::gpu::{DepthTarget, GpuContext};
use crate::immediate::ImmediatePass;
use crate::input::Input;
use crate::widgets::{Panel, PanelOutput, Pointer, WidgetState};

/// Left edge and top of the control panel, in pixels.
pub const PANEL_ORIGIN: (f32, f32) = (10.0, 10.0);
pub const PANEL_WIDTH: f32 = 260.0;

/// One interactive exercise.
///
/// Every frame the viewer first lets the scene lay out its widgets, so edits
/// apply immediately, then asks it to record geometry.
pub trait Scene {
    /// Adds this scene's sliders and checkboxes.
    fn ui(&mut self, panel: &mut Panel<'_>);

    /// Records this frame's geometry. `time` is seconds since start.
    fn draw(&mut self, target: &mut DrawList, time: f32);

    /// Where the camera starts.
    fn camera(&self) -> Camera {
        Camera::default()
    }
}

/// Runs the widget and draw steps of one frame without touching the GPU.
pub fn build_frame(
    scene: &mut dyn Scene,
    widgets: &mut WidgetState,
    pointer: Pointer,
    list: &mut DrawList,
    time: f32,
) -> PanelOutput {
    let mut panel = Panel::new(widgets, pointer, PANEL_ORIGIN.0, PANEL_ORIGIN.1, PANEL_WIDTH);
    scene.ui(&mut panel);
    let output = panel.finish();

    list.clear();
    scene.draw(list, time);
    output
}

/// Opens a window and runs `scene` until it is closed.
pub fn run_with_config(config: AppConfig, scene: Box<dyn Scene>) -> Result<(), EventLoopError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = ViewerApp::Pending {
        config,
        scene: Some(scene),
    };
    event_loop.run_app(&mut app)
}

enum ViewerApp {
    Pending {
        config: AppConfig,
        scene: Option<Box<dyn Scene>>,
    },
    Running {
        window: Arc<Window>,
        gpu: GpuContext,
        depth: DepthTarget,
        immediate: ImmediatePass,
        draw_2d: Draw2d,
        config: AppConfig,
        scene: Box<dyn Scene>,
        camera: Camera,
        input: Input,
        widgets: WidgetState,
        draw_list: DrawList,
        start_time: Instant,
    },
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let ViewerApp::Pending { config, scene } = self else {
            return;
        };
        let Some(scene) = scene.take() else {
            return;
        };

        let window_attrs = WindowAttributes::default()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .expect("Failed to create window"),
        );
        let gpu = GpuContext::new(window.clone());

        let font = config.font_path.as_ref().and_then(|path| {
            match FontAtlas::from_file(&gpu, path, config.font_size) {
                Ok(atlas) => Some(atlas),
                Err(err) => {
                    log::warn!("panel labels disabled, {}: {err}", path.display());
                    None
                }
            }
        });
        if font.is_none() && config.font_path.is_none() {
            log::info!("no font configured, panel labels disabled");
        }

        let depth = DepthTarget::new(&gpu);
        let immediate = ImmediatePass::new(&gpu);
        let draw_2d = Draw2d::new(&gpu, font);
        let camera = scene.camera();

        log::info!("starting {}", config.title);

        *self = ViewerApp::Running {
            window,
            gpu,
            depth,
            immediate,
            draw_2d,
            config: config.clone(),
            scene,
            camera,
            input: Input::new(),
            widgets: WidgetState::default(),
            draw_list: DrawList::new(),
            start_time: Instant::now(),
        };
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let ViewerApp::Running {
            window,
            gpu,
            depth,
            immediate,
            draw_2d,
            config,
            scene,
            camera,
            input,
            widgets,
            draw_list,
            start_time,
        } = self
        else {
            return;
        };

        input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                gpu.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                let time = start_time.elapsed().as_secs_f32();

                camera.update_from_keys(&*input, config.movement_speed);

                let output = build_frame(
                    scene.as_mut(),
                    widgets,
                    Pointer::from_input(input),
                    draw_list,
                    time,
                );
                if output.changed {
                    log::debug!("controls changed at t={time:.2}s");
                }

                draw_2d.clear();
                draw_2d.shapes(&output.shapes);

                depth.ensure_size(gpu);
                immediate.prepare(gpu, draw_list, camera.view_projection(gpu.aspect()));

                match render(gpu, depth, immediate, draw_2d, config.background) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let (width, height) = (gpu.width(), gpu.height());
                        gpu.resize(width, height);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("GPU out of memory");
                        event_loop.exit();
                    }
                    Err(err) => log::warn!("skipped frame: {err}"),
                }

                input.end_frame();
                window.request_redraw();
            }
            _ => {}
        }
    }
}

fn clear_color(color: Color) -> wgpu::Color {
    wgpu::Color {
        r: color.r as f64,
        g: color.g as f64,
        b: color.b as f64,
        a: color.a as f64,
    }
}

/// Draws the scene, then the panel over it, into the next surface texture.
fn render(
    gpu: &GpuContext,
    depth: &DepthTarget,
    immediate: &ImmediatePass,
    draw_2d: &mut Draw2d,
    background: Color,
) -> Result<(), wgpu::SurfaceError> {
    let output = gpu.surface.get_current_texture()?;
    let view = output
        .texture
        .create_view(&wgpu::TextureViewDescriptor::default());

    let mut encoder = gpu
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Frame Encoder"),
        });

    {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color(background)),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth.view(),
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        immediate.render(&mut render_pass);
        draw_2d.render(gpu, &mut render_pass);
    }

    gpu.queue.submit(std::iter::once(encoder.finish()));
    output.present();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::DrawTarget;
    use glam::{Vec2, Vec3};

    #[derive(Default)]
    struct Probe {
        value: f32,
        drawn_with: Option<f32>,
    }

    impl Scene for Probe {
        fn ui(&mut self, panel: &mut Panel<'_>) {
            panel.slider("Value", &mut self.value, 0.0, 10.0);
        }

        fn draw(&mut self, target: &mut DrawList, _time: f32) {
            self.drawn_with = Some(self.value);
            target.line(Vec3::ZERO, Vec3::splat(self.value), Color::BLACK);
        }
    }

    #[test]
    fn widget_edits_apply_in_the_same_frame() {
        let mut scene = Probe::default();
        let mut widgets = WidgetState::default();
        let mut list = DrawList::new();

        // Press on the right end of the first slider track.
        let pointer = Pointer {
            position: Vec2::new(PANEL_ORIGIN.0 + PANEL_WIDTH - 8.0, PANEL_ORIGIN.1 + 34.0),
            down: true,
            pressed: true,
        };
        let idle = build_frame(&mut scene, &mut widgets, Pointer::default(), &mut list, 0.0);
        assert!(!idle.changed);
        assert_eq!(scene.drawn_with, Some(0.0));

        let output = build_frame(&mut scene, &mut widgets, pointer, &mut list, 0.0);
        assert!(output.changed);
        assert_eq!(scene.value, 10.0);
        assert_eq!(scene.drawn_with, Some(10.0));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn draw_list_is_cleared_between_frames() {
        let mut scene = Probe::default();
        let mut widgets = WidgetState::default();
        let mut list = DrawList::new();
        for _ in 0..3 {
            build_frame(&mut scene, &mut widgets, Pointer::default(), &mut list, 1.0);
        }
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn clear_color_keeps_channels() {
        let c = clear_color(Color::rgba(0.25, 0.5, 0.75, 1.0));
        assert_eq!((c.r, c.g, c.b, c.a), (0.25, 0.5, 0.75, 1.0));
    }
}
