use std::time::Duration;

use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use crate::device::{Gpu, GpuInit, SurfaceErrorAction};
use crate::surface::Surface;

use super::WindowSettings;

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

/// winit callbacks. Only records state; the loop engine decides what to do.
struct Handler {
    settings: WindowSettings,
    gpu_init: GpuInit,

    entry: Option<WindowEntry>,
    close_requested: bool,
    error: Option<anyhow::Error>,
}

impl Handler {
    fn create_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let (width, height) = self.settings.clamped_size();
        let attrs = Window::default_attributes()
            .with_title(self.settings.title.clone())
            .with_inner_size(LogicalSize::new(width, height))
            .with_visible(self.settings.visible)
            .with_resizable(self.settings.resizable);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();

        WindowEntryTryBuilder {
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed for window")
    }

    fn window_id(&self) -> Option<WindowId> {
        self.entry.as_ref().map(|e| e.with_window(|w| w.id()))
    }
}

impl ApplicationHandler for Handler {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        match self.create_entry(event_loop) {
            Ok(entry) => {
                let id = entry.with_window(|w| w.id());
                log::info!("window {id:?} has been created");
                self.entry = Some(entry);
            }
            Err(e) => {
                log::error!("window couldn't be created: {e:#}");
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        if self.window_id() != Some(id) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                log::debug!("window {id:?} asked to close");
                self.close_requested = true;
            }
            WindowEvent::Resized(new_size) => {
                if let Some(entry) = self.entry.as_mut() {
                    entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                }
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = self.entry.as_mut() {
                    let new_size = entry.with_window(|w| w.inner_size());
                    entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Poll);
    }
}

/// [`Surface`] backed by a winit window and a wgpu swapchain.
///
/// `poll_events` pumps the winit event loop without blocking; `present`
/// clears the backbuffer to [`WindowSettings::clear_color`] and presents it.
/// After [`WindowSurface::destroy`] the surface reports itself closed and
/// close-requested.
pub struct WindowSurface {
    event_loop: EventLoop<()>,
    handler: Handler,
    exited: bool,
}

impl WindowSurface {
    /// Creates the event loop, the window and its GPU context.
    ///
    /// Any failure is returned here, so a loop is never started without a
    /// working surface.
    pub fn open(settings: WindowSettings, gpu_init: GpuInit) -> Result<Self> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut surface = Self {
            event_loop,
            handler: Handler {
                settings,
                gpu_init,
                entry: None,
                close_requested: false,
                error: None,
            },
            exited: false,
        };

        // The first pump delivers `resumed`, which creates the window.
        surface.pump();

        if let Some(e) = surface.handler.error.take() {
            return Err(e);
        }
        anyhow::ensure!(
            surface.handler.entry.is_some(),
            "window was not created by the first event pump"
        );

        Ok(surface)
    }

    /// Drops the GPU context and the window. Returns `false` if already gone.
    pub fn destroy(&mut self) -> bool {
        let Some(entry) = self.handler.entry.take() else {
            return false;
        };

        let id = entry.with_window(|w| w.id());
        drop(entry);
        log::info!("window {id:?} has been destroyed");
        true
    }

    pub fn title(&self) -> &str {
        &self.handler.settings.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> bool {
        let Some(entry) = self.handler.entry.as_ref() else {
            return false;
        };

        let title = title.into();
        entry.with_window(|w| w.set_title(&title));
        self.handler.settings.title = title;
        true
    }

    pub fn is_visible(&self) -> bool {
        self.is_open() && self.handler.settings.visible
    }

    pub fn set_visible(&mut self, visible: bool) -> bool {
        let Some(entry) = self.handler.entry.as_ref() else {
            return false;
        };

        entry.with_window(|w| w.set_visible(visible));
        self.handler.settings.visible = visible;
        true
    }

    pub fn is_resizable(&self) -> bool {
        self.is_open() && self.handler.settings.resizable
    }

    /// Requests a new inner size in logical pixels. Zero dimensions become 1.
    pub fn set_size(&mut self, width: u32, height: u32) -> bool {
        let Some(entry) = self.handler.entry.as_ref() else {
            return false;
        };

        let (width, height) = (width.max(1), height.max(1));
        // The platform may apply the size later and report it through `Resized`.
        let _ = entry.with_window(|w| w.request_inner_size(LogicalSize::new(width, height)));
        self.handler.settings.width = width;
        self.handler.settings.height = height;
        true
    }

    /// Current inner size in physical pixels, `None` once destroyed.
    pub fn size(&self) -> Option<PhysicalSize<u32>> {
        self.handler
            .entry
            .as_ref()
            .map(|e| e.with_window(|w| w.inner_size()))
    }

    pub fn set_clear_color(&mut self, color: wgpu::Color) {
        self.handler.settings.clear_color = color;
    }

    fn pump(&mut self) {
        if self.exited {
            return;
        }

        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.handler);

        if let PumpStatus::Exit(code) = status {
            log::debug!("event loop exited with code {code}");
            self.exited = true;
            self.handler.close_requested = true;
        }
    }
}

impl Surface for WindowSurface {
    fn is_open(&self) -> bool {
        self.handler.entry.is_some()
    }

    fn is_close_requested(&self) -> bool {
        !self.is_open() || self.handler.close_requested
    }

    fn poll_events(&mut self) {
        self.pump();
    }

    fn present(&mut self) {
        let clear = self.handler.settings.clear_color;
        let Some(entry) = self.handler.entry.as_mut() else {
            return;
        };

        let action = entry.with_mut(|fields| {
            let mut frame = match fields.gpu.begin_frame() {
                Ok(frame) => frame,
                Err(err) => return Some(fields.gpu.handle_surface_error(err)),
            };

            fields.gpu.clear(&mut frame, clear);
            fields.window.pre_present_notify();
            fields.gpu.submit(frame);
            None
        });

        if action == Some(SurfaceErrorAction::Fatal) {
            log::error!("unrecoverable surface error; closing the window");
            self.handler.close_requested = true;
            self.destroy();
        }
    }
}

impl Drop for WindowSurface {
    fn drop(&mut self) {
        self.destroy();
    }
}
