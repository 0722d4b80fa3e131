use std::sync::Arc;
use std::time::Duration;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use crate::error::SurfaceCreationError;

use super::{SurfaceConfig, SurfaceProvider};

/// Pumps allowed for the platform to deliver `resumed` at startup.
const STARTUP_PUMPS: usize = 8;

/// winit-backed surface provider.
///
/// The event loop is pumped by hand (`pump_app_events`) rather than handed
/// control, so the frame loop stays a plain `while !should_close()` loop.
pub struct WinitSurface {
    // Field order is drop order: window before the event loop.
    window: Arc<Window>,
    handler: HostHandler,
    event_loop: EventLoop<()>,
    exited: bool,
}

impl WinitSurface {
    /// Creates the event loop and the window.
    pub fn create(config: &SurfaceConfig) -> Result<Self, SurfaceCreationError> {
        let mut event_loop = EventLoop::new()
            .map_err(|e| SurfaceCreationError::new(format!("failed to create winit EventLoop: {e}")))?;
        let mut handler = HostHandler::new(config.clone());

        // Windows can only be created from inside a callback; `resumed` does it.
        for _ in 0..STARTUP_PUMPS {
            let status = event_loop.pump_app_events(Some(Duration::ZERO), &mut handler);
            if handler.window.is_some() || handler.create_error.is_some() {
                break;
            }
            if let PumpStatus::Exit(code) = status {
                return Err(SurfaceCreationError::new(format!(
                    "event loop exited during startup (code {code})"
                )));
            }
        }

        if let Some(err) = handler.create_error.take() {
            return Err(SurfaceCreationError::new(err));
        }
        let Some(window) = handler.window.clone() else {
            return Err(SurfaceCreationError::new("platform never resumed the application"));
        };

        log::info!(
            "window '{}' created ({}x{})",
            config.title,
            config.width,
            config.height
        );

        Ok(Self {
            window,
            handler,
            event_loop,
            exited: false,
        })
    }

    /// Window the device should render into.
    pub fn window(&self) -> Arc<Window> {
        Arc::clone(&self.window)
    }
}

impl SurfaceProvider for WinitSurface {
    fn should_close(&self) -> bool {
        self.exited || self.handler.close_requested
    }

    fn pre_present(&self) {
        self.window.pre_present_notify();
    }

    fn poll_events(&mut self) {
        if self.exited {
            return;
        }
        if let PumpStatus::Exit(code) = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.handler)
        {
            log::debug!("event loop exited (code {code})");
            self.exited = true;
        }
    }
}

struct HostHandler {
    config: SurfaceConfig,
    window: Option<Arc<Window>>,
    create_error: Option<String>,
    close_requested: bool,
}

impl HostHandler {
    fn new(config: SurfaceConfig) -> Self {
        Self {
            config,
            window: None,
            create_error: None,
            close_requested: false,
        }
    }
}

impl ApplicationHandler for HostHandler {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height))
            .with_resizable(self.config.resizable);

        match event_loop.create_window(attrs) {
            Ok(window) => self.window = Some(Arc::new(window)),
            Err(e) => {
                self.create_error = Some(format!("failed to create window: {e}"));
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::debug!("close requested by the host");
                self.close_requested = true;
            }
            WindowEvent::Resized(size) => {
                log::debug!("surface resized to {}x{}", size.width, size.height);
            }
            _ => {}
        }
    }
}
