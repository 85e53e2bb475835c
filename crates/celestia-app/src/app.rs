//! Window lifecycle and event dispatch.

use std::sync::Arc;
use std::time::Instant;

use celestia_config::Config;
use celestia_render::ContextOptions;
use celestia_scene::{
    FrameOutcome, GpuSceneRenderer, HostEvent, MountError, SceneHandle, mount,
};
use tracing::{error, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{WindowAttributes, WindowId};

use crate::host::{WindowTarget, WinitHost};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("failed to mount scene: {0}")]
    Mount(#[from] MountError),
}

pub fn window_attributes(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_transparent(config.window.transparent)
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ))
}

type Handle = SceneHandle<WinitHost, GpuSceneRenderer>;

struct CelestiaApp {
    config: Config,
    handle: Option<Handle>,
    load_sent: bool,
    error: Option<AppError>,
}

impl CelestiaApp {
    fn new(config: Config) -> Self {
        Self {
            config,
            handle: None,
            load_sent: false,
            error: None,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<Handle, AppError> {
        let window = Arc::new(event_loop.create_window(window_attributes(&self.config))?);
        let options = ContextOptions {
            vsync: self.config.window.vsync,
            transparent: self.config.window.transparent,
        };
        let host = WinitHost::new(Arc::clone(&window), self.config.layout.clone());
        let mut handle = mount(host, WindowTarget::new(window, options), &self.config)?;
        handle.on_render_failure(|failure| error!("Scene stopped rendering: {failure}"));
        Ok(handle)
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(mut handle) = self.handle.take() {
            handle.teardown();
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for CelestiaApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.handle.is_some() {
            return;
        }
        match self.start(event_loop) {
            Ok(handle) => self.handle = Some(handle),
            Err(e) => {
                error!("{e}");
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(handle) = self.handle.as_mut() else {
            return;
        };
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                self.shutdown(event_loop);
            }
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(resize) = handle.handle_event(HostEvent::Resize) {
                    info!(
                        "Window resized to {}x{} (scale: {:.2})",
                        resize.physical.width, resize.physical.height, resize.pixel_ratio
                    );
                }
            }
            WindowEvent::RedrawRequested => {
                if !self.load_sent {
                    self.load_sent = true;
                    handle.handle_event(HostEvent::Load);
                }
                // The loop is already cancelled and the hook has reported it;
                // the window stays open on the last frame.
                if let FrameOutcome::Failed(_) = handle.on_frame(Instant::now()) {
                    warn!("Animation stopped, window remains open");
                }
            }
            _ => {}
        }
    }
}

/// Open the window and run until it closes.
#[instrument(skip(config))]
pub fn run(config: Config) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    let mut app = CelestiaApp::new(config);
    event_loop.run_app(&mut app)?;
    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_error_converts() {
        let err: AppError = MountError::SurfaceUnavailable {
            reason: "gone".into(),
        }
        .into();
        assert!(matches!(err, AppError::Mount(_)));
        assert!(err.to_string().contains("gone"));
    }
}
