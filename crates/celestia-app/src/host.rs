//! winit-backed host and surface target.

use std::sync::Arc;

use celestia_config::LayoutConfig;
use celestia_render::{
    ContextOptions, DEEP_SPACE, LogicalSize, PhysicalSize, TRANSPARENT,
    init_render_context_blocking,
};
use celestia_scene::{
    FrameScheduler, GpuSceneRenderer, Host, ListenerRegistry, MountError, Scene, SurfaceTarget,
};
use winit::window::Window;

/// Hosts the scene in a native window. The window's inner area is the
/// container; there is no enclosing page, so it is also the window size.
pub struct WinitHost {
    window: Arc<Window>,
    listeners: ListenerRegistry,
    layout: LayoutConfig,
}

impl WinitHost {
    pub fn new(window: Arc<Window>, layout: LayoutConfig) -> Self {
        Self {
            window,
            listeners: ListenerRegistry::new(),
            layout,
        }
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }
}

impl FrameScheduler for WinitHost {
    fn request_frame(&self) {
        self.window.request_redraw();
    }
}

impl Host for WinitHost {
    fn container_size(&self) -> LogicalSize {
        let size = self
            .window
            .inner_size()
            .to_logical::<f64>(self.window.scale_factor());
        LogicalSize::new(size.width, size.height)
    }

    fn window_size(&self) -> LogicalSize {
        self.container_size()
    }

    fn pixel_ratio(&self) -> f64 {
        self.window.scale_factor()
    }

    fn section_height(&self, name: &str) -> Option<f64> {
        self.layout.section_height(name)
    }

    fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }
}

/// The window surface, before a GPU context exists for it.
pub struct WindowTarget {
    window: Arc<Window>,
    options: ContextOptions,
}

impl WindowTarget {
    pub fn new(window: Arc<Window>, options: ContextOptions) -> Self {
        Self { window, options }
    }
}

impl SurfaceTarget for WindowTarget {
    type Renderer = GpuSceneRenderer;

    fn attach(self, scene: &Scene, size: PhysicalSize) -> Result<GpuSceneRenderer, MountError> {
        let clear_color = if self.options.transparent {
            TRANSPARENT
        } else {
            DEEP_SPACE
        };
        let context =
            init_render_context_blocking(self.window, size.width, size.height, self.options)?;
        MountError::check_texture_size(
            scene.texture.size,
            context.device.limits().max_texture_dimension_2d,
        )?;
        Ok(GpuSceneRenderer::new(context, scene, clear_color))
    }
}
