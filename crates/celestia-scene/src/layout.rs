//! Keeps the camera projection and output surface in step with the host
//! layout.

use celestia_render::{Camera, LogicalSize, OutputSurface, SurfaceResizeEvent};
use tracing::{debug, warn};

use crate::error::LayoutQueryFailure;

/// Measurements taken from the host for one sync.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutInputs {
    pub container: LogicalSize,
    pub window: LogicalSize,
    pub pixel_ratio: f64,
    /// Height of the anchor section, when one is configured and present.
    pub section_height: Option<f64>,
}

/// Sizes the output surface from the container, an optional anchor section,
/// and the window as a last resort.
#[derive(Clone, Debug, Default)]
pub struct LayoutSynchronizer {
    anchor_section: Option<String>,
}

impl LayoutSynchronizer {
    pub fn new(anchor_section: Option<String>) -> Self {
        Self { anchor_section }
    }

    pub fn anchor_section(&self) -> Option<&str> {
        self.anchor_section.as_deref()
    }

    /// Logical size the surface should have for `inputs`.
    ///
    /// An unmeasurable container falls back to the window. With an anchor
    /// configured the height is the section's, or the window's if the
    /// section is absent or measures zero. The width always comes from the
    /// container (or its window fallback), never from the window alone, so
    /// a container narrower than the window keeps its own width.
    pub fn resolve_size(&self, inputs: &LayoutInputs) -> Result<LogicalSize, LayoutQueryFailure> {
        let base = if inputs.container.is_measurable() {
            inputs.container
        } else {
            let failure = LayoutQueryFailure::Unmeasurable {
                width: inputs.container.width,
                height: inputs.container.height,
            };
            warn!("{failure}, falling back to window size");
            inputs.window
        };

        let size = match &self.anchor_section {
            None => base,
            Some(name) => {
                let height = match inputs.section_height {
                    Some(h) if h.is_finite() && h > 0.0 => h,
                    _ => {
                        debug!("Anchor section '{name}' unavailable, using window height");
                        inputs.window.height
                    }
                };
                LogicalSize::new(base.width, height)
            }
        };

        if size.is_measurable() {
            Ok(size)
        } else {
            Err(LayoutQueryFailure::NoUsableSize)
        }
    }

    /// Apply `inputs` to the camera aspect and surface size. Returns the
    /// resize event when the pixel buffer changed. Calling again with the
    /// same inputs changes nothing.
    pub fn sync(
        &self,
        inputs: &LayoutInputs,
        camera: &mut Camera,
        surface: &mut OutputSurface,
    ) -> Option<SurfaceResizeEvent> {
        let size = match self.resolve_size(inputs) {
            Ok(size) => size,
            Err(failure) => {
                warn!("{failure}, keeping previous layout");
                return None;
            }
        };

        Self::apply(size, inputs.pixel_ratio, camera, surface)
    }

    /// Apply an already resolved logical `size` to the camera and surface.
    pub fn apply(
        size: LogicalSize,
        pixel_ratio: f64,
        camera: &mut Camera,
        surface: &mut OutputSurface,
    ) -> Option<SurfaceResizeEvent> {
        camera.set_aspect_ratio(size.width as f32, size.height as f32);
        let event = surface.set_logical_size(size, pixel_ratio);
        if let Some(event) = &event {
            debug!(
                "Surface resized to {}x{} ({:.0}x{:.0} @ {}x)",
                event.physical.width,
                event.physical.height,
                size.width,
                size.height,
                event.pixel_ratio
            );
        }
        event
    }
}
