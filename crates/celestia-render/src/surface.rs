//! Output surface sizing.
//!
//! The host measures its container in logical units; the GPU surface wants
//! physical pixels. [`OutputSurface`] keeps both in step with the device pixel
//! ratio and reports a [`SurfaceResizeEvent`] only when the pixel buffer
//! actually has to change.

/// Minimum surface dimension (prevents zero-size panics).
pub const MIN_SURFACE_DIMENSION: u32 = 1;

/// Container dimensions in logical (density-independent) units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogicalSize {
    pub width: f64,
    pub height: f64,
}

impl LogicalSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both dimensions are finite and strictly positive.
    pub fn is_measurable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Width / height. Only meaningful when [`Self::is_measurable`].
    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }
}

/// Physical pixel dimensions of a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhysicalSize {
    pub width: u32,
    pub height: u32,
}

impl PhysicalSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Scale a logical size by `pixel_ratio`, rounding and clamping to 1x1.
    pub fn from_logical(logical: LogicalSize, pixel_ratio: f64) -> Self {
        let scale = |v: f64| -> u32 {
            let px = (v * pixel_ratio).round();
            if px.is_finite() && px >= 1.0 {
                px.min(u32::MAX as f64) as u32
            } else {
                MIN_SURFACE_DIMENSION
            }
        };
        Self {
            width: scale(logical.width),
            height: scale(logical.height),
        }
    }
}

/// Emitted when the physical pixel buffer changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceResizeEvent {
    pub physical: PhysicalSize,
    pub logical: LogicalSize,
    pub pixel_ratio: f64,
}

/// Tracks logical size, device pixel ratio, and the derived physical size.
#[derive(Clone, Debug)]
pub struct OutputSurface {
    logical: LogicalSize,
    pixel_ratio: f64,
    physical: PhysicalSize,
}

impl OutputSurface {
    /// A non-positive or non-finite `pixel_ratio` is treated as 1.
    pub fn new(logical: LogicalSize, pixel_ratio: f64) -> Self {
        let pixel_ratio = sanitize_ratio(pixel_ratio);
        Self {
            logical,
            pixel_ratio,
            physical: PhysicalSize::from_logical(logical, pixel_ratio),
        }
    }

    /// Update the logical size and pixel ratio. Returns an event only if the
    /// physical size changed, so repeated calls with the same input are
    /// no-ops.
    pub fn set_logical_size(
        &mut self,
        logical: LogicalSize,
        pixel_ratio: f64,
    ) -> Option<SurfaceResizeEvent> {
        let pixel_ratio = sanitize_ratio(pixel_ratio);
        let physical = PhysicalSize::from_logical(logical, pixel_ratio);
        self.logical = logical;
        self.pixel_ratio = pixel_ratio;

        if physical == self.physical {
            return None;
        }
        self.physical = physical;
        Some(SurfaceResizeEvent {
            physical,
            logical,
            pixel_ratio,
        })
    }

    pub fn physical_size(&self) -> PhysicalSize {
        self.physical
    }

    pub fn logical_size(&self) -> LogicalSize {
        self.logical
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }
}

fn sanitize_ratio(pixel_ratio: f64) -> f64 {
    if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
        pixel_ratio
    } else {
        1.0
    }
}
