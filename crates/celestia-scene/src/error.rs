//! Error types for mounting, rendering, and layout.

use celestia_render::{RenderContextError, SurfaceError};

/// The target could not produce a usable output surface. Fatal to that
/// mount attempt; nothing from the attempt is left behind.
#[derive(Debug, thiserror::Error)]
pub enum MountError {
    #[error("output surface unavailable: {reason}")]
    SurfaceUnavailable { reason: String },

    #[error("failed to initialise rendering: {0}")]
    Render(#[from] RenderContextError),
}

impl MountError {
    /// Reject a planet texture edge length the device cannot hold.
    pub fn check_texture_size(size: u32, limit: u32) -> Result<(), Self> {
        if size > limit {
            return Err(Self::SurfaceUnavailable {
                reason: format!("planet texture size {size} exceeds device limit {limit}"),
            });
        }
        Ok(())
    }
}

/// The rendering context became unusable mid-session. Stops the frame loop.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderFailure {
    #[error("rendering context lost")]
    ContextLost,

    #[error("GPU out of memory")]
    OutOfMemory,
}

impl RenderFailure {
    /// Map a surface acquisition error. Timeouts are not failures, the frame
    /// is simply skipped.
    pub fn from_surface_error(error: SurfaceError) -> Option<Self> {
        match error {
            SurfaceError::Lost => Some(Self::ContextLost),
            SurfaceError::OutOfMemory => Some(Self::OutOfMemory),
            SurfaceError::Timeout => None,
        }
    }
}

/// The container could not be measured. Never fatal: the synchronizer falls
/// back to the window size.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutQueryFailure {
    #[error("container has unmeasurable size {width}x{height}")]
    Unmeasurable { width: f64, height: f64 },

    /// Neither the container nor the window has a usable size.
    #[error("no usable size for the output surface")]
    NoUsableSize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_error_mapping() {
        assert_eq!(
            RenderFailure::from_surface_error(SurfaceError::Lost),
            Some(RenderFailure::ContextLost)
        );
        assert_eq!(
            RenderFailure::from_surface_error(SurfaceError::OutOfMemory),
            Some(RenderFailure::OutOfMemory)
        );
        assert_eq!(RenderFailure::from_surface_error(SurfaceError::Timeout), None);
    }

    #[test]
    fn test_mount_error_message() {
        let err = MountError::SurfaceUnavailable {
            reason: "window closed".to_string(),
        };
        assert_eq!(err.to_string(), "output surface unavailable: window closed");
    }

    #[test]
    fn test_texture_size_limit() {
        assert!(MountError::check_texture_size(8192, 8192).is_ok());
        assert!(MountError::check_texture_size(0, 8192).is_ok());
        let err = MountError::check_texture_size(65_536, 8192).unwrap_err();
        assert!(matches!(err, MountError::SurfaceUnavailable { .. }));
        assert!(err.to_string().contains("65536"));
    }
}
