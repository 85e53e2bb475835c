//! Seams between the scene core and whatever hosts it.
//!
//! A host measures the container, reports device pixel density, schedules
//! frame callbacks, and delivers resize/load notifications to subscribers.
//! A surface target turns into a renderer once the scene exists.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use celestia_render::{LogicalSize, PhysicalSize};

use crate::error::{MountError, RenderFailure};
use crate::scene::Scene;

/// Notifications a mounted scene listens for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostEvent {
    /// The window or container changed size.
    Resize,
    /// Initial layout has settled.
    Load,
}

/// Per-frame callback facility.
pub trait FrameScheduler {
    /// Ask for one more frame callback.
    fn request_frame(&self);
}

/// Host environment of a mounted scene.
pub trait Host: FrameScheduler {
    /// Current container size. May be zero before layout has run.
    fn container_size(&self) -> LogicalSize;

    /// Full window size, used when the container cannot be measured.
    fn window_size(&self) -> LogicalSize;

    /// Physical pixels per logical unit.
    fn pixel_ratio(&self) -> f64;

    /// Measured height of a named layout section, if it exists.
    fn section_height(&self, name: &str) -> Option<f64>;

    fn listeners(&self) -> &ListenerRegistry;
}

/// Output surface a scene renderer can be attached to.
pub trait SurfaceTarget {
    type Renderer: SceneRenderer;

    /// Largest planet texture edge the target can upload.
    fn max_texture_size(&self) -> u32 {
        wgpu::Limits::default().max_texture_dimension_2d
    }

    /// Allocate rendering resources for `scene` at `size` physical pixels.
    fn attach(self, scene: &Scene, size: PhysicalSize) -> Result<Self::Renderer, MountError>;
}

/// Draws a scene to its surface.
pub trait SceneRenderer {
    fn resize(&mut self, size: PhysicalSize);

    fn render(&mut self, scene: &Scene) -> Result<(), RenderFailure>;
}

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    active: Vec<(u64, HostEvent)>,
}

/// Book-keeping of active event subscriptions.
///
/// Cloning shares the same registry.
#[derive(Clone, Debug, Default)]
pub struct ListenerRegistry {
    inner: Rc<RefCell<Registry>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register interest in `event`. The registration lasts as long as the
    /// returned guard.
    pub fn subscribe(&self, event: HostEvent) -> Subscription {
        let mut registry = self.inner.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.active.push((id, event));
        Subscription {
            id,
            event,
            registry: Rc::downgrade(&self.inner),
        }
    }

    /// Whether anyone is subscribed to `event`.
    pub fn is_subscribed(&self, event: HostEvent) -> bool {
        self.inner.borrow().active.iter().any(|(_, e)| *e == event)
    }

    pub fn active_count(&self) -> usize {
        self.inner.borrow().active.len()
    }
}

/// Scoped event subscription. Dropping it unregisters.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    event: HostEvent,
    registry: Weak<RefCell<Registry>>,
}

impl Subscription {
    pub fn event(&self) -> HostEvent {
        self.event
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .borrow_mut()
                .active
                .retain(|(id, _)| *id != self.id);
        }
    }
}
