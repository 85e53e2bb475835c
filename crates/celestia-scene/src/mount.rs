//! Mount lifecycle: attach a scene to a host, drive it, tear it down.

use std::time::Instant;

use celestia_config::Config;
use celestia_render::{LogicalSize, OutputSurface, PhysicalSize, SurfaceResizeEvent};
use tracing::{debug, error, info};

use crate::builder::build_scene;
use crate::error::{MountError, RenderFailure};
use crate::frame_loop::{FrameLoop, FrameOutcome, LoopState};
use crate::host::{Host, HostEvent, SceneRenderer, Subscription, SurfaceTarget};
use crate::layout::{LayoutInputs, LayoutSynchronizer};
use crate::motion::{Motion, advance};
use crate::scene::Scene;

type FailureHook = Box<dyn FnOnce(&RenderFailure)>;

struct Mounted<R> {
    scene: Scene,
    renderer: R,
    motion: Motion,
    frame_loop: FrameLoop,
    layout: LayoutSynchronizer,
    surface: OutputSurface,
    subscriptions: Vec<Subscription>,
    failure: Option<RenderFailure>,
    failure_hook: Option<FailureHook>,
}

impl<R> Mounted<R> {
    fn is_subscribed(&self, event: HostEvent) -> bool {
        self.subscriptions.iter().any(|s| s.event() == event)
    }
}

/// A mounted scene. Owns the scene, its renderer, and its host
/// subscriptions; dropping it tears everything down.
pub struct SceneHandle<H: Host, R: SceneRenderer> {
    host: H,
    inner: Option<Mounted<R>>,
}

fn measure<H: Host>(host: &H, layout: &LayoutSynchronizer) -> LayoutInputs {
    LayoutInputs {
        container: host.container_size(),
        window: host.window_size(),
        pixel_ratio: host.pixel_ratio(),
        section_height: layout
            .anchor_section()
            .and_then(|name| host.section_height(name)),
    }
}

/// Mount a scene on `host`, rendering to `target`.
///
/// Subscribes to resize and load notifications, builds the scene, sizes the
/// surface, and starts the frame loop. If any step fails, everything acquired
/// so far is released before the error is returned.
pub fn mount<H: Host, T: SurfaceTarget>(
    host: H,
    target: T,
    config: &Config,
) -> Result<SceneHandle<H, T::Renderer>, MountError> {
    let subscriptions = vec![
        host.listeners().subscribe(HostEvent::Resize),
        host.listeners().subscribe(HostEvent::Load),
    ];

    let layout = LayoutSynchronizer::new(config.layout.anchor_section.clone());
    let inputs = measure(&host, &layout);
    let size = layout
        .resolve_size(&inputs)
        .map_err(|failure| MountError::SurfaceUnavailable {
            reason: failure.to_string(),
        })?;
    let surface = OutputSurface::new(size, inputs.pixel_ratio);

    let (scene, renderer) = build_scene(target, surface.physical_size(), &config.scene)?;

    let mut mounted = Mounted {
        motion: Motion::from_config(&config.scene),
        frame_loop: FrameLoop::new(),
        layout,
        surface,
        subscriptions,
        failure: None,
        failure_hook: None,
        renderer,
        scene,
    };
    LayoutSynchronizer::apply(
        size,
        inputs.pixel_ratio,
        &mut mounted.scene.camera,
        &mut mounted.surface,
    );
    mounted.frame_loop.start(&host);

    let physical = mounted.surface.physical_size();
    info!(
        "Scene mounted at {}x{} ({:.0}x{:.0} logical)",
        physical.width, physical.height, size.width, size.height
    );

    Ok(SceneHandle {
        host,
        inner: Some(mounted),
    })
}

impl<H: Host, R: SceneRenderer> SceneHandle<H, R> {
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.is_some()
    }

    /// The live scene, until teardown.
    pub fn scene(&self) -> Option<&Scene> {
        self.inner.as_ref().map(|m| &m.scene)
    }

    pub fn renderer(&self) -> Option<&R> {
        self.inner.as_ref().map(|m| &m.renderer)
    }

    pub fn loop_state(&self) -> LoopState {
        self.inner
            .as_ref()
            .map_or(LoopState::Cancelled, |m| m.frame_loop.state())
    }

    pub fn surface_size(&self) -> Option<PhysicalSize> {
        self.inner.as_ref().map(|m| m.surface.physical_size())
    }

    /// Re-sync layout for an explicit container size. Idempotent.
    pub fn resize(&mut self, container: LogicalSize) -> Option<SurfaceResizeEvent> {
        let mounted = self.inner.as_mut()?;
        let inputs = LayoutInputs {
            container,
            ..measure(&self.host, &mounted.layout)
        };
        Self::apply_layout(mounted, &inputs)
    }

    /// Deliver a host notification. Ignored unless the matching subscription
    /// is still held. `Load` is honoured once.
    pub fn handle_event(&mut self, event: HostEvent) -> Option<SurfaceResizeEvent> {
        let mounted = self.inner.as_mut()?;
        if !mounted.is_subscribed(event) {
            return None;
        }
        if event == HostEvent::Load {
            mounted.subscriptions.retain(|s| s.event() != HostEvent::Load);
        }
        let inputs = measure(&self.host, &mounted.layout);
        Self::apply_layout(mounted, &inputs)
    }

    fn apply_layout(mounted: &mut Mounted<R>, inputs: &LayoutInputs) -> Option<SurfaceResizeEvent> {
        let event = mounted
            .layout
            .sync(inputs, &mut mounted.scene.camera, &mut mounted.surface)?;
        mounted.renderer.resize(event.physical);
        Some(event)
    }

    /// Per-frame callback. Advances the clock and animation, renders, and
    /// reschedules while the loop is running.
    pub fn on_frame(&mut self, now: Instant) -> FrameOutcome {
        let Some(mounted) = self.inner.as_mut() else {
            return FrameOutcome::Skipped;
        };
        let Mounted {
            scene,
            renderer,
            motion,
            frame_loop,
            ..
        } = &mut *mounted;

        let outcome = frame_loop.tick(&self.host, || {
            let frame = scene.clock.tick(now);
            advance(scene, motion, frame);
            renderer.render(scene)
        });

        if let FrameOutcome::Failed(failure) = &outcome {
            error!("Render failure, animation stopped: {failure}");
            mounted.failure = Some(failure.clone());
            if let Some(hook) = mounted.failure_hook.take() {
                hook(failure);
            }
        }
        outcome
    }

    /// Register a hook called once on the first render failure. If a failure
    /// has already happened, the hook runs immediately.
    pub fn on_render_failure<F>(&mut self, hook: F)
    where
        F: FnOnce(&RenderFailure) + 'static,
    {
        let Some(mounted) = self.inner.as_mut() else {
            return;
        };
        match &mounted.failure {
            Some(failure) => hook(failure),
            None => mounted.failure_hook = Some(Box::new(hook)),
        }
    }

    /// Stop animating but keep the scene and its resources.
    pub fn stop_animation(&mut self) {
        if let Some(mounted) = self.inner.as_mut() {
            mounted.frame_loop.stop();
        }
    }

    /// Cancel the frame loop and release subscriptions and rendering
    /// resources. Returns `false` if already torn down.
    pub fn teardown(&mut self) -> bool {
        let Some(mut mounted) = self.inner.take() else {
            return false;
        };
        mounted.frame_loop.stop();
        let frames = mounted.frame_loop.frame_count();
        debug!("Releasing {} host subscriptions", mounted.subscriptions.len());
        drop(mounted);
        info!("Scene torn down after {frames} frames");
        true
    }
}

impl<H: Host, R: SceneRenderer> Drop for SceneHandle<H, R> {
    fn drop(&mut self) {
        self.teardown();
    }
}
