//! The animated planet scene: procedural texture and starfield, scene graph,
//! per-frame motion, layout sync, and the mount lifecycle that ties them to a
//! host and a renderer.

pub mod builder;
pub mod clock;
pub mod error;
pub mod frame_loop;
pub mod geometry;
pub mod gpu;
pub mod host;
pub mod layout;
pub mod motion;
pub mod mount;
pub mod scene;
pub mod starfield;
pub mod texture;

pub use builder::{SceneBuilder, build_scene};
pub use clock::{Clock, FrameTime};
pub use error::{LayoutQueryFailure, MountError, RenderFailure};
pub use frame_loop::{FrameLoop, FrameOutcome, LoopState};
pub use gpu::GpuSceneRenderer;
pub use host::{
    FrameScheduler, Host, HostEvent, ListenerRegistry, SceneRenderer, Subscription, SurfaceTarget,
};
pub use layout::{LayoutInputs, LayoutSynchronizer};
pub use motion::Motion;
pub use mount::{SceneHandle, mount};
pub use scene::Scene;
pub use starfield::{ShellBounds, StarSample, sample_starfield};
pub use texture::{PlanetTexture, generate_planet_texture};
