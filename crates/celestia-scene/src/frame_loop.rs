//! Frame update loop state machine.
//!
//! `Idle -> Running` on start, `Running -> Cancelled` on stop or render
//! failure. `Cancelled` is terminal; a new mount gets a new loop.

use tracing::{debug, warn};

use crate::error::RenderFailure;
use crate::host::FrameScheduler;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    Cancelled,
}

/// What happened during one frame callback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The loop was not running; nothing was touched.
    Skipped,
    Rendered,
    /// Rendering failed and the loop is now cancelled.
    Failed(RenderFailure),
}

#[derive(Debug)]
pub struct FrameLoop {
    state: LoopState,
    frames: u64,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Idle,
            frames: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Frames rendered so far.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Start the loop and schedule the first frame. Only valid from `Idle`;
    /// returns whether the loop started.
    pub fn start(&mut self, scheduler: &dyn FrameScheduler) -> bool {
        if self.state != LoopState::Idle {
            warn!("Frame loop start ignored in state {:?}", self.state);
            return false;
        }
        self.state = LoopState::Running;
        scheduler.request_frame();
        true
    }

    /// Cancel the loop. Idempotent.
    pub fn stop(&mut self) {
        if self.state != LoopState::Cancelled {
            debug!("Frame loop cancelled after {} frames", self.frames);
            self.state = LoopState::Cancelled;
        }
    }

    /// Handle one frame callback.
    ///
    /// `frame` runs only while the loop is running, and the next frame is
    /// scheduled only if the loop is still running afterwards.
    pub fn tick<F>(&mut self, scheduler: &dyn FrameScheduler, frame: F) -> FrameOutcome
    where
        F: FnOnce() -> Result<(), RenderFailure>,
    {
        if !self.is_running() {
            return FrameOutcome::Skipped;
        }
        match frame() {
            Ok(()) => {
                self.frames += 1;
                if self.is_running() {
                    scheduler.request_frame();
                }
                FrameOutcome::Rendered
            }
            Err(failure) => {
                self.state = LoopState::Cancelled;
                FrameOutcome::Failed(failure)
            }
        }
    }
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}
