//! A repeating frame task with cancellation.
//!
//! [`FrameLoop`] owns an animation and a scheduler. Each fired frame runs the
//! animation once and requests the next; teardown cancels the pending
//! request and the token so nothing runs afterwards. At most one frame is
//! pending at any time.

use plexus_core::{
    Animation, CancelToken, DrawingSurface, FrameId, FrameScheduler, FrameStats, ManualScheduler,
};

pub struct FrameLoop<A, S: FrameScheduler> {
    animation: A,
    scheduler: S,
    pending: Option<S::Handle>,
    token: CancelToken,
    frames: u64,
}

impl<A: Animation, S: FrameScheduler> FrameLoop<A, S> {
    pub fn new(animation: A, scheduler: S) -> Self {
        Self {
            animation,
            scheduler,
            pending: None,
            token: CancelToken::new(),
            frames: 0,
        }
    }

    /// Requests the first frame. No-op if a frame is already pending or the
    /// loop was torn down.
    pub fn start(&mut self) {
        if self.pending.is_none() && !self.token.is_cancelled() {
            self.pending = self.scheduler.request_frame();
        }
    }

    /// Runs the first frame right away on `surface`, then requests the next.
    /// No-op if a frame is already pending or the loop was torn down.
    pub fn start_now(&mut self, surface: &mut dyn DrawingSurface) -> Option<FrameStats> {
        if self.pending.is_some() || self.token.is_cancelled() {
            return None;
        }
        Some(self.run_frame(surface))
    }

    /// Runs the frame for `handle` and requests the next one.
    ///
    /// Returns `None` without drawing if the loop was torn down or `handle`
    /// is not the pending frame.
    pub fn on_frame(
        &mut self,
        handle: S::Handle,
        surface: &mut dyn DrawingSurface,
    ) -> Option<FrameStats> {
        if self.token.is_cancelled() || self.pending != Some(handle) {
            log::trace!("ignoring stale frame {handle:?}");
            return None;
        }
        self.pending = None;
        Some(self.run_frame(surface))
    }

    fn run_frame(&mut self, surface: &mut dyn DrawingSurface) -> FrameStats {
        let stats = self.animation.advance(surface);
        self.frames += 1;
        log::trace!("frame {}: {stats:?}", self.frames);

        self.pending = self.scheduler.request_frame();
        if self.pending.is_none() {
            log::debug!("scheduler refused frame {}; loop stopped", self.frames + 1);
        }
        stats
    }

    /// Cancels the pending frame and stops the loop. Safe to call repeatedly.
    pub fn teardown(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
        self.token.cancel();
    }

    pub fn is_running(&self) -> bool {
        self.pending.is_some() && !self.token.is_cancelled()
    }

    /// The frame that will run next, if any.
    pub fn pending(&self) -> Option<S::Handle> {
        self.pending
    }

    /// Frames run so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// A clone of the loop's cancellation token.
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn animation(&self) -> &A {
        &self.animation
    }

    pub fn animation_mut(&mut self) -> &mut A {
        &mut self.animation
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }
}

impl<A: Animation> FrameLoop<A, ManualScheduler> {
    /// Fires the frame the manual scheduler is holding, if any.
    pub fn pump(&mut self, surface: &mut dyn DrawingSurface) -> Option<FrameStats> {
        let handle: FrameId = self.scheduler.take_due()?;
        self.on_frame(handle, surface)
    }
}
