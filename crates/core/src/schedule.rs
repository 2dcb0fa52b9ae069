//! Frame scheduling: "run this step, then arrange the next one, until canceled".
//!
//! A [`FrameScheduler`] hands out a handle for the next frame and can cancel
//! it. The browser binding wraps `requestAnimationFrame`; headless drivers and
//! tests use [`ManualScheduler`], which fires only when asked.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Something that can arrange for a single future frame callback.
pub trait FrameScheduler {
    type Handle: Copy + PartialEq + fmt::Debug;

    /// Requests one frame. Returns `None` if the platform refused.
    fn request_frame(&mut self) -> Option<Self::Handle>;

    /// Cancels a requested frame. Canceling an unknown or already-fired
    /// handle is a no-op.
    fn cancel_frame(&mut self, handle: Self::Handle);
}

/// Shared flag that stops a frame loop.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Handle issued by [`ManualScheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(pub u64);

/// Deterministic scheduler: a requested frame fires when `take_due` is called.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    due: Option<FrameId>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns the frame waiting to fire, if any.
    pub fn take_due(&mut self) -> Option<FrameId> {
        self.due.take()
    }

    /// The frame waiting to fire, without firing it.
    pub fn pending(&self) -> Option<FrameId> {
        self.due
    }
}

impl FrameScheduler for ManualScheduler {
    type Handle = FrameId;

    fn request_frame(&mut self) -> Option<FrameId> {
        self.next_id += 1;
        let id = FrameId(self.next_id);
        if let Some(replaced) = self.due.replace(id) {
            log::trace!("frame {replaced:?} superseded by {id:?}");
        }
        Some(id)
    }

    fn cancel_frame(&mut self, handle: FrameId) {
        if self.due == Some(handle) {
            self.due = None;
        }
    }
}
