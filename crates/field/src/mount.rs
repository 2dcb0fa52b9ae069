//! Attaching a field to a host container.
//!
//! A [`Container`] is whatever provides the drawing surface and its rendered
//! size: a browser `<canvas>`, or an off-screen raster. [`mount`] creates the
//! field at the container's size and starts its frame loop; it yields `None`
//! when the container cannot provide a surface, in which case nothing is
//! drawn and no error is reported.

use plexus_core::{Animation, DrawingSurface, FrameScheduler, FrameStats, Palette, Size};

use crate::config::FieldConfig;
use crate::frame_loop::FrameLoop;
use crate::ParticleField;

/// The host a field is mounted into.
pub trait Container {
    type Surface: DrawingSurface;

    /// Rendered pixel size, or `None` when the container has no area.
    fn rendered_size(&self) -> Option<Size>;

    /// Acquires a drawing surface of `size`. `None` means no 2D context.
    fn acquire_surface(&mut self, size: Size) -> Option<Self::Surface>;

    /// Resizes an acquired surface to `size`.
    fn resize_surface(&mut self, surface: &mut Self::Surface, size: Size);

    /// Starts delivering resize notifications.
    fn watch_resize(&mut self) {}

    /// Stops delivering resize notifications.
    fn unwatch_resize(&mut self) {}
}

/// A field running inside a container.
///
/// Dropping a `Mounted` tears it down.
pub struct Mounted<C: Container, S: FrameScheduler> {
    container: C,
    surface: C::Surface,
    frame_loop: FrameLoop<ParticleField, S>,
    last_stats: Option<FrameStats>,
    torn_down: bool,
}

/// Mounts a field into `container`, draws its first frame immediately and
/// requests the next one.
pub fn mount<C: Container, S: FrameScheduler>(
    mut container: C,
    scheduler: S,
    palette: Palette,
    config: FieldConfig,
    seed: u64,
) -> Option<Mounted<C, S>> {
    let Some(size) = container.rendered_size() else {
        log::debug!("container has no rendered area; animation disabled");
        return None;
    };
    let Some(mut surface) = container.acquire_surface(size) else {
        log::debug!("no 2D drawing surface available; animation disabled");
        return None;
    };
    container.watch_resize();

    let field = ParticleField::new(size, palette, config, seed);
    let mut frame_loop = FrameLoop::new(field, scheduler);
    let last_stats = frame_loop.start_now(&mut surface);
    log::debug!(
        "mounted field {}x{} with {} particles",
        size.width,
        size.height,
        config.particle_count
    );

    Some(Mounted {
        container,
        surface,
        frame_loop,
        last_stats,
        torn_down: false,
    })
}

impl<C: Container, S: FrameScheduler> Mounted<C, S> {
    /// Re-reads the container size and resizes the surface and field bounds.
    ///
    /// Entities are not moved; particles left outside a shrunken surface are
    /// clamped back on their next update.
    pub fn on_resize(&mut self) {
        if self.torn_down {
            return;
        }
        match self.container.rendered_size() {
            Some(size) => {
                self.container.resize_surface(&mut self.surface, size);
                self.frame_loop.animation_mut().resize(size);
                log::debug!("resized to {}x{}", size.width, size.height);
            }
            None => log::debug!("ignoring resize to an empty container"),
        }
    }

    /// Runs the frame for `handle`, see [`FrameLoop::on_frame`].
    pub fn on_frame(&mut self, handle: S::Handle) -> Option<FrameStats> {
        let stats = self.frame_loop.on_frame(handle, &mut self.surface)?;
        self.last_stats = Some(stats);
        Some(stats)
    }

    /// Runs whichever frame is pending.
    pub fn on_pending_frame(&mut self) -> Option<FrameStats> {
        let handle = self.frame_loop.pending()?;
        self.on_frame(handle)
    }

    /// Unregisters the resize handler and cancels the pending frame.
    /// Safe to call repeatedly.
    pub fn teardown(&mut self) {
        if !self.torn_down {
            self.container.unwatch_resize();
            self.torn_down = true;
            log::debug!("unmounted after {} frames", self.frame_loop.frames());
        }
        self.frame_loop.teardown();
    }

    pub fn is_running(&self) -> bool {
        self.frame_loop.is_running()
    }

    /// Stats of the most recently drawn frame.
    pub fn last_stats(&self) -> Option<FrameStats> {
        self.last_stats
    }

    pub fn field(&self) -> &ParticleField {
        self.frame_loop.animation()
    }

    pub fn frame_loop(&self) -> &FrameLoop<ParticleField, S> {
        &self.frame_loop
    }

    pub fn surface(&self) -> &C::Surface {
        &self.surface
    }

    pub fn container(&self) -> &C {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut C {
        &mut self.container
    }
}

impl<C: Container, S: FrameScheduler> Drop for Mounted<C, S> {
    fn drop(&mut self) {
        self.teardown();
    }
}
