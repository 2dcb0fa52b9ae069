//! Off-screen [`Container`] backed by a [`Raster`].

use plexus_core::Size;
use plexus_field::Container;

use crate::raster::Raster;

/// A fixed-size pixel area with no window behind it.
///
/// Call [`HeadlessContainer::set_size`] through `Mounted::container_mut`
/// followed by `Mounted::on_resize` to simulate a window resize.
#[derive(Debug, Clone)]
pub struct HeadlessContainer {
    width: usize,
    height: usize,
}

impl HeadlessContainer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn set_size(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }
}

impl Container for HeadlessContainer {
    type Surface = Raster;

    fn rendered_size(&self) -> Option<Size> {
        Size::new(self.width as f64, self.height as f64).ok()
    }

    fn acquire_surface(&mut self, _size: Size) -> Option<Raster> {
        Raster::new(self.width, self.height).ok()
    }

    fn resize_surface(&mut self, surface: &mut Raster, _size: Size) {
        if let Err(e) = surface.resize(self.width, self.height) {
            log::warn!("raster resize to {}x{} failed: {e}", self.width, self.height);
        }
    }
}
