//! ImageView - Retained view that presents an [`Image`].
//!
//! Every property write marks the view dirty so a renderer can pick up
//! exactly what changed with [`ImageView::take_dirty`].

use crate::types::{ContentRef, Image, Rgba, Size};

use super::ImperativeView;

bitflags::bitflags! {
    /// Properties written since the last [`ImageView::take_dirty`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ViewDirty: u8 {
        const NONE = 0;
        const IMAGE = 1 << 0;
        const CLEAR_COLOR = 1 << 1;
        const SIZE = 1 << 2;
    }
}

/// A retained image view.
///
/// Shows `image` when present and `clear_color` everywhere else.
#[derive(Debug, Default)]
pub struct ImageView {
    image: Option<ContentRef<Image>>,
    clear_color: Rgba,
    size: Size,
    dirty: ViewDirty,
    content_writes: usize,
}

impl ImageView {
    /// Create an empty view with the given size.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            ..Default::default()
        }
    }

    pub fn image(&self) -> Option<&ContentRef<Image>> {
        self.image.as_ref()
    }

    pub fn set_image(&mut self, image: Option<ContentRef<Image>>) {
        self.image = image;
        self.content_writes += 1;
        self.dirty |= ViewDirty::IMAGE;
    }

    pub fn clear_color(&self) -> Rgba {
        self.clear_color
    }

    pub fn set_clear_color(&mut self, color: Rgba) {
        self.clear_color = color;
        self.dirty |= ViewDirty::CLEAR_COLOR;
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = size;
        self.dirty |= ViewDirty::SIZE;
    }

    /// Number of times the image property has been written.
    pub fn content_writes(&self) -> usize {
        self.content_writes
    }

    /// Return and reset the dirty flags.
    pub fn take_dirty(&mut self) -> ViewDirty {
        std::mem::take(&mut self.dirty)
    }

    /// The color presented at `(x, y)` in view coordinates.
    ///
    /// The image is drawn at the origin without scaling. Points outside
    /// the image, or any point while no image is set, show the clear color.
    /// Returns `None` outside the view.
    pub fn sample(&self, x: u32, y: u32) -> Option<Rgba> {
        if !self.size.contains(x, y) {
            return None;
        }
        let pixel = self.image.as_ref().and_then(|image| image.pixel(x, y));
        Some(pixel.unwrap_or(self.clear_color))
    }
}

impl ImperativeView for ImageView {
    type Content = Option<ContentRef<Image>>;

    fn content(&self) -> &Self::Content {
        &self.image
    }

    fn set_content(&mut self, content: Self::Content) {
        self.set_image(content);
    }
}
