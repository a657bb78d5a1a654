//! Core types for spark-view-bridge.
//!
//! These are the value types that flow through the bridge:
//! - [`Rgba`] and [`Size`] describe pixels and view geometry
//! - [`Image`] is the content value shown by an [`ImageView`](crate::view::ImageView)
//! - [`ContentRef`] shares a content value and compares by identity
//!
//! Identity matters here. The bridge never compares content by value; a
//! write to a view is suppressed only when the very same allocation is
//! already applied. See [`Identity`].

use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

// =============================================================================
// Rgba
// =============================================================================

/// RGBA color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Create a new RGBA color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Transparent color.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    // Standard colors
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const GRAY: Self = Self::rgb(128, 128, 128);

    /// Create an opaque color from hue, saturation and brightness.
    ///
    /// All components are in `0.0..=1.0`. Hue wraps, so `1.25` is the same
    /// as `0.25`.
    pub fn hsb(hue: f32, saturation: f32, brightness: f32) -> Self {
        let h = hue.rem_euclid(1.0) * 6.0;
        let s = saturation.clamp(0.0, 1.0);
        let v = brightness.clamp(0.0, 1.0);

        let sector = h.floor();
        let f = h - sector;
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));

        let (r, g, b) = match sector as u8 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };

        let to_u8 = |x: f32| (x * 255.0).round().clamp(0.0, 255.0) as u8;
        Self::rgb(to_u8(r), to_u8(g), to_u8(b))
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

// =============================================================================
// Size
// =============================================================================

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub const fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    #[inline]
    pub const fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }
}

// =============================================================================
// Image
// =============================================================================

/// An immutable raster image.
///
/// `Image` is plain data and therefore `Send`: background work may build one
/// and ship it to the UI context, where it is wrapped in a [`ContentRef`]
/// before reaching a view.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    size: Size,
    pixels: Vec<Rgba>,
}

impl Image {
    /// Create an image filled with a single color.
    pub fn solid(color: Rgba, size: Size) -> Self {
        Self {
            size,
            pixels: vec![color; size.area()],
        }
    }

    /// Create an image from row-major pixels.
    ///
    /// Returns `None` when the pixel count does not match `size`.
    pub fn from_pixels(size: Size, pixels: Vec<Rgba>) -> Option<Self> {
        (pixels.len() == size.area()).then_some(Self { size, pixels })
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Pixel at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if !self.size.contains(x, y) {
            return None;
        }
        let index = y as usize * self.size.width as usize + x as usize;
        self.pixels.get(index).copied()
    }
}

// =============================================================================
// Identity
// =============================================================================

/// Identity comparison for content values.
///
/// Two values are the same when they refer to the same allocation, not
/// when they hold equal data.
pub trait Identity {
    fn same_identity(&self, other: &Self) -> bool;
}

impl<T: Identity> Identity for Option<T> {
    fn same_identity(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.same_identity(b),
            (None, None) => true,
            _ => false,
        }
    }
}

// =============================================================================
// ContentRef
// =============================================================================

/// Shared, identity-compared handle to a content value.
///
/// Cloning a `ContentRef` keeps its identity. Building a new one from an
/// equal value does not.
///
/// ```
/// use spark_view_bridge::types::{ContentRef, Identity, Image, Rgba, Size};
///
/// let a = ContentRef::new(Image::solid(Rgba::RED, Size::new(2, 2)));
/// let b = ContentRef::new(Image::solid(Rgba::RED, Size::new(2, 2)));
///
/// assert!(a.same_identity(&a.clone()));
/// assert!(!a.same_identity(&b));
/// ```
pub struct ContentRef<T: ?Sized>(Rc<T>);

impl<T> ContentRef<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(value))
    }
}

impl<T: ?Sized> ContentRef<T> {
    /// Address of the shared allocation, for logging.
    pub fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl<T: ?Sized> Identity for ContentRef<T> {
    fn same_identity(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T: ?Sized> Clone for ContentRef<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T: ?Sized> Deref for ContentRef<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> From<T> for ContentRef<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for ContentRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ContentRef").field(&&*self.0).finish()
    }
}
