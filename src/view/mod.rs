//! Imperative views - Long-lived, mutable view objects.
//!
//! A declarative tree is rebuilt on every pass and has no stable identity
//! for the objects it drives. The imperative view is the opposite: it is
//! created once, mutated in place, and keeps its identity until the host
//! destroys it.
//!
//! - [`ImperativeView`] - the contract a view must meet to be bridged
//! - [`ViewHandle`] - owning handle, identity is the allocation
//! - [`WeakView`] - non-owning handle used by proxies
//! - [`ImageView`] - the retained image view

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::types::Identity;

mod image_view;

pub use image_view::{ImageView, ViewDirty};

// =============================================================================
// ImperativeView
// =============================================================================

/// A retained view with a settable "current content" property.
///
/// The content must be comparable by identity so that redundant writes can
/// be skipped.
pub trait ImperativeView: 'static {
    /// The content value shown by the view.
    type Content: Identity + Clone + 'static;

    /// The currently applied content.
    fn content(&self) -> &Self::Content;

    /// Replace the current content.
    fn set_content(&mut self, content: Self::Content);
}

// =============================================================================
// ViewHandle
// =============================================================================

/// Owning handle to an imperative view.
///
/// Clones share the same view. Two handles are the same view when
/// [`ViewHandle::ptr_eq`] holds.
pub struct ViewHandle<V>(Rc<RefCell<V>>);

impl<V> ViewHandle<V> {
    pub fn new(view: V) -> Self {
        Self(Rc::new(RefCell::new(view)))
    }

    /// Borrow the view.
    ///
    /// # Panics
    ///
    /// Panics if the view is currently borrowed mutably, e.g. from inside
    /// a [`ViewProxy::perform`](crate::bridge::ViewProxy::perform) closure.
    pub fn borrow(&self) -> Ref<'_, V> {
        self.0.borrow()
    }

    /// Mutably borrow the view.
    ///
    /// # Panics
    ///
    /// Panics if the view is already borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, V> {
        self.0.borrow_mut()
    }

    pub fn downgrade(&self) -> WeakView<V> {
        WeakView(Rc::downgrade(&self.0))
    }

    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    /// Address of the view, for logging.
    pub fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl<V> Clone for ViewHandle<V> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<V> fmt::Debug for ViewHandle<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ViewHandle({:#x})", self.addr())
    }
}

// =============================================================================
// WeakView
// =============================================================================

/// Non-owning handle to an imperative view.
///
/// Holding a `WeakView` never keeps the view alive.
pub struct WeakView<V>(Weak<RefCell<V>>);

impl<V> WeakView<V> {
    pub fn upgrade(&self) -> Option<ViewHandle<V>> {
        self.0.upgrade().map(ViewHandle)
    }

    /// Whether this weak handle points at `view`.
    ///
    /// Works even after the view is gone: a dead handle matches nothing
    /// that is still alive.
    pub fn is(&self, view: &ViewHandle<V>) -> bool {
        std::ptr::eq(self.0.as_ptr(), Rc::as_ptr(&view.0))
    }
}

impl<V> Clone for WeakView<V> {
    fn clone(&self) -> Self {
        Self(Weak::clone(&self.0))
    }
}
