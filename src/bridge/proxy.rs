//! ViewProxy - Stable handle to a transient imperative view.
//!
//! The proxy outlives the views it addresses. It holds at most one view,
//! weakly, and every operation degrades to a no-op while nothing is bound,
//! so callers may use a proxy before any node has attached to it.
//!
//! # Observation
//!
//! [`ViewProxy::revision`] reads a `spark-signals` signal. Effects that read
//! it rerun when the bound view changes identity or when a forwarded
//! mutation reaches a live view.
//!
//! ```ignore
//! use spark_signals::effect;
//! use spark_view_bridge::bridge::ViewProxy;
//! use spark_view_bridge::view::ImageView;
//!
//! let proxy = ViewProxy::<ImageView>::new();
//! let watched = proxy.clone();
//! let _effect = effect(move || {
//!     let _ = watched.revision();
//!     // redraw overlay, refresh inspector, ...
//! });
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use spark_signals::{signal, Signal};
use tracing::trace;

use crate::types::{ContentRef, Image};
use crate::view::{ImageView, ImperativeView, ViewHandle, WeakView};

thread_local! {
    /// Counter for proxy ids (log output only).
    static PROXY_COUNTER: Cell<u64> = const { Cell::new(0) };
}

fn next_proxy_id() -> u64 {
    PROXY_COUNTER.with(|counter| {
        let id = counter.get();
        counter.set(id + 1);
        id
    })
}

struct ProxyInner<V> {
    id: u64,
    view: RefCell<Option<WeakView<V>>>,
    counter: Cell<u64>,
    revision: Signal<u64>,
}

impl<V> ProxyInner<V> {
    fn publish(&self) {
        let next = self.counter.get() + 1;
        self.counter.set(next);
        self.revision.set(next);
    }
}

/// Stable-identity handle to at most one imperative view.
///
/// Cloning a proxy yields the same proxy. Identity is compared with
/// [`ViewProxy::ptr_eq`].
pub struct ViewProxy<V> {
    inner: Rc<ProxyInner<V>>,
}

impl<V: ImperativeView> ViewProxy<V> {
    /// Create an unbound proxy.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(ProxyInner {
                id: next_proxy_id(),
                view: RefCell::new(None),
                counter: Cell::new(0),
                revision: signal(0),
            }),
        }
    }

    /// The bound view, if one is bound and still alive.
    pub fn view(&self) -> Option<ViewHandle<V>> {
        self.inner.view.borrow().as_ref().and_then(WeakView::upgrade)
    }

    pub fn is_bound(&self) -> bool {
        self.view().is_some()
    }

    /// Whether the live binding is exactly `view`.
    pub fn is_bound_to(&self, view: &ViewHandle<V>) -> bool {
        self.inner
            .view
            .borrow()
            .as_ref()
            .is_some_and(|weak| weak.is(view))
    }

    /// Forward new content to the bound view. No-op when unbound.
    ///
    /// Must be called on the UI context.
    pub fn set_content(&self, content: V::Content) {
        let Some(view) = self.view() else {
            trace!(proxy = self.inner.id, "set_content on unbound proxy");
            return;
        };
        view.borrow_mut().set_content(content);
        self.inner.publish();
    }

    /// Run `action` against the bound view. No-op when unbound.
    ///
    /// The view is mutably borrowed for the duration of `action`; reaching
    /// the same view through another handle inside `action` panics.
    pub fn perform(&self, action: impl FnOnce(&mut V)) {
        let Some(view) = self.view() else {
            trace!(proxy = self.inner.id, "perform on unbound proxy");
            return;
        };
        action(&mut *view.borrow_mut());
        self.inner.publish();
    }

    /// Bind to `view`, or unbind with `None`.
    ///
    /// Rebinding the view that is already bound changes nothing and
    /// notifies nobody.
    pub(crate) fn bind(&self, view: Option<&ViewHandle<V>>) {
        let mut slot = self.inner.view.borrow_mut();
        let unchanged = match (slot.as_ref(), view) {
            (Some(current), Some(view)) => current.is(view),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return;
        }

        trace!(
            proxy = self.inner.id,
            view = ?view.map(ViewHandle::addr),
            "bind"
        );
        *slot = view.map(ViewHandle::downgrade);
        drop(slot);
        self.inner.publish();
    }
}

impl<V> ViewProxy<V> {
    /// Stable numeric identity, for logging.
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Observation counter. Reading it inside an effect subscribes the
    /// effect to binding changes and forwarded mutations.
    pub fn revision(&self) -> u64 {
        self.inner.revision.get()
    }

    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.inner, &b.inner)
    }

    pub fn downgrade(&self) -> WeakProxy<V> {
        WeakProxy(Rc::downgrade(&self.inner))
    }
}

impl ViewProxy<ImageView> {
    /// Forward an image to the bound view. No-op when unbound.
    pub fn set_image(&self, image: Option<ContentRef<Image>>) {
        self.set_content(image);
    }
}

impl<V: ImperativeView> Default for ViewProxy<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Clone for ViewProxy<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<V> fmt::Debug for ViewProxy<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewProxy").field("id", &self.inner.id).finish()
    }
}

// =============================================================================
// WeakProxy
// =============================================================================

/// Non-owning handle to a [`ViewProxy`].
pub struct WeakProxy<V>(Weak<ProxyInner<V>>);

impl<V> WeakProxy<V> {
    pub fn upgrade(&self) -> Option<ViewProxy<V>> {
        self.0.upgrade().map(|inner| ViewProxy { inner })
    }

    /// Whether this weak handle points at `proxy`.
    pub fn is(&self, proxy: &ViewProxy<V>) -> bool {
        std::ptr::eq(self.0.as_ptr(), Rc::as_ptr(&proxy.inner))
    }
}

impl<V> Clone for WeakProxy<V> {
    fn clone(&self) -> Self {
        Self(Weak::clone(&self.0))
    }
}
