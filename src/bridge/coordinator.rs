//! Coordinator - Attach/detach protocol between proxies and views.
//!
//! One coordinator lives per bridge node and survives every update pass of
//! that node. It remembers, weakly, the proxy it attached last.
//!
//! # Protocol
//!
//! **attach(view, environment proxy)**
//! 1. Resolve the target: the explicit proxy if set, else the environment's.
//! 2. If the target is not the proxy attached last, unbind the old proxy and
//!    remember the target.
//! 3. Bind the target (if any) to `view`. This runs every time, so a node
//!    reclaims its proxy if something else rebound it in the meantime.
//!
//! **detach(view)**
//! - Unbind the remembered proxy only while it is still bound to `view`.
//!   If another coordinator has since taken the proxy, leave it alone.
//!
//! The second rule is what makes hand-off safe:
//!
//! ```
//! use spark_view_bridge::bridge::{Coordinator, ViewProxy};
//! use spark_view_bridge::view::{ImageView, ViewHandle};
//!
//! let proxy = ViewProxy::<ImageView>::new();
//! let v1 = ViewHandle::new(ImageView::default());
//! let v2 = ViewHandle::new(ImageView::default());
//!
//! let mut a = Coordinator::new(Some(proxy.clone()));
//! let mut b = Coordinator::new(Some(proxy.clone()));
//!
//! a.attach(&v1, None);
//! b.attach(&v2, None);
//! a.detach(&v1);
//!
//! assert!(proxy.is_bound_to(&v2));
//! ```

use tracing::debug;

use super::proxy::{ViewProxy, WeakProxy};
use crate::view::{ImperativeView, ViewHandle};

/// Pick the proxy a node attaches to. The explicit proxy always wins.
pub fn resolve_effective<V>(
    explicit: Option<&ViewProxy<V>>,
    environment: Option<&ViewProxy<V>>,
) -> Option<ViewProxy<V>> {
    explicit.or(environment).cloned()
}

/// Persistent per-node binding state.
pub struct Coordinator<V> {
    explicit_proxy: Option<ViewProxy<V>>,
    attached: Option<WeakProxy<V>>,
}

impl<V: ImperativeView> Coordinator<V> {
    pub fn new(explicit_proxy: Option<ViewProxy<V>>) -> Self {
        Self {
            explicit_proxy,
            attached: None,
        }
    }

    pub fn explicit_proxy(&self) -> Option<&ViewProxy<V>> {
        self.explicit_proxy.as_ref()
    }

    /// Replace the explicit proxy. Called on every update pass.
    pub fn set_explicit_proxy(&mut self, proxy: Option<ViewProxy<V>>) {
        self.explicit_proxy = proxy;
    }

    /// The proxy this coordinator attached last, if it is still alive.
    pub fn attached_proxy(&self) -> Option<ViewProxy<V>> {
        self.attached.as_ref().and_then(WeakProxy::upgrade)
    }

    /// Bind the effective proxy to `view`.
    pub fn attach(&mut self, view: &ViewHandle<V>, environment_proxy: Option<ViewProxy<V>>) {
        let target = resolve_effective(self.explicit_proxy.as_ref(), environment_proxy.as_ref());

        if !self.is_attached(target.as_ref()) {
            if let Some(previous) = self.attached_proxy() {
                debug!(
                    proxy = previous.id(),
                    view = view.addr(),
                    "releasing previously attached proxy"
                );
                previous.bind(None);
            }
            self.attached = target.as_ref().map(ViewProxy::downgrade);
        }

        if let Some(target) = target {
            debug!(proxy = target.id(), view = view.addr(), "attach");
            target.bind(Some(view));
        }
    }

    /// Unbind the attached proxy if it still addresses `view`.
    pub fn detach(&mut self, view: &ViewHandle<V>) {
        let Some(proxy) = self.attached_proxy() else {
            return;
        };
        if !proxy.is_bound_to(view) {
            debug!(
                proxy = proxy.id(),
                view = view.addr(),
                "proxy moved on, leaving binding in place"
            );
            return;
        }

        debug!(proxy = proxy.id(), view = view.addr(), "detach");
        proxy.bind(None);
        self.attached = None;
    }

    fn is_attached(&self, target: Option<&ViewProxy<V>>) -> bool {
        match (&self.attached, target) {
            (Some(attached), Some(target)) => attached.is(target),
            (None, None) => true,
            _ => false,
        }
    }
}
