//! Environment - Scoped values propagated from ancestors to descendants.
//!
//! An [`Environment`] is a persistent chain of scopes. Publishing a value
//! creates a child scope that shares everything above it; lookup walks from
//! the nearest scope outward and falls back to the key's default.
//!
//! The environment is threaded through tree construction, so resolution is
//! lexical: a node sees what its ancestors published, regardless of the
//! order in which the host later calls lifecycle hooks.
//!
//! ```
//! use spark_view_bridge::bridge::{Environment, ViewProxy};
//! use spark_view_bridge::view::ImageView;
//!
//! let outer = ViewProxy::<ImageView>::new();
//! let inner = ViewProxy::<ImageView>::new();
//!
//! let root = Environment::new();
//! let parent = root.with_view_proxy(Some(outer.clone()));
//! let child = parent.with_view_proxy(Some(inner.clone()));
//!
//! assert!(root.view_proxy::<ImageView>().is_none());
//! assert!(ViewProxy::ptr_eq(&parent.view_proxy().unwrap(), &outer));
//! assert!(ViewProxy::ptr_eq(&child.view_proxy().unwrap(), &inner));
//! ```

use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use super::proxy::ViewProxy;

// =============================================================================
// EnvironmentKey
// =============================================================================

/// A typed key into the [`Environment`].
pub trait EnvironmentKey: 'static {
    type Value: Clone + 'static;

    /// Value seen when no ancestor published one.
    fn default_value() -> Self::Value;
}

/// Key for the proxy a descendant bridge node attaches to when it has no
/// explicit proxy of its own. Absent by default.
pub struct ViewProxyKey<V>(PhantomData<fn() -> V>);

impl<V: 'static> EnvironmentKey for ViewProxyKey<V> {
    type Value = Option<ViewProxy<V>>;

    fn default_value() -> Self::Value {
        None
    }
}

// =============================================================================
// Environment
// =============================================================================

struct Scope {
    key: TypeId,
    value: Rc<dyn Any>,
    parent: Option<Rc<Scope>>,
}

/// Immutable, cheaply cloned set of scoped values.
#[derive(Clone, Default)]
pub struct Environment {
    head: Option<Rc<Scope>>,
}

impl Environment {
    /// An environment where every key has its default value.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `K` from the nearest scope that published it.
    pub fn get<K: EnvironmentKey>(&self) -> K::Value {
        let key = TypeId::of::<K>();
        let mut scope = self.head.as_deref();
        while let Some(current) = scope {
            if current.key == key {
                if let Some(value) = current.value.downcast_ref::<K::Value>() {
                    return value.clone();
                }
            }
            scope = current.parent.as_deref();
        }
        K::default_value()
    }

    /// A child environment with `K` set to `value`.
    ///
    /// The receiver is unchanged; siblings built from it do not see the
    /// new value.
    pub fn with<K: EnvironmentKey>(&self, value: K::Value) -> Self {
        Self {
            head: Some(Rc::new(Scope {
                key: TypeId::of::<K>(),
                value: Rc::new(value),
                parent: self.head.clone(),
            })),
        }
    }

    /// Resolve the published proxy for views of type `V`.
    pub fn view_proxy<V: 'static>(&self) -> Option<ViewProxy<V>> {
        self.get::<ViewProxyKey<V>>()
    }

    /// Publish `proxy` to descendants.
    ///
    /// Publishing `None` hides any proxy published further up.
    pub fn with_view_proxy<V: 'static>(&self, proxy: Option<ViewProxy<V>>) -> Self {
        self.with::<ViewProxyKey<V>>(proxy)
    }

    /// Number of scopes between here and the root.
    pub fn depth(&self) -> usize {
        std::iter::successors(self.head.as_deref(), |scope| scope.parent.as_deref()).count()
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("depth", &self.depth())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ImageView;

    struct Scale;

    impl EnvironmentKey for Scale {
        type Value = f32;

        fn default_value() -> f32 {
            1.0
        }
    }

    #[test]
    fn test_default_when_unpublished() {
        let env = Environment::new();
        assert_eq!(env.get::<Scale>(), 1.0);
        assert!(env.view_proxy::<ImageView>().is_none());
        assert_eq!(env.depth(), 0);
    }

    #[test]
    fn test_nearest_ancestor_wins() {
        let root = Environment::new().with::<Scale>(2.0);
        let child = root.with::<Scale>(3.0);
        let sibling = root.clone();

        assert_eq!(root.get::<Scale>(), 2.0);
        assert_eq!(child.get::<Scale>(), 3.0);
        assert_eq!(sibling.get::<Scale>(), 2.0);
    }

    #[test]
    fn test_keys_are_independent() {
        let proxy = ViewProxy::<ImageView>::new();
        let env = Environment::new()
            .with_view_proxy(Some(proxy.clone()))
            .with::<Scale>(4.0);

        assert_eq!(env.get::<Scale>(), 4.0);
        assert!(ViewProxy::ptr_eq(&env.view_proxy().unwrap(), &proxy));
        assert_eq!(env.depth(), 2);
    }

    #[test]
    fn test_publishing_none_hides_ancestor() {
        let proxy = ViewProxy::<ImageView>::new();
        let parent = Environment::new().with_view_proxy(Some(proxy));
        let child = parent.with_view_proxy::<ImageView>(None);

        assert!(parent.view_proxy::<ImageView>().is_some());
        assert!(child.view_proxy::<ImageView>().is_none());
    }

    #[test]
    fn test_proxy_keys_are_per_view_type() {
        let proxy = ViewProxy::<ImageView>::new();
        let env = Environment::new().with_view_proxy(Some(proxy));

        struct OtherView;
        assert!(env.view_proxy::<OtherView>().is_none());
    }
}
