//! Bridge nodes - Declarative nodes that stand for one imperative view.
//!
//! A [`BridgeNode`] is rebuilt on every pass of the declarative tree. The
//! host keeps the view and the [`Coordinator`] alive across passes and
//! drives the node through [`ViewRepresentable`]:
//!
//! - `make_view` - once, when the node first appears
//! - `update_view` - every pass the node survives
//! - `dismantle_view` - once, when the node is removed
//!
//! # Content modes
//!
//! - [`Content::Static`] - the node owns the view's content and writes it
//!   whenever a pass brings a different value (by identity)
//! - [`Content::ExternallyDriven`] - the node never writes content; callers
//!   push it through a [`ViewProxy`]
//!
//! # Example
//!
//! ```ignore
//! use spark_view_bridge::bridge::{ImageNode, ViewProxy};
//!
//! let proxy = ViewProxy::new();
//!
//! // Driven by the proxy, configured once at creation
//! let node = ImageNode::manual(Some(proxy.clone()))
//!     .configure(|view| view.set_clear_color(Rgba::BLACK));
//!
//! // Later, from anywhere on the UI context
//! proxy.set_image(Some(frame));
//! ```

use std::fmt;
use std::rc::Rc;

use tracing::trace;

use super::coordinator::Coordinator;
use super::environment::Environment;
use super::proxy::ViewProxy;
use crate::types::{ContentRef, Identity, Image};
use crate::view::{ImageView, ImperativeView, ViewHandle};

// =============================================================================
// ViewRepresentable
// =============================================================================

/// What a lifecycle hook gets from the host.
pub struct Context<'a, C> {
    pub coordinator: &'a mut C,
    pub environment: &'a Environment,
}

/// A declarative node backed by a retained imperative view.
///
/// The host guarantees `make_view` runs once before any `update_view`,
/// `dismantle_view` runs once after the last `update_view`, and all three
/// run on the same UI context.
pub trait ViewRepresentable {
    type View: 'static;
    type Coordinator;

    /// Build the per-node state that lives as long as the view.
    fn make_coordinator(&self) -> Self::Coordinator;

    fn make_view(&self, cx: &mut Context<'_, Self::Coordinator>) -> ViewHandle<Self::View>;

    fn update_view(&self, view: &ViewHandle<Self::View>, cx: &mut Context<'_, Self::Coordinator>);

    fn dismantle_view(_view: &ViewHandle<Self::View>, _coordinator: &mut Self::Coordinator) {}
}

// =============================================================================
// BridgeNode
// =============================================================================

/// What a bridge node does with the view's content.
#[derive(Clone)]
pub enum Content<C> {
    /// Write this value to the view.
    Static(C),
    /// Leave content to whoever drives the proxy.
    ExternallyDriven,
}

impl<C> Content<C> {
    pub fn is_static(&self) -> bool {
        matches!(self, Content::Static(_))
    }
}

/// Creation hook, run once on a freshly built view.
pub type ConfigureHook<V> = Rc<dyn Fn(&mut V)>;

/// Declarative node for one imperative view of type `V`.
pub struct BridgeNode<V: ImperativeView> {
    content: Content<V::Content>,
    explicit_proxy: Option<ViewProxy<V>>,
    configure: Option<ConfigureHook<V>>,
}

impl<V: ImperativeView> BridgeNode<V> {
    /// Node that shows `content`. Attaches to the environment's proxy only.
    pub fn with_content(content: V::Content) -> Self {
        Self {
            content: Content::Static(content),
            explicit_proxy: None,
            configure: None,
        }
    }

    /// Node whose content is pushed through a proxy.
    ///
    /// `proxy` takes precedence over any proxy published in the environment.
    pub fn driven(proxy: Option<ViewProxy<V>>) -> Self {
        Self {
            content: Content::ExternallyDriven,
            explicit_proxy: proxy,
            configure: None,
        }
    }

    /// Set the creation hook.
    pub fn configure(mut self, hook: impl Fn(&mut V) + 'static) -> Self {
        self.configure = Some(Rc::new(hook));
        self
    }

    pub fn content(&self) -> &Content<V::Content> {
        &self.content
    }

    pub fn explicit_proxy(&self) -> Option<&ViewProxy<V>> {
        self.explicit_proxy.as_ref()
    }

    fn attach_proxy(&self, view: &ViewHandle<V>, cx: &mut Context<'_, Coordinator<V>>) {
        cx.coordinator.attach(view, cx.environment.view_proxy::<V>());
    }
}

impl<V: ImperativeView + Default> ViewRepresentable for BridgeNode<V> {
    type View = V;
    type Coordinator = Coordinator<V>;

    fn make_coordinator(&self) -> Coordinator<V> {
        Coordinator::new(self.explicit_proxy.clone())
    }

    fn make_view(&self, cx: &mut Context<'_, Coordinator<V>>) -> ViewHandle<V> {
        let view = ViewHandle::new(V::default());
        if let Some(configure) = &self.configure {
            configure(&mut *view.borrow_mut());
        }
        self.attach_proxy(&view, cx);
        if let Content::Static(content) = &self.content {
            view.borrow_mut().set_content(content.clone());
        }
        view
    }

    fn update_view(&self, view: &ViewHandle<V>, cx: &mut Context<'_, Coordinator<V>>) {
        cx.coordinator.set_explicit_proxy(self.explicit_proxy.clone());
        self.attach_proxy(view, cx);

        if let Content::Static(content) = &self.content {
            if view.borrow().content().same_identity(content) {
                trace!(view = view.addr(), "content unchanged, skipping write");
                return;
            }
            view.borrow_mut().set_content(content.clone());
        }
    }

    fn dismantle_view(view: &ViewHandle<V>, coordinator: &mut Coordinator<V>) {
        coordinator.detach(view);
    }
}

impl<V: ImperativeView> Clone for BridgeNode<V> {
    fn clone(&self) -> Self {
        Self {
            content: self.content.clone(),
            explicit_proxy: self.explicit_proxy.clone(),
            configure: self.configure.clone(),
        }
    }
}

impl<V: ImperativeView> fmt::Debug for BridgeNode<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeNode")
            .field("static_content", &self.content.is_static())
            .field("explicit_proxy", &self.explicit_proxy)
            .field("configure", &self.configure.is_some())
            .finish()
    }
}

// =============================================================================
// ImageNode
// =============================================================================

/// Bridge node for an [`ImageView`].
pub type ImageNode = BridgeNode<ImageView>;

impl BridgeNode<ImageView> {
    /// Node that shows `image`.
    pub fn image(image: Option<ContentRef<Image>>) -> Self {
        Self::with_content(image)
    }

    /// Node whose image is set through `proxy` (or the environment's proxy).
    pub fn manual(proxy: Option<ViewProxy<ImageView>>) -> Self {
        Self::driven(proxy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use crate::types::{Rgba, Size};

    fn image(color: Rgba) -> Option<ContentRef<Image>> {
        Some(ContentRef::new(Image::solid(color, Size::new(2, 2))))
    }

    struct Mounted {
        view: ViewHandle<ImageView>,
        coordinator: Coordinator<ImageView>,
    }

    fn make(node: &ImageNode, environment: &Environment) -> Mounted {
        let mut coordinator = node.make_coordinator();
        let view = node.make_view(&mut Context {
            coordinator: &mut coordinator,
            environment,
        });
        Mounted { view, coordinator }
    }

    fn update(node: &ImageNode, mounted: &mut Mounted, environment: &Environment) {
        node.update_view(
            &mounted.view,
            &mut Context {
                coordinator: &mut mounted.coordinator,
                environment,
            },
        );
    }

    #[test]
    fn test_make_view_runs_configure_then_applies_content() {
        let configured = Rc::new(Cell::new(0));
        let configured_in_hook = configured.clone();
        let red = image(Rgba::RED);

        let node = ImageNode::image(red.clone()).configure(move |view| {
            configured_in_hook.set(configured_in_hook.get() + 1);
            view.set_clear_color(Rgba::BLACK);
        });
        let mounted = make(&node, &Environment::new());

        assert_eq!(configured.get(), 1);
        let view = mounted.view.borrow();
        assert_eq!(view.clear_color(), Rgba::BLACK);
        assert!(view.content().same_identity(&red));
        assert_eq!(view.content_writes(), 1);
    }

    #[test]
    fn test_configure_runs_only_at_creation() {
        let configured = Rc::new(Cell::new(0));
        let configured_in_hook = configured.clone();
        let node = ImageNode::manual(None)
            .configure(move |_| configured_in_hook.set(configured_in_hook.get() + 1));
        let env = Environment::new();

        let mut mounted = make(&node, &env);
        update(&node, &mut mounted, &env);
        update(&node, &mut mounted, &env);

        assert_eq!(configured.get(), 1);
    }

    #[test]
    fn test_update_suppresses_identical_content() {
        let red = image(Rgba::RED);
        let env = Environment::new();
        let node = ImageNode::image(red.clone());
        let mut mounted = make(&node, &env);

        update(&ImageNode::image(red.clone()), &mut mounted, &env);
        assert_eq!(mounted.view.borrow().content_writes(), 1);

        let blue = image(Rgba::BLUE);
        update(&ImageNode::image(blue.clone()), &mut mounted, &env);
        assert_eq!(mounted.view.borrow().content_writes(), 2);
        assert!(mounted.view.borrow().content().same_identity(&blue));
    }

    #[test]
    fn test_equal_but_distinct_content_is_written() {
        let env = Environment::new();
        let mut mounted = make(&ImageNode::image(image(Rgba::RED)), &env);

        // Same pixels, new allocation
        update(&ImageNode::image(image(Rgba::RED)), &mut mounted, &env);
        assert_eq!(mounted.view.borrow().content_writes(), 2);
    }

    #[test]
    fn test_driven_node_never_writes_content() {
        let proxy = ViewProxy::<ImageView>::new();
        let env = Environment::new();
        let node = ImageNode::manual(Some(proxy.clone()));
        let mut mounted = make(&node, &env);

        let red = image(Rgba::RED);
        proxy.set_image(red.clone());
        update(&node, &mut mounted, &env);

        let view = mounted.view.borrow();
        assert_eq!(view.content_writes(), 1);
        assert!(view.content().same_identity(&red));
    }

    #[test]
    fn test_static_node_attaches_environment_proxy() {
        let proxy = ViewProxy::<ImageView>::new();
        let env = Environment::new().with_view_proxy(Some(proxy.clone()));
        let mounted = make(&ImageNode::image(None), &env);

        assert!(proxy.is_bound_to(&mounted.view));
    }

    #[test]
    fn test_explicit_proxy_beats_environment_every_pass() {
        let explicit = ViewProxy::<ImageView>::new();
        let node = ImageNode::manual(Some(explicit.clone()));
        let initial = Environment::new().with_view_proxy(Some(ViewProxy::<ImageView>::new()));
        let mut mounted = make(&node, &initial);

        for _ in 0..3 {
            let env_proxy = ViewProxy::<ImageView>::new();
            let env = Environment::new().with_view_proxy(Some(env_proxy.clone()));
            update(&node, &mut mounted, &env);

            assert!(explicit.is_bound_to(&mounted.view));
            assert!(!env_proxy.is_bound());
        }
    }

    #[test]
    fn test_update_follows_environment_change() {
        let first = ViewProxy::<ImageView>::new();
        let second = ViewProxy::<ImageView>::new();
        let node = ImageNode::manual(None);

        let mut mounted = make(&node, &Environment::new().with_view_proxy(Some(first.clone())));
        assert!(first.is_bound_to(&mounted.view));

        update(&node, &mut mounted, &Environment::new().with_view_proxy(Some(second.clone())));
        assert!(!first.is_bound());
        assert!(second.is_bound_to(&mounted.view));
    }

    #[test]
    fn test_update_refreshes_explicit_proxy() {
        let first = ViewProxy::<ImageView>::new();
        let second = ViewProxy::<ImageView>::new();
        let env = Environment::new();

        let mut mounted = make(&ImageNode::manual(Some(first.clone())), &env);
        update(&ImageNode::manual(Some(second.clone())), &mut mounted, &env);

        assert!(!first.is_bound());
        assert!(second.is_bound_to(&mounted.view));
        assert!(ViewProxy::ptr_eq(
            mounted.coordinator.explicit_proxy().unwrap(),
            &second
        ));
    }

    #[test]
    fn test_dismantle_unbinds_proxy() {
        let proxy = ViewProxy::<ImageView>::new();
        let env = Environment::new();
        let mut mounted = make(&ImageNode::manual(Some(proxy.clone())), &env);

        ImageNode::dismantle_view(&mounted.view, &mut mounted.coordinator);
        assert!(!proxy.is_bound());
    }
}
