//! Host - Retained view pool that drives bridge node lifecycles.
//!
//! The host plays the part of the declarative framework: it keeps one view
//! and one coordinator per key and calls the node's lifecycle hooks as
//! passes come in.
//!
//! # Reconciliation
//!
//! [`Host::recompute`] takes a whole [`ViewTree`] pass and reconciles it by
//! key, like a keyed list:
//! - Removed keys: `dismantle_view`, then the view and coordinator are dropped
//! - Existing keys: `update_view` (no view recreation!)
//! - New keys: `make_coordinator` + `make_view`
//!
//! Removals run before creations, so a proxy handed from a removed node to
//! a new one ends up bound to the new node's view.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::bridge::{Context, Environment, ViewRepresentable};
use crate::error::{HostError, Result};
use crate::view::ViewHandle;

use super::config::HostConfig;
use super::tree::ViewTree;

struct Mounted<R: ViewRepresentable> {
    view: ViewHandle<R::View>,
    coordinator: R::Coordinator,
}

/// Counts from one [`Host::recompute`] pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PassSummary {
    pub created: usize,
    pub updated: usize,
    pub destroyed: usize,
}

/// Retained view pool for nodes of type `R`.
///
/// Dropping the host destroys every mounted node.
pub struct Host<R: ViewRepresentable> {
    config: HostConfig,
    mounted: HashMap<String, Mounted<R>>,
    /// Keys in mount order.
    order: Vec<String>,
}

impl<R: ViewRepresentable> Host<R> {
    pub fn new(config: HostConfig) -> Self {
        Self {
            config,
            mounted: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Create the node `key`: build its coordinator and view.
    pub fn mount(
        &mut self,
        key: &str,
        node: &R,
        environment: &Environment,
    ) -> Result<ViewHandle<R::View>> {
        if self.mounted.contains_key(key) {
            return Err(HostError::AlreadyMounted(key.to_string()));
        }

        let mut coordinator = node.make_coordinator();
        let view = node.make_view(&mut Context {
            coordinator: &mut coordinator,
            environment,
        });
        debug!(host = %self.config.label, key, view = view.addr(), "create");

        self.mounted.insert(
            key.to_string(),
            Mounted {
                view: view.clone(),
                coordinator,
            },
        );
        self.order.push(key.to_string());
        Ok(view)
    }

    /// Run an update pass for the mounted node `key`.
    pub fn update(&mut self, key: &str, node: &R, environment: &Environment) -> Result<()> {
        let mounted = self
            .mounted
            .get_mut(key)
            .ok_or_else(|| HostError::NotMounted(key.to_string()))?;

        node.update_view(
            &mounted.view,
            &mut Context {
                coordinator: &mut mounted.coordinator,
                environment,
            },
        );
        debug!(host = %self.config.label, key, "update");
        Ok(())
    }

    /// Destroy the node `key`.
    pub fn unmount(&mut self, key: &str) -> Result<()> {
        let mut mounted = self
            .mounted
            .remove(key)
            .ok_or_else(|| HostError::NotMounted(key.to_string()))?;
        self.order.retain(|k| k != key);

        R::dismantle_view(&mounted.view, &mut mounted.coordinator);
        debug!(host = %self.config.label, key, "destroy");
        Ok(())
    }

    /// Reconcile the host with one pass of the declarative tree.
    ///
    /// Fails without touching anything if the tree repeats a key.
    pub fn recompute(&mut self, tree: &ViewTree<R>, root: &Environment) -> Result<PassSummary> {
        let flat = tree.flatten(root);

        let mut present = HashSet::with_capacity(flat.len());
        for entry in &flat {
            if !present.insert(entry.key) {
                return Err(HostError::DuplicateKey(entry.key.to_string()));
            }
        }

        let mut summary = PassSummary::default();

        let removed: Vec<String> = self
            .order
            .iter()
            .filter(|key| !present.contains(key.as_str()))
            .cloned()
            .collect();
        for key in removed {
            self.unmount(&key)?;
            summary.destroyed += 1;
        }

        for entry in &flat {
            if self.mounted.contains_key(entry.key) {
                self.update(entry.key, entry.node, &entry.environment)?;
                summary.updated += 1;
            } else {
                self.mount(entry.key, entry.node, &entry.environment)?;
                summary.created += 1;
            }
        }

        debug!(
            host = %self.config.label,
            created = summary.created,
            updated = summary.updated,
            destroyed = summary.destroyed,
            "pass complete"
        );
        Ok(summary)
    }

    /// The view backing `key`.
    pub fn view(&self, key: &str) -> Option<ViewHandle<R::View>> {
        self.mounted.get(key).map(|mounted| mounted.view.clone())
    }

    pub fn coordinator(&self, key: &str) -> Option<&R::Coordinator> {
        self.mounted.get(key).map(|mounted| &mounted.coordinator)
    }

    pub fn is_mounted(&self, key: &str) -> bool {
        self.mounted.contains_key(key)
    }

    /// Mounted keys in mount order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.mounted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mounted.is_empty()
    }

    /// Destroy every mounted node, most recent first.
    pub fn clear(&mut self) {
        while let Some(key) = self.order.last().cloned() {
            // Key comes from `order`, so it is mounted
            let _ = self.unmount(&key);
        }
    }
}

impl<R: ViewRepresentable> Default for Host<R> {
    fn default() -> Self {
        Self::new(HostConfig::default())
    }
}

impl<R: ViewRepresentable> Drop for Host<R> {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::bridge::{ImageNode, ViewProxy};
    use crate::types::{ContentRef, Image, Rgba, Size};
    use crate::view::ImageView;

    /// Records lifecycle calls.
    struct Recorder {
        name: &'static str,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl ViewRepresentable for Recorder {
        type View = ();
        type Coordinator = Rc<RefCell<Vec<String>>>;

        fn make_coordinator(&self) -> Self::Coordinator {
            self.log.clone()
        }

        fn make_view(&self, cx: &mut Context<'_, Self::Coordinator>) -> ViewHandle<()> {
            cx.coordinator.borrow_mut().push(format!("make {}", self.name));
            ViewHandle::new(())
        }

        fn update_view(&self, _view: &ViewHandle<()>, cx: &mut Context<'_, Self::Coordinator>) {
            cx.coordinator.borrow_mut().push(format!("update {}", self.name));
        }

        fn dismantle_view(_view: &ViewHandle<()>, coordinator: &mut Self::Coordinator) {
            coordinator.borrow_mut().push("dismantle".to_string());
        }
    }

    fn recorder(name: &'static str, log: &Rc<RefCell<Vec<String>>>) -> Recorder {
        Recorder {
            name,
            log: log.clone(),
        }
    }

    #[test]
    fn test_mount_update_unmount() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut host = Host::default();
        let env = Environment::new();

        host.mount("a", &recorder("a", &log), &env).unwrap();
        host.update("a", &recorder("a", &log), &env).unwrap();
        host.unmount("a").unwrap();

        assert_eq!(*log.borrow(), ["make a", "update a", "dismantle"]);
        assert!(host.is_empty());
    }

    #[test]
    fn test_lifecycle_misuse_errors() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut host = Host::default();
        let env = Environment::new();

        host.mount("a", &recorder("a", &log), &env).unwrap();
        assert_eq!(
            host.mount("a", &recorder("a", &log), &env).unwrap_err(),
            HostError::AlreadyMounted("a".into())
        );
        assert_eq!(
            host.update("b", &recorder("b", &log), &env),
            Err(HostError::NotMounted("b".into()))
        );
        assert_eq!(host.unmount("b"), Err(HostError::NotMounted("b".into())));
    }

    #[test]
    fn test_recompute_reconciles_by_key() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut host = Host::default();
        let env = Environment::new();

        let first = ViewTree::group([
            ViewTree::leaf("a", recorder("a", &log)),
            ViewTree::leaf("b", recorder("b", &log)),
        ]);
        let summary = host.recompute(&first, &env).unwrap();
        assert_eq!(summary, PassSummary { created: 2, updated: 0, destroyed: 0 });
        let view_a = host.view("a").unwrap();

        let second = ViewTree::group([
            ViewTree::leaf("a", recorder("a", &log)),
            ViewTree::leaf("c", recorder("c", &log)),
        ]);
        let summary = host.recompute(&second, &env).unwrap();
        assert_eq!(summary, PassSummary { created: 1, updated: 1, destroyed: 1 });

        // Surviving node keeps its view
        assert!(ViewHandle::ptr_eq(&view_a, &host.view("a").unwrap()));
        assert_eq!(host.keys().collect::<Vec<_>>(), ["a", "c"]);
        assert!(!host.is_mounted("b"));
        assert!(host.is_mounted("c"));
        assert_eq!(
            *log.borrow(),
            ["make a", "make b", "dismantle", "update a", "make c"]
        );
    }

    #[test]
    fn test_duplicate_keys_rejected_before_any_change() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut host = Host::default();
        let tree = ViewTree::group([
            ViewTree::leaf("a", recorder("a", &log)),
            ViewTree::leaf("a", recorder("a", &log)),
        ]);

        assert_eq!(
            host.recompute(&tree, &Environment::new()),
            Err(HostError::DuplicateKey("a".into()))
        );
        assert!(host.is_empty());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_drop_destroys_all_nodes() {
        let proxy = ViewProxy::<ImageView>::new();
        {
            let mut host = Host::default();
            let node = ImageNode::manual(Some(proxy.clone()));
            host.mount("node", &node, &Environment::new()).unwrap();
            assert!(proxy.is_bound());
        }
        assert!(!proxy.is_bound());
    }

    #[test]
    fn test_hand_off_across_structural_change() {
        let proxy = ViewProxy::<ImageView>::new();
        let mut host = Host::new(HostConfig::new("hand-off"));
        let env = Environment::new();

        let before = ViewTree::leaf("old", ImageNode::manual(Some(proxy.clone())));
        host.recompute(&before, &env).unwrap();
        let old_view = host.view("old").unwrap();
        assert!(proxy.is_bound_to(&old_view));

        let after = ViewTree::leaf("new", ImageNode::manual(Some(proxy.clone())));
        host.recompute(&after, &env).unwrap();
        let new_view = host.view("new").unwrap();

        assert!(proxy.is_bound_to(&new_view));
        let frame = Some(ContentRef::new(Image::solid(Rgba::GREEN, Size::new(1, 1))));
        proxy.set_image(frame);
        assert_eq!(new_view.borrow().content_writes(), 1);
        assert_eq!(old_view.borrow().content_writes(), 0);
    }

    #[test]
    fn test_shared_environment_proxy_goes_to_last_leaf_every_pass() {
        let proxy = ViewProxy::<ImageView>::new();
        let mut host = Host::default();
        let tree = ViewTree::view_proxy(
            Some(proxy.clone()),
            ViewTree::group([
                ViewTree::leaf("first", ImageNode::manual(None)),
                ViewTree::leaf("second", ImageNode::manual(None)),
            ]),
        );

        for pass in 0..3 {
            host.recompute(&tree, &Environment::new()).unwrap();

            let second = host.view("second").unwrap();
            assert!(proxy.is_bound_to(&second), "pass {pass}");
            // Both coordinators still claim the proxy
            for key in ["first", "second"] {
                let attached = host.coordinator(key).unwrap().attached_proxy().unwrap();
                assert!(ViewProxy::ptr_eq(&attached, &proxy), "pass {pass}");
            }
        }

        // Removing the holder releases it until the survivor reclaims it
        host.unmount("second").unwrap();
        assert!(!proxy.is_bound());
        host.recompute(
            &ViewTree::view_proxy(
                Some(proxy.clone()),
                ViewTree::leaf("first", ImageNode::manual(None)),
            ),
            &Environment::new(),
        )
        .unwrap();
        assert!(proxy.is_bound_to(&host.view("first").unwrap()));
    }
}
