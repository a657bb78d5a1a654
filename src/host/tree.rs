//! View tree - One declarative pass, as data.
//!
//! A [`ViewTree`] describes what a pass produces: keyed leaves, groups, and
//! environment scopes. [`ViewTree::flatten`] walks it in construction order
//! and pairs each leaf with the environment its ancestors published.

use std::fmt;
use std::rc::Rc;

use crate::bridge::{Environment, ViewProxy};

/// Environment modifier applied to a subtree.
pub type EnvironmentModifier = Rc<dyn Fn(&Environment) -> Environment>;

/// Declarative description of a tree of bridge nodes.
pub enum ViewTree<R> {
    /// A node, identified across passes by `key`.
    Leaf { key: String, node: R },
    /// Siblings, in order.
    Group(Vec<ViewTree<R>>),
    /// A subtree that sees a modified environment.
    Scoped {
        modifier: EnvironmentModifier,
        child: Box<ViewTree<R>>,
    },
}

/// A leaf with its resolved environment.
pub struct FlatNode<'a, R> {
    pub key: &'a str,
    pub node: &'a R,
    pub environment: Environment,
}

impl<R> ViewTree<R> {
    pub fn leaf(key: impl Into<String>, node: R) -> Self {
        ViewTree::Leaf {
            key: key.into(),
            node,
        }
    }

    pub fn group(children: impl IntoIterator<Item = ViewTree<R>>) -> Self {
        ViewTree::Group(children.into_iter().collect())
    }

    /// Apply `modifier` to the environment of everything under `child`.
    pub fn environment(
        modifier: impl Fn(&Environment) -> Environment + 'static,
        child: ViewTree<R>,
    ) -> Self {
        ViewTree::Scoped {
            modifier: Rc::new(modifier),
            child: Box::new(child),
        }
    }

    /// Publish `proxy` to every bridge node under `child`.
    pub fn view_proxy<V: 'static>(proxy: Option<ViewProxy<V>>, child: ViewTree<R>) -> Self {
        Self::environment(move |env| env.with_view_proxy(proxy.clone()), child)
    }

    /// Every leaf in construction order, each with its environment.
    ///
    /// Modifiers run once per pass, on the way down.
    pub fn flatten(&self, root: &Environment) -> Vec<FlatNode<'_, R>> {
        let mut out = Vec::new();
        self.collect(root, &mut out);
        out
    }

    fn collect<'a>(&'a self, env: &Environment, out: &mut Vec<FlatNode<'a, R>>) {
        match self {
            ViewTree::Leaf { key, node } => out.push(FlatNode {
                key,
                node,
                environment: env.clone(),
            }),
            ViewTree::Group(children) => {
                for child in children {
                    child.collect(env, out);
                }
            }
            ViewTree::Scoped { modifier, child } => {
                let scoped = modifier(env);
                child.collect(&scoped, out);
            }
        }
    }
}

impl<R> fmt::Debug for ViewTree<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewTree::Leaf { key, .. } => f.debug_tuple("Leaf").field(key).finish(),
            ViewTree::Group(children) => f.debug_list().entries(children).finish(),
            ViewTree::Scoped { child, .. } => f.debug_tuple("Scoped").field(child).finish(),
        }
    }
}
