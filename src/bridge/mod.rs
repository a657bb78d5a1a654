//! View bridge - Addressing retained views from outside the declarative tree.
//!
//! - [`ViewProxy`] - stable handle callers hold on to
//! - [`Environment`] - scoped channel that hands a proxy to descendants
//! - [`BridgeNode`] - declarative node standing for one view
//! - [`Coordinator`] - per-node state running the attach/detach protocol
//!
//! Everything here runs on the UI context. Work produced elsewhere must
//! reach it through a [`UiQueue`](crate::host::UiQueue) first.

mod coordinator;
mod environment;
mod node;
mod proxy;

pub use coordinator::{resolve_effective, Coordinator};
pub use environment::{Environment, EnvironmentKey, ViewProxyKey};
pub use node::{BridgeNode, ConfigureHook, Content, Context, ImageNode, ViewRepresentable};
pub use proxy::{ViewProxy, WeakProxy};
