//! # spark-view-bridge
//!
//! Stable handles to retained views inside a reactive declarative tree.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! proxy observation.
//!
//! ## Architecture
//!
//! Declarative nodes are rebuilt on every pass; the imperative views behind
//! them are not. A [`ViewProxy`] gives callers a handle whose identity never
//! changes, and a per-node [`Coordinator`] keeps that handle pointed at the
//! right view as nodes are created, updated and destroyed:
//!
//! ```text
//! ViewTree pass → Host::recompute → make_view / update_view / dismantle_view
//!                                        │
//!                                        └─→ Coordinator::attach / detach
//!                                               │
//!                                               └─→ ViewProxy::bind (weak)
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Value types (Rgba, Size, Image, ContentRef)
//! - [`view`] - Imperative view contract, handles, ImageView
//! - [`bridge`] - Proxy, environment, coordinator, bridge nodes
//! - [`host`] - Retained view pool, view tree, UI queue, config
//! - [`error`] - Host errors

pub mod bridge;
pub mod error;
pub mod host;
pub mod types;
pub mod view;

// Re-export commonly used items
pub use types::*;

pub use bridge::{
    resolve_effective, BridgeNode, ConfigureHook, Content, Context, Coordinator, Environment,
    EnvironmentKey, ImageNode, ViewProxy, ViewProxyKey, ViewRepresentable, WeakProxy,
};

pub use view::{ImageView, ImperativeView, ViewDirty, ViewHandle, WeakView};

pub use host::{Host, HostConfig, PassSummary, UiQueue, UiSender, ViewTree};

pub use error::{HostError, Result};
