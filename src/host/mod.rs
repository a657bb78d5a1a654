//! Host - Stand-in for the declarative framework around the bridge.
//!
//! - [`Host`] - retained view pool, drives create/update/destroy
//! - [`ViewTree`] - one declarative pass with environment scopes
//! - [`UiQueue`] - hop from worker threads onto the UI context
//! - [`HostConfig`] - host settings

mod config;
mod pool;
mod queue;
mod tree;

pub use config::HostConfig;
pub use pool::{Host, PassSummary};
pub use queue::{UiQueue, UiSender};
pub use tree::{EnvironmentModifier, FlatNode, ViewTree};
