//! Host configuration.

/// Settings for a [`Host`](super::Host) and its [`UiQueue`](super::UiQueue).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    /// Name attached to the host's log output.
    pub label: String,
    /// Messages the UI queue buffers before senders see `QueueFull`.
    pub queue_capacity: usize,
}

impl HostConfig {
    pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            label: "host".to_string(),
            queue_capacity: Self::DEFAULT_QUEUE_CAPACITY,
        }
    }
}
