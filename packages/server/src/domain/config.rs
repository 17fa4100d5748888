//! Room tuning knobs.

use std::time::Duration;

/// Whether a room delivers a message back to the member who sent it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EchoPolicy {
    /// Every member receives every message, including its own
    #[default]
    IncludeSender,
    /// The sender is skipped when its own message is broadcast
    ExcludeSender,
}

/// Settings shared by every room the registry creates.
#[derive(Debug, Clone)]
pub struct RoomConfig {
    /// Capacity of each room's inbound message queue
    pub queue_capacity: usize,
    /// How long `enqueue` waits for queue space before dropping the message
    pub enqueue_timeout: Duration,
    /// How long one member may take to accept a message before it is removed
    pub send_timeout: Duration,
    /// How long a room may stay empty before it is torn down; `None` keeps it forever
    pub idle_grace: Option<Duration>,
    pub echo: EchoPolicy,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 256,
            enqueue_timeout: Duration::from_secs(1),
            send_timeout: Duration::from_secs(5),
            idle_grace: Some(Duration::from_secs(30)),
            echo: EchoPolicy::IncludeSender,
        }
    }
}
