//! Room member: one connected participant.
//!
//! A member owns both halves of its connection. The write half
//! ([`MessageSink`]) is handed to the room's broadcast loop, the read half
//! ([`MessageSource`]) to the member's ingress loop, so a send from the
//! broadcast loop never waits on a blocked receive.

use std::fmt;

use async_trait::async_trait;
use uuid::Uuid;

use super::{ChatMessage, MemberError};

/// Identity of a member.
///
/// Display names are not unique, so rooms compare members by this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemberId(Uuid);

impl MemberId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Write half of a member connection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageSink: Send {
    /// Write one message to the peer. Does not retry.
    async fn send(&mut self, message: &ChatMessage) -> Result<(), MemberError>;

    /// Tell the peer the connection is going away. Best effort.
    async fn close(&mut self);
}

/// Read half of a member connection.
#[async_trait]
pub trait MessageSource: Send {
    /// Wait for the next message from the peer.
    ///
    /// Returns an error once the peer disconnects or sends something that is
    /// not a chat message.
    async fn receive(&mut self) -> Result<ChatMessage, MemberError>;
}

/// A connected participant, not yet split into its room-side parts.
pub struct Member {
    id: MemberId,
    name: String,
    sink: Box<dyn MessageSink>,
    source: Box<dyn MessageSource>,
}

impl Member {
    pub fn new(
        name: impl Into<String>,
        sink: Box<dyn MessageSink>,
        source: Box<dyn MessageSource>,
    ) -> Self {
        Self {
            id: MemberId::generate(),
            name: name.into(),
            sink,
            source,
        }
    }

    pub fn id(&self) -> MemberId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn into_parts(
        self,
    ) -> (MemberSummary, Box<dyn MessageSink>, Box<dyn MessageSource>) {
        (
            MemberSummary {
                id: self.id,
                name: self.name,
            },
            self.sink,
            self.source,
        )
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Identity and display name of a member, without its connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSummary {
    pub id: MemberId,
    pub name: String,
}
