//! Domain layer: members, rooms and the registry that binds names to rooms.

mod config;
mod error;
mod ingress;
mod member;
mod message;
mod registry;
mod room;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{EchoPolicy, RoomConfig};
pub use error::{MemberError, RoomError};
pub use member::{Member, MemberId, MemberSummary, MessageSink, MessageSource};
pub use message::ChatMessage;
pub use registry::Registry;
pub use room::{Room, RoomId};
