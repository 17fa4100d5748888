//! Room-based WebSocket chat relay.
//!
//! Clients connect to `/ws?room=<name>&user=<name>`, join the named room and
//! every chat message they send is broadcast to the room's members.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
