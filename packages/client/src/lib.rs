//! Terminal client for Hiroba chat rooms.

pub mod domain;
pub mod dto;
pub mod error;
pub mod formatter;
pub mod runner;
pub mod session;
pub mod ui;

pub use error::ClientError;
pub use runner::run_client;
