//! In-memory connection halves for unit tests.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ChatMessage, Member, MemberError, MessageSink, MessageSource};

/// Sink that forwards every sent message to a channel. Fails once the receiver is dropped.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<ChatMessage>,
}

#[async_trait]
impl MessageSink for ChannelSink {
    async fn send(&mut self, message: &ChatMessage) -> Result<(), MemberError> {
        self.tx
            .send(message.clone())
            .map_err(|_| MemberError::Closed)
    }

    async fn close(&mut self) {}
}

/// Source fed by the test through a channel. A dropped sender reads as a closed connection.
pub struct ScriptedSource {
    rx: mpsc::UnboundedReceiver<Result<ChatMessage, MemberError>>,
}

#[async_trait]
impl MessageSource for ScriptedSource {
    async fn receive(&mut self) -> Result<ChatMessage, MemberError> {
        self.rx.recv().await.unwrap_or(Err(MemberError::Closed))
    }
}

/// Sink whose sends never complete.
pub struct StalledSink;

#[async_trait]
impl MessageSink for StalledSink {
    async fn send(&mut self, _message: &ChatMessage) -> Result<(), MemberError> {
        std::future::pending().await
    }

    async fn close(&mut self) {}
}

pub fn channel_sink() -> (Box<dyn MessageSink>, mpsc::UnboundedReceiver<ChatMessage>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Box::new(ChannelSink { tx }), rx)
}

pub fn scripted_source() -> (
    Box<dyn MessageSource>,
    mpsc::UnboundedSender<Result<ChatMessage, MemberError>>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Box::new(ScriptedSource { rx }), tx)
}

/// A member wired to test channels: what it receives, and a handle to make it "speak".
pub struct TestPeer {
    pub inbox: mpsc::UnboundedReceiver<ChatMessage>,
    pub outbox: mpsc::UnboundedSender<Result<ChatMessage, MemberError>>,
}

pub fn test_member(name: &str) -> (Member, TestPeer) {
    let (sink, inbox) = channel_sink();
    let (source, outbox) = scripted_source();
    (Member::new(name, sink, source), TestPeer { inbox, outbox })
}

/// Next message delivered to a test peer, failing the test after one second.
pub async fn next_message(inbox: &mut mpsc::UnboundedReceiver<ChatMessage>) -> ChatMessage {
    tokio::time::timeout(std::time::Duration::from_secs(1), inbox.recv())
        .await
        .expect("timed out waiting for a message")
        .expect("sink channel closed")
}

/// Poll the room until it has exactly `count` members, failing the test after one second.
pub async fn wait_for_member_count(room: &super::Room, count: usize) {
    let deadline = tokio::time::Instant::now() + std::time::Duration::from_secs(1);
    loop {
        let members = room.members().await.expect("room should be running");
        if members.len() == count {
            return;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "expected {} members, found {}",
            count,
            members.len()
        );
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
}
