//! Room: a named group of members sharing one broadcast loop.
//!
//! ## 設計
//!
//! A room is a single-task actor. Joins, leaves, membership queries and
//! broadcasts are all handled by that one task, so the member list is never
//! mutated while it is being iterated. [`Room`] is the cloneable handle used by
//! the registry and by every member's ingress loop.
//!
//! Two inboxes feed the actor:
//!
//! - `commands` (unbounded): join / leave / members / close
//! - `queue` (bounded): chat messages waiting to be broadcast
//!
//! Commands are always served before the next queued message, so a leave that
//! has been issued takes effect before the next broadcast iteration.

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use tokio::{
    sync::{
        mpsc::{self, error::SendTimeoutError},
        oneshot,
    },
    task::AbortHandle,
    time::{Instant, sleep_until, timeout},
};
use uuid::Uuid;

use super::{
    ChatMessage, EchoPolicy, Member, MemberId, MemberSummary, MessageSink, RoomConfig, RoomError,
    ingress::run_ingress, registry::RoomReaper,
};

/// Identity of one incarnation of a room.
///
/// A name that is reaped and joined again gets a new id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoomId(Uuid);

impl RoomId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A queued message together with the member it came from.
struct Envelope {
    origin: MemberId,
    message: ChatMessage,
}

enum Command {
    Join(Member),
    Leave(MemberId),
    Members(oneshot::Sender<Vec<MemberSummary>>),
    Close,
}

/// Handle to a running room.
#[derive(Clone)]
pub struct Room {
    id: RoomId,
    name: Arc<str>,
    commands: mpsc::UnboundedSender<Command>,
    queue: mpsc::Sender<Envelope>,
    /// Members joined or about to join; read by the reaper under the registry lock
    occupancy: Arc<AtomicUsize>,
    enqueue_timeout: Duration,
}

impl Room {
    /// Create a room and start its broadcast loop.
    ///
    /// A room created this way is not registered anywhere and is never reaped;
    /// it runs until [`Room::close`] is called.
    pub fn spawn(name: &str, config: &RoomConfig) -> Self {
        Self::spawn_with_reaper(name, config, None)
    }

    pub(crate) fn spawn_with_reaper(
        name: &str,
        config: &RoomConfig,
        reaper: Option<RoomReaper>,
    ) -> Self {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (queue_tx, queue_rx) = mpsc::channel(config.queue_capacity.max(1));

        let handle = Self {
            id: RoomId::generate(),
            name: Arc::from(name),
            commands: commands_tx,
            queue: queue_tx,
            occupancy: Arc::new(AtomicUsize::new(0)),
            enqueue_timeout: config.enqueue_timeout,
        };

        let actor = RoomActor {
            handle: handle.clone(),
            members: Vec::new(),
            commands: commands_rx,
            queue: queue_rx,
            send_timeout: config.send_timeout,
            echo: config.echo,
            idle_grace: reaper.as_ref().and(config.idle_grace),
            idle_deadline: None,
            reaper,
        };
        tokio::spawn(actor.run());

        handle
    }

    pub fn id(&self) -> RoomId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a member and start its ingress loop.
    ///
    /// The member is appended after every member whose join was issued earlier.
    pub fn join(&self, member: Member) -> Result<MemberId, RoomError> {
        let id = member.id();
        self.occupancy.fetch_add(1, Ordering::AcqRel);
        if self.commands.send(Command::Join(member)).is_err() {
            self.occupancy.fetch_sub(1, Ordering::AcqRel);
            return Err(RoomError::Closed);
        }
        Ok(id)
    }

    /// Remove a member. Removing a member that is not in the room is a no-op.
    pub fn leave(&self, member_id: MemberId) -> Result<(), RoomError> {
        self.commands
            .send(Command::Leave(member_id))
            .map_err(|_| RoomError::Closed)
    }

    /// Queue a message from `origin` for broadcast.
    ///
    /// Waits up to the configured enqueue timeout for queue space, then gives
    /// up with [`RoomError::QueueFull`] and the message is dropped.
    pub async fn enqueue(&self, origin: MemberId, message: ChatMessage) -> Result<(), RoomError> {
        self.queue
            .send_timeout(Envelope { origin, message }, self.enqueue_timeout)
            .await
            .map_err(|e| match e {
                SendTimeoutError::Timeout(_) => RoomError::QueueFull,
                SendTimeoutError::Closed(_) => RoomError::Closed,
            })
    }

    /// Current members in join order.
    pub async fn members(&self) -> Result<Vec<MemberSummary>, RoomError> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(Command::Members(tx))
            .map_err(|_| RoomError::Closed)?;
        rx.await.map_err(|_| RoomError::Closed)
    }

    /// Stop the broadcast loop. Members are sent a close and their ingress loops aborted.
    pub fn close(&self) {
        let _ = self.commands.send(Command::Close);
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    pub(crate) fn occupancy(&self) -> usize {
        self.occupancy.load(Ordering::Acquire)
    }
}

impl fmt::Debug for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Room")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

struct JoinedMember {
    summary: MemberSummary,
    sink: Box<dyn MessageSink>,
    ingress: AbortHandle,
}

struct RoomActor {
    /// Own handle, cloned into each ingress loop
    handle: Room,
    members: Vec<JoinedMember>,
    commands: mpsc::UnboundedReceiver<Command>,
    queue: mpsc::Receiver<Envelope>,
    send_timeout: Duration,
    echo: EchoPolicy,
    idle_grace: Option<Duration>,
    idle_deadline: Option<Instant>,
    reaper: Option<RoomReaper>,
}

impl RoomActor {
    async fn run(mut self) {
        tracing::info!(room = %self.handle.name, id = %self.handle.id, "Broadcast loop started");
        self.arm_idle_timer();

        loop {
            tokio::select! {
                biased;
                command = self.commands.recv() => match command {
                    Some(Command::Join(member)) => self.join(member),
                    Some(Command::Leave(member_id)) => {
                        self.remove(member_id, "left");
                    }
                    Some(Command::Members(reply)) => {
                        let _ = reply.send(self.summaries());
                    }
                    Some(Command::Close) | None => break,
                },
                Some(envelope) = self.queue.recv() => self.broadcast(envelope).await,
                _ = idle_timeout(self.idle_deadline) => {
                    if self.try_reap().await {
                        break;
                    }
                }
            }
        }

        self.shutdown().await;
    }

    fn join(&mut self, member: Member) {
        let (summary, sink, source) = member.into_parts();
        let ingress =
            tokio::spawn(run_ingress(self.handle.clone(), summary.clone(), source)).abort_handle();

        tracing::info!(
            room = %self.handle.name,
            member = %summary.name,
            member_id = %summary.id,
            members = self.members.len() + 1,
            "Member joined"
        );
        self.members.push(JoinedMember {
            summary,
            sink,
            ingress,
        });
        self.idle_deadline = None;
    }

    /// Remove the member with `member_id`, returning whether it was present.
    fn remove(&mut self, member_id: MemberId, reason: &str) -> bool {
        let Some(index) = self
            .members
            .iter()
            .position(|m| m.summary.id == member_id)
        else {
            tracing::debug!(room = %self.handle.name, %member_id, "Member already removed");
            return false;
        };

        let member = self.members.remove(index);
        member.ingress.abort();
        self.handle.occupancy.fetch_sub(1, Ordering::AcqRel);

        tracing::info!(
            room = %self.handle.name,
            member = %member.summary.name,
            member_id = %member_id,
            reason,
            members = self.members.len(),
            "Member removed"
        );

        if self.members.is_empty() {
            self.arm_idle_timer();
        }
        true
    }

    async fn broadcast(&mut self, envelope: Envelope) {
        let mut failed = Vec::new();

        for member in &mut self.members {
            if self.echo == EchoPolicy::ExcludeSender && member.summary.id == envelope.origin {
                continue;
            }

            match timeout(self.send_timeout, member.sink.send(&envelope.message)).await {
                Ok(Ok(())) => {
                    tracing::trace!(member = %member.summary.name, "Delivered message");
                }
                Ok(Err(e)) => {
                    tracing::warn!(
                        room = %self.handle.name,
                        member = %member.summary.name,
                        "Failed to deliver message: {}",
                        e
                    );
                    failed.push((member.summary.id, e.to_string()));
                }
                Err(_) => {
                    tracing::warn!(
                        room = %self.handle.name,
                        member = %member.summary.name,
                        "Delivery timed out after {:?}",
                        self.send_timeout
                    );
                    failed.push((member.summary.id, "send timed out".to_string()));
                }
            }
        }

        tracing::debug!(
            room = %self.handle.name,
            sender = %envelope.message.sender(),
            failed = failed.len(),
            "Broadcasted message"
        );

        for (member_id, reason) in failed {
            self.remove(member_id, &reason);
        }
    }

    fn summaries(&self) -> Vec<MemberSummary> {
        self.members.iter().map(|m| m.summary.clone()).collect()
    }

    fn arm_idle_timer(&mut self) {
        if let Some(grace) = self.idle_grace {
            self.idle_deadline = Some(Instant::now() + grace);
        }
    }

    /// Ask the registry to drop this room. Returns true when the loop should stop.
    async fn try_reap(&mut self) -> bool {
        self.idle_deadline = None;
        if !self.members.is_empty() {
            return false;
        }
        match &self.reaper {
            Some(reaper) => reaper.reap(&self.handle).await,
            None => false,
        }
    }

    async fn shutdown(mut self) {
        for mut member in self.members.drain(..) {
            member.ingress.abort();
            if timeout(self.send_timeout, member.sink.close()).await.is_err() {
                tracing::debug!(member = %member.summary.name, "Close timed out");
            }
        }
        self.handle.occupancy.store(0, Ordering::Release);
        tracing::info!(room = %self.handle.name, id = %self.handle.id, "Broadcast loop stopped");
    }
}

async fn idle_timeout(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
