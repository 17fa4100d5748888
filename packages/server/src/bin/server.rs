//! Room-based WebSocket chat server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-server
//! cargo run --bin hiroba-server -- --host 0.0.0.0 --port 3000 --exclude-sender
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use hiroba_server::{
    domain::{EchoPolicy, Registry, RoomConfig},
    ui::Server,
};
use hiroba_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "hiroba-server")]
#[command(about = "WebSocket chat server with named rooms", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Capacity of each room's message queue
    #[arg(long, default_value = "256")]
    queue_capacity: usize,

    /// How long a sender waits for queue space before its message is dropped
    #[arg(long, default_value = "1000", value_parser = clap::value_parser!(u64).range(1..))]
    enqueue_timeout_ms: u64,

    /// How long a member may take to accept a message before it is removed
    #[arg(long, default_value = "5000", value_parser = clap::value_parser!(u64).range(1..))]
    send_timeout_ms: u64,

    /// How long an empty room is kept before it is torn down
    #[arg(long, default_value = "30")]
    idle_room_grace_secs: u64,

    /// Never tear down empty rooms
    #[arg(long)]
    keep_idle_rooms: bool,

    /// Do not echo a message back to its sender
    #[arg(long)]
    exclude_sender: bool,
}

impl Args {
    fn room_config(&self) -> RoomConfig {
        RoomConfig {
            queue_capacity: self.queue_capacity,
            enqueue_timeout: Duration::from_millis(self.enqueue_timeout_ms),
            send_timeout: Duration::from_millis(self.send_timeout_ms),
            idle_grace: (!self.keep_idle_rooms)
                .then(|| Duration::from_secs(self.idle_room_grace_secs)),
            echo: if self.exclude_sender {
                EchoPolicy::ExcludeSender
            } else {
                EchoPolicy::IncludeSender
            },
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(&[env!("CARGO_CRATE_NAME"), "tower_http"], "debug");

    let args = Args::parse();
    let config = args.room_config();
    tracing::debug!(?config, "Room configuration");

    let registry = Arc::new(Registry::new(config));
    let server = Server::new(registry);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
