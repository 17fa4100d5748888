//! Terminal chat client.
//!
//! Joins a room on a Hiroba server, prints every message broadcast to the
//! room and sends each line typed at the prompt. Reconnects on disconnection
//! (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-client -- --room lobby --user Alice
//! cargo run --bin hiroba-client -- -r lobby -n Bob
//! ```

use clap::Parser;

use hiroba_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "hiroba-client")]
#[command(about = "Terminal client for Hiroba chat rooms", long_about = None)]
struct Args {
    /// Room to join
    #[arg(short = 'r', long)]
    room: String,

    /// Display name shown to other members
    #[arg(short = 'n', long)]
    user: String,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    setup_logger(&[env!("CARGO_CRATE_NAME")], "info");

    let args = Args::parse();

    if let Err(e) = hiroba_client::run_client(args.url, args.room, args.user).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
