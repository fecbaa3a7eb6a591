use clap::Parser;
use client::app::{ClientConfig, SnakeClient};
use log::info;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base URL of the game server
    #[arg(short = 's', long, default_value = "http://127.0.0.1:5000")]
    server: String,

    /// Session cookie of a logged-in user
    #[arg(long, env = "SNAKE_SESSION")]
    session: Option<String>,

    /// Interval between synchronization ticks in milliseconds
    #[arg(short = 't', long, default_value = "150")]
    tick_ms: u64,

    /// Per-request timeout in milliseconds
    #[arg(long, default_value = "2000")]
    timeout_ms: u64,

    /// Window width
    #[arg(short = 'w', long, default_value = "620")]
    width: i32,

    /// Window height (no short flag to avoid conflict with --help)
    #[arg(long, default_value = "480")]
    height: i32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    let config = ClientConfig {
        server: args.server,
        session: args.session,
        tick_interval: Duration::from_millis(args.tick_ms),
        request_timeout: Duration::from_millis(args.timeout_ms),
        width: args.width,
        height: args.height,
    };

    info!("Starting client...");
    if config.session.is_none() {
        info!("No session cookie given; the server may reject game calls");
    }
    info!("Controls: arrows/WASD to steer, Space to start or pause, Esc to pause");

    let mut client = SnakeClient::new(&config)?;
    macroquad::Window::from_config(config.window_conf(), async move {
        client.run().await;
    });

    Ok(())
}
