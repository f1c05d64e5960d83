use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use duet::client::{CallStatus, ClientConfig, ClientSession, WebRtcContextFactory, connect};
use duet::model::IceServerConfig;
use duet::server::{ServerConfig, serve};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "duet")]
#[command(about = "Anonymous one-to-one video call matchmaking")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the signaling server.
    Serve(ServeArgs),

    /// Join as a headless peer: receive-only, no local capture.
    Join {
        #[arg(long, env = "DUET_SIGNALING_URL")]
        url: Option<String>,

        #[arg(long, env = "DUET_STUN_URL")]
        stun: Option<String>,
    },
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    #[arg(long, env = "DUET_BIND_ADDR")]
    bind: Option<SocketAddr>,

    /// Capacity of the session controller's command queue.
    #[arg(long, env = "DUET_COMMAND_BUFFER")]
    command_buffer: Option<usize>,

    #[arg(long, env = "DUET_ROOM_HISTORY")]
    room_history: Option<usize>,
}

impl ServeArgs {
    fn apply(self, config: &mut ServerConfig) {
        if let Some(bind) = self.bind {
            config.bind_addr = bind;
        }
        if let Some(command_buffer) = self.command_buffer {
            config.command_buffer = command_buffer;
        }
        if let Some(room_history) = self.room_history {
            config.room_history = room_history;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Commands::Serve(args) => {
            let mut config = ServerConfig::from_env()?;
            args.apply(&mut config);
            info!(
                "Command buffer {}, remembering {} ended rooms",
                config.command_buffer, config.room_history
            );

            println!(
                "{} {}",
                "Duet signaling server on".green().bold(),
                config.bind_addr.to_string().cyan()
            );
            serve(config).await?;
        }

        Commands::Join { url, stun } => {
            let mut config = ClientConfig::from_env();
            if let Some(url) = url {
                config.signaling_url = url;
            }
            if let Some(stun) = stun {
                config.ice_servers = vec![IceServerConfig {
                    urls: vec![stun],
                    username: None,
                    credential: None,
                }];
            }

            join(config).await?;
        }
    }

    Ok(())
}

async fn join(config: ClientConfig) -> Result<()> {
    let factory = WebRtcContextFactory::new(&config, Vec::new())
        .context("Failed to set up the WebRTC engine")?;
    let connection = connect(&config.signaling_url)
        .await
        .with_context(|| format!("Cannot reach {}", config.signaling_url))?;

    let (session, handle) = ClientSession::new(
        Arc::new(factory),
        Arc::new(connection.outbound.clone()),
        connection.inbound,
    );
    let mut task = tokio::spawn(session.run());
    info!("Joined signaling server at {}", config.signaling_url);

    println!("{}", "Type 's' + Enter to skip, 'q' + Enter to leave.".dimmed());

    let mut status = handle.watch_status();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                print_status(*status.borrow_and_update());
            }

            line = lines.next_line() => match line?.as_deref().map(str::trim) {
                Some("s") | Some("skip") => handle.skip()?,
                Some("q") | Some("quit") | None => {
                    let _ = handle.hang_up();
                    break;
                }
                Some(_) => {}
            },

            _ = tokio::signal::ctrl_c() => {
                let _ = handle.hang_up();
                break;
            }

            _ = &mut task => {
                warn!("Client session ended before the user left");
                println!("{}", "Signaling connection closed.".red());
                return Ok(());
            }
        }
    }

    task.await.context("Client session panicked")?;
    println!("{}", "Left the call.".green());
    Ok(())
}

fn print_status(status: CallStatus) {
    match status {
        CallStatus::Idle => println!("{}", "Idle".dimmed()),
        CallStatus::Searching => println!("{}", "Finding a match...".yellow()),
        CallStatus::Negotiating { room_id } => {
            println!("{} {}", "Connecting to room".cyan(), room_id)
        }
        CallStatus::Connected { room_id } => {
            println!("{} {}", "Connected to room".green().bold(), room_id)
        }
    }
}
