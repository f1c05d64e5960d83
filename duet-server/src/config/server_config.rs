use anyhow::{Context, Result};
use duet_core::utils::DEFAULT_SERVER_PORT;
use std::env;
use std::net::{Ipv4Addr, SocketAddr};

/// Runtime settings for the signaling server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP/websocket listener binds to.
    pub bind_addr: SocketAddr,
    /// Capacity of the channel feeding the session controller.
    pub command_buffer: usize,
    /// How many ended rooms are remembered to honor rematch hints.
    pub room_history: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_SERVER_PORT)),
            command_buffer: 100,
            room_history: 1024,
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by `DUET_BIND_ADDR`, `DUET_COMMAND_BUFFER` and
    /// `DUET_ROOM_HISTORY` when set.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(addr) = env::var("DUET_BIND_ADDR") {
            config.bind_addr = addr
                .parse()
                .with_context(|| format!("DUET_BIND_ADDR is not a socket address: {addr}"))?;
        }

        if let Ok(size) = env::var("DUET_COMMAND_BUFFER") {
            config.command_buffer = size
                .parse()
                .with_context(|| format!("DUET_COMMAND_BUFFER is not a number: {size}"))?;
        }

        if let Ok(size) = env::var("DUET_ROOM_HISTORY") {
            config.room_history = size
                .parse()
                .with_context(|| format!("DUET_ROOM_HISTORY is not a number: {size}"))?;
        }

        Ok(config)
    }
}
