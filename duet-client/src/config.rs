use duet_core::IceServerConfig;
use duet_core::utils::{DEFAULT_SERVER_PORT, DEFAULT_STUN_ADDR};
use std::env;

/// Settings for one client session.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Websocket endpoint of the signaling server.
    pub signaling_url: String,
    pub ice_servers: Vec<IceServerConfig>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            signaling_url: format!("ws://127.0.0.1:{DEFAULT_SERVER_PORT}/ws"),
            ice_servers: vec![IceServerConfig {
                urls: vec![DEFAULT_STUN_ADDR.to_string()],
                username: None,
                credential: None,
            }],
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `DUET_SIGNALING_URL` and `DUET_STUN_URL`.
    /// `DUET_TURN_USERNAME` / `DUET_TURN_CREDENTIAL` are attached to the
    /// ICE server entry.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = env::var("DUET_SIGNALING_URL") {
            config.signaling_url = url;
        }

        if let Ok(url) = env::var("DUET_STUN_URL") {
            config.ice_servers = vec![IceServerConfig {
                urls: vec![url],
                username: None,
                credential: None,
            }];
        }

        let username = env::var("DUET_TURN_USERNAME").ok();
        let credential = env::var("DUET_TURN_CREDENTIAL").ok();
        if username.is_some() || credential.is_some() {
            for server in &mut config.ice_servers {
                server.username = username.clone();
                server.credential = credential.clone();
            }
        }

        config
    }
}
