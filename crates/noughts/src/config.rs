//! Server configuration.

use std::time::Duration;

use noughts_room::{DEFAULT_CHANNEL_SIZE, RoomConfig};

use crate::NoughtsError;

/// Environment variable holding the listen address.
pub const ENV_BIND: &str = "NOUGHTS_BIND";
/// Environment variable holding each room's command channel capacity.
pub const ENV_ROOM_CHANNEL_SIZE: &str = "NOUGHTS_ROOM_CHANNEL_SIZE";
/// Environment variable holding the idle connection timeout in seconds.
pub const ENV_IDLE_TIMEOUT_SECS: &str = "NOUGHTS_IDLE_TIMEOUT_SECS";
/// Environment variable holding the WebSocket handshake deadline in seconds.
pub const ENV_HANDSHAKE_TIMEOUT_SECS: &str = "NOUGHTS_HANDSHAKE_TIMEOUT_SECS";

/// How long a new TCP peer has to complete the WebSocket upgrade.
pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for a Noughts server.
///
/// Start from `ServerConfig::default()`, [`from_env`](Self::from_env) or
/// the builder setters on [`NoughtsServerBuilder`](crate::NoughtsServerBuilder).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the WebSocket listener to.
    pub bind_addr: String,

    /// Command channel capacity of each room actor.
    pub room_channel_size: usize,

    /// Close connections that send nothing for this long. `None` keeps
    /// idle connections open indefinitely.
    pub idle_timeout: Option<Duration>,

    /// Drop peers that have not finished the WebSocket upgrade by then.
    pub handshake_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            room_channel_size: DEFAULT_CHANNEL_SIZE,
            idle_timeout: None,
            handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
        }
    }
}

impl ServerConfig {
    /// Reads overrides from the process environment on top of the defaults.
    pub fn from_env() -> Result<Self, NoughtsError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, NoughtsError> {
        let mut config = Self::default();

        if let Some(addr) = lookup(ENV_BIND) {
            config.bind_addr = addr;
        }
        if let Some(raw) = lookup(ENV_ROOM_CHANNEL_SIZE) {
            let size: usize = raw.trim().parse().map_err(|_| {
                NoughtsError::Config(format!("{ENV_ROOM_CHANNEL_SIZE}={raw:?} is not a number"))
            })?;
            if size == 0 {
                return Err(NoughtsError::Config(format!(
                    "{ENV_ROOM_CHANNEL_SIZE} must be at least 1"
                )));
            }
            config.room_channel_size = size;
        }
        if let Some(raw) = lookup(ENV_IDLE_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                NoughtsError::Config(format!("{ENV_IDLE_TIMEOUT_SECS}={raw:?} is not a number"))
            })?;
            // 0 disables the timeout.
            config.idle_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(raw) = lookup(ENV_HANDSHAKE_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                NoughtsError::Config(format!(
                    "{ENV_HANDSHAKE_TIMEOUT_SECS}={raw:?} is not a number"
                ))
            })?;
            if secs == 0 {
                return Err(NoughtsError::Config(format!(
                    "{ENV_HANDSHAKE_TIMEOUT_SECS} must be at least 1"
                )));
            }
            config.handshake_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub(crate) fn room_config(&self) -> RoomConfig {
        RoomConfig {
            channel_size: self.room_channel_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.room_channel_size, DEFAULT_CHANNEL_SIZE);
        assert!(config.idle_timeout.is_none());
        assert_eq!(config.handshake_timeout, DEFAULT_HANDSHAKE_TIMEOUT);
    }

    #[test]
    fn test_overrides_from_env() {
        let config = ServerConfig::from_lookup(lookup(&[
            (ENV_BIND, "0.0.0.0:9000"),
            (ENV_ROOM_CHANNEL_SIZE, "16"),
            (ENV_IDLE_TIMEOUT_SECS, "30"),
            (ENV_HANDSHAKE_TIMEOUT_SECS, "3"),
        ]))
        .unwrap();
        assert_eq!(config.handshake_timeout, Duration::from_secs(3));
        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.room_config().channel_size, 16);
        assert_eq!(config.idle_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_zero_idle_timeout_disables_it() {
        let config =
            ServerConfig::from_lookup(lookup(&[(ENV_IDLE_TIMEOUT_SECS, "0")])).unwrap();
        assert!(config.idle_timeout.is_none());
    }

    #[test]
    fn test_rejects_bad_numbers() {
        let err = ServerConfig::from_lookup(lookup(&[(ENV_ROOM_CHANNEL_SIZE, "lots")]))
            .unwrap_err();
        assert!(matches!(err, NoughtsError::Config(_)));

        let err =
            ServerConfig::from_lookup(lookup(&[(ENV_ROOM_CHANNEL_SIZE, "0")])).unwrap_err();
        assert!(err.to_string().contains("at least 1"));

        let err = ServerConfig::from_lookup(lookup(&[(ENV_HANDSHAKE_TIMEOUT_SECS, "0")]))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_HANDSHAKE_TIMEOUT_SECS));
    }
}
