//! Configuration for tubewire
//!
//! Client settings with sensible defaults.

use std::time::Duration;

use crate::body::BodyCodec;
use crate::error::{Result, TubeError};
use crate::network::Address;
use crate::state::DEFAULT_TUBE;

/// Default priority for put/release/bury (lower is more urgent)
pub const DEFAULT_PRIORITY: u32 = 1 << 16;

/// Default time-to-run for put
pub const DEFAULT_TTR: Duration = Duration::from_secs(60);

/// Main configuration for a client
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Connection Configuration
    // -------------------------------------------------------------------------
    /// Server to connect to
    pub address: Address,

    /// Read/write deadline for commands that do not block on the server.
    /// Also added on top of a `reserve-with-timeout` wait.
    pub io_timeout: Option<Duration>,

    // -------------------------------------------------------------------------
    // Tube Configuration
    // -------------------------------------------------------------------------
    /// Tube used after connecting
    pub use_tube: String,

    /// Tubes watched after connecting; `default` is ignored if absent
    pub watch: Vec<String>,

    // -------------------------------------------------------------------------
    // Job Defaults
    // -------------------------------------------------------------------------
    /// Text codec applied to job bodies
    pub codec: BodyCodec,

    pub default_priority: u32,

    pub default_delay: Duration,

    pub default_ttr: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: Address::default(),
            io_timeout: None,
            use_tube: DEFAULT_TUBE.to_string(),
            watch: vec![DEFAULT_TUBE.to_string()],
            codec: BodyCodec::Utf8,
            default_priority: DEFAULT_PRIORITY,
            default_delay: Duration::ZERO,
            default_ttr: DEFAULT_TTR,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check settings that would leave the client unusable
    pub fn validate(&self) -> Result<()> {
        if self.use_tube.is_empty() {
            return Err(TubeError::Config("use tube name is empty".to_string()));
        }
        if self.watch.is_empty() {
            return Err(TubeError::Config(
                "at least one tube must be watched".to_string(),
            ));
        }
        if let Some(tube) = self.watch.iter().find(|t| t.is_empty()) {
            return Err(TubeError::Config(format!("invalid watch tube {:?}", tube)));
        }
        if self.io_timeout == Some(Duration::ZERO) {
            return Err(TubeError::Config("io_timeout must be non-zero".to_string()));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the server address
    pub fn address(mut self, address: Address) -> Self {
        self.config.address = address;
        self
    }

    /// Set the I/O deadline for non-blocking commands
    pub fn io_timeout(mut self, timeout: Duration) -> Self {
        self.config.io_timeout = Some(timeout);
        self
    }

    /// Set the tube to use after connecting
    pub fn use_tube(mut self, tube: impl Into<String>) -> Self {
        self.config.use_tube = tube.into();
        self
    }

    /// Replace the watch list
    pub fn watch<I, S>(mut self, tubes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.watch = tubes.into_iter().map(Into::into).collect();
        self
    }

    /// Set the body codec
    pub fn codec(mut self, codec: BodyCodec) -> Self {
        self.config.codec = codec;
        self
    }

    pub fn default_priority(mut self, priority: u32) -> Self {
        self.config.default_priority = priority;
        self
    }

    pub fn default_delay(mut self, delay: Duration) -> Self {
        self.config.default_delay = delay;
        self
    }

    pub fn default_ttr(mut self, ttr: Duration) -> Self {
        self.config.default_ttr = ttr;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
