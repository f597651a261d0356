use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Tunables for adapter bring-up and bounded waits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Gap between the two SYSTIM samples that prove the clock runs (default: 10ms)
    #[serde(with = "duration_ms")]
    pub ptp_settle_interval: Duration,

    /// Poll period while waiting for an aux timestamp (default: 1ms)
    #[serde(with = "duration_ms")]
    pub aux_poll_interval: Duration,

    /// Upper bound on an aux timestamp wait (default: 100ms)
    #[serde(with = "duration_ms")]
    pub aux_wait_timeout: Duration,

    /// MDIC ready-bit polls before a PHY access faults (default: 640)
    pub mdio_poll_limit: u32,

    /// Extra lead added when a past TAS base time is rolled forward (default: 0)
    pub tas_min_lead_ns: u64,

    /// Maximum device info string length (default: 1024)
    pub info_buffer_limit: usize,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            ptp_settle_interval: Duration::from_millis(10),
            aux_poll_interval: Duration::from_millis(1),
            aux_wait_timeout: Duration::from_millis(100),
            mdio_poll_limit: 640,
            tas_min_lead_ns: 0,
            info_buffer_limit: 1024,
        }
    }
}

impl DriverConfig {
    /// Create a new config builder
    #[must_use]
    pub fn builder() -> DriverConfigBuilder {
        DriverConfigBuilder::default()
    }

    /// Load a config saved as JSON. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config = serde_json::from_str(&data)?;
        tracing::debug!(path = %path.as_ref().display(), "Loaded driver config");
        Ok(config)
    }

    /// Save as pretty-printed JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), data)?;
        Ok(())
    }
}

/// Builder for `DriverConfig`
#[derive(Debug, Clone, Default)]
pub struct DriverConfigBuilder {
    config: DriverConfig,
}

impl DriverConfigBuilder {
    /// Set the clock verification gap
    #[must_use]
    pub fn ptp_settle_interval(mut self, interval: Duration) -> Self {
        self.config.ptp_settle_interval = interval;
        self
    }

    /// Set the aux timestamp poll period
    #[must_use]
    pub fn aux_poll_interval(mut self, interval: Duration) -> Self {
        self.config.aux_poll_interval = interval;
        self
    }

    /// Set the aux timestamp wait bound
    #[must_use]
    pub fn aux_wait_timeout(mut self, timeout: Duration) -> Self {
        self.config.aux_wait_timeout = timeout;
        self
    }

    /// Set the MDIC poll limit
    #[must_use]
    pub fn mdio_poll_limit(mut self, limit: u32) -> Self {
        self.config.mdio_poll_limit = limit;
        self
    }

    /// Set the TAS roll-forward lead
    #[must_use]
    pub fn tas_min_lead_ns(mut self, lead: u64) -> Self {
        self.config.tas_min_lead_ns = lead;
        self
    }

    /// Set the device info length limit
    #[must_use]
    pub fn info_buffer_limit(mut self, limit: usize) -> Self {
        self.config.info_buffer_limit = limit;
        self
    }

    /// Build the configuration
    #[must_use]
    pub fn build(self) -> DriverConfig {
        self.config
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
