//! Controller configuration.
//!
//! Values come from command-line flags and environment variables; see the
//! `sgfctl` binary.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a controller session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Serial device the coordinator radio is attached to.
    pub port: String,

    /// Serial baud rate.
    pub baud_rate: u32,

    /// Delay between consecutive transmissions when a request goes to more
    /// than one node (milliseconds).
    pub pacing_ms: u64,

    /// Time to let the radio settle after opening the port before the first
    /// discovery (milliseconds).
    pub settle_delay_ms: u64,

    /// Issue node discovery once the radio has settled.
    pub discover_on_start: bool,

    /// Also send an identification request when a known address reports a
    /// new node id.
    pub requery_on_rename: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        ControllerConfig {
            port: "/dev/ttyUSB0".to_string(),
            baud_rate: 9600,
            pacing_ms: 1000,
            settle_delay_ms: 1000,
            discover_on_start: true,
            requery_on_rename: false,
        }
    }
}

impl ControllerConfig {
    /// Pacing interval between transmissions.
    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }

    /// Settle delay before the first discovery.
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Set the pacing interval.
    pub fn with_pacing_ms(mut self, pacing_ms: u64) -> Self {
        self.pacing_ms = pacing_ms;
        self
    }

    /// Enable or disable re-identification on rename.
    pub fn with_requery_on_rename(mut self, enabled: bool) -> Self {
        self.requery_on_rename = enabled;
        self
    }
}
