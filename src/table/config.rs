//! Table configuration.

use serde::{Deserialize, Serialize};
use tokio::time::Duration;

use crate::game::constants::{
    DEFAULT_CONNECT_GRACE_SECS, DEFAULT_READY_TIMEOUT_SECS, DEFAULT_SEAT_COUNT,
    DEFAULT_THINKING_TIMEOUT_SECS, DEFAULT_WAIT_FOR_SEATS_SECS, MAX_SEAT_COUNT,
};

/// Per-table settings. Everything a session needs to know about pacing and
/// size lives here; the defaults match a casual two-seat table.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TableConfig {
    /// Seats to fill before the match starts.
    pub seat_count: usize,

    /// How long the table stays open while waiting for its roster.
    pub wait_for_seats_secs: u64,

    /// Window each seat has to acknowledge the ready check.
    pub ready_timeout_secs: u64,

    /// Window each seat has to answer an action solicitation.
    pub thinking_timeout_secs: u64,

    /// Pause before the ready check so the last transport can attach.
    pub connect_grace_secs: u64,

    /// Fixed wall seed; `None` shuffles from the thread RNG.
    pub wall_seed: Option<u64>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            seat_count: DEFAULT_SEAT_COUNT,
            wait_for_seats_secs: DEFAULT_WAIT_FOR_SEATS_SECS,
            ready_timeout_secs: DEFAULT_READY_TIMEOUT_SECS,
            thinking_timeout_secs: DEFAULT_THINKING_TIMEOUT_SECS,
            connect_grace_secs: DEFAULT_CONNECT_GRACE_SECS,
            wall_seed: None,
        }
    }
}

impl TableConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(2..=MAX_SEAT_COUNT).contains(&self.seat_count) {
            return Err(format!("seat count must be between 2 and {MAX_SEAT_COUNT}"));
        }
        if self.thinking_timeout_secs == 0 {
            return Err("thinking timeout must be at least one second".to_string());
        }
        if self.ready_timeout_secs == 0 {
            return Err("ready timeout must be at least one second".to_string());
        }
        Ok(())
    }

    pub fn wait_for_seats(&self) -> Duration {
        Duration::from_secs(self.wait_for_seats_secs)
    }

    pub fn ready_timeout(&self) -> Duration {
        Duration::from_secs(self.ready_timeout_secs)
    }

    pub fn thinking_timeout(&self) -> Duration {
        Duration::from_secs(self.thinking_timeout_secs)
    }

    pub fn connect_grace(&self) -> Duration {
        Duration::from_secs(self.connect_grace_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(TableConfig::default().validate().is_ok());
    }

    #[test]
    fn test_bad_seat_counts_are_rejected() {
        let mut config = TableConfig::default();
        config.seat_count = 1;
        assert!(config.validate().is_err());
        config.seat_count = MAX_SEAT_COUNT + 1;
        assert!(config.validate().is_err());
        config.seat_count = MAX_SEAT_COUNT;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_windows_are_rejected() {
        let mut config = TableConfig::default();
        config.thinking_timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
