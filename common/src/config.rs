use serde::{Deserialize, Serialize};

use crate::types::BlowerMode;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    pub poll_interval_ms: u64,
    // Backdates the startup transition reference so the blower begins in its
    // quiescent branch; must match the blower hold window.
    pub startup_backdate_ms: u64,
    pub failure_log_every: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 15_000,
            startup_backdate_ms: 360_000,
            failure_log_every: 6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlowerConfig {
    pub hold_window_ms: u64,
    pub forced_mode: BlowerMode,
}

impl Default for BlowerConfig {
    fn default() -> Self {
        Self {
            hold_window_ms: 360_000,
            forced_mode: BlowerMode::On,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CeilingFanConfig {
    pub on_delay_ms: u64,
    pub off_delay_ms: u64,
    pub heat_on_speed: u8,
    pub heat_off_speed: u8,
}

impl Default for CeilingFanConfig {
    fn default() -> Self {
        Self {
            on_delay_ms: 60_000,
            off_delay_ms: 180_000,
            heat_on_speed: 2,
            heat_off_speed: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    pub thermostat_url: String,
    pub fan_urls: Vec<String>,
    pub http_timeout_ms: u64,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            thermostat_url: "http://192.168.0.73/tstat".to_string(),
            fan_urls: vec![
                "http://192.168.0.75/mf".to_string(),
                "http://192.168.0.76/mf".to_string(),
                "http://192.168.0.77/mf".to_string(),
            ],
            // Requests against these devices occasionally take far longer
            // than the few seconds they should; keep the bound generous.
            http_timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub blower: BlowerConfig,
    #[serde(default)]
    pub fan: CeilingFanConfig,
    #[serde(default)]
    pub devices: DeviceConfig,
}
