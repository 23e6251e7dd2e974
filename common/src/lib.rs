pub mod blower;
pub mod config;
pub mod fan;
pub mod monitor;
pub mod types;

pub use blower::{BlowerAction, BlowerHold};
pub use config::{BlowerConfig, CeilingFanConfig, DeviceConfig, MonitorConfig, RuntimeConfig};
pub use fan::FanDebounce;
pub use monitor::TransitionTracker;
pub use types::{BlowerMode, FanStatus, HeatSnapshot, ParseError, ThermostatReading};
