use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("empty response body")]
    Empty,
    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown fmode value: {0}")]
    UnknownBlowerMode(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BlowerMode {
    Auto,
    Circulate,
    On,
}

impl BlowerMode {
    pub fn as_fmode(self) -> i64 {
        match self {
            Self::Auto => 0,
            Self::Circulate => 1,
            Self::On => 2,
        }
    }

    pub fn from_fmode(value: i64) -> Result<Self, ParseError> {
        match value {
            0 => Ok(Self::Auto),
            1 => Ok(Self::Circulate),
            2 => Ok(Self::On),
            other => Err(ParseError::UnknownBlowerMode(other)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "AUTO",
            Self::Circulate => "CIRCULATE",
            Self::On => "ON",
        }
    }
}

/// One thermostat status sample. Replaced wholesale on every successful poll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermostatReading {
    pub temperature: f32,
    pub target_temperature: f32,
    pub heat_active: bool,
    pub blower_mode: BlowerMode,
}

// Wire format of the thermostat status endpoint. Field spellings belong to
// the device and must not change.
#[derive(Debug, Deserialize)]
struct RawThermostatStatus {
    temp: f32,
    t_heat: f32,
    tstate: i64,
    fmode: i64,
}

impl ThermostatReading {
    pub fn parse(body: &str) -> Result<Self, ParseError> {
        if body.is_empty() {
            return Err(ParseError::Empty);
        }
        let raw: RawThermostatStatus = serde_json::from_str(body)?;
        Ok(Self {
            temperature: raw.temp,
            target_temperature: raw.t_heat,
            heat_active: raw.tstate == 1,
            blower_mode: BlowerMode::from_fmode(raw.fmode)?,
        })
    }
}

// Status payload returned by a ceiling fan's shadow-data query. The device
// reports more fields than this; only the speed matters here.
#[derive(Debug, Deserialize)]
pub struct FanStatus {
    #[serde(rename = "fanSpeed")]
    pub fan_speed: i64,
}

impl FanStatus {
    pub fn parse(body: &str) -> Result<Self, ParseError> {
        if body.is_empty() {
            return Err(ParseError::Empty);
        }
        Ok(serde_json::from_str(body)?)
    }
}

/// Read-only facts derived from the most recent successful poll, handed to
/// each controller in turn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatSnapshot {
    pub heat_active: bool,
    pub transitioned: bool,
    pub since_transition_ms: u64,
    pub blower_mode: Option<BlowerMode>,
}
