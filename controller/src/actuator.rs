use std::time::Instant;

use serde_json::json;
use tracing::{info, warn};

use fancontrol_common::{
    BlowerAction, BlowerConfig, BlowerHold, CeilingFanConfig, FanDebounce, FanStatus, HeatSnapshot,
};

use crate::device::Device;

/// Forces the furnace blower on after heat cycles and restores the latched
/// mode afterwards. Shares the thermostat's endpoint; `fmode` writes land on
/// the same device the readings come from.
pub struct FurnaceBlower<D> {
    device: D,
    hold: BlowerHold,
}

impl<D: Device> FurnaceBlower<D> {
    pub fn new(device: D, config: BlowerConfig) -> Self {
        Self {
            device,
            hold: BlowerHold::new(config),
        }
    }

    pub async fn update(&mut self, snapshot: &HeatSnapshot) {
        let was_latched = self.hold.in_override();
        let Some(action) = self.hold.update(snapshot) else {
            return;
        };
        if !was_latched {
            if let Some(mode) = self.hold.latched() {
                info!("latched blower mode {}", mode.as_str());
            }
        }
        // Result intentionally ignored: the latch stays put until a reading
        // confirms the device, so a lost command is reissued next cycle.
        self.set_mode(action).await;
    }

    async fn set_mode(&self, action: BlowerAction) -> bool {
        let mode = action.mode();
        let verb = match action {
            BlowerAction::Force(_) => "forcing",
            BlowerAction::Restore(_) => "restoring",
        };
        let started = Instant::now();
        let result = self.device.write(&json!({ "fmode": mode.as_fmode() })).await;
        let took_ms = started.elapsed().as_millis();

        match result {
            Ok(response) if response.is_success() => {
                info!(
                    "{verb} blower {} to {} ({took_ms} ms)",
                    self.device.url(),
                    mode.as_str()
                );
                true
            }
            Ok(response) => {
                warn!(
                    "{verb} blower {} to {} got status {}: {} ({took_ms} ms)",
                    self.device.url(),
                    mode.as_str(),
                    response.status,
                    response.body
                );
                false
            }
            Err(err) => {
                warn!("{verb} blower {} to {} failed: {err} ({took_ms} ms)",
                    self.device.url(),
                    mode.as_str()
                );
                false
            }
        }
    }

    pub async fn debug(&self) {
        match self.device.read().await {
            Ok(response) => println!(
                "Thermostat response: {}\n{}\n",
                response.status, response.body
            ),
            Err(err) => println!("Thermostat read failed: {err}\n"),
        }
    }
}

/// Nudges a ceiling fan between its heat-on and heat-off speeds once the
/// post-transition debounce has elapsed.
pub struct CeilingFan<D> {
    device: D,
    debounce: FanDebounce,
}

impl<D: Device> CeilingFan<D> {
    pub fn new(device: D, config: CeilingFanConfig) -> Self {
        Self {
            device,
            debounce: FanDebounce::new(config),
        }
    }

    pub async fn update(&mut self, snapshot: &HeatSnapshot) {
        if let Some(speed) = self.debounce.update(snapshot) {
            let ok = self.set_speed(speed).await;
            self.debounce.command_result(ok);
        }
    }

    async fn set_speed(&self, speed: u8) -> bool {
        let started = Instant::now();
        let result = self.device.write(&json!({ "fanSpeed": speed })).await;
        let took_ms = started.elapsed().as_millis();

        match result {
            Ok(response) if response.is_success() => {
                info!("set fan {} speed to {speed} ({took_ms} ms)", self.device.url());
                true
            }
            Ok(response) => {
                warn!(
                    "set fan {} speed to {speed} got status {}: {} ({took_ms} ms)",
                    self.device.url(),
                    response.status,
                    response.body
                );
                false
            }
            Err(err) => {
                warn!(
                    "set fan {} speed to {speed} failed: {err} ({took_ms} ms)",
                    self.device.url()
                );
                false
            }
        }
    }

    /// Reboot request gets no reply; the device simply drops the connection
    /// until the request times out.
    pub async fn reboot(&self) {
        match self.device.write(&json!({ "reboot": 1 })).await {
            Ok(response) => info!(
                "fan {} reboot acknowledged with status {}",
                self.device.url(),
                response.status
            ),
            Err(err) => info!("fan {} reboot sent: {err}", self.device.url()),
        }
    }

    pub async fn debug(&self) {
        match self.device.write(&json!({ "queryDynamicShadowData": 1 })).await {
            Ok(response) => {
                println!(
                    "Fan query response for: {} {}\n{}\n",
                    self.device.url(),
                    response.status,
                    response.body
                );
                if response.is_success() {
                    match FanStatus::parse(&response.body) {
                        Ok(status) => println!("  decoded fanSpeed: {}", status.fan_speed),
                        Err(err) => println!("  could not decode fanSpeed: {err}"),
                    }
                }
            }
            Err(err) => println!("Fan query for {} failed: {err}\n", self.device.url()),
        }
    }
}

/// The two actuator kinds the scheduler drives through one update/debug
/// surface.
pub enum Actuator<D> {
    Blower(FurnaceBlower<D>),
    Ceiling(CeilingFan<D>),
}

impl<D: Device> Actuator<D> {
    pub async fn update(&mut self, snapshot: &HeatSnapshot) {
        match self {
            Self::Blower(blower) => blower.update(snapshot).await,
            Self::Ceiling(fan) => fan.update(snapshot).await,
        }
    }

    pub async fn debug(&self) {
        match self {
            Self::Blower(blower) => blower.debug().await,
            Self::Ceiling(fan) => fan.debug().await,
        }
    }
}
