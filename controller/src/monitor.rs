use tracing::error;

use fancontrol_common::{
    HeatSnapshot, MonitorConfig, ParseError, ThermostatReading, TransitionTracker,
};

use crate::device::{Device, DeviceError, DeviceResponse};

/// Polls the thermostat and folds each sample into the transition tracker.
pub struct ThermostatMonitor<D> {
    device: D,
    tracker: TransitionTracker,
    failure_log_every: u64,
}

enum PollFailure {
    Transport(DeviceError),
    Status(DeviceResponse),
    Parse(ParseError, String),
}

impl<D: Device> ThermostatMonitor<D> {
    pub fn new(device: D, config: &MonitorConfig, now_ms: u64) -> Self {
        Self {
            device,
            tracker: TransitionTracker::new(now_ms, config.startup_backdate_ms),
            failure_log_every: config.failure_log_every.max(1),
        }
    }

    /// One poll cycle. Returns true iff a fresh reading was retrieved and
    /// parsed; on any failure the tracker is left untouched apart from its
    /// failure counter, and no controller should run.
    pub async fn poll(&mut self, now_ms: u64) -> bool {
        let failure = match self.device.read().await {
            Err(err) => PollFailure::Transport(err),
            Ok(response) if !response.is_success() => PollFailure::Status(response),
            Ok(response) => match ThermostatReading::parse(&response.body) {
                Ok(reading) => {
                    self.tracker.observe(reading, now_ms);
                    return true;
                }
                Err(err) => PollFailure::Parse(err, response.body),
            },
        };

        self.note_failure(failure);
        false
    }

    pub fn snapshot(&self, now_ms: u64) -> HeatSnapshot {
        self.tracker.snapshot(now_ms)
    }

    pub fn reading(&self) -> Option<&ThermostatReading> {
        self.tracker.reading()
    }

    pub fn time_since_transition_ms(&self, now_ms: u64) -> u64 {
        self.tracker.time_since_transition_ms(now_ms)
    }

    // Sustained outages would flood the log at one entry per cycle; surface a
    // diagnostic only on every Nth consecutive failure.
    fn note_failure(&mut self, failure: PollFailure) {
        let count = self.tracker.record_failure();
        if count % self.failure_log_every != 0 {
            return;
        }

        let url = self.device.url();
        match failure {
            PollFailure::Transport(err) => {
                error!("thermostat {url} unreachable after {count} attempts: {err}");
            }
            PollFailure::Status(response) => {
                error!(
                    "thermostat {url} returned status {} after {count} attempts: {}",
                    response.status, response.body
                );
            }
            PollFailure::Parse(err, body) => {
                error!("thermostat {url} sent bad data after {count} attempts: {err}; body: {body}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::testing::FakeDevice;

    const OK_BODY: &str = r#"{"temp":68.0,"t_heat":70.0,"tstate":1,"fmode":0}"#;

    fn monitor(device: FakeDevice) -> ThermostatMonitor<FakeDevice> {
        ThermostatMonitor::new(device, &MonitorConfig::default(), 0)
    }

    #[tokio::test]
    async fn successful_poll_updates_snapshot() {
        let device = FakeDevice::new();
        device.push_read(Ok(DeviceResponse {
            status: 200,
            body: OK_BODY.to_string(),
        }));
        let mut monitor = monitor(device);

        assert!(monitor.poll(1_000).await);
        let snap = monitor.snapshot(1_000);
        assert!(snap.heat_active);
        assert!(!snap.transitioned);
    }

    #[tokio::test]
    async fn transport_error_fails_poll_and_preserves_state() {
        let device = FakeDevice::new();
        device.push_read(Ok(DeviceResponse {
            status: 200,
            body: OK_BODY.to_string(),
        }));
        device.push_read(Err(DeviceError::Timeout {
            url: "http://fake/tstat".to_string(),
        }));
        let mut monitor = monitor(device);

        assert!(monitor.poll(0).await);
        let before = monitor.snapshot(0);

        assert!(!monitor.poll(15_000).await);
        assert_eq!(monitor.snapshot(0), before);
    }

    #[tokio::test]
    async fn error_status_fails_poll() {
        let device = FakeDevice::new();
        device.push_read(Ok(DeviceResponse {
            status: 500,
            body: "server error".to_string(),
        }));
        let mut monitor = monitor(device);

        assert!(!monitor.poll(0).await);
        assert_eq!(monitor.reading(), None);
    }

    #[tokio::test]
    async fn malformed_body_fails_poll() {
        let device = FakeDevice::new();
        device.push_read(Ok(DeviceResponse {
            status: 200,
            body: r#"{"temp":68.0}"#.to_string(),
        }));
        let mut monitor = monitor(device);

        assert!(!monitor.poll(0).await);
        assert_eq!(monitor.reading(), None);
    }

    #[tokio::test]
    async fn recovers_after_outage() {
        let device = FakeDevice::new();
        for _ in 0..7 {
            device.push_read(Err(DeviceError::Timeout {
                url: "http://fake/tstat".to_string(),
            }));
        }
        device.push_read(Ok(DeviceResponse {
            status: 200,
            body: OK_BODY.to_string(),
        }));
        let mut monitor = monitor(device);

        for i in 0..7 {
            assert!(!monitor.poll(i * 15_000).await);
        }
        assert!(monitor.poll(105_000).await);
        assert!(monitor.reading().is_some());
    }
}
