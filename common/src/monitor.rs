use crate::types::{BlowerMode, HeatSnapshot, ThermostatReading};

/// Tracks heat-call transitions across successive thermostat readings.
///
/// Owns everything the controllers derive their timing from: the previous
/// reading, when the heat flag last flipped, and the consecutive poll failure
/// count. Mutated only by `observe` and `record_failure`.
#[derive(Debug, Clone)]
pub struct TransitionTracker {
    started_ms: u64,
    backdate_ms: u64,
    previous: Option<ThermostatReading>,
    last_transition_ms: Option<u64>,
    transitioned: bool,
    consecutive_failures: u64,
}

impl TransitionTracker {
    /// `backdate_ms` shifts the startup transition reference into the past so
    /// that, until a real transition is seen, the blower hold window reads as
    /// already elapsed.
    pub fn new(now_ms: u64, backdate_ms: u64) -> Self {
        Self {
            started_ms: now_ms,
            backdate_ms,
            previous: None,
            last_transition_ms: None,
            transitioned: false,
            consecutive_failures: 0,
        }
    }

    /// Folds in a freshly parsed reading from a successful poll.
    pub fn observe(&mut self, reading: ThermostatReading, now_ms: u64) {
        self.consecutive_failures = 0;
        self.transitioned = self
            .previous
            .is_some_and(|prev| prev.heat_active != reading.heat_active);
        if self.transitioned {
            self.last_transition_ms = Some(now_ms);
        }
        self.previous = Some(reading);
    }

    /// Bumps the unified failure counter and returns the new count. All other
    /// state is left untouched.
    pub fn record_failure(&mut self) -> u64 {
        self.consecutive_failures += 1;
        self.consecutive_failures
    }

    pub fn heat_active(&self) -> bool {
        self.previous.is_some_and(|reading| reading.heat_active)
    }

    pub fn blower_mode(&self) -> Option<BlowerMode> {
        self.previous.map(|reading| reading.blower_mode)
    }

    pub fn reading(&self) -> Option<&ThermostatReading> {
        self.previous.as_ref()
    }

    /// True only on the poll where the heat flag flipped relative to the
    /// previous reading.
    pub fn transitioned(&self) -> bool {
        self.transitioned
    }

    pub fn consecutive_failures(&self) -> u64 {
        self.consecutive_failures
    }

    pub fn time_since_transition_ms(&self, now_ms: u64) -> u64 {
        match self.last_transition_ms {
            Some(at) => now_ms.saturating_sub(at),
            None => self
                .backdate_ms
                .saturating_add(now_ms.saturating_sub(self.started_ms)),
        }
    }

    pub fn snapshot(&self, now_ms: u64) -> HeatSnapshot {
        HeatSnapshot {
            heat_active: self.heat_active(),
            transitioned: self.transitioned,
            since_transition_ms: self.time_since_transition_ms(now_ms),
            blower_mode: self.blower_mode(),
        }
    }
}
