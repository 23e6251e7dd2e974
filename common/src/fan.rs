use crate::config::CeilingFanConfig;
use crate::types::HeatSnapshot;

/// Debounced ceiling fan speed adjustment.
///
/// A transition re-arms the debounce without issuing anything; once the
/// relevant delay has fully elapsed with no further transition, one speed
/// command is attempted. A successful command converges the fan until the
/// next transition; a failed one is retried every cycle.
#[derive(Debug, Clone)]
pub struct FanDebounce {
    config: CeilingFanConfig,
    converged: bool,
}

impl FanDebounce {
    pub fn new(config: CeilingFanConfig) -> Self {
        Self {
            config,
            converged: false,
        }
    }

    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Returns the speed to command this cycle, if one is due.
    pub fn update(&mut self, snapshot: &HeatSnapshot) -> Option<u8> {
        if snapshot.transitioned {
            self.converged = false;
            return None;
        }

        let delay_ms = if snapshot.heat_active {
            self.config.on_delay_ms
        } else {
            self.config.off_delay_ms
        };

        if !self.converged && snapshot.since_transition_ms > delay_ms {
            let speed = if snapshot.heat_active {
                self.config.heat_on_speed
            } else {
                self.config.heat_off_speed
            };
            return Some(speed);
        }

        None
    }

    /// Feeds back the outcome of a command returned by `update`.
    pub fn command_result(&mut self, ok: bool) {
        self.converged = ok;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CeilingFanConfig {
        CeilingFanConfig::default()
    }

    fn snap(heat_active: bool, transitioned: bool, since_ms: u64) -> HeatSnapshot {
        HeatSnapshot {
            heat_active,
            transitioned,
            since_transition_ms: since_ms,
            blower_mode: None,
        }
    }

    #[test]
    fn transition_arms_without_commanding() {
        let mut fan = FanDebounce::new(config());
        fan.command_result(true);

        assert_eq!(fan.update(&snap(true, true, 0)), None);
        assert!(!fan.converged());
    }

    #[test]
    fn waits_out_the_on_delay_then_speeds_up() {
        let mut fan = FanDebounce::new(config());
        fan.update(&snap(true, true, 0));

        // Delay not yet elapsed; boundary is strict.
        assert_eq!(fan.update(&snap(true, false, 45_000)), None);
        assert_eq!(fan.update(&snap(true, false, 60_000)), None);

        assert_eq!(fan.update(&snap(true, false, 60_001)), Some(2));
    }

    #[test]
    fn heat_off_uses_longer_delay_and_lower_speed() {
        let mut fan = FanDebounce::new(config());
        fan.update(&snap(false, true, 0));

        assert_eq!(fan.update(&snap(false, false, 120_000)), None);
        assert_eq!(fan.update(&snap(false, false, 180_001)), Some(1));
    }

    #[test]
    fn successful_command_converges_until_next_transition() {
        let mut fan = FanDebounce::new(config());
        fan.update(&snap(true, true, 0));

        assert_eq!(fan.update(&snap(true, false, 75_000)), Some(2));
        fan.command_result(true);

        // Repeated polls with unchanged heating state issue nothing further.
        assert_eq!(fan.update(&snap(true, false, 90_000)), None);
        assert_eq!(fan.update(&snap(true, false, 900_000)), None);

        // The next transition re-arms.
        assert_eq!(fan.update(&snap(false, true, 0)), None);
        assert_eq!(fan.update(&snap(false, false, 180_001)), Some(1));
    }

    #[test]
    fn failed_command_retries_next_cycle() {
        let mut fan = FanDebounce::new(config());
        fan.update(&snap(true, true, 0));

        assert_eq!(fan.update(&snap(true, false, 75_000)), Some(2));
        fan.command_result(false);

        assert_eq!(fan.update(&snap(true, false, 90_000)), Some(2));
        fan.command_result(true);
        assert_eq!(fan.update(&snap(true, false, 105_000)), None);
    }

    #[test]
    fn aligns_to_current_phase_at_startup() {
        // No transition ever observed: the backdated reference reads as well
        // past either delay, so the fan settles to the current phase speed.
        let mut fan = FanDebounce::new(config());

        assert_eq!(fan.update(&snap(false, false, 360_000)), Some(1));
        fan.command_result(true);
        assert_eq!(fan.update(&snap(false, false, 375_000)), None);
    }

    #[test]
    fn heat_on_scenario_commands_exactly_once() {
        let mut fan = FanDebounce::new(config());
        // Baseline: heat off, converged from startup alignment.
        fan.update(&snap(false, false, 360_000));
        fan.command_result(true);

        // t=0: heat turns on.
        assert_eq!(fan.update(&snap(true, true, 0)), None);

        // Polls every 15s until t=90s: the first poll past the 60s delay
        // commands the heat-on speed, and only that one.
        let mut commands = Vec::new();
        for since in (15_000..=90_000).step_by(15_000) {
            if let Some(speed) = fan.update(&snap(true, false, since)) {
                commands.push((since, speed));
                fan.command_result(true);
            }
        }

        assert_eq!(commands, vec![(75_000, 2)]);
    }
}
