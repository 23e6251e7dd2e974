use crate::config::BlowerConfig;
use crate::types::{BlowerMode, HeatSnapshot};

/// Command the furnace blower actuator should issue this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlowerAction {
    /// Override the blower into the forced (running) mode.
    Force(BlowerMode),
    /// Put the blower back into the mode captured when the override began.
    Restore(BlowerMode),
}

impl BlowerAction {
    pub fn mode(self) -> BlowerMode {
        match self {
            Self::Force(mode) | Self::Restore(mode) => mode,
        }
    }
}

/// Post-heat blower hold.
///
/// While heat is off and the hold window since the last transition has not
/// elapsed, the blower is forced on; the mode reported at override entry is
/// latched once and restored after the window passes. The latch survives
/// nested overrides so the original pre-heat mode is never lost, and it only
/// clears once the device reports the restored mode back.
#[derive(Debug, Clone)]
pub struct BlowerHold {
    config: BlowerConfig,
    latched: Option<BlowerMode>,
}

impl BlowerHold {
    pub fn new(config: BlowerConfig) -> Self {
        Self {
            config,
            latched: None,
        }
    }

    pub fn latched(&self) -> Option<BlowerMode> {
        self.latched
    }

    /// True while an override is in effect and not yet confirmed reverted.
    pub fn in_override(&self) -> bool {
        self.latched.is_some()
    }

    pub fn update(&mut self, snapshot: &HeatSnapshot) -> Option<BlowerAction> {
        let holding = !snapshot.heat_active
            && (snapshot.transitioned
                || snapshot.since_transition_ms < self.config.hold_window_ms);

        if holding {
            if self.latched.is_none() {
                // Capture once; a transition arriving mid-override must not
                // overwrite the original mode.
                self.latched = snapshot.blower_mode;
            }
            if snapshot.blower_mode != Some(self.config.forced_mode) {
                return Some(BlowerAction::Force(self.config.forced_mode));
            }
            return None;
        }

        let original = self.latched?;
        if snapshot.blower_mode == Some(original) {
            self.latched = None;
            None
        } else {
            // Covers lost commands and device drift; reissued every cycle
            // until the reading confirms the restore.
            Some(BlowerAction::Restore(original))
        }
    }
}
