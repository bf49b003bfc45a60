use crate::systems::{SystemType, SYSTEM_COUNT};

/// First-person dashboard readout of per-system damage tiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemsPanel {
    tiers: [usize; SYSTEM_COUNT],
    dirty: [bool; SYSTEM_COUNT],
}

impl SystemsPanel {
    pub fn set_system_health_group(&mut self, system: SystemType, tier: usize, dirty: bool) {
        self.tiers[system.index()] = tier;
        self.dirty[system.index()] |= dirty;
    }

    pub fn tier(&self, system: SystemType) -> usize {
        self.tiers[system.index()]
    }

    /// Systems flagged for redraw since the last call, clearing the flags.
    pub fn take_dirty(&mut self) -> Vec<SystemType> {
        let mut changed = Vec::new();
        for system in SystemType::ALL {
            if std::mem::take(&mut self.dirty[system.index()]) {
                changed.push(system);
            }
        }
        changed
    }
}
