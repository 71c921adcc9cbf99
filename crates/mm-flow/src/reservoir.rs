use log::warn;
use mm_core::{LinkIndex, Mode};

use crate::mfd::{MfdFunction, ModeAccumulation, ModeSpeeds};

/// One geographic zone: an immutable set of covered links, per-mode
/// accumulation counters and the zone's speed function.
pub struct Reservoir {
    name:         String,
    links:        Vec<LinkIndex>,
    accumulation: ModeAccumulation,
    mfd:          Box<dyn MfdFunction>,
}

impl Reservoir {
    pub fn new(name: &str, links: Vec<LinkIndex>, mfd: Box<dyn MfdFunction>) -> Self {
        Self { name: name.to_owned(), links, accumulation: ModeAccumulation::ZERO, mfd }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn links(&self) -> &[LinkIndex] {
        &self.links
    }

    pub fn accumulation(&self) -> &ModeAccumulation {
        &self.accumulation
    }

    /// Evaluate the zone's MFD at the current accumulation.
    pub fn speeds(&self) -> ModeSpeeds {
        self.mfd.speeds(&self.accumulation)
    }

    pub(crate) fn enter(&mut self, mode: Mode) {
        self.accumulation.add(mode, 1.0);
    }

    pub(crate) fn exit(&mut self, mode: Mode) {
        debug_assert!(
            self.accumulation.get(mode) >= 1.0,
            "exit without matching entry in reservoir {}",
            self.name
        );
        self.accumulation.sub(mode, 1.0);
        if self.accumulation.get(mode) < 0.0 {
            warn!(
                "reservoir {}: {:?} accumulation went negative, clamping to 0",
                self.name, mode
            );
            self.accumulation.add(mode, -self.accumulation.get(mode));
        }
    }
}

impl std::fmt::Debug for Reservoir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reservoir")
            .field("name", &self.name)
            .field("links", &self.links.len())
            .field("accumulation", &self.accumulation)
            .finish()
    }
}
