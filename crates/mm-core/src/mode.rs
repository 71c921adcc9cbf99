//! Transportation mode enum shared across all layers and flow crates.
//!
//! Every `Layer` carries exactly one `Mode`; reservoirs keep one accumulation
//! counter per vehicular mode.  Walking never contributes to accumulation.

/// The means by which a traveler or vehicle moves on a layer.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
#[non_exhaustive]
pub enum Mode {
    /// Private vehicle.
    #[default]
    Car,
    /// Fixed-route bus service.
    Bus,
    /// Fixed-route tram service.
    Tram,
    /// On foot (transfer and access legs).
    Walk,
    /// On-demand mobility service (ride-hailing, shared vehicles).
    OnDemand,
}

/// Number of `Mode` variants — sizes the per-mode accumulation arrays.
pub const MODE_COUNT: usize = 5;

impl Mode {
    /// All variants in declaration order, aligned with [`Mode::index`].
    pub const ALL: [Mode; MODE_COUNT] =
        [Mode::Car, Mode::Bus, Mode::Tram, Mode::Walk, Mode::OnDemand];

    /// Dense index for per-mode arrays.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Mode::Car      => 0,
            Mode::Bus      => 1,
            Mode::Tram     => 2,
            Mode::Walk     => 3,
            Mode::OnDemand => 4,
        }
    }

    /// `true` for modes that occupy road space and count toward reservoir
    /// accumulation.
    #[inline]
    pub fn is_vehicular(self) -> bool {
        !matches!(self, Mode::Walk)
    }

    /// Human-readable label, useful for CSV column values.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Car      => "car",
            Mode::Bus      => "bus",
            Mode::Tram     => "tram",
            Mode::Walk     => "walk",
            Mode::OnDemand => "on_demand",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
