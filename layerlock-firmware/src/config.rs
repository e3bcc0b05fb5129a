use layerlock_common::LayerId;

use crate::tap_hold::TapHoldConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    ZeroThreshold,
    /// A layer appears more than once in the priority order.
    DuplicateLayer(LayerId),
    LayerOutOfRange(LayerId),
    /// A layer has bindings, or is the target of one, but has no place in the priority order.
    UnorderedLayer(LayerId),
    /// The default layer is not part of the priority order.
    UnknownDefaultLayer(LayerId),
}

/// Optional collaborators present on the board. A disabled capability makes the matching
/// collaborator calls no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Capabilities {
    pub audio: bool,
    pub backlight: bool,
    /// DoubleTap detection on dual-role keys.
    pub tap_dance: bool,
    /// Write the default layer through to the [crate::store::LayerStore].
    pub persist: bool,
}

impl Capabilities {
    pub const ALL: Self = Self {
        audio: true,
        backlight: true,
        tap_dance: true,
        persist: true,
    };

    pub const NONE: Self = Self {
        audio: false,
        backlight: false,
        tap_dance: false,
        persist: false,
    };
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::ALL
    }
}

/// Startup configuration. Loaded once; never changes while the dispatcher runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub default_layer: LayerId,
    pub tap_hold: TapHoldConfig,
    pub capabilities: Capabilities,
}

impl Config {
    pub fn new(default_layer: LayerId) -> Self {
        Self {
            default_layer,
            tap_hold: TapHoldConfig::default(),
            capabilities: Capabilities::default(),
        }
    }

    pub fn with_tap_hold(mut self, tap_hold: TapHoldConfig) -> Self {
        self.tap_hold = tap_hold;
        self
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod test;
