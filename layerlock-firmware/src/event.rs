use embassy_time::Instant;
use layerlock_common::LayerId;

/// Identity of a physical key as delivered by the host's scanner. Matrix scanners pack row and
/// column with [KeyId::matrix].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyId(pub u16);

impl KeyId {
    pub const fn matrix(row: u8, col: u8) -> Self {
        Self(((row as u16) << 8) | col as u16)
    }

    pub const fn row(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn column(self) -> u8 {
        self.0 as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyEvent {
    pub key: KeyId,
    pub pressed: bool,
    pub timestamp: Instant,
}

impl KeyEvent {
    pub fn press(key: KeyId, timestamp: Instant) -> Self {
        Self {
            key,
            pressed: true,
            timestamp,
        }
    }

    pub fn release(key: KeyId, timestamp: Instant) -> Self {
        Self {
            key,
            pressed: false,
            timestamp,
        }
    }
}

/// Programmer or configuration mistakes detected while processing events. None of them are
/// fatal: the offending event is ignored and state is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Misuse {
    /// Release of a key that has no recorded press.
    UnmatchedRelease(KeyId),
    /// Lock toggle aimed at the current default layer.
    DefaultLayerToggle(LayerId),
    /// No room left to track another key.
    KeyCapacity(KeyId),
}
