/// Sound cues understood by the host's audio collaborator. How each cue sounds is up to the
/// host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SoundCue {
    LayerLockOn,
    LayerLockOff,
    /// Momentary layer engaged by holding its key.
    HoldOn,
    /// Momentary layer released.
    HoldOff,
    CapsLock,
    /// General purpose click, e.g. a backlight step.
    Push,
}

/// Backlight pattern for a layer: breathing period and whether it breathes continuously or
/// pulses once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedPattern {
    pub speed: u8,
    pub breathing: bool,
}

impl LedPattern {
    pub const fn new(speed: u8, breathing: bool) -> Self {
        Self { speed, breathing }
    }
}

/// Request sent to the backlight collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedRequest {
    pub enable: bool,
    pub breathing: bool,
    pub speed: u8,
}

impl LedRequest {
    /// Backlight off; the breathing period is reset to 1.
    pub const OFF: Self = Self {
        enable: false,
        breathing: false,
        speed: 1,
    };

    pub const fn on(pattern: LedPattern) -> Self {
        Self {
            enable: true,
            breathing: pattern.breathing,
            speed: pattern.speed,
        }
    }
}

impl From<LedPattern> for LedRequest {
    fn from(pattern: LedPattern) -> Self {
        Self::on(pattern)
    }
}
