use embassy_time::{Duration, Instant};
use heapless::Vec;

use DanceState::*;

use crate::{
    config::ConfigError,
    event::{KeyId, Misuse},
};

/// Tapping term used when none is configured.
pub const DEFAULT_THRESHOLD_MS: u16 = 135;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GestureResult {
    /// Nothing resolved yet; the key is down or untracked.
    Idle,
    Tap,
    Hold,
    DoubleTap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TapHoldConfig {
    threshold_ms: u16,
    interrupt: bool,
}

impl TapHoldConfig {
    /// `interrupt` makes a press of any other key resolve pending gestures as Hold straight away.
    pub fn new(threshold_ms: u16, interrupt: bool) -> Result<Self, ConfigError> {
        if threshold_ms == 0 {
            return Err(ConfigError::ZeroThreshold);
        }
        Ok(Self {
            threshold_ms,
            interrupt,
        })
    }

    pub fn threshold_ms(&self) -> u16 {
        self.threshold_ms
    }

    pub fn threshold(&self) -> Duration {
        Duration::from_millis(self.threshold_ms as u64)
    }

    pub fn interrupt(&self) -> bool {
        self.interrupt
    }
}

impl Default for TapHoldConfig {
    fn default() -> Self {
        Self {
            threshold_ms: DEFAULT_THRESHOLD_MS,
            interrupt: false,
        }
    }
}

/// Double-tap progress of one key.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DanceState {
    #[default]
    Idle,
    AwaitingSecondTap {
        released_at: Instant,
    },
    Resolved {
        released_at: Instant,
    },
}

#[derive(Copy, Clone, Debug)]
struct KeyTiming {
    key: KeyId,
    pressed_at: Option<Instant>,
    interrupted: bool,
    double_tap: bool,
    dance: DanceState,
}

impl KeyTiming {
    fn new(key: KeyId) -> Self {
        Self {
            key,
            pressed_at: None,
            interrupted: false,
            double_tap: false,
            dance: Idle,
        }
    }

    fn is_idle(&self) -> bool {
        self.pressed_at.is_none() && matches!(self.dance, Idle)
    }
}

/// Keys whose pending gesture was resolved as Hold by an interrupting press.
pub type Interrupted<const KEYS: usize> = Vec<KeyId, KEYS>;

/// Classifies press/release sequences into [GestureResult]s. Timing state is kept per key so
/// gestures on different keys never interfere; at most `KEYS` keys can be tracked at once.
pub struct Resolver<const KEYS: usize> {
    config: TapHoldConfig,
    keys: Vec<KeyTiming, KEYS>,
}

impl<const KEYS: usize> Resolver<KEYS> {
    pub fn new(config: TapHoldConfig) -> Self {
        Self {
            config,
            keys: Vec::new(),
        }
    }

    pub fn config(&self) -> &TapHoldConfig {
        &self.config
    }

    /// Start a gesture for `key`. `double_tap` enables DoubleTap detection for this press.
    pub fn on_press(
        &mut self,
        key: KeyId,
        double_tap: bool,
        now: Instant,
    ) -> Result<Interrupted<KEYS>, Misuse> {
        let idx = match self.position(key) {
            Some(idx) => idx,
            None => self.insert(key)?,
        };

        let interrupted = self.interrupt_others(Some(key), now);

        let timing = &mut self.keys[idx];
        if timing.pressed_at.is_some() {
            crate::warn!("press of {:?} without release; restarting gesture", key);
        }
        timing.pressed_at = Some(now);
        timing.interrupted = false;
        timing.double_tap = double_tap;
        if !double_tap {
            timing.dance = Idle;
        }

        Ok(interrupted)
    }

    /// Apply the interruption rule for a press of a key this resolver does not track.
    pub fn interrupt(&mut self, now: Instant) -> Interrupted<KEYS> {
        self.interrupt_others(None, now)
    }

    pub fn on_release(&mut self, key: KeyId, now: Instant) -> Result<GestureResult, Misuse> {
        let Some(idx) = self
            .keys
            .iter()
            .position(|t| t.key == key && t.pressed_at.is_some())
        else {
            return Err(Misuse::UnmatchedRelease(key));
        };
        let threshold = self.config.threshold();

        let timing = &mut self.keys[idx];
        let pressed_at = timing.pressed_at.take().unwrap_or(now);
        let elapsed = now.saturating_duration_since(pressed_at);

        let gesture = if timing.interrupted || elapsed >= threshold {
            timing.dance = Idle;
            GestureResult::Hold
        } else {
            match timing.dance {
                AwaitingSecondTap { released_at }
                    if timing.double_tap && within(released_at, pressed_at, threshold) =>
                {
                    timing.dance = Resolved { released_at: now };
                    GestureResult::DoubleTap
                }
                Resolved { released_at } if within(released_at, pressed_at, threshold) => {
                    // third tap in a row is absorbed
                    timing.dance = Idle;
                    GestureResult::Hold
                }
                _ => {
                    timing.dance = if timing.double_tap {
                        AwaitingSecondTap { released_at: now }
                    } else {
                        Idle
                    };
                    GestureResult::Tap
                }
            }
        };
        timing.interrupted = false;

        if timing.is_idle() {
            self.keys.swap_remove(idx);
        }

        crate::debug!("{:?} resolved {:?}", key, gesture);
        Ok(gesture)
    }

    /// `true` while `key` is down and its gesture could still resolve as Tap.
    pub fn is_pending(&self, key: KeyId, now: Instant) -> bool {
        self.find(key).is_some_and(|t| match t.pressed_at {
            Some(at) => !t.interrupted && now.saturating_duration_since(at) < self.config.threshold(),
            None => false,
        })
    }

    /// Double-tap progress of `key` as seen at `now`; a window that has run out reads as Idle.
    pub fn dance_state(&self, key: KeyId, now: Instant) -> DanceState {
        match self.find(key).map(|t| t.dance) {
            Some(state @ (AwaitingSecondTap { released_at } | Resolved { released_at }))
                if now.saturating_duration_since(released_at) < self.config.threshold() =>
            {
                state
            }
            _ => Idle,
        }
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    fn find(&self, key: KeyId) -> Option<&KeyTiming> {
        self.keys.iter().find(|t| t.key == key)
    }

    fn position(&self, key: KeyId) -> Option<usize> {
        self.keys.iter().position(|t| t.key == key)
    }

    fn insert(&mut self, key: KeyId) -> Result<usize, Misuse> {
        if self.keys.is_full() {
            // make room by dropping a released key's stale double-tap window
            match self.keys.iter().position(|t| t.pressed_at.is_none()) {
                Some(idx) => {
                    self.keys.swap_remove(idx);
                }
                None => {
                    crate::warn!("no room to track {:?}", key);
                    return Err(Misuse::KeyCapacity(key));
                }
            }
        }
        self.keys
            .push(KeyTiming::new(key))
            .map_err(|_| Misuse::KeyCapacity(key))?;
        Ok(self.keys.len() - 1)
    }

    fn interrupt_others(&mut self, except: Option<KeyId>, now: Instant) -> Interrupted<KEYS> {
        let mut interrupted = Vec::new();
        if !self.config.interrupt {
            return interrupted;
        }
        let threshold = self.config.threshold();

        for timing in self.keys.iter_mut() {
            if Some(timing.key) == except || timing.interrupted {
                continue;
            }
            if let Some(at) = timing.pressed_at {
                if now.saturating_duration_since(at) < threshold {
                    timing.interrupted = true;
                    // same capacity as keys so this cannot overflow
                    let _ = interrupted.push(timing.key);
                }
            }
        }

        interrupted
    }
}

fn within(released_at: Instant, pressed_at: Instant, threshold: Duration) -> bool {
    pressed_at.saturating_duration_since(released_at) < threshold
}

#[cfg(test)]
#[path = "tap_hold_test.rs"]
mod test;
