use layerlock_common::{
    feedback::{LedPattern, SoundCue},
    LayerId, LayerSet,
};

use crate::{config::ConfigError, event::KeyId};

/// Output of a tap. When `shifted` is set and a shift modifier was held at press time the
/// shifted codes are sent instead; `suspend_shift` lifts the held shift while they are sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Emit {
    pub plain: &'static [u16],
    pub shifted: Option<&'static [u16]>,
    pub suspend_shift: bool,
}

impl Emit {
    pub const fn codes(codes: &'static [u16]) -> Self {
        Self {
            plain: codes,
            shifted: None,
            suspend_shift: false,
        }
    }

    pub const fn shift_aware(
        plain: &'static [u16],
        shifted: &'static [u16],
        suspend_shift: bool,
    ) -> Self {
        Self {
            plain,
            shifted: Some(shifted),
            suspend_shift,
        }
    }

    pub fn select(&self, shift_held: bool) -> &'static [u16] {
        match self.shifted {
            Some(shifted) if shift_held => shifted,
            _ => self.plain,
        }
    }
}

/// Layer named by a binding. `FollowDefault` maps the current default layer to a target, e.g.
/// a raise layer per base layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LayerTarget {
    Fixed(LayerId),
    FollowDefault(&'static [(LayerId, LayerId)]),
}

impl LayerTarget {
    pub fn resolve(&self, default_layer: LayerId) -> Option<LayerId> {
        match self {
            Self::Fixed(layer) => Some(*layer),
            Self::FollowDefault(table) => table
                .iter()
                .find(|(base, _)| *base == default_layer)
                .map(|(_, layer)| *layer),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HoldRole {
    /// Momentary layer while held.
    Layer(LayerTarget),
    /// Codes pressed while held.
    Codes(&'static [u16]),
}

/// Tap emits `tap`, holding engages `hold`. With `double_tap` set a DoubleTap inverts that
/// layer's lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DualRole {
    pub tap: Emit,
    pub hold: HoldRole,
    pub double_tap: Option<LayerTarget>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Defer to the next lower priority layer.
    Transparent,
    /// Swallow the key.
    NoOp,
    /// Codes held down for as long as the key is.
    EmitCodes(&'static [u16]),
    /// Tap the output on press.
    Tap(Emit),
    /// Like [Action::EmitCodes] and plays a cue on press.
    Cue(&'static [u16], SoundCue),
    /// Tap each code in turn on press.
    RunMacro(&'static [u16]),
    ToggleLayer(LayerTarget),
    SetDefaultLayer(LayerId),
    Momentary(LayerTarget),
    DualRole(DualRole),
}

impl Action {
    pub fn is_transparent(&self) -> bool {
        matches!(self, Self::Transparent)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LayerMap {
    pub layer: LayerId,
    pub bindings: &'static [(KeyId, Action)],
}

impl LayerMap {
    pub const fn new(layer: LayerId, bindings: &'static [(KeyId, Action)]) -> Self {
        Self { layer, bindings }
    }

    pub fn get(&self, key: KeyId) -> Option<Action> {
        self.bindings
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, action)| *action)
    }
}

/// Feedback assigned to a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LayerFeedback {
    pub layer: LayerId,
    /// Shown while the layer is locked, or held with nothing locked.
    pub led: Option<LedPattern>,
    pub hold_on: Option<SoundCue>,
    pub hold_off: Option<SoundCue>,
}

impl LayerFeedback {
    pub const fn led(layer: LayerId, pattern: LedPattern) -> Self {
        Self {
            layer,
            led: Some(pattern),
            hold_on: None,
            hold_off: None,
        }
    }

    pub const fn hold_cues(layer: LayerId, on: SoundCue, off: SoundCue) -> Self {
        Self {
            layer,
            led: None,
            hold_on: Some(on),
            hold_off: Some(off),
        }
    }
}

/// Static binding tables. `priority` lists layers lowest first; a later layer wins.
#[derive(Debug, Clone, Copy)]
pub struct Keymap {
    priority: &'static [LayerId],
    layers: &'static [LayerMap],
    feedback: &'static [LayerFeedback],
}

impl Keymap {
    pub fn new(
        priority: &'static [LayerId],
        layers: &'static [LayerMap],
        feedback: &'static [LayerFeedback],
    ) -> Result<Self, ConfigError> {
        let mut seen = LayerSet::EMPTY;
        for &layer in priority {
            if !layer.is_valid() {
                return Err(ConfigError::LayerOutOfRange(layer));
            }
            if !seen.insert(layer) {
                return Err(ConfigError::DuplicateLayer(layer));
            }
        }

        for map in layers {
            if !seen.contains(map.layer) {
                return Err(ConfigError::UnorderedLayer(map.layer));
            }
            for (_, action) in map.bindings {
                check_targets(action, seen)?;
            }
        }

        Ok(Self {
            priority,
            layers,
            feedback,
        })
    }

    pub fn priority(&self) -> &'static [LayerId] {
        self.priority
    }

    pub fn contains_layer(&self, layer: LayerId) -> bool {
        self.priority.contains(&layer)
    }

    /// Binding of `key` on `layer` alone. `None` when unbound or transparent.
    pub fn binding(&self, layer: LayerId, key: KeyId) -> Option<Action> {
        self.layers
            .iter()
            .filter(|m| m.layer == layer)
            .find_map(|m| m.get(key))
            .filter(|a| !a.is_transparent())
    }

    pub fn feedback(&self, layer: LayerId) -> Option<&'static LayerFeedback> {
        let feedback: &'static [LayerFeedback] = self.feedback;
        feedback.iter().find(|f| f.layer == layer)
    }
}

/// Layers an action can switch to must be in the priority order.
fn check_targets(action: &Action, known: LayerSet) -> Result<(), ConfigError> {
    let check = |layer: LayerId| {
        if known.contains(layer) {
            Ok(())
        } else {
            Err(ConfigError::UnorderedLayer(layer))
        }
    };
    let check_target = |target: &LayerTarget| match target {
        LayerTarget::Fixed(layer) => check(*layer),
        LayerTarget::FollowDefault(table) => table.iter().try_for_each(|&(_, layer)| check(layer)),
    };

    match action {
        Action::SetDefaultLayer(layer) => check(*layer),
        Action::ToggleLayer(target) | Action::Momentary(target) => check_target(target),
        Action::DualRole(dual) => {
            if let HoldRole::Layer(target) = &dual.hold {
                check_target(target)?;
            }
            dual.double_tap.as_ref().map_or(Ok(()), check_target)
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
#[path = "keymap_test.rs"]
mod test;
