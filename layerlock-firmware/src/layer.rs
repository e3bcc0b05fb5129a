use layerlock_common::{LayerId, LayerSet};

use crate::{
    event::{KeyId, Misuse},
    keymap::{Action, Keymap},
};

/// Which layers are visible: the default layer, layers held momentarily and locked layers.
/// A layer may be held and locked at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LayerState {
    default_layer: LayerId,
    momentary: LayerSet,
    locked: LayerSet,
}

impl LayerState {
    pub fn new(default_layer: LayerId) -> Self {
        Self {
            default_layer,
            momentary: LayerSet::EMPTY,
            locked: LayerSet::EMPTY,
        }
    }

    pub fn default_layer(&self) -> LayerId {
        self.default_layer
    }

    /// Replace the default layer. The new default is dropped from the momentary and locked sets;
    /// everything else in them stays. Follow with [LayerState::reset] for a full switch.
    pub fn set_default_layer(&mut self, layer: LayerId) {
        self.default_layer = layer;
        self.momentary.remove(layer);
        self.locked.remove(layer);
    }

    /// Release every momentary and locked layer.
    pub fn reset(&mut self) {
        self.momentary.clear();
        self.locked.clear();
    }

    /// Invert the lock of `layer`. Returns `true` when the layer is now locked.
    pub fn toggle_lock(&mut self, layer: LayerId) -> Result<bool, Misuse> {
        if layer == self.default_layer {
            return Err(Misuse::DefaultLayerToggle(layer));
        }
        if self.locked.remove(layer) {
            Ok(false)
        } else {
            Ok(self.locked.insert(layer))
        }
    }

    /// Engage or release `layer` while its key is held. Independent of the lock; a no-op for the
    /// default layer.
    pub fn set_momentary(&mut self, layer: LayerId, on: bool) {
        if layer == self.default_layer {
            return;
        }
        if on {
            self.momentary.insert(layer);
        } else {
            self.momentary.remove(layer);
        }
    }

    pub fn is_locked(&self, layer: LayerId) -> bool {
        self.locked.contains(layer)
    }

    pub fn is_momentary(&self, layer: LayerId) -> bool {
        self.momentary.contains(layer)
    }

    pub fn is_on(&self, layer: LayerId) -> bool {
        layer == self.default_layer || self.momentary.contains(layer) || self.locked.contains(layer)
    }

    pub fn locked(&self) -> LayerSet {
        self.locked
    }

    pub fn momentary(&self) -> LayerSet {
        self.momentary
    }

    pub fn visible(&self) -> LayerSet {
        let mut visible = self.momentary.union(self.locked);
        visible.insert(self.default_layer);
        visible
    }

    /// Highest priority visible layer with a non-transparent binding for `key`; the default
    /// layer when none has one.
    pub fn effective_layer_for(&self, key: KeyId, keymap: &Keymap) -> LayerId {
        self.lookup(key, keymap)
            .map(|(layer, _)| layer)
            .unwrap_or(self.default_layer)
    }

    /// Like [LayerState::effective_layer_for] and also returns the binding found.
    pub fn lookup(&self, key: KeyId, keymap: &Keymap) -> Option<(LayerId, Action)> {
        let visible = self.visible();
        keymap
            .priority()
            .iter()
            .rev()
            .filter(|layer| visible.contains(**layer))
            .find_map(|&layer| keymap.binding(layer, key).map(|action| (layer, action)))
            .or_else(|| {
                keymap
                    .binding(self.default_layer, key)
                    .map(|action| (self.default_layer, action))
            })
    }
}

#[cfg(test)]
#[path = "layer_test.rs"]
mod test;
