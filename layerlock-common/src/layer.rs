/// Layer ids must fit in a 32 bit layer state word.
pub const MAX_LAYERS: u8 = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LayerId(pub u8);

impl LayerId {
    pub const fn index(self) -> u8 {
        self.0
    }

    pub const fn is_valid(self) -> bool {
        self.0 < MAX_LAYERS
    }
}

/// Fixed capacity set of layers, one bit per [LayerId].
///
/// ```
/// use layerlock_common::layer::{LayerId, LayerSet};
/// let mut set = LayerSet::EMPTY;
/// assert!(set.insert(LayerId(3)));
/// assert!(!set.insert(LayerId(3)));
/// assert!(set.contains(LayerId(3)));
/// assert_eq!(set.bits(), 0b1000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LayerSet(u32);

impl LayerSet {
    pub const EMPTY: Self = Self(0);

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, layer: LayerId) -> bool {
        layer.is_valid() && self.0 & bit(layer) != 0
    }

    /// Returns `true` when `layer` was not already in the set.
    pub fn insert(&mut self, layer: LayerId) -> bool {
        if !layer.is_valid() {
            return false;
        }
        let old = self.0;
        self.0 |= bit(layer);
        old != self.0
    }

    /// Returns `true` when `layer` was in the set.
    pub fn remove(&mut self, layer: LayerId) -> bool {
        if !layer.is_valid() {
            return false;
        }
        let old = self.0;
        self.0 &= !bit(layer);
        old != self.0
    }

    pub fn union(self, other: LayerSet) -> LayerSet {
        LayerSet(self.0 | other.0)
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    pub fn iter(self) -> impl Iterator<Item = LayerId> {
        (0..MAX_LAYERS)
            .map(LayerId)
            .filter(move |l| self.contains(*l))
    }
}

impl FromIterator<LayerId> for LayerSet {
    fn from_iter<T: IntoIterator<Item = LayerId>>(iter: T) -> Self {
        let mut set = LayerSet::EMPTY;
        for layer in iter {
            set.insert(layer);
        }
        set
    }
}

#[inline(always)]
fn bit(layer: LayerId) -> u32 {
    1 << layer.0
}

#[cfg(test)]
#[path = "layer_test.rs"]
mod test;
