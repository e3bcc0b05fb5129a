use embedded_storage::nor_flash::{NorFlash, NorFlashError, NorFlashErrorKind};
use layerlock_common::LayerId;

/// Where the default layer survives power cycles.
pub trait LayerStore {
    fn load(&mut self) -> Option<LayerId>;
    fn save(&mut self, layer: LayerId);
}

/// No persistence.
impl LayerStore for () {
    fn load(&mut self) -> Option<LayerId> {
        None
    }

    fn save(&mut self, _layer: LayerId) {}
}

impl<T: LayerStore + ?Sized> LayerStore for &mut T {
    fn load(&mut self) -> Option<LayerId> {
        (**self).load()
    }

    fn save(&mut self, layer: LayerId) {
        (**self).save(layer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    Flash(NorFlashErrorKind),
    /// The offset is not on an erase boundary or the record does not fit the flash's write
    /// granularity.
    Unaligned,
}

#[cfg(feature = "defmt")]
impl defmt::Format for StoreError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Flash(NorFlashErrorKind::NotAligned) => defmt::write!(f, "Flash(NotAligned)"),
            Self::Flash(NorFlashErrorKind::OutOfBounds) => defmt::write!(f, "Flash(OutOfBounds)"),
            Self::Flash(_) => defmt::write!(f, "Flash(Other)"),
            Self::Unaligned => defmt::write!(f, "Unaligned"),
        }
    }
}

fn flash_error<E: NorFlashError>(err: E) -> StoreError {
    StoreError::Flash(err.kind())
}

const MAGIC: u8 = 0x4c;
const RECORD_LEN: usize = 3;
const MAX_RECORD_LEN: usize = 32;

/// Keeps the default layer in one erase sector of a NOR flash. The record is
/// `[MAGIC, layer, !layer]` padded with `0xff` to the flash's write size.
pub struct NorFlashLayerStore<F: NorFlash> {
    flash: F,
    offset: u32,
}

impl<F: NorFlash> NorFlashLayerStore<F> {
    pub fn new(flash: F, offset: u32) -> Self {
        Self { flash, offset }
    }

    pub fn into_inner(self) -> F {
        self.flash
    }

    fn record_len(&self) -> Result<usize, StoreError> {
        let len = RECORD_LEN.div_ceil(F::WRITE_SIZE) * F::WRITE_SIZE;
        if len > MAX_RECORD_LEN
            || len % F::READ_SIZE != 0
            || self.offset as usize % F::ERASE_SIZE != 0
        {
            return Err(StoreError::Unaligned);
        }
        Ok(len)
    }

    /// The stored layer, or `None` when the sector holds no valid record.
    pub fn read_layer(&mut self) -> Result<Option<LayerId>, StoreError> {
        let len = self.record_len()?;
        let mut buf = [0xff; MAX_RECORD_LEN];
        self.flash
            .read(self.offset, &mut buf[..len])
            .map_err(flash_error)?;
        if buf[0] != MAGIC || buf[1] != !buf[2] {
            return Ok(None);
        }
        let layer = LayerId(buf[1]);
        Ok(layer.is_valid().then_some(layer))
    }

    /// Erase the sector and write `layer`. Skipped when `layer` is already stored.
    pub fn write_layer(&mut self, layer: LayerId) -> Result<(), StoreError> {
        if self.read_layer()? == Some(layer) {
            return Ok(());
        }
        let len = self.record_len()?;
        let mut buf = [0xff; MAX_RECORD_LEN];
        buf[0] = MAGIC;
        buf[1] = layer.0;
        buf[2] = !layer.0;
        self.flash
            .erase(self.offset, self.offset + F::ERASE_SIZE as u32)
            .map_err(flash_error)?;
        self.flash
            .write(self.offset, &buf[..len])
            .map_err(flash_error)
    }
}

impl<F: NorFlash> LayerStore for NorFlashLayerStore<F> {
    fn load(&mut self) -> Option<LayerId> {
        match self.read_layer() {
            Ok(layer) => layer,
            Err(err) => {
                crate::warn!("default layer read failed: {:?}", err);
                None
            }
        }
    }

    fn save(&mut self, layer: LayerId) {
        if let Err(err) = self.write_layer(layer) {
            crate::warn!("default layer write failed: {:?}", err);
        }
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod test;
