use embedded_storage::nor_flash::{
    ErrorType, NorFlash, NorFlashError, NorFlashErrorKind, ReadNorFlash,
};

#[derive(Debug)]
pub struct FlashStubError;

impl NorFlashError for FlashStubError {
    fn kind(&self) -> NorFlashErrorKind {
        NorFlashErrorKind::Other
    }
}

/// In-memory NOR flash with 4 byte writes and 64 byte sectors. Writes can only clear bits.
pub struct NorFlashStub<const SIZE: usize> {
    pub buf: [u8; SIZE],
    pub erases: usize,
    pub writes: usize,
    pub fail: bool,
}

impl<const SIZE: usize> Default for NorFlashStub<SIZE> {
    fn default() -> Self {
        Self {
            buf: [0; SIZE],
            erases: 0,
            writes: 0,
            fail: false,
        }
    }
}

impl<const SIZE: usize> ErrorType for NorFlashStub<SIZE> {
    type Error = FlashStubError;
}

impl<const SIZE: usize> ReadNorFlash for NorFlashStub<SIZE> {
    const READ_SIZE: usize = 1;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        if self.fail {
            return Err(FlashStubError);
        }
        let offset = offset as usize;
        bytes.copy_from_slice(&self.buf[offset..offset + bytes.len()]);
        Ok(())
    }

    fn capacity(&self) -> usize {
        SIZE
    }
}

impl<const SIZE: usize> NorFlash for NorFlashStub<SIZE> {
    const WRITE_SIZE: usize = 4;

    const ERASE_SIZE: usize = 64;

    fn erase(&mut self, from: u32, to: u32) -> Result<(), Self::Error> {
        if self.fail {
            return Err(FlashStubError);
        }
        self.erases += 1;
        self.buf[from as usize..to as usize].fill(0xff);
        Ok(())
    }

    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        if self.fail {
            return Err(FlashStubError);
        }
        assert_eq!(bytes.len() % Self::WRITE_SIZE, 0);
        self.writes += 1;
        let offset = offset as usize;
        for (t, f) in self.buf[offset..offset + bytes.len()]
            .iter_mut()
            .zip(bytes.iter())
        {
            *t &= *f;
        }
        Ok(())
    }
}
