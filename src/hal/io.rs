use crate::error::Result;

/// Live 32-bit register access to one adapter's BAR0.
///
/// Implementations never cache: every call reaches the device. The
/// adapter serializes callers, so methods take `&mut self`.
pub trait RegisterIo: Send {
    /// Read the register at `offset`.
    fn read(&mut self, offset: u32) -> Result<u32>;

    /// Write `value` to the register at `offset`.
    fn write(&mut self, offset: u32, value: u32) -> Result<()>;

    /// Read-modify-write: bits in `mask` take their value from `value`.
    ///
    /// Two device accesses, not atomic on the bus. Returns the value written.
    fn modify(&mut self, offset: u32, mask: u32, value: u32) -> Result<u32> {
        let current = self.read(offset)?;
        let next = merge(current, mask, value);
        self.write(offset, next)?;
        Ok(next)
    }
}

impl<T: RegisterIo + ?Sized> RegisterIo for Box<T> {
    fn read(&mut self, offset: u32) -> Result<u32> {
        (**self).read(offset)
    }

    fn write(&mut self, offset: u32, value: u32) -> Result<()> {
        (**self).write(offset, value)
    }
}

/// `(current & !mask) | (value & mask)`
#[inline]
#[must_use]
pub const fn merge(current: u32, mask: u32, value: u32) -> u32 {
    (current & !mask) | (value & mask)
}

/// Read a low/high register pair as one 64-bit value, low word first.
pub fn read_u64(io: &mut dyn RegisterIo, low: u32, high: u32) -> Result<u64> {
    let lo = io.read(low)?;
    let hi = io.read(high)?;
    Ok((u64::from(hi) << 32) | u64::from(lo))
}

/// Split a 64-bit value into `(low, high)` words.
#[inline]
#[must_use]
pub const fn split_u64(value: u64) -> (u32, u32) {
    #[allow(clippy::cast_possible_truncation)]
    (value as u32, (value >> 32) as u32)
}
