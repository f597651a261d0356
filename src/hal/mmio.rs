use std::ptr::{self, NonNull};

use super::io::RegisterIo;
use crate::error::{AvbError, Result};

/// A mapped BAR0 window accessed with volatile 32-bit loads and stores.
#[derive(Debug)]
pub struct MmioWindow {
    base: NonNull<u8>,
    len: usize,
}

// SAFETY: the window is plain device memory; the owning adapter serializes
// all access behind its lock.
unsafe impl Send for MmioWindow {}

impl MmioWindow {
    /// Wrap an already-mapped register window.
    ///
    /// # Safety
    /// `base` must point to `len` bytes of device memory mapped uncached for
    /// the whole lifetime of the returned value, and nothing else may unmap it.
    pub unsafe fn new(base: *mut u8, len: usize) -> Result<Self> {
        let base = NonNull::new(base).ok_or_else(|| AvbError::fault(0, "BAR0 base is null"))?;
        if base.as_ptr().align_offset(4) != 0 {
            return Err(AvbError::fault(0, "BAR0 base is not 4-byte aligned"));
        }
        Ok(Self { base, len })
    }

    /// Size of the mapped window in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the window maps nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn checked(&self, offset: u32) -> Result<*mut u32> {
        let off = offset as usize;
        if off % 4 != 0 || off.checked_add(4).is_none_or(|end| end > self.len) {
            return Err(AvbError::fault(offset, "offset outside mapped window"));
        }
        // SAFETY: bounds checked above against the mapped length.
        Ok(unsafe { self.base.as_ptr().add(off).cast::<u32>() })
    }
}

impl RegisterIo for MmioWindow {
    fn read(&mut self, offset: u32) -> Result<u32> {
        let reg = self.checked(offset)?;
        // SAFETY: `reg` is aligned and inside the mapping.
        let value = u32::from_le(unsafe { ptr::read_volatile(reg) });
        tracing::trace!(
            offset = format_args!("{offset:#07x}"),
            value = format_args!("{value:#010x}"),
            "MMIO read"
        );
        Ok(value)
    }

    fn write(&mut self, offset: u32, value: u32) -> Result<()> {
        let reg = self.checked(offset)?;
        tracing::trace!(
            offset = format_args!("{offset:#07x}"),
            value = format_args!("{value:#010x}"),
            "MMIO write"
        );
        // SAFETY: `reg` is aligned and inside the mapping.
        unsafe { ptr::write_volatile(reg, value.to_le()) };
        Ok(())
    }
}
