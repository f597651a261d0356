use crate::error::Result;
use crate::hal::regs::{SYSTIMH, SYSTIML, TSAUXC, TSAUXC_STATUS_MASK};
use crate::hal::{RegisterIo, merge, split_u64};

/// Read SYSTIM as one 64-bit value.
///
/// Reading SYSTIML latches SYSTIMH, so low-then-high is consistent.
pub(crate) fn read_systim(io: &mut dyn RegisterIo) -> Result<u64> {
    let lo = io.read(SYSTIML)?;
    let hi = io.read(SYSTIMH)?;
    Ok((u64::from(hi) << 32) | u64::from(lo))
}

/// Write SYSTIM, high word first so the low write never carries into a stale high.
pub(crate) fn write_systim(io: &mut dyn RegisterIo, ns: u64) -> Result<()> {
    let (lo, hi) = split_u64(ns);
    io.write(SYSTIMH, hi)?;
    io.write(SYSTIML, lo)
}

/// Read-modify-write of TSAUXC that never writes back the W1C status flags.
///
/// Returns `(previous, written)`.
pub(crate) fn modify_tsauxc(io: &mut dyn RegisterIo, mask: u32, value: u32) -> Result<(u32, u32)> {
    let previous = io.read(TSAUXC)?;
    let next = merge(previous, mask, value) & !TSAUXC_STATUS_MASK;
    io.write(TSAUXC, next)?;
    Ok((previous, next))
}
