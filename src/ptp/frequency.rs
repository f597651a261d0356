use crate::error::{AvbError, Result};
use crate::hal::regs::TIMINCA_FRAC_MASK;
use crate::types::Increment;

/// Largest accepted magnitude of a frequency adjustment, in ppb.
pub const PPB_LIMIT: i64 = 1_000_000_000;

/// Scale a nominal TIMINCA word by `1 + ppb / 1e9`.
///
/// TIMINCA is an 8.24 fixed-point nanosecond value, so scaling the word
/// scales the increment. `ppb == 0` returns `nominal` unchanged. The result
/// saturates to `1..=u32::MAX` so the clock never stops.
pub fn scale_increment(nominal: u32, ppb: i64) -> Result<u32> {
    if !(-PPB_LIMIT..=PPB_LIMIT).contains(&ppb) {
        return Err(AvbError::invalid(
            "ppb",
            format!("{ppb} outside [-{PPB_LIMIT}, {PPB_LIMIT}]"),
        ));
    }
    if ppb == 0 {
        return Ok(nominal);
    }
    let scaled = i128::from(nominal) * i128::from(PPB_LIMIT + ppb) / i128::from(PPB_LIMIT);
    let word = u32::try_from(scaled.clamp(1, i128::from(u32::MAX))).unwrap_or(u32::MAX);
    Ok(word)
}

/// Validate a raw increment request and encode it.
pub fn encode_increment(increment_ns: u32, increment_frac: u32) -> Result<u32> {
    if increment_ns > 0xFF {
        return Err(AvbError::invalid(
            "increment_ns",
            format!("{increment_ns} does not fit in 8 bits"),
        ));
    }
    if increment_frac > TIMINCA_FRAC_MASK {
        return Err(AvbError::invalid(
            "increment_frac",
            format!("{increment_frac:#x} does not fit in 24 bits"),
        ));
    }
    let inc = Increment::new(increment_ns, increment_frac);
    if inc.is_zero() {
        return Err(AvbError::invalid("increment", "zero increment stops the clock"));
    }
    Ok(inc.to_timinca())
}
