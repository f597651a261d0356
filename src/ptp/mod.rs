//! IEEE 1588 hardware clock engine.
//!
//! All operations are methods on [`crate::registry::AdapterSession`]:
//! system time, frequency and increment control, hardware timestamping
//! enables, the two target-time slots and the two aux capture slots.
//! Operations that need a running clock drive the adapter to `PTP_READY`
//! on first use when the hardware allows it.

mod clock;
pub mod frequency;
mod rx;
mod systim;
mod timers;

#[cfg(test)]
mod tests;

pub use frequency::{PPB_LIMIT, encode_increment, scale_increment};
pub(crate) use systim::read_systim;

use crate::error::Result;
use crate::registry::DeviceProfile;
use crate::registry::adapter::AdapterInner;
use crate::state::{HardwareState, bringup};
use crate::types::DriverConfig;

/// Require `PTP_READY`, trying the promotion first when only the BAR is mapped.
pub(crate) fn ensure_ptp_ready(
    inner: &mut AdapterInner,
    profile: &DeviceProfile,
    config: &DriverConfig,
) -> Result<()> {
    if inner.machine.current() == HardwareState::BarMapped {
        bringup::promote_to_ptp_ready(inner, profile, config)?;
    }
    inner.machine.require(HardwareState::PtpReady)
}
