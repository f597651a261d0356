//! Time-sensitive networking shapers.
//!
//! Gate schedules (802.1Qbv), credit-based shapers (802.1Qav), frame
//! preemption (802.3br) and PCIe PTM. Like the clock engine these are
//! methods on [`crate::registry::AdapterSession`]; accepted configuration
//! is kept in the adapter's shadow until a full re-initialization.

mod cbs;
mod preemption;
mod ptm;
mod tas;

#[cfg(test)]
mod tests;

pub use tas::{next_cycle_boundary, validate_schedule};

use crate::error::Result;
use crate::hal::RegisterIo;
use crate::hal::regs::{
    TQAVCTRL, TQAVCTRL_ENHANCED_QAV, TQAVCTRL_FUTSCDDIS, TQAVCTRL_TRANSMIT_MODE_TSN,
};
use crate::registry::adapter::ShaperShadow;

/// Bring TQAVCTRL in line with which shapers the shadow says are live.
///
/// TSN transmit mode stays on while either the gate schedule or any
/// credit shaper needs it.
fn sync_tqavctrl(io: &mut dyn RegisterIo, shadow: &ShaperShadow) -> Result<u32> {
    let cbs_active = shadow.cbs.iter().flatten().any(|c| c.is_enabled());
    let mut value = 0;
    if shadow.tas_enabled || cbs_active {
        value |= TQAVCTRL_TRANSMIT_MODE_TSN;
    }
    if shadow.tas_enabled {
        value |= TQAVCTRL_FUTSCDDIS;
    }
    if cbs_active {
        value |= TQAVCTRL_ENHANCED_QAV;
    }
    io.modify(
        TQAVCTRL,
        TQAVCTRL_TRANSMIT_MODE_TSN | TQAVCTRL_FUTSCDDIS | TQAVCTRL_ENHANCED_QAV,
        value,
    )
}
