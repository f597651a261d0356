//! Drives an adapter up the lifecycle as far as the hardware allows.

use super::machine::{HardwareState, Transition};
use crate::error::{AvbError, Result};
use crate::hal::RegisterIo;
use crate::hal::regs::{
    CTRL, SYSTIML, TIMINCA, TSAUXC, TSAUXC_DISABLE_SYSTIM0, TSAUXC_STATUS_MASK, TSYNC_ENABLED,
    TSYNCRXCTL, TSYNCTXCTL,
};
use crate::ptp::read_systim;
use crate::registry::{Capabilities, DeviceProfile};
use crate::registry::adapter::AdapterInner;
use crate::types::DriverConfig;

/// Value an unreadable BAR returns for every register.
const BAR_UNREADABLE: u32 = 0xFFFF_FFFF;

/// Advance the adapter and return the state reached.
///
/// Idempotent: from `BAR_MAPPED` or above only verification runs and the
/// state never moves backwards.
pub(crate) fn initialize(
    inner: &mut AdapterInner,
    profile: &DeviceProfile,
    config: &DriverConfig,
) -> Result<HardwareState> {
    if inner.machine.current() == HardwareState::Unbound {
        inner.machine.apply(Transition::Attach)?;
    }

    if inner.machine.current() == HardwareState::Bound {
        match echo_test(inner.probe_io()) {
            Ok(ctrl) => {
                tracing::debug!(ctrl = format_args!("{ctrl:#010x}"), "BAR0 echo test passed");
                inner.machine.apply(Transition::MapBar)?;
            }
            Err(e) => {
                tracing::warn!(error = %e, "BAR0 not usable, adapter stays BOUND");
                return Ok(inner.machine.current());
            }
        }
    } else if let Err(e) = echo_test(inner.probe_io()) {
        tracing::warn!(error = %e, state = %inner.machine.current(), "BAR0 verification failed");
        return Ok(inner.machine.current());
    }

    if !profile.has(Capabilities::BASIC_1588) || profile.nominal_timinca == 0 {
        return Ok(inner.machine.current());
    }

    if inner.machine.current() == HardwareState::BarMapped {
        promote_to_ptp_ready(inner, profile, config)?;
    } else if let Err(e) = verify_increment(inner.regs()?) {
        tracing::warn!(error = %e, "PTP_READY verification failed");
        return Err(e);
    }
    Ok(inner.machine.current())
}

/// Try the `BAR_MAPPED -> PTP_READY` step. A clock that will not run
/// leaves the state unchanged.
pub(crate) fn promote_to_ptp_ready(
    inner: &mut AdapterInner,
    profile: &DeviceProfile,
    config: &DriverConfig,
) -> Result<HardwareState> {
    if inner.machine.current() != HardwareState::BarMapped {
        return Ok(inner.machine.current());
    }
    match start_clock(inner.regs()?, profile, config) {
        Ok(()) => {
            inner.machine.apply(Transition::EnablePtp)?;
        }
        Err(e) => {
            tracing::warn!(error = %e, "PTP clock did not start, adapter stays BAR_MAPPED");
        }
    }
    Ok(inner.machine.current())
}

/// Full re-initialization: back to `UNBOUND` with shaping state cleared.
pub(crate) fn reset(inner: &mut AdapterInner) -> Result<HardwareState> {
    inner.shadow = Default::default();
    inner.machine.apply(Transition::Reset)
}

fn echo_test(io: &mut dyn RegisterIo) -> Result<u32> {
    let ctrl = io.read(CTRL)?;
    if ctrl == BAR_UNREADABLE {
        return Err(AvbError::fault(CTRL, "CTRL reads all ones"));
    }
    Ok(ctrl)
}

fn verify_increment(io: &mut dyn RegisterIo) -> Result<()> {
    if io.read(TIMINCA)? == 0 {
        return Err(AvbError::fault(TIMINCA, "increment reads zero at PTP_READY"));
    }
    Ok(())
}

/// Program the increment, release SYSTIM0, enable capture and prove the
/// counter advances.
fn start_clock(io: &mut dyn RegisterIo, profile: &DeviceProfile, config: &DriverConfig) -> Result<()> {
    // Increment first so releasing the counter never runs it at zero rate.
    if io.read(TIMINCA)? == 0 {
        io.write(TIMINCA, profile.nominal_timinca)?;
    }
    let tsauxc = io.read(TSAUXC)?;
    io.write(TSAUXC, tsauxc & !(TSAUXC_DISABLE_SYSTIM0 | TSAUXC_STATUS_MASK))?;
    io.modify(TSYNCTXCTL, TSYNC_ENABLED, TSYNC_ENABLED)?;
    io.modify(TSYNCRXCTL, TSYNC_ENABLED, TSYNC_ENABLED)?;

    let first = read_systim(io)?;
    std::thread::sleep(config.ptp_settle_interval);
    let second = read_systim(io)?;
    tracing::debug!(first, second, "SYSTIM settle check");
    if second <= first {
        return Err(AvbError::fault(SYSTIML, format!("SYSTIM not incrementing ({first} -> {second})")));
    }
    Ok(())
}
