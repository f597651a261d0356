use super::ensure_ptp_ready;
use super::frequency::{encode_increment, scale_increment};
use super::systim::{modify_tsauxc, read_systim, write_systim};
use crate::error::{AvbError, Result};
use crate::hal::regs::{
    TIMINCA, TSAUXC, TSAUXC_DISABLE_ALL, TSAUXC_DISABLE_SYSTIM0, TSAUXC_EN_TS_ALL,
    TSAUXC_EN_TT_ALL, tsauxc_disable_bit,
};
use crate::registry::{AdapterSession, Capabilities};
use crate::state::{HardwareState, bringup};
use crate::types::{ClockConfig, Increment, IncrementChange, TimestampingControl};

/// Bits of `timer_mask` that name a SYSTIM instance.
const TIMER_MASK_BITS: u32 = 0xF;

impl AdapterSession {
    /// Current SYSTIM in nanoseconds. Never decreases between calls.
    pub fn get_systime(&self) -> Result<u64> {
        self.require_capability(Capabilities::BASIC_1588, "PTP clock")?;
        let mut inner = self.adapter().lock();
        read_systim(inner.regs_at(HardwareState::BarMapped)?)
    }

    /// Set SYSTIM to `ns`
    pub fn set_systime(&self, ns: u64) -> Result<()> {
        self.require_capability(Capabilities::BASIC_1588, "PTP clock")?;
        let mut inner = self.adapter().lock();
        write_systim(inner.regs_at(HardwareState::BarMapped)?, ns)?;
        tracing::debug!(ns, "SYSTIM set");
        Ok(())
    }

    /// Step SYSTIM by `offset_ns` in one locked read-modify-write.
    ///
    /// Saturates at zero and `u64::MAX`. Returns the value written.
    pub fn adjust_systime(&self, offset_ns: i64) -> Result<u64> {
        self.require_capability(Capabilities::BASIC_1588, "PTP clock")?;
        let mut inner = self.adapter().lock();
        let io = inner.regs_at(HardwareState::BarMapped)?;
        let now = read_systim(io)?;
        let next = now.saturating_add_signed(offset_ns);
        write_systim(io, next)?;
        tracing::debug!(offset_ns, from = now, to = next, "SYSTIM stepped");
        Ok(next)
    }

    /// Tune the clock rate by `ppb` relative to the family's nominal increment.
    ///
    /// Out-of-range values are rejected before any register access. Zero
    /// restores the nominal increment.
    pub fn adjust_frequency(&self, ppb: i64) -> Result<IncrementChange> {
        self.require_capability(Capabilities::BASIC_1588, "PTP clock")?;
        let word = scale_increment(self.profile().nominal_timinca, ppb)?;
        let change = self.write_increment(word)?;
        tracing::debug!(
            ppb,
            previous = format_args!("{:#010x}", change.previous),
            current = format_args!("{:#010x}", change.current),
            "Clock frequency adjusted"
        );
        Ok(change)
    }

    /// Program a raw increment: `increment_ns` (8 bits) plus a 24-bit fraction
    pub fn set_increment(&self, increment_ns: u32, increment_frac: u32) -> Result<IncrementChange> {
        self.require_capability(Capabilities::BASIC_1588, "PTP clock")?;
        let word = encode_increment(increment_ns, increment_frac)?;
        self.write_increment(word)
    }

    fn write_increment(&self, word: u32) -> Result<IncrementChange> {
        let adapter = self.adapter();
        let mut inner = adapter.lock();
        ensure_ptp_ready(&mut inner, adapter.profile(), adapter.config())?;
        let io = inner.regs()?;
        let previous = io.read(TIMINCA)?;
        io.write(TIMINCA, word)?;
        Ok(IncrementChange {
            previous,
            current: word,
        })
    }

    /// Consistent snapshot of SYSTIM, TIMINCA and TSAUXC
    pub fn get_clock_config(&self) -> Result<ClockConfig> {
        self.require_capability(Capabilities::BASIC_1588, "PTP clock")?;
        let mut inner = self.adapter().lock();
        let ready = inner.machine.at_least(HardwareState::PtpReady);
        let io = inner.regs_at(HardwareState::BarMapped)?;
        let systim = read_systim(io)?;
        let timinca = io.read(TIMINCA)?;
        let tsauxc = io.read(TSAUXC)?;
        if ready && timinca == 0 {
            return Err(AvbError::fault(TIMINCA, "increment reads zero at PTP_READY"));
        }
        let inc = Increment::from_timinca(timinca);
        Ok(ClockConfig {
            systim,
            increment_ns: inc.ns,
            increment_frac: inc.frac_2_32(),
            timinca,
            tsauxc,
            clock_rate_mhz: self.profile().clock_rate.as_mhz(),
        })
    }

    /// Enable or disable the hardware clock and its target/aux functions.
    ///
    /// `timer_mask` selects SYSTIM instances to release (bit i = SYSTIMi,
    /// zero means SYSTIM0). Disabling stops all four instances and clears
    /// every target and aux enable. Releasing SYSTIM0 from `BAR_MAPPED`
    /// drives the adapter to `PTP_READY`.
    pub fn set_hw_timestamping(
        &self,
        enable: bool,
        timer_mask: u32,
        enable_target_time: bool,
        enable_aux_ts: bool,
    ) -> Result<TimestampingControl> {
        self.require_capability(Capabilities::BASIC_1588, "PTP clock")?;
        if timer_mask & !TIMER_MASK_BITS != 0 {
            return Err(AvbError::invalid(
                "timer_mask",
                format!("{timer_mask:#x} names timers beyond SYSTIM3"),
            ));
        }
        let adapter = self.adapter();
        let profile = adapter.profile();
        let mut inner = adapter.lock();
        let io = inner.regs_at(HardwareState::BarMapped)?;

        let (previous, _) = if enable {
            let mask = if timer_mask == 0 { 1 } else { timer_mask };
            if io.read(TIMINCA)? == 0 {
                io.write(TIMINCA, profile.nominal_timinca)?;
            }
            let release = (0..4)
                .filter(|i| mask & (1 << *i) != 0)
                .fold(0, |acc, i| acc | tsauxc_disable_bit(i));
            let mut set_mask = release;
            let mut set_value = 0;
            if enable_target_time {
                set_mask |= TSAUXC_EN_TT_ALL;
                set_value |= TSAUXC_EN_TT_ALL;
            }
            if enable_aux_ts {
                set_mask |= TSAUXC_EN_TS_ALL;
                set_value |= TSAUXC_EN_TS_ALL;
            }
            modify_tsauxc(io, set_mask, set_value)?
        } else {
            modify_tsauxc(
                io,
                TSAUXC_DISABLE_ALL | TSAUXC_EN_TT_ALL | TSAUXC_EN_TS_ALL,
                TSAUXC_DISABLE_ALL,
            )?
        };
        let current = io.read(TSAUXC)?;

        if !enable && !profile.freezes_on_disable {
            tracing::warn!(family = ?profile.family, "SYSTIM keeps counting while disabled on this family");
        }
        if enable
            && current & TSAUXC_DISABLE_SYSTIM0 == 0
            && inner.machine.current() == HardwareState::BarMapped
        {
            bringup::promote_to_ptp_ready(&mut inner, profile, adapter.config())?;
        }
        tracing::debug!(
            enable,
            previous = format_args!("{previous:#010x}"),
            current = format_args!("{current:#010x}"),
            "Hardware timestamping updated"
        );
        Ok(TimestampingControl {
            previous,
            current,
            freezes_on_disable: profile.freezes_on_disable,
        })
    }
}
