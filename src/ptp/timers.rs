use std::time::{Duration, Instant};

use super::ensure_ptp_ready;
use super::systim::modify_tsauxc;
use crate::error::{AvbError, Result};
use crate::hal::regs::{
    TIMER_COUNT, TSAUXC, TSAUXC_STATUS_MASK, TSIM, TSIM_TT0, TSIM_TT1, TSSDP, TSSDP_TS_SDP0_EN,
    TSSDP_TS_SDP1_EN, auxstmp, trgttim, tsauxc_autt, tsauxc_en_tt,
};
use crate::hal::{RegisterIo, read_u64, split_u64};
use crate::registry::adapter::AdapterInner;
use crate::registry::{AdapterSession, Capabilities};
use crate::types::{AuxTimestamp, TargetTimeSlot};

fn check_timer(timer_index: u32) -> Result<()> {
    if timer_index >= TIMER_COUNT {
        return Err(AvbError::invalid(
            "timer_index",
            format!("{timer_index} is not a timer slot (0 or 1)"),
        ));
    }
    Ok(())
}

fn flag(enabled: bool, bit: u32) -> u32 {
    if enabled { bit } else { 0 }
}

impl AdapterSession {
    fn timer_window<'a>(&self, inner: &'a mut AdapterInner) -> Result<&'a mut dyn RegisterIo> {
        let adapter = self.adapter();
        ensure_ptp_ready(inner, adapter.profile(), adapter.config())?;
        inner.regs()
    }

    /// Arm target time `timer_index` at `target_ns`.
    ///
    /// Only the named slot's registers and enable bits are touched. Returns
    /// the slot as programmed, including the target it replaced.
    pub fn set_target_time(
        &self,
        timer_index: u32,
        target_ns: u64,
        enable_interrupt: bool,
        enable_sdp_output: bool,
    ) -> Result<TargetTimeSlot> {
        check_timer(timer_index)?;
        self.require_capability(Capabilities::ENHANCED_TS, "target time")?;
        let mut inner = self.adapter().lock();
        let io = self.timer_window(&mut inner)?;

        let (lo_reg, hi_reg) = trgttim(timer_index);
        let previous_target_ns = read_u64(io, lo_reg, hi_reg)?;
        let (lo, hi) = split_u64(target_ns);
        io.write(lo_reg, lo)?;
        io.write(hi_reg, hi)?;

        let tsim_bit = if timer_index == 0 { TSIM_TT0 } else { TSIM_TT1 };
        io.modify(TSIM, tsim_bit, flag(enable_interrupt, tsim_bit))?;
        let sdp_bit = if timer_index == 0 { TSSDP_TS_SDP0_EN } else { TSSDP_TS_SDP1_EN };
        io.modify(TSSDP, sdp_bit, flag(enable_sdp_output, sdp_bit))?;
        let en_tt = tsauxc_en_tt(timer_index);
        modify_tsauxc(io, en_tt, en_tt)?;

        tracing::debug!(
            timer_index,
            target_ns,
            previous_target_ns,
            enable_interrupt,
            enable_sdp_output,
            "Target time armed"
        );
        Ok(TargetTimeSlot {
            timer_index,
            target_time_ns: target_ns,
            interrupt_enabled: enable_interrupt,
            sdp_output_enabled: enable_sdp_output,
            previous_target_ns,
        })
    }

    /// Target currently programmed in slot `timer_index`
    pub fn get_target_time(&self, timer_index: u32) -> Result<u64> {
        check_timer(timer_index)?;
        self.require_capability(Capabilities::ENHANCED_TS, "target time")?;
        let mut inner = self.adapter().lock();
        let io = self.timer_window(&mut inner)?;
        let (lo_reg, hi_reg) = trgttim(timer_index);
        read_u64(io, lo_reg, hi_reg)
    }

    /// Read aux timestamp slot `timer_index`.
    ///
    /// `valid` is false when no SDP event was captured since the last clear.
    /// With `clear_flag`, a valid capture's flag is cleared after the read.
    pub fn get_aux_timestamp(&self, timer_index: u32, clear_flag: bool) -> Result<AuxTimestamp> {
        check_timer(timer_index)?;
        self.require_capability(Capabilities::ENHANCED_TS, "aux timestamp")?;
        let mut inner = self.adapter().lock();
        let io = self.timer_window(&mut inner)?;

        let tsauxc = io.read(TSAUXC)?;
        let autt = tsauxc_autt(timer_index);
        let valid = tsauxc & autt != 0;
        let (lo_reg, hi_reg) = auxstmp(timer_index);
        let timestamp_ns = read_u64(io, lo_reg, hi_reg)?;
        if clear_flag && valid {
            io.write(TSAUXC, (tsauxc & !TSAUXC_STATUS_MASK) | autt)?;
        }
        tracing::trace!(timer_index, timestamp_ns, valid, clear_flag, "Aux timestamp read");
        Ok(AuxTimestamp {
            timer_index,
            timestamp_ns,
            valid,
        })
    }

    /// Poll for an aux capture for at most `timeout`.
    ///
    /// The adapter lock is released between polls. On timeout the last
    /// read is returned with `valid == false`.
    pub fn wait_aux_timestamp(
        &self,
        timer_index: u32,
        clear_flag: bool,
        timeout: Duration,
    ) -> Result<AuxTimestamp> {
        let poll = self.adapter().config().aux_poll_interval;
        let deadline = Instant::now() + timeout;
        loop {
            let aux = self.get_aux_timestamp(timer_index, clear_flag)?;
            if aux.valid || Instant::now() >= deadline {
                return Ok(aux);
            }
            std::thread::sleep(poll.min(deadline.saturating_duration_since(Instant::now())));
        }
    }

    /// Async form of [`Self::wait_aux_timestamp`], bounded by `tokio::time::timeout`
    #[cfg(feature = "tokio-runtime")]
    pub async fn wait_aux_timestamp_async(
        &self,
        timer_index: u32,
        clear_flag: bool,
        timeout: Duration,
    ) -> Result<AuxTimestamp> {
        let poll = self.adapter().config().aux_poll_interval;
        let waited = tokio::time::timeout(timeout, async {
            loop {
                let aux = self.get_aux_timestamp(timer_index, clear_flag)?;
                if aux.valid {
                    return Ok::<_, AvbError>(aux);
                }
                tokio::time::sleep(poll).await;
            }
        })
        .await;
        match waited {
            Ok(result) => result,
            Err(_) => self.get_aux_timestamp(timer_index, clear_flag),
        }
    }
}
