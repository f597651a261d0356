use super::sync_tqavctrl;
use crate::error::{AvbError, Result};
use crate::hal::regs::{CBS_CLASS_COUNT, TQAVCC_QUEUE_MODE, tqavcc, tqavhc};
use crate::registry::AdapterSession;
use crate::state::HardwareState;
use crate::types::CbsShaperConfig;

fn validate(config: &CbsShaperConfig) -> Result<()> {
    if config.traffic_class >= CBS_CLASS_COUNT {
        return Err(AvbError::invalid(
            "traffic_class",
            format!("{} >= {CBS_CLASS_COUNT}", config.traffic_class),
        ));
    }
    if config.idle_slope < 0 {
        return Err(AvbError::invalid(
            "idle_slope",
            format!("{} is negative", config.idle_slope),
        ));
    }
    if config.idle_slope == 0 {
        return Ok(());
    }
    if config.send_slope > 0 {
        return Err(AvbError::invalid(
            "send_slope",
            format!("{} must not be positive", config.send_slope),
        ));
    }
    if config.hi_credit < 0 {
        return Err(AvbError::invalid(
            "hi_credit",
            format!("{} must not be negative", config.hi_credit),
        ));
    }
    if config.lo_credit > 0 {
        return Err(AvbError::invalid(
            "lo_credit",
            format!("{} must not be positive", config.lo_credit),
        ));
    }
    Ok(())
}

impl AdapterSession {
    /// Program the credit-based shaper of one traffic class.
    ///
    /// `idle_slope == 0` turns shaping off for that class only. The send
    /// slope and low credit are derived by the hardware and only validated
    /// and recorded here.
    pub fn configure_cbs(&self, config: &CbsShaperConfig) -> Result<()> {
        if !self.profile().supports_cbs {
            return Err(AvbError::unsupported(format!(
                "credit-based shaper on {:?}",
                self.profile().family
            )));
        }
        validate(config)?;
        let mut inner = self.adapter().lock();
        inner.machine.require(HardwareState::BarMapped)?;
        let (io, shadow) = inner.regs_and_shadow()?;

        let queue = u32::from(config.traffic_class);
        if config.is_enabled() {
            // Both values were range-checked as non-negative above.
            #[allow(clippy::cast_sign_loss)]
            let (idle, hi) = (config.idle_slope as u32, config.hi_credit as u32);
            io.write(tqavcc(queue), TQAVCC_QUEUE_MODE | idle)?;
            io.write(tqavhc(queue), hi)?;
        } else {
            io.write(tqavcc(queue), 0)?;
            io.write(tqavhc(queue), 0)?;
        }
        shadow.cbs[usize::from(config.traffic_class)] = Some(*config);
        let tqavctrl = sync_tqavctrl(io, shadow)?;
        tracing::info!(
            traffic_class = config.traffic_class,
            idle_slope = config.idle_slope,
            send_slope = config.send_slope,
            hi_credit = config.hi_credit,
            lo_credit = config.lo_credit,
            tqavctrl = format_args!("{tqavctrl:#010x}"),
            "CBS configured"
        );
        Ok(())
    }

    /// Shaper last accepted for `traffic_class`, if any
    #[must_use]
    pub fn cbs_config(&self, traffic_class: u8) -> Option<CbsShaperConfig> {
        let inner = self.adapter().lock();
        inner.shadow.cbs.get(usize::from(traffic_class)).copied().flatten()
    }
}
