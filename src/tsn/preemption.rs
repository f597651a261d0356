use crate::error::{AvbError, Result};
use crate::hal::regs::{
    FP_CONFIG, FP_CONFIG_ENABLE, FP_CONFIG_FRAG_SHIFT, FP_CONFIG_QUEUE_SHIFT,
    FP_CONFIG_VERIFY_DISABLE,
};
use crate::registry::{AdapterSession, Capabilities};
use crate::state::HardwareState;
use crate::types::FramePreemptionConfig;

/// Fragment sizes the MAC merge sublayer can negotiate.
const FRAGMENT_SIZES: [u32; 4] = [64, 128, 192, 256];

/// FP_CONFIG word for `config`
fn encode(config: &FramePreemptionConfig) -> Result<u32> {
    let Some(add_frag) = FRAGMENT_SIZES
        .iter()
        .position(|&size| size == config.min_fragment_size)
    else {
        return Err(AvbError::invalid(
            "min_fragment_size",
            format!("{} is not one of {FRAGMENT_SIZES:?}", config.min_fragment_size),
        ));
    };
    let mut word = (u32::from(config.preemptable_queue_mask) << FP_CONFIG_QUEUE_SHIFT)
        | (u32::try_from(add_frag).unwrap_or(0) << FP_CONFIG_FRAG_SHIFT);
    if config.preemptable_queue_mask != 0 {
        word |= FP_CONFIG_ENABLE;
    }
    if config.verify_disable {
        word |= FP_CONFIG_VERIFY_DISABLE;
    }
    Ok(word)
}

impl AdapterSession {
    /// Set which transmit queues may be preempted and the minimum fragment size.
    ///
    /// Queue 0 normally carries express traffic; marking it preemptable is
    /// allowed but logged.
    pub fn configure_frame_preemption(&self, config: &FramePreemptionConfig) -> Result<()> {
        self.require_capability(Capabilities::TSN_FP, "frame preemption")?;
        let word = encode(config)?;
        if config.preemptable_queue_mask & 1 != 0 {
            tracing::warn!(
                mask = format_args!("{:#04x}", config.preemptable_queue_mask),
                "Queue 0 marked preemptable"
            );
        }
        let mut inner = self.adapter().lock();
        inner.regs_at(HardwareState::BarMapped)?.write(FP_CONFIG, word)?;
        inner.shadow.frame_preemption = Some(*config);
        tracing::info!(
            mask = format_args!("{:#04x}", config.preemptable_queue_mask),
            min_fragment_size = config.min_fragment_size,
            verify_disable = config.verify_disable,
            "Frame preemption configured"
        );
        Ok(())
    }

    /// Frame preemption settings last accepted, if any
    #[must_use]
    pub fn frame_preemption_config(&self) -> Option<FramePreemptionConfig> {
        self.adapter().lock().shadow.frame_preemption
    }
}
