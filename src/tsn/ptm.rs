use crate::error::{AvbError, Result};
use crate::hal::regs::{PTM_CTRL, PTM_CTRL_EN, PTM_CTRL_GRANULARITY_MASK};
use crate::registry::{AdapterSession, Capabilities};
use crate::state::HardwareState;
use crate::types::PtmConfig;

impl AdapterSession {
    /// Enable or disable PCIe precision time measurement
    pub fn configure_ptm(&self, config: &PtmConfig) -> Result<()> {
        self.require_capability(Capabilities::PCIE_PTM, "PCIe PTM")?;
        if config.clock_granularity > PTM_CTRL_GRANULARITY_MASK {
            return Err(AvbError::invalid(
                "clock_granularity",
                format!("{} ns does not fit the 8-bit field", config.clock_granularity),
            ));
        }
        let value = (if config.enabled { PTM_CTRL_EN } else { 0 }) | config.clock_granularity;
        let mut inner = self.adapter().lock();
        inner.regs_at(HardwareState::BarMapped)?.modify(
            PTM_CTRL,
            PTM_CTRL_EN | PTM_CTRL_GRANULARITY_MASK,
            value,
        )?;
        inner.shadow.ptm = Some(*config);
        tracing::info!(enabled = config.enabled, granularity = config.clock_granularity, "PTM configured");
        Ok(())
    }

    /// PTM settings last accepted, if any
    #[must_use]
    pub fn ptm_config(&self) -> Option<PtmConfig> {
        self.adapter().lock().shadow.ptm
    }
}
