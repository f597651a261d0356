use std::fmt;
use std::sync::Arc;

use super::adapter::Adapter;
use super::device::{AdapterDescriptor, Capabilities, DeviceProfile};
use crate::error::{AvbError, Result};
use crate::hal::mdio;
use crate::state::{HardwareState, HwStateSnapshot, bringup};

/// Caller-scoped handle to one selected adapter.
///
/// Returned by [`super::AdapterRegistry::select`]. Every operation goes
/// through the session it is called on, so concurrent callers holding
/// sessions to different adapters never interfere. Clones share the adapter.
#[derive(Clone)]
pub struct AdapterSession {
    adapter: Arc<Adapter>,
}

impl AdapterSession {
    pub(crate) fn new(adapter: Arc<Adapter>) -> Self {
        Self { adapter }
    }

    pub(crate) fn adapter(&self) -> &Adapter {
        &self.adapter
    }

    /// Identity of the selected adapter
    #[must_use]
    pub fn descriptor(&self) -> AdapterDescriptor {
        self.adapter.descriptor()
    }

    /// Family profile of the selected adapter
    #[must_use]
    pub fn profile(&self) -> &'static DeviceProfile {
        self.adapter.profile()
    }

    /// Whether both sessions point at the same adapter
    #[must_use]
    pub fn same_adapter(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.adapter, &other.adapter)
    }

    // ===== Lifecycle =====

    /// Advance the adapter as far as the hardware allows and return the state reached
    pub fn initialize(&self) -> Result<HardwareState> {
        let adapter = self.adapter();
        let mut inner = adapter.lock();
        bringup::initialize(&mut inner, adapter.profile(), adapter.config())
    }

    /// Consistent `{state, vendor, device, capabilities}` snapshot; safe in any state
    #[must_use]
    pub fn query_state(&self) -> HwStateSnapshot {
        self.adapter.snapshot()
    }

    /// Full re-initialization back to `UNBOUND`
    pub fn reset(&self) -> Result<HardwareState> {
        bringup::reset(&mut self.adapter.lock())
    }

    /// Human-readable description of the adapter
    pub fn device_info(&self) -> Result<String> {
        self.adapter.lock().machine.require(HardwareState::BarMapped)?;
        let mut info = self.profile().info.to_string();
        let limit = self.adapter.config().info_buffer_limit;
        if info.len() > limit {
            let mut end = limit;
            while !info.is_char_boundary(end) {
                end -= 1;
            }
            info.truncate(end);
        }
        Ok(info)
    }

    // ===== Register access =====

    /// Live register read
    pub fn read_register(&self, offset: u32) -> Result<u32> {
        self.adapter.lock().regs()?.read(offset)
    }

    /// Live register write
    pub fn write_register(&self, offset: u32, value: u32) -> Result<()> {
        self.adapter.lock().regs()?.write(offset, value)
    }

    /// Read-modify-write under the adapter lock; returns the value written
    pub fn modify_register(&self, offset: u32, mask: u32, value: u32) -> Result<u32> {
        self.adapter.lock().regs()?.modify(offset, mask, value)
    }

    // ===== PHY access =====

    /// Read a PHY register through MDIO
    pub fn mdio_read(&self, page: u32, reg: u32) -> Result<u16> {
        self.require_capability(Capabilities::MDIO, "MDIO")?;
        let limit = self.adapter.config().mdio_poll_limit;
        let mut inner = self.adapter.lock();
        mdio::read(inner.regs_at(HardwareState::BarMapped)?, page, reg, limit)
    }

    /// Write a PHY register through MDIO
    pub fn mdio_write(&self, page: u32, reg: u32, value: u16) -> Result<()> {
        self.require_capability(Capabilities::MDIO, "MDIO")?;
        let limit = self.adapter.config().mdio_poll_limit;
        let mut inner = self.adapter.lock();
        mdio::write(inner.regs_at(HardwareState::BarMapped)?, page, reg, value, limit)
    }

    pub(crate) fn require_capability(&self, cap: Capabilities, feature: &str) -> Result<()> {
        if self.profile().has(cap) {
            Ok(())
        } else {
            Err(AvbError::unsupported(format!(
                "{feature} on {:?} ({:04x}:{:04x})",
                self.profile().family,
                self.descriptor().vendor_id,
                self.descriptor().device_id
            )))
        }
    }
}

impl fmt::Debug for AdapterSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterSession")
            .field("descriptor", &self.descriptor())
            .finish_non_exhaustive()
    }
}
