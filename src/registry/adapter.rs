use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::device::{AdapterDescriptor, DeviceProfile};
use crate::error::{AvbError, Result};
use crate::hal::RegisterIo;
use crate::hal::regs::CBS_CLASS_COUNT;
use crate::state::{HardwareState, HwStateSnapshot, StateMachine};
use crate::types::{
    CbsShaperConfig, DriverConfig, FramePreemptionConfig, PtmConfig, TasActivation,
    TasScheduleConfig,
};

/// Configuration last accepted by the shaping engines.
///
/// Cleared only by a full re-initialization.
#[derive(Debug, Default)]
pub(crate) struct ShaperShadow {
    pub(crate) tas: Option<(TasScheduleConfig, TasActivation)>,
    pub(crate) tas_enabled: bool,
    pub(crate) cbs: [Option<CbsShaperConfig>; CBS_CLASS_COUNT as usize],
    pub(crate) frame_preemption: Option<FramePreemptionConfig>,
    pub(crate) ptm: Option<PtmConfig>,
}

/// Mutable per-adapter state, guarded by the adapter lock.
pub(crate) struct AdapterInner {
    io: Box<dyn RegisterIo>,
    pub(crate) machine: StateMachine,
    pub(crate) shadow: ShaperShadow,
}

impl AdapterInner {
    /// The register window, available from `BAR_MAPPED` on.
    pub(crate) fn regs(&mut self) -> Result<&mut dyn RegisterIo> {
        self.check_mapped()?;
        Ok(self.io.as_mut())
    }

    /// Register window and shaper shadow, borrowed together.
    pub(crate) fn regs_and_shadow(&mut self) -> Result<(&mut dyn RegisterIo, &mut ShaperShadow)> {
        self.check_mapped()?;
        Ok((self.io.as_mut(), &mut self.shadow))
    }

    fn check_mapped(&self) -> Result<()> {
        if self.machine.at_least(HardwareState::BarMapped) {
            Ok(())
        } else {
            Err(AvbError::fault(
                0,
                format!("register window not mapped (state {})", self.machine.current()),
            ))
        }
    }

    /// Raw bus access used while probing the BAR during bring-up.
    pub(crate) fn probe_io(&mut self) -> &mut dyn RegisterIo {
        self.io.as_mut()
    }

    /// Require `state` and hand out the register window.
    pub(crate) fn regs_at(&mut self, state: HardwareState) -> Result<&mut dyn RegisterIo> {
        self.machine.require(state)?;
        self.regs()
    }
}

/// One enumerated NIC: immutable identity plus its serialized hardware state.
pub(crate) struct Adapter {
    descriptor: AdapterDescriptor,
    profile: &'static DeviceProfile,
    config: Arc<DriverConfig>,
    inner: Mutex<AdapterInner>,
}

impl Adapter {
    pub(crate) fn new(
        descriptor: AdapterDescriptor,
        io: Box<dyn RegisterIo>,
        config: Arc<DriverConfig>,
    ) -> Self {
        Self {
            descriptor,
            profile: descriptor.family.profile(),
            config,
            inner: Mutex::new(AdapterInner {
                io,
                machine: StateMachine::new(),
                shadow: ShaperShadow::default(),
            }),
        }
    }

    pub(crate) fn descriptor(&self) -> AdapterDescriptor {
        self.descriptor
    }

    pub(crate) fn profile(&self) -> &'static DeviceProfile {
        self.profile
    }

    pub(crate) fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Serialize against every other caller on this adapter.
    ///
    /// A poisoned lock only means a caller panicked mid-sequence; the guarded
    /// data is register shadow state and stays usable.
    pub(crate) fn lock(&self) -> MutexGuard<'_, AdapterInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn snapshot(&self) -> HwStateSnapshot {
        let state = self.lock().machine.current();
        if state >= HardwareState::Bound {
            HwStateSnapshot {
                state,
                vendor_id: self.descriptor.vendor_id,
                device_id: self.descriptor.device_id,
                capabilities: self.descriptor.capabilities,
            }
        } else {
            HwStateSnapshot {
                state,
                ..HwStateSnapshot::default()
            }
        }
    }
}
