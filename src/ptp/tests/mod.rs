
use crate::hal::regs::TSYNCTXCTL;
use crate::registry::{AdapterRegistry, AdapterSession, DeviceFamily};
use crate::state::HardwareState;
use crate::testing::{SimulatedNic, create_test_adapter};

pub(super) struct Fixture {
    _registry: AdapterRegistry,
    pub(super) session: AdapterSession,
    pub(super) nic: SimulatedNic,
}

/// Adapter of `family` brought up to `PTP_READY`.
pub(super) fn ready(family: DeviceFamily) -> Fixture {
    let nic = SimulatedNic::new(family);
    let (registry, session) = create_test_adapter(family, &nic).unwrap();
    assert_eq!(session.initialize().unwrap(), HardwareState::PtpReady);
    Fixture {
        _registry: registry,
        session,
        nic,
    }
}

/// Adapter left at `BAR_MAPPED` because clock start-up failed once.
///
/// The fault is cleared again, so a later promotion succeeds.
pub(super) fn bar_mapped(family: DeviceFamily) -> Fixture {
    let nic = SimulatedNic::new(family);
    let (registry, session) = create_test_adapter(family, &nic).unwrap();
    nic.inject_fault(TSYNCTXCTL);
    assert_eq!(session.initialize().unwrap(), HardwareState::BarMapped);
    nic.clear_faults();
    Fixture {
        _registry: registry,
        session,
        nic,
    }
}
