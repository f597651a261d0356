mod tas;

use crate::registry::{AdapterRegistry, AdapterSession, DeviceFamily};
use crate::state::HardwareState;
use crate::testing::{SimulatedNic, create_test_adapter};

pub(super) struct Fixture {
    _registry: AdapterRegistry,
    pub(super) session: AdapterSession,
    pub(super) nic: SimulatedNic,
}

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

/// Adapter whose clock never starts, so it stops at `BAR_MAPPED`.
pub(super) fn stalled(family: DeviceFamily) -> Fixture {
    let nic = SimulatedNic::builder(family).clock_stopped(true).build();
    let (registry, session) = create_test_adapter(family, &nic).unwrap();
    assert_eq!(session.initialize().unwrap(), HardwareState::BarMapped);
    Fixture {
        _registry: registry,
        session,
        nic,
    }
}
