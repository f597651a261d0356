use std::sync::Arc;
use std::thread;

use super::*;
use crate::error::AvbError;
use crate::hal::regs::TIMINCA;
use crate::state::{HardwareState, HwStateSnapshot};
use crate::testing::{SimulatedNic, create_test_adapter, create_test_registry};
use crate::types::DriverConfig;

const I210: (u16, u16) = (INTEL_VENDOR_ID, 0x1533);
const I225: (u16, u16) = (INTEL_VENDOR_ID, 0x15F2);
const I350: (u16, u16) = (INTEL_VENDOR_ID, 0x1521);

// ===== Family classification =====

#[test]
fn test_identify_known_parts() {
    assert_eq!(DeviceFamily::identify(INTEL_VENDOR_ID, 0x1536), Some(DeviceFamily::I210));
    assert_eq!(DeviceFamily::identify(INTEL_VENDOR_ID, 0x0DC7), Some(DeviceFamily::I219));
    assert_eq!(DeviceFamily::identify(INTEL_VENDOR_ID, 0x125C), Some(DeviceFamily::I226));
    assert_eq!(DeviceFamily::identify(INTEL_VENDOR_ID, 0x10E6), Some(DeviceFamily::I82576));
}

#[test]
fn test_identify_rejects_foreign_parts() {
    assert_eq!(DeviceFamily::identify(INTEL_VENDOR_ID, 0x1539), None);
    assert_eq!(DeviceFamily::identify(0x10EC, 0x1533), None);
}

#[test]
fn test_profiles_are_consistent() {
    for family in [
        DeviceFamily::I210,
        DeviceFamily::I217,
        DeviceFamily::I219,
        DeviceFamily::I225,
        DeviceFamily::I226,
        DeviceFamily::I350,
        DeviceFamily::I82576,
    ] {
        let profile = family.profile();
        assert_eq!(profile.family, family);
        assert!(profile.has(Capabilities::MMIO));
        assert_eq!(
            profile.has(Capabilities::BASIC_1588),
            profile.nominal_timinca != 0,
            "{family:?}"
        );
    }
    assert_eq!(DeviceFamily::I350.profile().nominal_timinca, 0x1800_0000);
    assert_eq!(DeviceFamily::I225.profile().clock_rate.as_mhz(), 200);
}

#[test]
fn test_capability_bits_and_names() {
    let caps = DeviceFamily::I226.profile().capabilities;
    assert_eq!(caps.bits(), 0x1FD);
    assert_eq!(Capabilities::default(), Capabilities::empty());
    assert_eq!(
        format!("{:?}", Capabilities::MMIO | Capabilities::PCIE_PTM | Capabilities::SPEED_2_5G),
        "Capabilities(0xc1: MMIO|PCIe_PTM|2_5G)"
    );
}

#[test]
fn test_descriptor_wildcards() {
    let descriptor = AdapterDescriptor {
        vendor_id: INTEL_VENDOR_ID,
        device_id: 0x1533,
        capabilities: Capabilities::MMIO,
        ordinal: 0,
        family: DeviceFamily::I210,
    };
    assert!(descriptor.matches(WILDCARD_ID, WILDCARD_ID));
    assert!(descriptor.matches(INTEL_VENDOR_ID, WILDCARD_ID));
    assert!(descriptor.matches(WILDCARD_ID, 0x1533));
    assert!(!descriptor.matches(INTEL_VENDOR_ID, 0x1534));
}

// ===== Enumeration =====

#[test]
fn test_enumerate_is_stable() {
    let (registry, _nics) = create_test_registry(&[I210, I225, I350]);
    let first: Vec<_> = (0..3).map(|i| registry.enumerate(i).unwrap()).collect();
    for _ in 0..10 {
        for (i, expected) in (0u32..).zip(&first) {
            let again = registry.enumerate(i).unwrap();
            assert_eq!(again.count, 3);
            assert_eq!(again.descriptor, expected.descriptor);
        }
    }
    assert_eq!(first[1].descriptor.ordinal, 1);
    assert_eq!(first[2].descriptor.family, DeviceFamily::I350);
}

#[test]
fn test_enumerate_past_end() {
    let (registry, _nics) = create_test_registry(&[I210]);
    assert!(matches!(registry.enumerate(1), Err(AvbError::NotFound { .. })));
}

#[test]
fn test_unsupported_functions_skipped() {
    let (registry, _nics) = create_test_registry(&[(0x10EC, 0x8168), I210, (INTEL_VENDOR_ID, 0x0001)]);
    assert_eq!(registry.count(), 1);
    assert_eq!(registry.enumerate(0).unwrap().descriptor.device_id, 0x1533);
}

#[test]
fn test_hot_plug_count_refreshes_on_index_zero() {
    let (registry, _nics) = create_test_registry(&[I210]);
    let nic = SimulatedNic::new(DeviceFamily::I225);
    let attached = registry
        .attach(ProbedDevice::new(I225.0, I225.1, nic))
        .unwrap();
    assert_eq!(attached.ordinal, 1);

    // Published count lags until the next enumerate(0).
    assert_eq!(registry.count(), 1);
    assert!(registry.enumerate(1).is_err());
    assert!(registry.select(I225.0, I225.1).is_ok());

    assert_eq!(registry.enumerate(0).unwrap().count, 2);
    assert_eq!(registry.enumerate(1).unwrap().descriptor.device_id, 0x15F2);
}

#[test]
fn test_attach_rejects_unknown_device() {
    let registry = AdapterRegistry::new(DriverConfig::default());
    let nic = SimulatedNic::new(DeviceFamily::I210);
    assert!(registry.attach(ProbedDevice::new(INTEL_VENDOR_ID, 0xBEEF, nic)).is_none());
    assert_eq!(registry.enumerate(0).map(|e| e.count).unwrap_or(0), 0);
}

// ===== Selection =====

#[test]
fn test_select_first_match() {
    let (registry, _nics) = create_test_registry(&[I210, I225, (INTEL_VENDOR_ID, 0x1536)]);
    let any = registry.select(WILDCARD_ID, WILDCARD_ID).unwrap();
    assert_eq!(any.descriptor().ordinal, 0);
    let tsn = registry.select(INTEL_VENDOR_ID, 0x15F2).unwrap();
    assert_eq!(tsn.descriptor().ordinal, 1);
    let second_i210 = registry.select(WILDCARD_ID, 0x1536).unwrap();
    assert_eq!(second_i210.descriptor().ordinal, 2);
}

#[test]
fn test_select_missing_pair() {
    let (registry, _nics) = create_test_registry(&[I210]);
    assert!(matches!(
        registry.select(INTEL_VENDOR_ID, 0x15F2),
        Err(AvbError::NotFound { .. })
    ));
    assert!(matches!(registry.select_ordinal(3), Err(AvbError::NotFound { .. })));
}

#[test]
fn test_sessions_share_adapter() {
    let (registry, _nics) = create_test_registry(&[I210, I225]);
    let a = registry.select_ordinal(0).unwrap();
    let b = registry.select(WILDCARD_ID, 0x1533).unwrap();
    let c = registry.select_ordinal(1).unwrap();
    assert!(a.same_adapter(&b));
    assert!(!a.same_adapter(&c));
    a.initialize().unwrap();
    assert_eq!(b.query_state().state, HardwareState::PtpReady);
    assert_eq!(c.query_state().state, HardwareState::Unbound);
}

// ===== Lifecycle through the session =====

#[test]
fn test_query_state_below_bound_is_zero() {
    let nic = SimulatedNic::new(DeviceFamily::I210);
    let (_registry, session) = create_test_adapter(DeviceFamily::I210, &nic).unwrap();
    assert_eq!(session.query_state(), HwStateSnapshot::default());
    session.initialize().unwrap();
    let snapshot = session.query_state();
    assert_eq!(snapshot.vendor_id, INTEL_VENDOR_ID);
    assert_eq!(snapshot.device_id, 0x1533);
    assert!(snapshot.capabilities.contains(Capabilities::ENHANCED_TS));
}

#[test]
fn test_unreadable_bar_stays_bound() {
    let nic = SimulatedNic::builder(DeviceFamily::I210).unreadable_bar(true).build();
    let (_registry, session) = create_test_adapter(DeviceFamily::I210, &nic).unwrap();
    assert_eq!(session.initialize().unwrap(), HardwareState::Bound);
    assert!(matches!(session.read_register(0), Err(AvbError::HardwareFault { .. })));
}

#[test]
fn test_no_clock_family_stops_at_bar_mapped() {
    let nic = SimulatedNic::new(DeviceFamily::I82576);
    let (_registry, session) = create_test_adapter(DeviceFamily::I82576, &nic).unwrap();
    assert_eq!(session.initialize().unwrap(), HardwareState::BarMapped);
    assert!(matches!(session.get_systime(), Err(AvbError::NotSupported { .. })));
}

#[test]
fn test_state_never_regresses_over_repeated_init() {
    let nic = SimulatedNic::new(DeviceFamily::I226);
    let (_registry, session) = create_test_adapter(DeviceFamily::I226, &nic).unwrap();
    let mut last = session.query_state().state;
    for _ in 0..100 {
        session.initialize().unwrap();
        let now = session.query_state().state;
        assert!(now >= last);
        last = now;
    }
    assert_eq!(last, HardwareState::PtpReady);
}

#[test]
fn test_reinitialize_with_lost_increment_is_fault() {
    let nic = SimulatedNic::new(DeviceFamily::I210);
    let (_registry, session) = create_test_adapter(DeviceFamily::I210, &nic).unwrap();
    session.initialize().unwrap();
    nic.set_register(TIMINCA, 0);
    assert!(matches!(
        session.initialize(),
        Err(AvbError::HardwareFault { offset: TIMINCA, .. })
    ));
    assert_eq!(nic.register(TIMINCA), 0);
    assert_eq!(session.query_state().state, HardwareState::PtpReady);
}

#[test]
fn test_reset_returns_to_unbound() {
    let nic = SimulatedNic::new(DeviceFamily::I210);
    let (_registry, session) = create_test_adapter(DeviceFamily::I210, &nic).unwrap();
    session.initialize().unwrap();
    assert_eq!(session.reset().unwrap(), HardwareState::Unbound);
    assert_eq!(session.initialize().unwrap(), HardwareState::PtpReady);
}

#[test]
fn test_device_info_requires_mapping() {
    let nic = SimulatedNic::new(DeviceFamily::I225);
    let (_registry, session) = create_test_adapter(DeviceFamily::I225, &nic).unwrap();
    assert!(matches!(session.device_info(), Err(AvbError::NotReady { .. })));
    session.initialize().unwrap();
    assert_eq!(session.device_info().unwrap(), "Intel I225 2.5G Ethernet - Enhanced TSN");
}

#[test]
fn test_device_info_truncated_to_config_limit() {
    let config = DriverConfig::builder().info_buffer_limit(10).build();
    let nic = SimulatedNic::new(DeviceFamily::I210);
    let registry = AdapterRegistry::with_devices(config, [ProbedDevice::new(I210.0, I210.1, nic)]);
    let session = registry.select_ordinal(0).unwrap();
    session.initialize().unwrap();
    assert_eq!(session.device_info().unwrap(), "Intel I210");
}

#[test]
fn test_mdio_through_session() {
    let nic = SimulatedNic::new(DeviceFamily::I350);
    let (_registry, session) = create_test_adapter(DeviceFamily::I350, &nic).unwrap();
    assert!(matches!(session.mdio_read(0, 1), Err(AvbError::NotReady { .. })));
    session.initialize().unwrap();
    nic.set_phy_register(0, 2, 0x0141);
    assert_eq!(session.mdio_read(0, 2).unwrap(), 0x0141);
    session.mdio_write(0, 0, 0x1140).unwrap();
    assert_eq!(nic.phy_register(0, 0), 0x1140);
}

// ===== Concurrency =====

#[test]
fn test_concurrent_sessions_on_different_adapters() {
    let (registry, nics) = create_test_registry(&[I210, I225, I350]);
    let registry = Arc::new(registry);
    let handles: Vec<_> = (0..3u32)
        .map(|ordinal| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                let session = registry.select_ordinal(ordinal).unwrap();
                session.initialize().unwrap();
                let base = u64::from(ordinal + 1) * 1_000_000_000_000;
                for step in 0..50u64 {
                    session.set_systime(base + step * 1_000).unwrap();
                    let now = session.get_systime().unwrap();
                    assert!(now >= base + step * 1_000);
                    assert!(now < base + 1_000_000_000);
                }
                session.descriptor().device_id
            })
        })
        .collect();
    let ids: Vec<u16> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(ids, vec![0x1533, 0x15F2, 0x1521]);
    assert!(nics.iter().all(|nic| nic.access_count() > 0));
}

#[test]
fn test_registry_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AdapterRegistry>();
    assert_send_sync::<AdapterSession>();
}
