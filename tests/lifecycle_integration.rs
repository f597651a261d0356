//! End-to-end adapter lifecycle: enumerate, select, bring up, query.

use std::sync::Once;

use intel_avb::testing::create_test_registry;
use intel_avb::{HardwareState, INTEL_VENDOR_ID, WILDCARD_ID};

static INIT: Once = Once::new();

fn init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("info,intel_avb=debug")
            .with_test_writer()
            .try_init();
    });
}

// ===== Scenario =====

#[test]
fn test_enumerate_select_initialize_query() {
    init();
    let (registry, _nics) = create_test_registry(&[
        (INTEL_VENDOR_ID, 0x15F2),
        (INTEL_VENDOR_ID, 0x1533),
        (INTEL_VENDOR_ID, 0x1521),
    ]);

    let count = registry.enumerate(0).unwrap().count;
    assert_eq!(count, 3);
    let listed: Vec<_> = (0..count)
        .map(|i| registry.enumerate(i).unwrap().descriptor)
        .collect();
    assert!(listed.iter().any(|d| d.device_id == 0x1533));

    let session = registry.select(INTEL_VENDOR_ID, 0x1533).unwrap();
    let reached = session.initialize().unwrap();
    assert_eq!(reached, HardwareState::PtpReady);

    let snapshot = session.query_state();
    assert!(snapshot.state >= HardwareState::Bound);
    assert_eq!(snapshot.vendor_id, 0x8086);
    assert_eq!(snapshot.device_id, 0x1533);
}

#[test]
fn test_query_state_never_regresses() {
    init();
    let (registry, _nics) = create_test_registry(&[(INTEL_VENDOR_ID, 0x125B)]);
    let session = registry.select(WILDCARD_ID, WILDCARD_ID).unwrap();
    let mut previous = session.query_state().state;
    for call in 0..100 {
        if call == 10 {
            session.initialize().unwrap();
        }
        if call % 7 == 0 {
            let _ = session.get_systime();
        }
        let now = session.query_state().state;
        assert!(now >= previous, "call {call}: {previous} -> {now}");
        previous = now;
    }
    assert_eq!(previous, HardwareState::PtpReady);
}

#[test]
fn test_enumeration_is_repeatable() {
    init();
    let devices = [
        (INTEL_VENDOR_ID, 0x1533),
        (INTEL_VENDOR_ID, 0x153A),
        (INTEL_VENDOR_ID, 0x15B7),
        (INTEL_VENDOR_ID, 0x125B),
    ];
    let (registry, _nics) = create_test_registry(&devices);
    for _ in 0..5 {
        let count = registry.enumerate(0).unwrap().count;
        assert_eq!(count, 4);
        for (i, &(vendor, device)) in (0u32..).zip(&devices) {
            let d = registry.enumerate(i).unwrap().descriptor;
            assert_eq!((d.vendor_id, d.device_id), (vendor, device));
        }
    }
}
