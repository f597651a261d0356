use std::sync::Arc;

use proptest::prelude::*;

use super::{ready, stalled};
use crate::error::AvbError;
use crate::hal::regs::{
    BASET_H, BASET_L, QBVCYCLET, TQAVCTRL, TQAVCTRL_FUTSCDDIS, TQAVCTRL_TRANSMIT_MODE_TSN,
    TXQCTL_QUEUE_MODE_LAUNCHT, endqt, stqt, txqctl,
};
use crate::registry::DeviceFamily;
use crate::tsn::{next_cycle_boundary, validate_schedule};
use crate::types::{GATE_LIST_LEN, TasScheduleConfig};

const CYCLE_NS: u64 = 1_000_000;
const EIGHT_WAY: [u32; GATE_LIST_LEN] = [125_000; GATE_LIST_LEN];
const STATES: [u8; GATE_LIST_LEN] = [0x01, 0x02, 0x04, 0x08, 0x0F, 0x03, 0x0C, 0x00];

fn schedule_at(base: u64) -> TasScheduleConfig {
    TasScheduleConfig::starting_after(base, 0, CYCLE_NS, STATES, EIGHT_WAY)
}

// ===== Validation =====

#[test]
fn test_full_gate_list_is_valid() {
    assert!(validate_schedule(&schedule_at(0)).is_ok());
}

#[test]
fn test_zero_duration_terminates_list() {
    let durations = [500_000, 500_000, 0, 77, 0, 0, 0, 0];
    let config = TasScheduleConfig::starting_after(0, 0, CYCLE_NS, STATES, durations);
    assert_eq!(config.entries().count(), 2);
    assert!(validate_schedule(&config).is_ok());
}

#[test]
fn test_invalid_schedules() {
    let mut zero_cycle = schedule_at(0);
    zero_cycle.cycle_time_ns = 0;

    let mut short = schedule_at(0);
    short.gate_durations[7] = 100_000;

    let empty = TasScheduleConfig::starting_after(0, 0, CYCLE_NS, STATES, [0; GATE_LIST_LEN]);

    let mut bad_base = schedule_at(0);
    bad_base.base_time_ns = 1_000_000_000;

    let mut bad_cycle_ns = schedule_at(0);
    bad_cycle_ns.cycle_time_ns = 1_000_000_000;

    for config in [zero_cycle, short, empty, bad_base, bad_cycle_ns] {
        assert!(
            matches!(validate_schedule(&config), Err(AvbError::InvalidParameter { .. })),
            "{config:?} accepted"
        );
    }
}

// ===== Base time =====

#[test]
fn test_future_base_is_kept() {
    assert_eq!(next_cycle_boundary(5_000, 1_000, 4_000, 0).unwrap(), (5_000, false));
    assert_eq!(next_cycle_boundary(4_000, 1_000, 4_000, 0).unwrap(), (4_000, false));
}

#[test]
fn test_past_base_rolls_to_boundary() {
    assert_eq!(next_cycle_boundary(1_000, 1_000, 4_500, 0).unwrap(), (5_000, true));
    assert_eq!(next_cycle_boundary(1_000, 1_000, 4_500, 600).unwrap(), (6_000, true));
}

proptest! {
    #[test]
    fn test_rolled_base_is_first_boundary_after_now(
        base in 0u64..1_000_000_000_000,
        cycle in 1u64..10_000_000,
        ahead in 1u64..1_000_000_000_000,
        lead in 0u64..1_000_000,
    ) {
        let now = base + ahead;
        let (effective, rolled) = next_cycle_boundary(base, cycle, now, lead).unwrap();
        prop_assert!(rolled);
        prop_assert_eq!((effective - base) % cycle, 0);
        prop_assert!(effective >= now + lead);
        prop_assert!(effective - cycle < now + lead);
    }
}

// ===== Adapter path =====

#[test]
fn test_configure_tas_programs_registers() {
    let fx = ready(DeviceFamily::I225);
    let now = fx.session.get_systime().unwrap();
    let config = TasScheduleConfig::starting_after(now, 5_000_000_000, CYCLE_NS, STATES, EIGHT_WAY);
    let activation = fx.session.configure_tas(&config).unwrap();

    assert!(!activation.rolled_forward);
    assert_eq!(activation.base_time_ns, config.base_time());
    assert_eq!(activation.cycle_time_ns, CYCLE_NS);
    assert_eq!(u64::from(fx.nic.register(QBVCYCLET)), CYCLE_NS);
    assert_eq!(u64::from(fx.nic.register(BASET_H)), config.base_time_s);
    assert_eq!(fx.nic.register(BASET_L), config.base_time_ns);

    let tqavctrl = fx.nic.register(TQAVCTRL);
    assert_ne!(tqavctrl & TQAVCTRL_TRANSMIT_MODE_TSN, 0);
    assert_ne!(tqavctrl & TQAVCTRL_FUTSCDDIS, 0);
    assert_eq!(fx.nic.register(txqctl(3)) & TXQCTL_QUEUE_MODE_LAUNCHT, TXQCTL_QUEUE_MODE_LAUNCHT);
    assert_eq!(fx.session.tas_schedule(), Some((config, activation)));
    assert!(fx.session.tas_enabled());
}

#[test]
fn test_queue_windows_follow_gate_list() {
    let fx = ready(DeviceFamily::I226);
    let now = fx.session.get_systime().unwrap();
    let states = [0x01, 0x02, 0x04, 0x08, 0, 0, 0, 0];
    let durations = [100_000, 200_000, 300_000, 400_000, 0, 0, 0, 0];
    let config = TasScheduleConfig::starting_after(now, 1_000_000_000, CYCLE_NS, states, durations);
    fx.session.configure_tas(&config).unwrap();

    let expected = [(0, 100_000), (100_000, 300_000), (300_000, 600_000), (600_000, 1_000_000)];
    for (q, (start, end)) in (0..4).zip(expected) {
        assert_eq!(fx.nic.register(stqt(q)), start, "queue {q} start");
        assert_eq!(fx.nic.register(endqt(q)), end, "queue {q} end");
    }
}

#[test]
fn test_past_base_time_is_rolled_forward() {
    let fx = ready(DeviceFamily::I225);
    let activation = fx.session.configure_tas(&schedule_at(0)).unwrap();
    let now = fx.session.get_systime().unwrap();
    assert!(activation.rolled_forward);
    assert_eq!(activation.base_time_ns % CYCLE_NS, 0);
    assert!(activation.base_time_ns <= now + CYCLE_NS);
}

#[test]
fn test_enable_without_schedule_is_rejected() {
    let fx = ready(DeviceFamily::I225);
    assert!(matches!(
        fx.session.set_tas_enabled(true),
        Err(AvbError::Rejected { .. })
    ));
    fx.session.set_tas_enabled(false).unwrap();
}

#[test]
fn test_disable_keeps_schedule_for_reenable() {
    let fx = ready(DeviceFamily::I225);
    fx.session.configure_tas(&schedule_at(0)).unwrap();
    fx.session.set_tas_enabled(false).unwrap();
    assert!(!fx.session.tas_enabled());
    assert_eq!(fx.nic.register(TQAVCTRL) & TQAVCTRL_TRANSMIT_MODE_TSN, 0);
    assert!(fx.session.tas_schedule().is_some());

    fx.session.set_tas_enabled(true).unwrap();
    assert!(fx.session.tas_enabled());
    assert_ne!(fx.nic.register(TQAVCTRL) & TQAVCTRL_TRANSMIT_MODE_TSN, 0);
}

#[test]
fn test_tas_needs_capability() {
    let fx = ready(DeviceFamily::I210);
    assert!(matches!(
        fx.session.configure_tas(&schedule_at(0)),
        Err(AvbError::NotSupported { .. })
    ));
}

#[test]
fn test_tas_without_running_clock_is_not_ready() {
    let fx = stalled(DeviceFamily::I225);
    assert!(matches!(
        fx.session.configure_tas(&schedule_at(0)),
        Err(AvbError::NotReady { .. })
    ));
    assert!(fx.session.tas_schedule().is_none());
}

#[test]
fn test_reset_clears_schedule() {
    let fx = ready(DeviceFamily::I225);
    fx.session.configure_tas(&schedule_at(0)).unwrap();
    fx.session.reset().unwrap();
    assert!(fx.session.tas_schedule().is_none());
    assert!(matches!(
        fx.session.set_tas_enabled(true),
        Err(AvbError::Rejected { .. })
    ));
}

#[test]
fn test_failed_replace_leaves_gates_closed() {
    let fx = ready(DeviceFamily::I225);
    let first = fx.session.configure_tas(&schedule_at(0)).unwrap();
    assert!(fx.session.tas_enabled());

    fx.nic.inject_fault(stqt(2));
    let durations = [1_000_000, 1_000_000, 0, 0, 0, 0, 0, 0];
    let replacement = TasScheduleConfig::starting_after(0, 0, 2 * CYCLE_NS, STATES, durations);
    let err = fx.session.configure_tas(&replacement).unwrap_err();
    assert!(matches!(err, AvbError::HardwareFault { offset, .. } if offset == stqt(2)));

    assert!(!fx.session.tas_enabled());
    assert_eq!(fx.nic.register(TQAVCTRL) & TQAVCTRL_FUTSCDDIS, 0);
    assert_eq!(fx.nic.register(TQAVCTRL) & TQAVCTRL_TRANSMIT_MODE_TSN, 0);
    let (stored, activation) = fx.session.tas_schedule().unwrap();
    assert_eq!(stored, schedule_at(0));
    assert_eq!(activation.cycle_time_ns, first.cycle_time_ns);

    fx.nic.clear_faults();
    fx.session.set_tas_enabled(true).unwrap();
    assert_eq!(u64::from(fx.nic.register(QBVCYCLET)), CYCLE_NS);
    assert_ne!(fx.nic.register(TQAVCTRL) & TQAVCTRL_FUTSCDDIS, 0);
}

#[test]
fn test_concurrent_replace_is_never_mixed() {
    let fx = ready(DeviceFamily::I225);
    let session = Arc::new(fx.session.clone());
    let cycles = [CYCLE_NS, 2 * CYCLE_NS];
    let handles: Vec<_> = cycles
        .into_iter()
        .map(|cycle| {
            let session = Arc::clone(&session);
            std::thread::spawn(move || {
                let durations = [u32::try_from(cycle / 2).unwrap(); 2];
                let mut full = [0; GATE_LIST_LEN];
                full[..2].copy_from_slice(&durations);
                for _ in 0..50 {
                    let config = TasScheduleConfig::starting_after(0, 0, cycle, STATES, full);
                    session.configure_tas(&config).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let (config, activation) = fx.session.tas_schedule().unwrap();
    assert_eq!(u64::from(fx.nic.register(QBVCYCLET)), config.cycle_time());
    assert_eq!(u64::from(fx.nic.register(endqt(0))), config.cycle_time() / 2);
    assert_eq!(activation.cycle_time_ns, config.cycle_time());
}
