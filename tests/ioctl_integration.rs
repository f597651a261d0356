//! Control-request interface driven with raw byte buffers.

use std::sync::Arc;

use byteorder::{ByteOrder, LittleEndian};
use intel_avb::ioctl::{Command, ControlHandle, EnumWire, HwStateWire, TimestampWire, WireStruct, ctl_code};
use intel_avb::testing::create_test_registry;
use intel_avb::{AvbError, HardwareState, INTEL_VENDOR_ID};

fn handle() -> ControlHandle {
    let (registry, _nics) = create_test_registry(&[(INTEL_VENDOR_ID, 0x1533), (INTEL_VENDOR_ID, 0x15F2)]);
    ControlHandle::new(Arc::new(registry))
}

// ===== Raw buffers =====

#[test]
fn test_codes_match_catalog() {
    assert_eq!(Command::InitDevice.code(), 0x0017_0050);
    assert_eq!(Command::GetHwState.code(), 0x0017_0090);
    assert_eq!(Command::PhcOffsetAdjust.code(), 0x0017_00B8);
    for command in Command::ALL {
        assert_eq!(Command::from_code(command.code()), Some(command));
    }
    assert_eq!(Command::from_code(ctl_code(45)), None);
}

#[test]
fn test_scenario_over_raw_buffers() {
    let mut handle = handle();

    let mut open = [0u8; 8];
    LittleEndian::write_u16(&mut open[0..], 0x8086);
    LittleEndian::write_u16(&mut open[2..], 0x1533);
    assert_eq!(handle.control(Command::OpenAdapter.code(), &mut open).unwrap(), 8);
    assert_eq!(LittleEndian::read_u32(&open[4..]), 0);

    handle.control(Command::InitDevice.code(), &mut []).unwrap();

    let mut state = [0u8; 16];
    handle.control(Command::GetHwState.code(), &mut state).unwrap();
    assert_eq!(LittleEndian::read_u32(&state[0..]), HardwareState::PtpReady.as_u32());
    assert_eq!(LittleEndian::read_u16(&state[4..]), 0x8086);
    assert_eq!(LittleEndian::read_u16(&state[6..]), 0x1533);
}

#[test]
fn test_oversized_buffer_accepted() {
    let mut handle = handle();
    let mut buf = [0u8; 64];
    let len = handle.control(Command::GetTimestamp.code(), &mut buf).unwrap();
    assert_eq!(len, TimestampWire::SIZE);
    assert_eq!(LittleEndian::read_u32(&buf[12..]), 0);
}

#[test]
fn test_undersized_buffer_rejected() {
    let mut handle = handle();
    let mut buf = [0u8; 4];
    assert!(matches!(
        handle.control(Command::GetTimestamp.code(), &mut buf),
        Err(AvbError::BufferTooSmall { needed: 16, have: 4 })
    ));
    let state = handle.request(Command::GetHwState, &HwStateWire::default()).unwrap();
    assert_eq!(state.hw_state, HardwareState::Unbound.as_u32());
}

#[test]
fn test_negative_ppb_over_wire() {
    let mut handle = handle();
    handle.control(Command::InitDevice.code(), &mut []).unwrap();
    let mut buf = [0u8; 28];
    LittleEndian::write_i32(&mut buf[8..], -500);
    LittleEndian::write_u32(&mut buf[12..], 1);
    handle.control(Command::AdjustFrequency.code(), &mut buf).unwrap();
    assert_eq!(LittleEndian::read_u32(&buf[24..]), 0);
    let previous = LittleEndian::read_u32(&buf[16..]);
    let current = LittleEndian::read_u32(&buf[20..]);
    assert_eq!(previous, 0x0800_0000);
    assert!(current < previous);
}

#[test]
fn test_enumerate_every_ordinal() {
    let mut handle = handle();
    let count = handle
        .request(Command::EnumAdapters, &EnumWire::default())
        .unwrap()
        .count;
    let ids: Vec<u16> = (0..count)
        .map(|index| {
            handle
                .request(Command::EnumAdapters, &EnumWire { index, ..EnumWire::default() })
                .unwrap()
                .device_id
        })
        .collect();
    assert_eq!(ids, vec![0x1533, 0x15F2]);
}
