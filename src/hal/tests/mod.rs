use std::collections::HashMap;

use proptest::prelude::*;

use super::mdio;
use super::regs::{MDIC, MDIC_ERROR};
use super::{MmioWindow, RegisterIo, merge, read_u64, split_u64};
use crate::error::AvbError;
use crate::registry::DeviceFamily;
use crate::testing::SimulatedNic;

/// Plain register file; MDIC never completes unless preloaded.
#[derive(Default)]
struct RegFile {
    regs: HashMap<u32, u32>,
    writes: Vec<(u32, u32)>,
    sticky_mdic: Option<u32>,
}

impl RegisterIo for RegFile {
    fn read(&mut self, offset: u32) -> crate::Result<u32> {
        if offset == MDIC {
            if let Some(v) = self.sticky_mdic {
                return Ok(v);
            }
        }
        Ok(self.regs.get(&offset).copied().unwrap_or(0))
    }

    fn write(&mut self, offset: u32, value: u32) -> crate::Result<()> {
        self.writes.push((offset, value));
        self.regs.insert(offset, value);
        Ok(())
    }
}

// ===== Register helpers =====

#[test]
fn test_merge_keeps_unmasked_bits() {
    assert_eq!(merge(0xFFFF_0000, 0x0000_FF00, 0x1234_5678), 0xFFFF_5600);
    assert_eq!(merge(0xAAAA_AAAA, 0, 0xFFFF_FFFF), 0xAAAA_AAAA);
    assert_eq!(merge(0, u32::MAX, 0x5555_5555), 0x5555_5555);
}

#[test]
fn test_modify_is_read_then_write() {
    let mut io = RegFile::default();
    io.regs.insert(0x100, 0x0000_00F0);
    let written = io.modify(0x100, 0x0F, 0x05).unwrap();
    assert_eq!(written, 0xF5);
    assert_eq!(io.writes, vec![(0x100, 0xF5)]);
}

#[test]
fn test_split_and_read_u64() {
    let (lo, hi) = split_u64(0x0123_4567_89AB_CDEF);
    assert_eq!((lo, hi), (0x89AB_CDEF, 0x0123_4567));
    let mut io = RegFile::default();
    io.regs.insert(0x10, lo);
    io.regs.insert(0x14, hi);
    assert_eq!(read_u64(&mut io, 0x10, 0x14).unwrap(), 0x0123_4567_89AB_CDEF);
}

proptest! {
    #[test]
    fn test_merge_only_changes_masked_bits(
        current in any::<u32>(),
        mask in any::<u32>(),
        value in any::<u32>(),
    ) {
        let merged = merge(current, mask, value);
        prop_assert_eq!(merged & !mask, current & !mask);
        prop_assert_eq!(merged & mask, value & mask);
    }
}

// ===== MMIO window =====

#[test]
fn test_mmio_read_write() {
    let mut backing = vec![0u32; 16];
    let mut window = unsafe { MmioWindow::new(backing.as_mut_ptr().cast(), 64) }.unwrap();
    assert_eq!(window.len(), 64);
    window.write(0x08, 0xCAFE_F00D).unwrap();
    assert_eq!(window.read(0x08).unwrap(), 0xCAFE_F00D);
    assert_eq!(window.read(0x3C).unwrap(), 0);
    drop(window);
    assert_eq!(u32::from_le(backing[2]), 0xCAFE_F00D);
}

#[test]
fn test_mmio_rejects_out_of_window() {
    let mut backing = vec![0u32; 4];
    let mut window = unsafe { MmioWindow::new(backing.as_mut_ptr().cast(), 16) }.unwrap();
    assert!(matches!(window.read(0x10), Err(AvbError::HardwareFault { offset: 0x10, .. })));
    assert!(matches!(window.write(0x02, 1), Err(AvbError::HardwareFault { .. })));
    assert!(matches!(window.read(u32::MAX), Err(AvbError::HardwareFault { .. })));
}

#[test]
fn test_mmio_null_base() {
    let err = unsafe { MmioWindow::new(std::ptr::null_mut(), 4096) }.unwrap_err();
    assert!(matches!(err, AvbError::HardwareFault { .. }));
}

// ===== MDIO =====

#[test]
fn test_mdio_round_trip_through_sim() {
    let mut nic = SimulatedNic::new(DeviceFamily::I350);
    mdio::write(&mut nic, 0, 4, 0x01E1, 16).unwrap();
    assert_eq!(nic.phy_register(0, 4), 0x01E1);
    assert_eq!(mdio::read(&mut nic, 0, 4, 16).unwrap(), 0x01E1);
}

#[test]
fn test_mdio_selects_page() {
    let mut nic = SimulatedNic::new(DeviceFamily::I219);
    nic.set_phy_register(769, 17, 0xBEEF);
    assert_eq!(mdio::read(&mut nic, 769, 17, 16).unwrap(), 0xBEEF);
}

#[test]
fn test_mdio_returns_to_page_zero() {
    let mut nic = SimulatedNic::new(DeviceFamily::I219);
    nic.set_phy_register(0, 2, 0x0141);
    nic.set_phy_register(769, 2, 0xBEEF);
    assert_eq!(mdio::read(&mut nic, 769, 2, 16).unwrap(), 0xBEEF);
    assert_eq!(mdio::read(&mut nic, 0, 2, 16).unwrap(), 0x0141);

    mdio::write(&mut nic, 769, 2, 0x1234, 16).unwrap();
    mdio::write(&mut nic, 0, 2, 0x5678, 16).unwrap();
    assert_eq!(nic.phy_register(769, 2), 0x1234);
    assert_eq!(nic.phy_register(0, 2), 0x5678);
}

#[test]
fn test_mdio_register_out_of_range() {
    let mut nic = SimulatedNic::new(DeviceFamily::I350);
    let before = nic.access_count();
    let err = mdio::read(&mut nic, 0, 32, 16).unwrap_err();
    assert!(matches!(err, AvbError::InvalidParameter { .. }));
    assert_eq!(nic.access_count(), before);
}

#[test]
fn test_mdio_times_out() {
    let mut io = RegFile::default();
    let err = mdio::read(&mut io, 0, 1, 8).unwrap_err();
    assert!(matches!(err, AvbError::HardwareFault { offset: MDIC, .. }));
}

#[test]
fn test_mdio_error_bit() {
    let mut io = RegFile {
        sticky_mdic: Some(MDIC_ERROR),
        ..RegFile::default()
    };
    let err = mdio::write(&mut io, 0, 1, 0x1234, 8).unwrap_err();
    assert!(matches!(err, AvbError::HardwareFault { .. }));
}
