//! Simulated hardware and registry helpers for tests and benches

pub mod sim;

use std::time::Duration;

pub use sim::{SimulatedNic, SimulatedNicBuilder};

use crate::error::Result;
use crate::registry::{AdapterRegistry, AdapterSession, DeviceFamily, INTEL_VENDOR_ID, ProbedDevice};
use crate::types::DriverConfig;

/// A device ID the family is recognized by.
#[must_use]
pub fn device_id_for(family: DeviceFamily) -> u16 {
    match family {
        DeviceFamily::I210 => 0x1533,
        DeviceFamily::I217 => 0x153A,
        DeviceFamily::I219 => 0x15B7,
        DeviceFamily::I225 => 0x15F2,
        DeviceFamily::I226 => 0x125B,
        DeviceFamily::I350 => 0x1521,
        DeviceFamily::I82576 => 0x10C9,
    }
}

/// Config with a short bring-up settle so tests stay fast.
#[must_use]
pub fn test_config() -> DriverConfig {
    DriverConfig::builder()
        .ptp_settle_interval(Duration::from_millis(2))
        .aux_poll_interval(Duration::from_millis(1))
        .aux_wait_timeout(Duration::from_millis(20))
        .build()
}

/// Build a registry over simulated functions.
///
/// Every `(vendor, device)` pair gets a model, including pairs the registry
/// skips, so the returned handles line up with `devices`.
#[must_use]
pub fn create_test_registry(devices: &[(u16, u16)]) -> (AdapterRegistry, Vec<SimulatedNic>) {
    let nics: Vec<SimulatedNic> = devices
        .iter()
        .map(|&(vendor_id, device_id)| {
            SimulatedNic::new(DeviceFamily::identify(vendor_id, device_id).unwrap_or(DeviceFamily::I210))
        })
        .collect();
    let registry = AdapterRegistry::with_devices(
        test_config(),
        devices
            .iter()
            .zip(&nics)
            .map(|(&(vendor_id, device_id), nic)| ProbedDevice::new(vendor_id, device_id, nic.clone())),
    );
    (registry, nics)
}

/// Single-adapter registry for `nic`, with a session already selected.
///
/// The registry is returned too so tests can keep enumerating it.
pub fn create_test_adapter(
    family: DeviceFamily,
    nic: &SimulatedNic,
) -> Result<(AdapterRegistry, AdapterSession)> {
    let device_id = device_id_for(family);
    let registry = AdapterRegistry::with_devices(
        test_config(),
        [ProbedDevice::new(INTEL_VENDOR_ID, device_id, nic.clone())],
    );
    let session = registry.select_ordinal(0)?;
    Ok((registry, session))
}
