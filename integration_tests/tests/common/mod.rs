//! Common test utilities and fixtures
#![allow(dead_code)]

use std::sync::{Arc, Once};
use std::time::Duration;

use intel_avb::testing::{SimulatedNic, create_test_registry};
use intel_avb::{AdapterRegistry, DriverConfig, INTEL_VENDOR_ID};
use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

/// Initialize test logging (call once per test module)
pub fn init_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::from_default_env().add_directive("intel_avb=debug".parse().unwrap());

        let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
    });
}

/// Create a test configuration with short waits
pub fn test_config() -> DriverConfig {
    DriverConfig {
        ptp_settle_interval: Duration::from_millis(2),
        aux_wait_timeout: Duration::from_millis(50),
        ..Default::default()
    }
}

/// One adapter of each family on the bench rack
pub const LAB_RACK: [(u16, u16); 5] = [
    (INTEL_VENDOR_ID, 0x1533),
    (INTEL_VENDOR_ID, 0x15B7),
    (INTEL_VENDOR_ID, 0x15F2),
    (INTEL_VENDOR_ID, 0x125B),
    (INTEL_VENDOR_ID, 0x1521),
];

/// Shared registry over `LAB_RACK`
pub fn lab_registry() -> (Arc<AdapterRegistry>, Vec<SimulatedNic>) {
    let (registry, nics) = create_test_registry(&LAB_RACK);
    (Arc::new(registry), nics)
}
