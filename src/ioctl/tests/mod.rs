
use std::sync::Arc;

use super::ControlHandle;
use crate::registry::INTEL_VENDOR_ID;
use crate::testing::{SimulatedNic, create_test_registry};

/// I210 at ordinal 0, I225 at ordinal 1
pub(super) fn two_adapter_handle() -> (ControlHandle, Vec<SimulatedNic>) {
    let (registry, nics) = create_test_registry(&[(INTEL_VENDOR_ID, 0x1533), (INTEL_VENDOR_ID, 0x15F2)]);
    (ControlHandle::new(Arc::new(registry)), nics)
}
