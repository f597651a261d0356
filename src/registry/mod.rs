//! Adapter registry and selection.
//!
//! The registry classifies probed PCI functions into known Intel families
//! and keeps them in enumeration order. Selecting an adapter yields an
//! [`AdapterSession`]; the PTP and shaping engines are methods on the
//! session rather than on a process-wide "current adapter".

pub(crate) mod adapter;
mod device;
mod enumerate;
mod session;

#[cfg(test)]
mod tests;

pub use device::{
    AdapterDescriptor, Capabilities, ClockRate, DeviceFamily, DeviceProfile, INTEL_VENDOR_ID,
    WILDCARD_ID,
};
pub use enumerate::{AdapterRegistry, Enumerated, ProbedDevice};
pub use session::AdapterSession;
