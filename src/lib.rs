//! # intel-avb
//!
//! Hardware abstraction core for the IEEE 1588 clock and TSN traffic
//! shapers of Intel Ethernet controllers (I210, I217, I219, I225, I226,
//! I350, 82576).
//!
//! ## Features
//!
//! - Adapter enumeration and per-caller selection
//! - Four-state hardware lifecycle with a checked transition table
//! - PTP clock: system time, frequency tuning, target times, aux captures
//! - 802.1Qbv gate schedules, 802.1Qav credit shapers, frame preemption, PTM
//! - Fixed-layout control-request interface
//!
//! ## Example
//!
//! ```rust,no_run
//! use intel_avb::prelude::*;
//!
//! # fn example(registry: AdapterRegistry) -> intel_avb::Result<()> {
//! let session = registry.select(INTEL_VENDOR_ID, 0x1533)?;
//! session.initialize()?;
//!
//! let now = session.get_systime()?;
//! session.adjust_frequency(-250)?;
//! session.set_target_time(0, now + 1_000_000_000, true, true)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Registry**: [`AdapterRegistry`] owns the adapters and hands out
//!   [`AdapterSession`]s
//! - **Engines**: clock ([`ptp`]) and shaping ([`tsn`]) operations on a session
//! - **Hardware**: [`hal::RegisterIo`], the only path to the silicon
//! - **Wire**: [`ioctl::ControlHandle`], the control-request dispatcher

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Public modules
/// Error types
pub mod error;
pub mod hal;
pub mod ioctl;
pub mod ptp;
pub mod registry;
pub mod state;
pub mod tsn;
pub mod types;

/// Testing utilities
pub mod testing;

// Re-exports
pub use error::{AvbError, Result};
pub use ioctl::ControlHandle;
pub use registry::{
    AdapterDescriptor, AdapterRegistry, AdapterSession, Capabilities, DeviceFamily, INTEL_VENDOR_ID,
    ProbedDevice, WILDCARD_ID,
};
pub use state::{HardwareState, HwStateSnapshot};
pub use types::{
    AuxTimestamp, CbsShaperConfig, ClockConfig, DriverConfig, FramePreemptionConfig, PtmConfig,
    TasScheduleConfig,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude for common imports
///
/// Convenient re-exports
pub mod prelude {
    pub use crate::{
        AdapterRegistry, AdapterSession, AvbError, CbsShaperConfig, DriverConfig, HardwareState,
        INTEL_VENDOR_ID, TasScheduleConfig, WILDCARD_ID,
    };
}
