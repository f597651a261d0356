//! Control-request interface.
//!
//! A fixed catalog of control codes, each exchanging one fixed-size
//! little-endian structure in place. [`ControlHandle`] is the per-handle
//! dispatcher: it owns its adapter selection and maps every engine error
//! to the response `status` word.
//!
//! ```no_run
//! use std::sync::Arc;
//! use intel_avb::ioctl::{Command, ControlHandle, TimestampWire};
//! # fn demo(registry: Arc<intel_avb::AdapterRegistry>) -> intel_avb::Result<()> {
//! let mut handle = ControlHandle::new(registry);
//! let ts = handle.request(Command::GetTimestamp, &TimestampWire::default())?;
//! println!("SYSTIM = {} ns (status {:#x})", ts.timestamp, ts.status);
//! # Ok(())
//! # }
//! ```

mod codes;
mod dispatcher;
pub mod wire;

#[cfg(test)]
mod tests;

pub use codes::{Command, DEVICE_TYPE, ctl_code};
pub use dispatcher::{ControlHandle, INTERFACE_VERSION};
pub use wire::{
    AuxTimestampWire, ClockConfigWire, DEVICE_INFO_CAPACITY, DeviceInfoWire, EnumWire,
    FREQUENCY_USE_PPB, FpWire, FrequencyWire, HwStateWire, HwTimestampingWire, MdioWire, OpenWire,
    PhcOffsetWire, PtmWire, QavWire, QueueTimestampWire, RegisterWire, RxTimestampWire,
    TargetTimeWire, TasWire, TimestampWire, VersionWire, WireStruct,
};
