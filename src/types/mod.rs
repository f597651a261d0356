//! Data model shared by the clock and shaping engines

mod clock;
mod config;
mod shaping;

#[cfg(test)]
mod tests;

pub use clock::{
    AuxTimestamp, ClockConfig, Increment, IncrementChange, QueueTimestampChange,
    RxTimestampChange, TargetTimeSlot, TimestampingControl,
};
pub use config::{DriverConfig, DriverConfigBuilder};
pub use shaping::{
    CbsShaperConfig, FramePreemptionConfig, GATE_LIST_LEN, PtmConfig, TasActivation,
    TasScheduleConfig,
};
