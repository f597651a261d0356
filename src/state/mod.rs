//! Hardware lifecycle state machine

pub(crate) mod bringup;
mod machine;

pub use machine::{HardwareState, HwStateSnapshot, StateMachine, Transition, next_state};
