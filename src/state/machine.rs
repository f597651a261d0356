use std::fmt;

use crate::error::{AvbError, Result};
use crate::registry::Capabilities;

/// Per-adapter hardware lifecycle.
///
/// Ordered: every state authorizes everything the states below it do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u32)]
pub enum HardwareState {
    /// No driver binding.
    #[default]
    Unbound = 0,
    /// Bound to a supported chip; identity known.
    Bound = 1,
    /// Register window mapped and echo-tested.
    BarMapped = 2,
    /// Clock verified running and timestamp capture enabled.
    PtpReady = 3,
}

impl HardwareState {
    /// Wire value of the state.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self as u32
    }

    /// Decode a wire value.
    #[must_use]
    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Unbound),
            1 => Some(Self::Bound),
            2 => Some(Self::BarMapped),
            3 => Some(Self::PtpReady),
            _ => None,
        }
    }

    /// Upper-case name used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unbound => "UNBOUND",
            Self::Bound => "BOUND",
            Self::BarMapped => "BAR_MAPPED",
            Self::PtpReady => "PTP_READY",
        }
    }
}

impl fmt::Display for HardwareState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Events that move an adapter between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// Driver attached to a supported chip.
    Attach,
    /// BAR0 mapped and the echo test passed.
    MapBar,
    /// Clock proven running with capture enabled.
    EnablePtp,
    /// Full re-initialization. The only backward edge.
    Reset,
}

/// The complete transition table. Anything absent is illegal.
const TRANSITIONS: &[(HardwareState, Transition, HardwareState)] = &[
    (HardwareState::Unbound, Transition::Attach, HardwareState::Bound),
    (HardwareState::Bound, Transition::MapBar, HardwareState::BarMapped),
    (HardwareState::BarMapped, Transition::EnablePtp, HardwareState::PtpReady),
    (HardwareState::Unbound, Transition::Reset, HardwareState::Unbound),
    (HardwareState::Bound, Transition::Reset, HardwareState::Unbound),
    (HardwareState::BarMapped, Transition::Reset, HardwareState::Unbound),
    (HardwareState::PtpReady, Transition::Reset, HardwareState::Unbound),
];

/// Look up the target of `transition` from `from`.
#[must_use]
pub fn next_state(from: HardwareState, transition: Transition) -> Option<HardwareState> {
    TRANSITIONS
        .iter()
        .find(|(src, t, _)| *src == from && *t == transition)
        .map(|(_, _, dst)| *dst)
}

/// Monotonic lifecycle gate for one adapter.
#[derive(Debug, Clone, Default)]
pub struct StateMachine {
    current: HardwareState,
}

impl StateMachine {
    /// Create a machine in `UNBOUND`
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    #[must_use]
    pub fn current(&self) -> HardwareState {
        self.current
    }

    /// Apply a transition from the table
    pub fn apply(&mut self, transition: Transition) -> Result<HardwareState> {
        let next = next_state(self.current, transition).ok_or_else(|| {
            AvbError::rejected(format!(
                "illegal transition {transition:?} from {}",
                self.current
            ))
        })?;
        if next != self.current {
            tracing::info!(from = %self.current, to = %next, ?transition, "Hardware state transition");
        }
        self.current = next;
        Ok(next)
    }

    /// Fail with `NotReady` unless the state is at least `required`
    pub fn require(&self, required: HardwareState) -> Result<()> {
        if self.current >= required {
            Ok(())
        } else {
            Err(AvbError::NotReady {
                required,
                current: self.current,
            })
        }
    }

    /// Whether the state is at least `state`
    #[must_use]
    pub fn at_least(&self, state: HardwareState) -> bool {
        self.current >= state
    }
}

/// Consistent view returned by `query_state`.
///
/// Identity fields are zero below `BOUND`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HwStateSnapshot {
    /// Lifecycle state
    pub state: HardwareState,
    /// PCI vendor ID
    pub vendor_id: u16,
    /// PCI device ID
    pub device_id: u16,
    /// Capability bits of the bound family
    pub capabilities: Capabilities,
}
