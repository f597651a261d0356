use crate::hal::regs::{
    TIMINCA_FRAC_MASK, TIMINCA_NS_SHIFT, TSAUXC_DISABLE_SYSTIM0, TSAUXC_EN_TS_ALL,
    TSAUXC_EN_TT_ALL,
};

/// Snapshot of the hardware clock registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockConfig {
    /// Free-running counter, nanoseconds
    pub systim: u64,
    /// Whole nanoseconds added per clock cycle
    pub increment_ns: u32,
    /// Sub-nanosecond increment, scaled by 2^32
    pub increment_frac: u32,
    /// Raw TIMINCA word
    pub timinca: u32,
    /// Raw TSAUXC word
    pub tsauxc: u32,
    /// Clock frequency, MHz
    pub clock_rate_mhz: u32,
}

/// Decoded TIMINCA word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Increment {
    /// Whole nanoseconds (bits 31:24)
    pub ns: u32,
    /// 24-bit fraction (bits 23:0)
    pub frac: u32,
}

impl Increment {
    /// Build from fields; callers validate ranges
    #[must_use]
    pub const fn new(ns: u32, frac: u32) -> Self {
        Self { ns, frac }
    }

    /// Decode a TIMINCA word
    #[must_use]
    pub const fn from_timinca(word: u32) -> Self {
        Self {
            ns: word >> TIMINCA_NS_SHIFT,
            frac: word & TIMINCA_FRAC_MASK,
        }
    }

    /// Encode as a TIMINCA word
    #[must_use]
    pub const fn to_timinca(self) -> u32 {
        ((self.ns & 0xFF) << TIMINCA_NS_SHIFT) | (self.frac & TIMINCA_FRAC_MASK)
    }

    /// Fraction rescaled from 2^24 to 2^32
    #[must_use]
    pub const fn frac_2_32(self) -> u32 {
        (self.frac & TIMINCA_FRAC_MASK) << 8
    }

    /// Whether the increment would stop the clock
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.to_timinca() == 0
    }
}

/// Before/after TIMINCA words of a frequency change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncrementChange {
    /// TIMINCA before the change
    pub previous: u32,
    /// TIMINCA after the change
    pub current: u32,
}

/// Result of toggling hardware timestamping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampingControl {
    /// TSAUXC before the call
    pub previous: u32,
    /// TSAUXC read back after the call
    pub current: u32,
    /// Whether this family stops SYSTIM while disabled
    pub freezes_on_disable: bool,
}

impl TimestampingControl {
    /// SYSTIM0 is enabled in the current word
    #[must_use]
    pub fn clock_enabled(&self) -> bool {
        self.current & TSAUXC_DISABLE_SYSTIM0 == 0
    }

    /// The counter is expected to be stopped
    #[must_use]
    pub fn clock_frozen(&self) -> bool {
        !self.clock_enabled() && self.freezes_on_disable
    }

    /// Any target time is armed
    #[must_use]
    pub fn target_time_enabled(&self) -> bool {
        self.current & TSAUXC_EN_TT_ALL != 0
    }

    /// Any aux capture is armed
    #[must_use]
    pub fn aux_capture_enabled(&self) -> bool {
        self.current & TSAUXC_EN_TS_ALL != 0
    }
}

/// One target-time slot as programmed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetTimeSlot {
    /// Slot index, 0 or 1
    pub timer_index: u32,
    /// Armed target, nanoseconds
    pub target_time_ns: u64,
    /// Target interrupt enabled in TSIM
    pub interrupt_enabled: bool,
    /// SDP output driven by this slot
    pub sdp_output_enabled: bool,
    /// Target that was armed before this write
    pub previous_target_ns: u64,
}

/// Captured auxiliary timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuxTimestamp {
    /// Slot index, 0 or 1
    pub timer_index: u32,
    /// Captured SYSTIM, nanoseconds
    pub timestamp_ns: u64,
    /// An SDP event was captured since the last clear
    pub valid: bool,
}

/// Result of an RX timestamp buffer change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RxTimestampChange {
    /// RXPBSIZE before
    pub previous: u32,
    /// RXPBSIZE after
    pub current: u32,
    /// A port software reset is needed for the change to take effect
    pub requires_reset: bool,
}

/// Result of a per-queue timestamp change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueTimestampChange {
    /// Queue index
    pub queue_index: u32,
    /// SRRCTL before
    pub previous: u32,
    /// SRRCTL after
    pub current: u32,
}
