/// Number of entries in a gate control list.
pub const GATE_LIST_LEN: usize = 8;

const NS_PER_SEC: u64 = 1_000_000_000;

/// Time-aware shaper schedule. Replaced as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TasScheduleConfig {
    /// Base time, seconds part
    pub base_time_s: u64,
    /// Base time, nanoseconds part (< 1e9)
    pub base_time_ns: u32,
    /// Cycle time, seconds part
    pub cycle_time_s: u32,
    /// Cycle time, nanoseconds part (< 1e9)
    pub cycle_time_ns: u32,
    /// Open-queue bitmask per entry
    pub gate_states: [u8; GATE_LIST_LEN],
    /// Entry durations, nanoseconds; a zero ends the list
    pub gate_durations: [u32; GATE_LIST_LEN],
}

impl TasScheduleConfig {
    /// Schedule whose base time is `offset_ns` after `systim`
    #[must_use]
    pub fn starting_after(
        systim: u64,
        offset_ns: u64,
        cycle_time_ns: u64,
        gate_states: [u8; GATE_LIST_LEN],
        gate_durations: [u32; GATE_LIST_LEN],
    ) -> Self {
        let base = systim.saturating_add(offset_ns);
        #[allow(clippy::cast_possible_truncation)]
        Self {
            base_time_s: base / NS_PER_SEC,
            base_time_ns: (base % NS_PER_SEC) as u32,
            cycle_time_s: u32::try_from(cycle_time_ns / NS_PER_SEC).unwrap_or(u32::MAX),
            cycle_time_ns: (cycle_time_ns % NS_PER_SEC) as u32,
            gate_states,
            gate_durations,
        }
    }

    /// Base time in nanoseconds, saturating
    #[must_use]
    pub fn base_time(&self) -> u64 {
        self.base_time_s
            .saturating_mul(NS_PER_SEC)
            .saturating_add(u64::from(self.base_time_ns))
    }

    /// Cycle time in nanoseconds
    #[must_use]
    pub fn cycle_time(&self) -> u64 {
        u64::from(self.cycle_time_s) * NS_PER_SEC + u64::from(self.cycle_time_ns)
    }

    /// Entries before the first zero duration
    pub fn entries(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.gate_states
            .iter()
            .copied()
            .zip(self.gate_durations.iter().copied())
            .take_while(|(_, duration)| *duration != 0)
    }
}

/// Schedule as accepted by the hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TasActivation {
    /// Effective base time, nanoseconds
    pub base_time_ns: u64,
    /// Cycle time, nanoseconds
    pub cycle_time_ns: u64,
    /// The requested base time was in the past and moved to a cycle boundary
    pub rolled_forward: bool,
}

/// Credit-based shaper parameters for one traffic class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CbsShaperConfig {
    /// Traffic class (0 = class A, 1 = class B)
    pub traffic_class: u8,
    /// Credit gain while waiting; zero disables shaping for the class
    pub idle_slope: i32,
    /// Credit drain while sending; never positive
    pub send_slope: i32,
    /// Credit ceiling; never negative
    pub hi_credit: i32,
    /// Credit floor; never positive
    pub lo_credit: i32,
}

impl CbsShaperConfig {
    /// Stream reservation class A
    pub const CLASS_A: u8 = 0;
    /// Stream reservation class B
    pub const CLASS_B: u8 = 1;

    /// Config that turns shaping off for `traffic_class`
    #[must_use]
    pub fn disabled(traffic_class: u8) -> Self {
        Self {
            traffic_class,
            ..Self::default()
        }
    }

    /// Whether the class is shaped
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.idle_slope != 0
    }
}

/// Frame preemption settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePreemptionConfig {
    /// Bitmask of preemptable transmit queues
    pub preemptable_queue_mask: u8,
    /// Minimum non-final fragment size, bytes (64, 128, 192 or 256)
    pub min_fragment_size: u32,
    /// Skip the 802.3br verification handshake
    pub verify_disable: bool,
}

/// PCIe precision time measurement settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PtmConfig {
    /// PTM requester enabled
    pub enabled: bool,
    /// Local clock granularity, nanoseconds (0 = unknown)
    pub clock_granularity: u32,
}
