//! Control codes of the command catalog.

/// Device type shared by every code.
pub const DEVICE_TYPE: u32 = 0x17;

/// `CTL_CODE(DEVICE_TYPE, function, METHOD_BUFFERED, FILE_ANY_ACCESS)`
#[must_use]
pub const fn ctl_code(function: u32) -> u32 {
    (DEVICE_TYPE << 16) | (function << 2)
}

/// One entry of the command catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Advance the selected adapter's lifecycle
    InitDevice,
    /// Description string of the selected adapter
    GetDeviceInfo,
    /// Live register read
    ReadRegister,
    /// Live register write
    WriteRegister,
    /// Read SYSTIM
    GetTimestamp,
    /// Write SYSTIM
    SetTimestamp,
    /// Program the gate schedule
    SetupTas,
    /// Program frame preemption
    SetupFp,
    /// Program PCIe PTM
    SetupPtm,
    /// PHY register read
    MdioRead,
    /// PHY register write
    MdioWrite,
    /// Enumerate adapters by ordinal
    EnumAdapters,
    /// Select an adapter for this handle
    OpenAdapter,
    /// Program one credit-based shaper
    SetupQav,
    /// Lifecycle snapshot
    GetHwState,
    /// Frequency or raw increment change
    AdjustFrequency,
    /// Interface version
    GetVersion,
    /// Clock register snapshot
    GetClockConfig,
    /// Toggle hardware timestamping
    SetHwTimestamping,
    /// RX timestamp buffer reservation
    SetRxTimestamp,
    /// Per-queue RX timestamping
    SetQueueTimestamp,
    /// Arm a target time
    SetTargetTime,
    /// Read an aux capture
    GetAuxTimestamp,
    /// Step SYSTIM by a signed offset
    PhcOffsetAdjust,
}

impl Command {
    /// Every command, in function-number order
    pub const ALL: [Self; 24] = [
        Self::InitDevice,
        Self::GetDeviceInfo,
        Self::ReadRegister,
        Self::WriteRegister,
        Self::GetTimestamp,
        Self::SetTimestamp,
        Self::SetupTas,
        Self::SetupFp,
        Self::SetupPtm,
        Self::MdioRead,
        Self::MdioWrite,
        Self::EnumAdapters,
        Self::OpenAdapter,
        Self::SetupQav,
        Self::GetHwState,
        Self::AdjustFrequency,
        Self::GetVersion,
        Self::GetClockConfig,
        Self::SetHwTimestamping,
        Self::SetRxTimestamp,
        Self::SetQueueTimestamp,
        Self::SetTargetTime,
        Self::GetAuxTimestamp,
        Self::PhcOffsetAdjust,
    ];

    /// Function number inside the control code
    #[must_use]
    pub const fn function(self) -> u32 {
        match self {
            Self::InitDevice => 20,
            Self::GetDeviceInfo => 21,
            Self::ReadRegister => 22,
            Self::WriteRegister => 23,
            Self::GetTimestamp => 24,
            Self::SetTimestamp => 25,
            Self::SetupTas => 26,
            Self::SetupFp => 27,
            Self::SetupPtm => 28,
            Self::MdioRead => 29,
            Self::MdioWrite => 30,
            Self::EnumAdapters => 31,
            Self::OpenAdapter => 32,
            Self::SetupQav => 35,
            Self::GetHwState => 36,
            Self::AdjustFrequency => 37,
            Self::GetVersion => 38,
            Self::GetClockConfig => 39,
            Self::SetHwTimestamping => 40,
            Self::SetRxTimestamp => 41,
            Self::SetQueueTimestamp => 42,
            Self::SetTargetTime => 43,
            Self::GetAuxTimestamp => 44,
            Self::PhcOffsetAdjust => 46,
        }
    }

    /// Full control code
    #[must_use]
    pub const fn code(self) -> u32 {
        ctl_code(self.function())
    }

    /// Look a control code up in the catalog
    #[must_use]
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }
}
