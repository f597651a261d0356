use std::fmt;

/// PCI vendor ID for Intel.
pub const INTEL_VENDOR_ID: u16 = 0x8086;

/// Vendor/device ID that matches anything in `select`.
pub const WILDCARD_ID: u16 = 0xFFFF;

bitflags::bitflags! {
    /// Feature bits advertised by an adapter family
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u32 {
        /// Memory-mapped register window
        const MMIO = 0x0000_0001;
        /// PHY access through MDIO
        const MDIO = 0x0000_0002;
        /// IEEE 1588 hardware clock
        const BASIC_1588 = 0x0000_0004;
        /// Target time and auxiliary timestamps
        const ENHANCED_TS = 0x0000_0008;
        /// 802.1Qbv time-aware shaper
        const TSN_TAS = 0x0000_0010;
        /// 802.1Qbu frame preemption
        const TSN_FP = 0x0000_0020;
        /// PCIe precision time measurement
        const PCIE_PTM = 0x0000_0040;
        /// 2.5 Gb/s link
        const SPEED_2_5G = 0x0000_0080;
        /// Energy-efficient Ethernet
        const EEE = 0x0000_0100;
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self
            .iter_names()
            .map(|(name, _)| match name {
                "PCIE_PTM" => "PCIe_PTM",
                "SPEED_2_5G" => "2_5G",
                other => other,
            })
            .collect();
        write!(f, "Capabilities({:#x}: {})", self.bits(), names.join("|"))
    }
}

/// Nominal SYSTIM clock frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClockRate {
    /// 125 MHz
    Mhz125,
    /// 156.25 MHz
    Mhz156,
    /// 200 MHz
    Mhz200,
    /// 250 MHz
    Mhz250,
}

impl ClockRate {
    /// Frequency in MHz as reported on the wire
    #[must_use]
    pub const fn as_mhz(self) -> u32 {
        match self {
            Self::Mhz125 => 125,
            Self::Mhz156 => 156,
            Self::Mhz200 => 200,
            Self::Mhz250 => 250,
        }
    }
}

/// Silicon families the core knows how to drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceFamily {
    /// I210 gigabit controller
    I210,
    /// I217 gigabit PHY-based LOM
    I217,
    /// I219 gigabit PHY-based LOM
    I219,
    /// I225 2.5G controller
    I225,
    /// I226 2.5G controller
    I226,
    /// I350 server controller
    I350,
    /// 82576 server controller (no PTP clock)
    I82576,
}

/// Static description of one family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceProfile {
    /// Family
    pub family: DeviceFamily,
    /// Human-readable description returned by device info
    pub info: &'static str,
    /// Capability bits
    pub capabilities: Capabilities,
    /// TIMINCA value for a nominal-rate clock; zero when there is no clock
    pub nominal_timinca: u32,
    /// SYSTIM clock frequency
    pub clock_rate: ClockRate,
    /// Has per-queue credit-based shapers
    pub supports_cbs: bool,
    /// Setting the SYSTIM0 disable bit stops the counter
    pub freezes_on_disable: bool,
}

impl DeviceProfile {
    /// Whether the family carries every bit of `cap`
    #[must_use]
    pub const fn has(&self, cap: Capabilities) -> bool {
        self.capabilities.contains(cap)
    }
}

const PTP_BASIC: Capabilities = Capabilities::BASIC_1588.union(Capabilities::MMIO);
const PTP_ENHANCED: Capabilities = PTP_BASIC.union(Capabilities::ENHANCED_TS);
const TSN_FULL: Capabilities = PTP_ENHANCED
    .union(Capabilities::TSN_TAS)
    .union(Capabilities::TSN_FP)
    .union(Capabilities::PCIE_PTM)
    .union(Capabilities::SPEED_2_5G);

static PROFILES: [DeviceProfile; 7] = [
    DeviceProfile {
        family: DeviceFamily::I210,
        info: "Intel I210 Gigabit Ethernet - IEEE 1588 PTP",
        capabilities: PTP_ENHANCED,
        nominal_timinca: 0x0800_0000,
        clock_rate: ClockRate::Mhz125,
        supports_cbs: true,
        freezes_on_disable: true,
    },
    DeviceProfile {
        family: DeviceFamily::I217,
        info: "Intel I217 Gigabit Ethernet - Basic PTP",
        capabilities: PTP_BASIC,
        nominal_timinca: 0x0800_0001,
        clock_rate: ClockRate::Mhz125,
        supports_cbs: false,
        freezes_on_disable: false,
    },
    DeviceProfile {
        family: DeviceFamily::I219,
        info: "Intel I219 Gigabit Ethernet - Enhanced PTP",
        capabilities: PTP_ENHANCED.union(Capabilities::MDIO),
        nominal_timinca: 0x0800_0001,
        clock_rate: ClockRate::Mhz125,
        supports_cbs: false,
        freezes_on_disable: true,
    },
    DeviceProfile {
        family: DeviceFamily::I225,
        info: "Intel I225 2.5G Ethernet - Enhanced TSN",
        capabilities: TSN_FULL,
        nominal_timinca: 0x0500_0000,
        clock_rate: ClockRate::Mhz200,
        supports_cbs: true,
        freezes_on_disable: true,
    },
    DeviceProfile {
        family: DeviceFamily::I226,
        info: "Intel I226 2.5G Ethernet - Advanced TSN",
        capabilities: TSN_FULL.union(Capabilities::EEE),
        nominal_timinca: 0x0500_0000,
        clock_rate: ClockRate::Mhz200,
        supports_cbs: true,
        freezes_on_disable: true,
    },
    DeviceProfile {
        family: DeviceFamily::I350,
        info: "Intel I350 Gigabit Network Connection - IEEE 1588 PTP",
        capabilities: PTP_ENHANCED.union(Capabilities::MDIO),
        nominal_timinca: 0x1800_0000,
        clock_rate: ClockRate::Mhz125,
        supports_cbs: false,
        freezes_on_disable: true,
    },
    DeviceProfile {
        family: DeviceFamily::I82576,
        info: "Intel 82576 Gigabit Network Connection",
        capabilities: Capabilities::MMIO.union(Capabilities::MDIO),
        nominal_timinca: 0,
        clock_rate: ClockRate::Mhz125,
        supports_cbs: false,
        freezes_on_disable: false,
    },
];

impl DeviceFamily {
    /// Classify an Intel PCI device ID
    #[must_use]
    pub const fn from_device_id(device_id: u16) -> Option<Self> {
        match device_id {
            0x1533..=0x1538 => Some(Self::I210),
            0x153A | 0x153B => Some(Self::I217),
            0x15B7 | 0x15B8 | 0x15D6 | 0x15D7 | 0x15D8 | 0x0DC7 | 0x1570 | 0x15E3 => {
                Some(Self::I219)
            }
            0x15F2 | 0x15F3 => Some(Self::I225),
            0x125B | 0x125C => Some(Self::I226),
            0x1521 | 0x1522 => Some(Self::I350),
            0x10C9 | 0x10E6 => Some(Self::I82576),
            _ => None,
        }
    }

    /// Classify a vendor/device pair; only Intel parts are recognized
    #[must_use]
    pub const fn identify(vendor_id: u16, device_id: u16) -> Option<Self> {
        if vendor_id == INTEL_VENDOR_ID {
            Self::from_device_id(device_id)
        } else {
            None
        }
    }

    /// Static profile of the family
    #[must_use]
    pub fn profile(self) -> &'static DeviceProfile {
        let index = match self {
            Self::I210 => 0,
            Self::I217 => 1,
            Self::I219 => 2,
            Self::I225 => 3,
            Self::I226 => 4,
            Self::I350 => 5,
            Self::I82576 => 6,
        };
        &PROFILES[index]
    }
}

/// Identity of one enumerated adapter. Immutable once published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdapterDescriptor {
    /// PCI vendor ID
    pub vendor_id: u16,
    /// PCI device ID
    pub device_id: u16,
    /// Capability bits of the family
    pub capabilities: Capabilities,
    /// Stable position in enumeration order
    pub ordinal: u32,
    /// Silicon family
    pub family: DeviceFamily,
}

impl AdapterDescriptor {
    /// Whether a `select` request for `vendor_id`/`device_id` picks this adapter
    #[must_use]
    pub fn matches(&self, vendor_id: u16, device_id: u16) -> bool {
        (vendor_id == WILDCARD_ID || vendor_id == self.vendor_id)
            && (device_id == WILDCARD_ID || device_id == self.device_id)
    }
}
