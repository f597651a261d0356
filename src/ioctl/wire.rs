//! Fixed-size little-endian request/response structures.
//!
//! Layouts follow C natural alignment. Every structure but `GET_VERSION`
//! and `GET_HW_STATE` ends in a `status` word. Signed fields travel as raw
//! two's-complement words and are typed as signed only here.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{AvbError, Result};
use crate::types::{GATE_LIST_LEN, TasScheduleConfig};

/// A structure with a fixed wire size
pub trait WireStruct: Sized {
    /// Size on the wire, bytes
    const SIZE: usize;
    /// Offset of the `status` word, if the structure has one
    const STATUS_OFFSET: Option<usize>;

    /// Parse from the front of `buf`
    fn decode(buf: &[u8]) -> Result<Self>;

    /// Serialize into the front of `buf`
    fn encode(&self, buf: &mut [u8]) -> Result<()>;
}

fn check_len(len: usize, needed: usize) -> Result<()> {
    if len < needed {
        return Err(AvbError::BufferTooSmall { needed, have: len });
    }
    Ok(())
}

fn flag(buf: &[u8], offset: usize) -> bool {
    LittleEndian::read_u32(&buf[offset..]) != 0
}

fn put_flag(buf: &mut [u8], offset: usize, value: bool) {
    LittleEndian::write_u32(&mut buf[offset..], u32::from(value));
}

/// Write `status` into a buffer already holding a structure of type `T`.
pub fn write_status<T: WireStruct>(buf: &mut [u8], status: u32) -> Result<()> {
    check_len(buf.len(), T::SIZE)?;
    if let Some(offset) = T::STATUS_OFFSET {
        LittleEndian::write_u32(&mut buf[offset..], status);
    }
    Ok(())
}

// ===== Identity and lifecycle =====

/// `GET_VERSION`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VersionWire {
    /// Major version
    pub major: u16,
    /// Minor version
    pub minor: u16,
}

impl WireStruct for VersionWire {
    const SIZE: usize = 4;
    const STATUS_OFFSET: Option<usize> = None;

    fn decode(buf: &[u8]) -> Result<Self> {
        check_len(buf.len(), Self::SIZE)?;
        Ok(Self {
            major: LittleEndian::read_u16(&buf[0..]),
            minor: LittleEndian::read_u16(&buf[2..]),
        })
    }

    fn encode(&self, buf: &mut [u8]) -> Result<()> {
        check_len(buf.len(), Self::SIZE)?;
        LittleEndian::write_u16(&mut buf[0..], self.major);
        LittleEndian::write_u16(&mut buf[2..], self.minor);
        Ok(())
    }
}

/// Capacity of the device info string, including its terminator.
pub const DEVICE_INFO_CAPACITY: usize = 1024;

/// `GET_DEVICE_INFO`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeviceInfoWire {
    /// NUL-terminated description
    pub info: String,
    /// Caller's usable string size; zero means the whole field
    pub buffer_size: u32,
    /// Request status
    pub status: u32,
}

impl WireStruct for DeviceInfoWire {
    const SIZE: usize = DEVICE_INFO_CAPACITY + 8;
    const STATUS_OFFSET: Option<usize> = Some(DEVICE_INFO_CAPACITY + 4);

    fn decode(buf: &[u8]) -> Result<Self> {
        check_len(buf.len(), Self::SIZE)?;
        let text = &buf[..DEVICE_INFO_CAPACITY];
        let end = text.iter().position(|&b| b == 0).unwrap_or(DEVICE_INFO_CAPACITY);
        Ok(Self {
            info: String::from_utf8_lossy(&text[..end]).into_owned(),
            buffer_size: LittleEndian::read_u32(&buf[DEVICE_INFO_CAPACITY..]),
            status: LittleEndian::read_u32(&buf[DEVICE_INFO_CAPACITY + 4..]),
        })
    }

    /// The string is cut to fit `buffer_size` and always NUL-terminated.
    fn encode(&self, buf: &mut [u8]) -> Result<()> {
        check_len(buf.len(), Self::SIZE)?;
        let limit = match usize::try_from(self.buffer_size) {
            Ok(0) | Err(_) => DEVICE_INFO_CAPACITY,
            Ok(n) => n.min(DEVICE_INFO_CAPACITY),
        };
        let bytes = self.info.as_bytes();
        let len = bytes.len().min(limit - 1);
        buf[..DEVICE_INFO_CAPACITY].fill(0);
        buf[..len].copy_from_slice(&bytes[..len]);
        LittleEndian::write_u32(&mut buf[DEVICE_INFO_CAPACITY..], self.buffer_size);
        LittleEndian::write_u32(&mut buf[DEVICE_INFO_CAPACITY + 4..], self.status);
        Ok(())
    }
}

/// `ENUM_ADAPTERS`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnumWire {
    /// Requested ordinal
    pub index: u32,
    /// Total adapter count
    pub count: u32,
    /// PCI vendor ID
    pub vendor_id: u16,
    /// PCI device ID
    pub device_id: u16,
    /// Capability bits
    pub capabilities: u32,
    /// Request status
    pub status: u32,
}

impl WireStruct for EnumWire {
    const SIZE: usize = 20;
    const STATUS_OFFSET: Option<usize> = Some(16);

    fn decode(buf: &[u8]) -> Result<Self> {
        check_len(buf.len(), Self::SIZE)?;
        Ok(Self {
            index: LittleEndian::read_u32(&buf[0..]),
            count: LittleEndian::read_u32(&buf[4..]),
            vendor_id: LittleEndian::read_u16(&buf[8..]),
            device_id: LittleEndian::read_u16(&buf[10..]),
            capabilities: LittleEndian::read_u32(&buf[12..]),
            status: LittleEndian::read_u32(&buf[16..]),
        })
    }

    fn encode(&self, buf: &mut [u8]) -> Result<()> {
        check_len(buf.len(), Self::SIZE)?;
        LittleEndian::write_u32(&mut buf[0..], self.index);
        LittleEndian::write_u32(&mut buf[4..], self.count);
        LittleEndian::write_u16(&mut buf[8..], self.vendor_id);
        LittleEndian::write_u16(&mut buf[10..], self.device_id);
        LittleEndian::write_u32(&mut buf[12..], self.capabilities);
        LittleEndian::write_u32(&mut buf[16..], self.status);
        Ok(())
    }
}

/// `OPEN_ADAPTER`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpenWire {
    /// PCI vendor ID, 0xFFFF for any
    pub vendor_id: u16,
    /// PCI device ID, 0xFFFF for any
    pub device_id: u16,
    /// Request status
    pub status: u32,
}

impl WireStruct for OpenWire {
    const SIZE: usize = 8;
    const STATUS_OFFSET: Option<usize> = Some(4);

    fn decode(buf: &[u8]) -> Result<Self> {
        check_len(buf.len(), Self::SIZE)?;
        Ok(Self {
            vendor_id: LittleEndian::read_u16(&buf[0..]),
            device_id: LittleEndian::read_u16(&buf[2..]),
            status: LittleEndian::read_u32(&buf[4..]),
        })
    }

    fn encode(&self, buf: &mut [u8]) -> Result<()> {
        check_len(buf.len(), Self::SIZE)?;
        LittleEndian::write_u16(&mut buf[0..], self.vendor_id);
        LittleEndian::write_u16(&mut buf[2..], self.device_id);
        LittleEndian::write_u32(&mut buf[4..], self.status);
        Ok(())
    }
}

/// `GET_HW_STATE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HwStateWire {
    /// Lifecycle state, 0..=3
    pub hw_state: u32,
    /// PCI vendor ID, zero below BOUND
    pub vendor_id: u16,
    /// PCI device ID, zero below BOUND
    pub device_id: u16,
    /// Capability bits, zero below BOUND
    pub capabilities: u32,
    /// Always zero
    pub reserved: u32,
}

impl WireStruct for HwStateWire {
    const SIZE: usize = 16;
    const STATUS_OFFSET: Option<usize> = None;

    fn decode(buf: &[u8]) -> Result<Self> {
        check_len(buf.len(), Self::SIZE)?;
        Ok(Self {
            hw_state: LittleEndian::read_u32(&buf[0..]),
            vendor_id: LittleEndian::read_u16(&buf[4..]),
            device_id: LittleEndian::read_u16(&buf[6..]),
            capabilities: LittleEndian::read_u32(&buf[8..]),
            reserved: LittleEndian::read_u32(&buf[12..]),
        })
    }

    fn encode(&self, buf: &mut [u8]) -> Result<()> {
        check_len(buf.len(), Self::SIZE)?;
        LittleEndian::write_u32(&mut buf[0..], self.hw_state);
        LittleEndian::write_u16(&mut buf[4..], self.vendor_id);
        LittleEndian::write_u16(&mut buf[6..], self.device_id);
        LittleEndian::write_u32(&mut buf[8..], self.capabilities);
        LittleEndian::write_u32(&mut buf[12..], self.reserved);
        Ok(())
    }
}

// ===== Registers and PHY =====

/// `READ_REGISTER` / `WRITE_REGISTER`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegisterWire {
    /// BAR0 offset
    pub offset: u32,
    /// Value read or to write
    pub value: u32,
    /// Request status
    pub status: u32,
}

impl WireStruct for RegisterWire {
    const SIZE: usize = 12;
    const STATUS_OFFSET: Option<usize> = Some(8);

    fn decode(buf: &[u8]) -> Result<Self> {
        check_len(buf.len(), Self::SIZE)?;
        Ok(Self {
            offset: LittleEndian::read_u32(&buf[0..]),
            value: LittleEndian::read_u32(&buf[4..]),
            status: LittleEndian::read_u32(&buf[8..]),
        })
    }

    fn encode(&self, buf: &mut [u8]) -> Result<()> {
        check_len(buf.len(), Self::SIZE)?;
        LittleEndian::write_u32(&mut buf[0..], self.offset);
        LittleEndian::write_u32(&mut buf[4..], self.value);
        LittleEndian::write_u32(&mut buf[8..], self.status);
        Ok(())
    }
}

/// `MDIO_READ` / `MDIO_WRITE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MdioWire {
    /// PHY page
    pub page: u32,
    /// PHY register, below 32
    pub reg: u32,
    /// Value read or to write
    pub value: u16,
    /// Request status
    pub status: u32,
}

impl WireStruct for MdioWire {
    const SIZE: usize = 16;
    const STATUS_OFFSET: Option<usize> = Some(12);

    fn decode(buf: &[u8]) -> Result<Self> {
        check_len(buf.len(), Self::SIZE)?;
        Ok(Self {
            page: LittleEndian::read_u32(&buf[0..]),
            reg: LittleEndian::read_u32(&buf[4..]),
            value: LittleEndian::read_u16(&buf[8..]),
            status: LittleEndian::read_u32(&buf[12..]),
        })
    }

    fn encode(&self, buf: &mut [u8]) -> Result<()> {
        check_len(buf.len(), Self::SIZE)?;
        LittleEndian::write_u32(&mut buf[0..], self.page);
        LittleEndian::write_u32(&mut buf[4..], self.reg);
        LittleEndian::write_u16(&mut buf[8..], self.value);
        buf[10..12].fill(0);
        LittleEndian::write_u32(&mut buf[12..], self.status);
        Ok(())
    }
}

// ===== Clock =====

/// `GET_TIMESTAMP` / `SET_TIMESTAMP`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimestampWire {
    /// SYSTIM, nanoseconds
    pub timestamp: u64,
    /// Clock instance; only 0 exists
    pub clock_id: u32,
    /// Request status
    pub status: u32,
}

impl WireStruct for TimestampWire {
    const SIZE: usize = 16;
    const STATUS_OFFSET: Option<usize> = Some(12);

    fn decode(buf: &[u8]) -> Result<Self> {
        check_len(buf.len(), Self::SIZE)?;
        Ok(Self {
            timestamp: LittleEndian::read_u64(&buf[0..]),
            clock_id: LittleEndian::read_u32(&buf[8..]),
            status: LittleEndian::read_u32(&buf[12..]),
        })
    }

    fn encode(&self, buf: &mut [u8]) -> Result<()> {
        check_len(buf.len(), Self::SIZE)?;
        LittleEndian::write_u64(&mut buf[0..], self.timestamp);
        LittleEndian::write_u32(&mut buf[8..], self.clock_id);
        LittleEndian::write_u32(&mut buf[12..], self.status);
        Ok(())
    }
}

/// `ADJUST_FREQUENCY` flag: apply `ppb` instead of the raw increment
pub const FREQUENCY_USE_PPB: u32 = 0x1;

/// `ADJUST_FREQUENCY`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrequencyWire {
    /// Raw increment, whole nanoseconds
    pub increment_ns: u32,
    /// Raw increment, 24-bit fraction
    pub increment_frac: u32,
    /// Adjustment in parts per billion
    pub ppb: i32,
    /// [`FREQUENCY_USE_PPB`] selects the ppb path
    pub flags: u32,
    /// TIMINCA before
    pub previous: u32,
    /// TIMINCA after
    pub current: u32,
    /// Request status
    pub status: u32,
}

impl WireStruct for FrequencyWire {
    const SIZE: usize = 28;
    const STATUS_OFFSET: Option<usize> = Some(24);

    fn decode(buf: &[u8]) -> Result<Self> {
        check_len(buf.len(), Self::SIZE)?;
        Ok(Self {
            increment_ns: LittleEndian::read_u32(&buf[0..]),
            increment_frac: LittleEndian::read_u32(&buf[4..]),
            ppb: LittleEndian::read_i32(&buf[8..]),
            flags: LittleEndian::read_u32(&buf[12..]),
            previous: LittleEndian::read_u32(&buf[16..]),
            current: LittleEndian::read_u32(&buf[20..]),
            status: LittleEndian::read_u32(&buf[24..]),
        })
    }

    fn encode(&self, buf: &mut [u8]) -> Result<()> {
        check_len(buf.len(), Self::SIZE)?;
        LittleEndian::write_u32(&mut buf[0..], self.increment_ns);
        LittleEndian::write_u32(&mut buf[4..], self.increment_frac);
        LittleEndian::write_i32(&mut buf[8..], self.ppb);
        LittleEndian::write_u32(&mut buf[12..], self.flags);
        LittleEndian::write_u32(&mut buf[16..], self.previous);
        LittleEndian::write_u32(&mut buf[20..], self.current);
        LittleEndian::write_u32(&mut buf[24..], self.status);
        Ok(())
    }
}

/// `GET_CLOCK_CONFIG`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClockConfigWire {
    /// SYSTIM, nanoseconds
    pub systim: u64,
    /// Raw TIMINCA
    pub timinca: u32,
    /// Raw TSAUXC
    pub tsauxc: u32,
    /// Clock frequency, MHz
    pub clock_rate_mhz: u32,
    /// Request status
    pub status: u32,
}

impl WireStruct for ClockConfigWire {
    const SIZE: usize = 24;
    const STATUS_OFFSET: Option<usize> = Some(20);

    fn decode(buf: &[u8]) -> Result<Self> {
        check_len(buf.len(), Self::SIZE)?;
        Ok(Self {
            systim: LittleEndian::read_u64(&buf[0..]),
            timinca: LittleEndian::read_u32(&buf[8..]),
            tsauxc: LittleEndian::read_u32(&buf[12..]),
            clock_rate_mhz: LittleEndian::read_u32(&buf[16..]),
            status: LittleEndian::read_u32(&buf[20..]),
        })
    }

    fn encode(&self, buf: &mut [u8]) -> Result<()> {
        check_len(buf.len(), Self::SIZE)?;
        LittleEndian::write_u64(&mut buf[0..], self.systim);
        LittleEndian::write_u32(&mut buf[8..], self.timinca);
        LittleEndian::write_u32(&mut buf[12..], self.tsauxc);
        LittleEndian::write_u32(&mut buf[16..], self.clock_rate_mhz);
        LittleEndian::write_u32(&mut buf[20..], self.status);
        Ok(())
    }
}

/// `SET_HW_TIMESTAMPING`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HwTimestampingWire {
    /// Enable or disable
    pub enable: bool,
    /// SYSTIM instances to release
    pub timer_mask: u32,
    /// Arm target-time enables
    pub enable_target_time: bool,
    /// Arm aux capture enables
    pub enable_aux_ts: bool,
    /// TSAUXC before
    pub previous_tsauxc: u32,
    /// TSAUXC after
    pub current_tsauxc: u32,
    /// Request status
    pub status: u32,
}

impl WireStruct for HwTimestampingWire {
    const SIZE: usize = 28;
    const STATUS_OFFSET: Option<usize> = Some(24);

    fn decode(buf: &[u8]) -> Result<Self> {
        check_len(buf.len(), Self::SIZE)?;
        Ok(Self {
            enable: flag(buf, 0),
            timer_mask: LittleEndian::read_u32(&buf[4..]),
            enable_target_time: flag(buf, 8),
            enable_aux_ts: flag(buf, 12),
            previous_tsauxc: LittleEndian::read_u32(&buf[16..]),
            current_tsauxc: LittleEndian::read_u32(&buf[20..]),
            status: LittleEndian::read_u32(&buf[24..]),
        })
    }

    fn encode(&self, buf: &mut [u8]) -> Result<()> {
        check_len(buf.len(), Self::SIZE)?;
        put_flag(buf, 0, self.enable);
        LittleEndian::write_u32(&mut buf[4..], self.timer_mask);
        put_flag(buf, 8, self.enable_target_time);
        put_flag(buf, 12, self.enable_aux_ts);
        LittleEndian::write_u32(&mut buf[16..], self.previous_tsauxc);
        LittleEndian::write_u32(&mut buf[20..], self.current_tsauxc);
        LittleEndian::write_u32(&mut buf[24..], self.status);
        Ok(())
    }
}

/// `SET_RX_TIMESTAMP`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RxTimestampWire {
    /// Reserve timestamp space
    pub enable: bool,
    /// RXPBSIZE before
    pub previous: u32,
    /// RXPBSIZE after
    pub current: u32,
    /// Port reset needed
    pub requires_reset: bool,
    /// Request status
    pub status: u32,
}

impl WireStruct for RxTimestampWire {
    const SIZE: usize = 20;
    const STATUS_OFFSET: Option<usize> = Some(16);

    fn decode(buf: &[u8]) -> Result<Self> {
        check_len(buf.len(), Self::SIZE)?;
        Ok(Self {
            enable: flag(buf, 0),
            previous: LittleEndian::read_u32(&buf[4..]),
            current: LittleEndian::read_u32(&buf[8..]),
            requires_reset: flag(buf, 12),
            status: LittleEndian::read_u32(&buf[16..]),
        })
    }

    fn encode(&self, buf: &mut [u8]) -> Result<()> {
        check_len(buf.len(), Self::SIZE)?;
        put_flag(buf, 0, self.enable);
        LittleEndian::write_u32(&mut buf[4..], self.previous);
        LittleEndian::write_u32(&mut buf[8..], self.current);
        put_flag(buf, 12, self.requires_reset);
        LittleEndian::write_u32(&mut buf[16..], self.status);
        Ok(())
    }
}

/// `SET_QUEUE_TIMESTAMP`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueueTimestampWire {
    /// Receive queue, below 4
    pub queue_index: u32,
    /// Timestamp every packet on the queue
    pub enable: bool,
    /// SRRCTL before
    pub previous: u32,
    /// SRRCTL after
    pub current: u32,
    /// Request status
    pub status: u32,
}

impl WireStruct for QueueTimestampWire {
    const SIZE: usize = 20;
    const STATUS_OFFSET: Option<usize> = Some(16);

    fn decode(buf: &[u8]) -> Result<Self> {
        check_len(buf.len(), Self::SIZE)?;
        Ok(Self {
            queue_index: LittleEndian::read_u32(&buf[0..]),
            enable: flag(buf, 4),
            previous: LittleEndian::read_u32(&buf[8..]),
            current: LittleEndian::read_u32(&buf[12..]),
            status: LittleEndian::read_u32(&buf[16..]),
        })
    }

    fn encode(&self, buf: &mut [u8]) -> Result<()> {
        check_len(buf.len(), Self::SIZE)?;
        LittleEndian::write_u32(&mut buf[0..], self.queue_index);
        put_flag(buf, 4, self.enable);
        LittleEndian::write_u32(&mut buf[8..], self.previous);
        LittleEndian::write_u32(&mut buf[12..], self.current);
        LittleEndian::write_u32(&mut buf[16..], self.status);
        Ok(())
    }
}

/// `SET_TARGET_TIME`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TargetTimeWire {
    /// Slot, 0 or 1
    pub timer_index: u32,
    /// Target, nanoseconds
    pub target_time: u64,
    /// Raise the target interrupt
    pub enable_interrupt: bool,
    /// Drive the slot's SDP pin
    pub enable_sdp_output: bool,
    /// Target replaced by this call
    pub previous_target: u64,
    /// Request status
    pub status: u32,
}

impl WireStruct for TargetTimeWire {
    const SIZE: usize = 40;
    const STATUS_OFFSET: Option<usize> = Some(32);

    fn decode(buf: &[u8]) -> Result<Self> {
        check_len(buf.len(), Self::SIZE)?;
        Ok(Self {
            timer_index: LittleEndian::read_u32(&buf[0..]),
            target_time: LittleEndian::read_u64(&buf[8..]),
            enable_interrupt: flag(buf, 16),
            enable_sdp_output: flag(buf, 20),
            previous_target: LittleEndian::read_u64(&buf[24..]),
            status: LittleEndian::read_u32(&buf[32..]),
        })
    }

    fn encode(&self, buf: &mut [u8]) -> Result<()> {
        check_len(buf.len(), Self::SIZE)?;
        LittleEndian::write_u32(&mut buf[0..], self.timer_index);
        buf[4..8].fill(0);
        LittleEndian::write_u64(&mut buf[8..], self.target_time);
        put_flag(buf, 16, self.enable_interrupt);
        put_flag(buf, 20, self.enable_sdp_output);
        LittleEndian::write_u64(&mut buf[24..], self.previous_target);
        LittleEndian::write_u32(&mut buf[32..], self.status);
        buf[36..40].fill(0);
        Ok(())
    }
}

/// `GET_AUX_TIMESTAMP`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuxTimestampWire {
    /// Slot, 0 or 1
    pub timer_index: u32,
    /// Captured SYSTIM, nanoseconds
    pub timestamp: u64,
    /// A capture is present
    pub valid: bool,
    /// Clear the capture flag after reading
    pub clear_flag: bool,
    /// Request status
    pub status: u32,
}

impl WireStruct for AuxTimestampWire {
    const SIZE: usize = 32;
    const STATUS_OFFSET: Option<usize> = Some(24);

    fn decode(buf: &[u8]) -> Result<Self> {
        check_len(buf.len(), Self::SIZE)?;
        Ok(Self {
            timer_index: LittleEndian::read_u32(&buf[0..]),
            timestamp: LittleEndian::read_u64(&buf[8..]),
            valid: flag(buf, 16),
            clear_flag: flag(buf, 20),
            status: LittleEndian::read_u32(&buf[24..]),
        })
    }

    fn encode(&self, buf: &mut [u8]) -> Result<()> {
        check_len(buf.len(), Self::SIZE)?;
        LittleEndian::write_u32(&mut buf[0..], self.timer_index);
        buf[4..8].fill(0);
        LittleEndian::write_u64(&mut buf[8..], self.timestamp);
        put_flag(buf, 16, self.valid);
        put_flag(buf, 20, self.clear_flag);
        LittleEndian::write_u32(&mut buf[24..], self.status);
        buf[28..32].fill(0);
        Ok(())
    }
}

/// `PHC_OFFSET_ADJUST`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PhcOffsetWire {
    /// Signed step, nanoseconds
    pub offset_ns: i64,
    /// Request status
    pub status: u32,
}

impl WireStruct for PhcOffsetWire {
    const SIZE: usize = 16;
    const STATUS_OFFSET: Option<usize> = Some(8);

    fn decode(buf: &[u8]) -> Result<Self> {
        check_len(buf.len(), Self::SIZE)?;
        Ok(Self {
            offset_ns: LittleEndian::read_i64(&buf[0..]),
            status: LittleEndian::read_u32(&buf[8..]),
        })
    }

    fn encode(&self, buf: &mut [u8]) -> Result<()> {
        check_len(buf.len(), Self::SIZE)?;
        LittleEndian::write_i64(&mut buf[0..], self.offset_ns);
        LittleEndian::write_u32(&mut buf[8..], self.status);
        buf[12..16].fill(0);
        Ok(())
    }
}

// ===== Shaping =====

/// Size of the gate schedule block, padded to 8-byte alignment.
const TAS_CONFIG_SIZE: usize = 64;
const TAS_STATES_OFFSET: usize = 20;
const TAS_DURATIONS_OFFSET: usize = TAS_STATES_OFFSET + GATE_LIST_LEN;

/// `SETUP_TAS`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TasWire {
    /// Schedule to program
    pub config: TasScheduleConfig,
    /// Request status
    pub status: u32,
}

impl WireStruct for TasWire {
    const SIZE: usize = TAS_CONFIG_SIZE + 8;
    const STATUS_OFFSET: Option<usize> = Some(TAS_CONFIG_SIZE);

    fn decode(buf: &[u8]) -> Result<Self> {
        check_len(buf.len(), Self::SIZE)?;
        let mut config = TasScheduleConfig {
            base_time_s: LittleEndian::read_u64(&buf[0..]),
            base_time_ns: LittleEndian::read_u32(&buf[8..]),
            cycle_time_s: LittleEndian::read_u32(&buf[12..]),
            cycle_time_ns: LittleEndian::read_u32(&buf[16..]),
            ..TasScheduleConfig::default()
        };
        config
            .gate_states
            .copy_from_slice(&buf[TAS_STATES_OFFSET..TAS_DURATIONS_OFFSET]);
        LittleEndian::read_u32_into(
            &buf[TAS_DURATIONS_OFFSET..TAS_DURATIONS_OFFSET + 4 * GATE_LIST_LEN],
            &mut config.gate_durations,
        );
        Ok(Self {
            config,
            status: LittleEndian::read_u32(&buf[TAS_CONFIG_SIZE..]),
        })
    }

    fn encode(&self, buf: &mut [u8]) -> Result<()> {
        check_len(buf.len(), Self::SIZE)?;
        let c = &self.config;
        LittleEndian::write_u64(&mut buf[0..], c.base_time_s);
        LittleEndian::write_u32(&mut buf[8..], c.base_time_ns);
        LittleEndian::write_u32(&mut buf[12..], c.cycle_time_s);
        LittleEndian::write_u32(&mut buf[16..], c.cycle_time_ns);
        buf[TAS_STATES_OFFSET..TAS_DURATIONS_OFFSET].copy_from_slice(&c.gate_states);
        LittleEndian::write_u32_into(
            &c.gate_durations,
            &mut buf[TAS_DURATIONS_OFFSET..TAS_DURATIONS_OFFSET + 4 * GATE_LIST_LEN],
        );
        buf[TAS_DURATIONS_OFFSET + 4 * GATE_LIST_LEN..TAS_CONFIG_SIZE].fill(0);
        LittleEndian::write_u32(&mut buf[TAS_CONFIG_SIZE..], self.status);
        buf[TAS_CONFIG_SIZE + 4..Self::SIZE].fill(0);
        Ok(())
    }
}

/// `SETUP_QAV`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QavWire {
    /// Traffic class
    pub traffic_class: u32,
    /// Idle slope
    pub idle_slope: i32,
    /// Send slope
    pub send_slope: i32,
    /// High credit
    pub hi_credit: i32,
    /// Low credit
    pub lo_credit: i32,
    /// Request status
    pub status: u32,
}

impl WireStruct for QavWire {
    const SIZE: usize = 24;
    const STATUS_OFFSET: Option<usize> = Some(20);

    fn decode(buf: &[u8]) -> Result<Self> {
        check_len(buf.len(), Self::SIZE)?;
        Ok(Self {
            traffic_class: LittleEndian::read_u32(&buf[0..]),
            idle_slope: LittleEndian::read_i32(&buf[4..]),
            send_slope: LittleEndian::read_i32(&buf[8..]),
            hi_credit: LittleEndian::read_i32(&buf[12..]),
            lo_credit: LittleEndian::read_i32(&buf[16..]),
            status: LittleEndian::read_u32(&buf[20..]),
        })
    }

    fn encode(&self, buf: &mut [u8]) -> Result<()> {
        check_len(buf.len(), Self::SIZE)?;
        LittleEndian::write_u32(&mut buf[0..], self.traffic_class);
        LittleEndian::write_i32(&mut buf[4..], self.idle_slope);
        LittleEndian::write_i32(&mut buf[8..], self.send_slope);
        LittleEndian::write_i32(&mut buf[12..], self.hi_credit);
        LittleEndian::write_i32(&mut buf[16..], self.lo_credit);
        LittleEndian::write_u32(&mut buf[20..], self.status);
        Ok(())
    }
}

/// `SETUP_FP`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FpWire {
    /// Preemptable queue bitmask
    pub preemptable_queues: u8,
    /// Minimum non-final fragment, bytes
    pub min_fragment_size: u32,
    /// Skip verification
    pub verify_disable: bool,
    /// Request status
    pub status: u32,
}

impl WireStruct for FpWire {
    const SIZE: usize = 16;
    const STATUS_OFFSET: Option<usize> = Some(12);

    fn decode(buf: &[u8]) -> Result<Self> {
        check_len(buf.len(), Self::SIZE)?;
        Ok(Self {
            preemptable_queues: buf[0],
            min_fragment_size: LittleEndian::read_u32(&buf[4..]),
            verify_disable: buf[8] != 0,
            status: LittleEndian::read_u32(&buf[12..]),
        })
    }

    fn encode(&self, buf: &mut [u8]) -> Result<()> {
        check_len(buf.len(), Self::SIZE)?;
        buf[..Self::SIZE].fill(0);
        buf[0] = self.preemptable_queues;
        LittleEndian::write_u32(&mut buf[4..], self.min_fragment_size);
        buf[8] = u8::from(self.verify_disable);
        LittleEndian::write_u32(&mut buf[12..], self.status);
        Ok(())
    }
}

/// `SETUP_PTM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PtmWire {
    /// Enable PTM
    pub enabled: bool,
    /// Local clock granularity, nanoseconds
    pub clock_granularity: u32,
    /// Request status
    pub status: u32,
}

impl WireStruct for PtmWire {
    const SIZE: usize = 12;
    const STATUS_OFFSET: Option<usize> = Some(8);

    fn decode(buf: &[u8]) -> Result<Self> {
        check_len(buf.len(), Self::SIZE)?;
        Ok(Self {
            enabled: buf[0] != 0,
            clock_granularity: LittleEndian::read_u32(&buf[4..]),
            status: LittleEndian::read_u32(&buf[8..]),
        })
    }

    fn encode(&self, buf: &mut [u8]) -> Result<()> {
        check_len(buf.len(), Self::SIZE)?;
        buf[..4].fill(0);
        buf[0] = u8::from(self.enabled);
        LittleEndian::write_u32(&mut buf[4..], self.clock_granularity);
        LittleEndian::write_u32(&mut buf[8..], self.status);
        Ok(())
    }
}
