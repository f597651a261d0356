//! Register offsets and bit definitions shared by the supported families.
//!
//! Offsets are byte offsets into BAR0. Per-queue and per-timer registers
//! are exposed as functions.

// ===== Device control =====

/// Device control. Read during the BAR echo test.
pub const CTRL: u32 = 0x0000;
/// MDI control (PHY access).
pub const MDIC: u32 = 0x0020;
/// Software-definable pin control for the time sync unit.
pub const TSSDP: u32 = 0x003C;

// ===== Receive path =====

/// Receive packet buffer size.
pub const RXPBSIZE: u32 = 0x2404;
/// RXPBSIZE bit that reserves space for receive timestamps.
pub const RXPBSIZE_CFG_TS_EN: u32 = 1 << 29;
/// SRRCTL bit that timestamps every received packet on the queue.
pub const SRRCTL_TIMESTAMP: u32 = 1 << 30;
/// Number of receive queues with timestamp control.
pub const RX_QUEUE_COUNT: u32 = 4;

/// Split receive control for queue `q`.
#[must_use]
pub const fn srrctl(q: u32) -> u32 {
    0x0C00C + 0x40 * q
}

// ===== Credit-based shaper =====

/// Number of traffic classes with a credit-based shaper.
pub const CBS_CLASS_COUNT: u8 = 4;
/// TQAVCC bit putting the queue in stream-reservation mode.
pub const TQAVCC_QUEUE_MODE: u32 = 1 << 31;
/// Transmit Qav control.
pub const TQAVCTRL: u32 = 0x3570;
/// TQAVCTRL: transmit in TSN mode.
pub const TQAVCTRL_TRANSMIT_MODE_TSN: u32 = 0x0000_0001;
/// TQAVCTRL: enhanced Qav (credit shaper) mode.
pub const TQAVCTRL_ENHANCED_QAV: u32 = 0x0000_0008;
/// TQAVCTRL: future schedule disable.
pub const TQAVCTRL_FUTSCDDIS: u32 = 0x0080_0000;

/// Qav credit control (idle slope) for queue `q`.
#[must_use]
pub const fn tqavcc(q: u32) -> u32 {
    0x3004 + 0x40 * q
}

/// Qav high credit for queue `q`.
#[must_use]
pub const fn tqavhc(q: u32) -> u32 {
    0x300C + 0x40 * q
}

// ===== Time-aware shaper =====

/// TAS base time, nanoseconds part.
pub const BASET_L: u32 = 0x3314;
/// TAS base time, seconds part.
pub const BASET_H: u32 = 0x3318;
/// TAS cycle time, nanoseconds.
pub const QBVCYCLET: u32 = 0x331C;
/// TAS cycle time shadow.
pub const QBVCYCLET_S: u32 = 0x3320;
/// TXQCTL bit selecting launch-time (gated) queue mode.
pub const TXQCTL_QUEUE_MODE_LAUNCHT: u32 = 0x0000_0001;
/// Number of transmit queues governed by the gate list.
pub const TAS_QUEUE_COUNT: u32 = 4;

/// Transmit queue control for queue `q`.
#[must_use]
pub const fn txqctl(q: u32) -> u32 {
    0x3300 + 4 * q
}

/// Gate window start for queue `q`.
#[must_use]
pub const fn stqt(q: u32) -> u32 {
    0x3340 + 4 * q
}

/// Gate window end for queue `q`.
#[must_use]
pub const fn endqt(q: u32) -> u32 {
    0x3380 + 4 * q
}

// ===== Frame preemption and PTM =====

/// Frame preemption configuration.
pub const FP_CONFIG: u32 = 0x8700;
/// FP_CONFIG: preemption enabled.
pub const FP_CONFIG_ENABLE: u32 = 1 << 0;
/// FP_CONFIG: preemptable queue mask field shift.
pub const FP_CONFIG_QUEUE_SHIFT: u32 = 8;
/// FP_CONFIG: additional fragment size field shift.
pub const FP_CONFIG_FRAG_SHIFT: u32 = 16;
/// FP_CONFIG: skip the verification handshake.
pub const FP_CONFIG_VERIFY_DISABLE: u32 = 1 << 18;

/// PCIe precision time measurement control.
pub const PTM_CTRL: u32 = 0x12540;
/// PTM_CTRL: PTM enabled.
pub const PTM_CTRL_EN: u32 = 1 << 30;
/// PTM_CTRL: clock granularity field.
pub const PTM_CTRL_GRANULARITY_MASK: u32 = 0xFF;

// ===== Time sync unit =====

/// System time, low word.
pub const SYSTIML: u32 = 0xB600;
/// System time, high word.
pub const SYSTIMH: u32 = 0xB604;
/// Clock increment attributes.
pub const TIMINCA: u32 = 0xB608;
/// Transmit time sync control.
pub const TSYNCTXCTL: u32 = 0xB614;
/// Receive time sync control.
pub const TSYNCRXCTL: u32 = 0xB620;
/// TSYNCTXCTL/TSYNCRXCTL enable bit.
pub const TSYNC_ENABLED: u32 = 1 << 4;
/// Auxiliary control.
pub const TSAUXC: u32 = 0xB640;
/// Time sync interrupt mask.
pub const TSIM: u32 = 0xB674;

/// TIMINCA: increment nanoseconds shift.
pub const TIMINCA_NS_SHIFT: u32 = 24;
/// TIMINCA: fractional increment mask.
pub const TIMINCA_FRAC_MASK: u32 = 0x00FF_FFFF;

/// TSAUXC: enable target time 0.
pub const TSAUXC_EN_TT0: u32 = 1 << 0;
/// TSAUXC: enable target time 1.
pub const TSAUXC_EN_TT1: u32 = 1 << 4;
/// TSAUXC: enable aux timestamp 0.
pub const TSAUXC_EN_TS0: u32 = 1 << 8;
/// TSAUXC: aux timestamp 0 taken (write 1 to clear).
pub const TSAUXC_AUTT0: u32 = 1 << 9;
/// TSAUXC: enable aux timestamp 1.
pub const TSAUXC_EN_TS1: u32 = 1 << 10;
/// TSAUXC: aux timestamp 1 taken (write 1 to clear).
pub const TSAUXC_AUTT1: u32 = 1 << 17;
/// TSAUXC: stop SYSTIM1.
pub const TSAUXC_DISABLE_SYSTIM1: u32 = 1 << 27;
/// TSAUXC: stop SYSTIM2.
pub const TSAUXC_DISABLE_SYSTIM2: u32 = 1 << 28;
/// TSAUXC: stop SYSTIM3.
pub const TSAUXC_DISABLE_SYSTIM3: u32 = 1 << 29;
/// TSAUXC: stop SYSTIM0, the clock every PTP operation reads.
pub const TSAUXC_DISABLE_SYSTIM0: u32 = 1 << 31;
/// All four SYSTIM disable bits.
pub const TSAUXC_DISABLE_ALL: u32 = TSAUXC_DISABLE_SYSTIM0
    | TSAUXC_DISABLE_SYSTIM1
    | TSAUXC_DISABLE_SYSTIM2
    | TSAUXC_DISABLE_SYSTIM3;
/// Both target-time enables.
pub const TSAUXC_EN_TT_ALL: u32 = TSAUXC_EN_TT0 | TSAUXC_EN_TT1;
/// Both aux-timestamp enables.
pub const TSAUXC_EN_TS_ALL: u32 = TSAUXC_EN_TS0 | TSAUXC_EN_TS1;
/// Write-1-to-clear status flags. Never written back by read-modify-write.
pub const TSAUXC_STATUS_MASK: u32 = TSAUXC_AUTT0 | TSAUXC_AUTT1;

/// TSIM: target time 0 interrupt.
pub const TSIM_TT0: u32 = 1 << 3;
/// TSIM: target time 1 interrupt.
pub const TSIM_TT1: u32 = 1 << 4;
/// TSSDP: drive SDP0 from target time 0.
pub const TSSDP_TS_SDP0_EN: u32 = 1 << 8;
/// TSSDP: drive SDP1 from target time 1.
pub const TSSDP_TS_SDP1_EN: u32 = 1 << 11;

/// Number of target-time and aux-timestamp slots.
pub const TIMER_COUNT: u32 = 2;

/// SYSTIM disable bit for timer `i` of the enable mask (0..=3).
#[must_use]
pub const fn tsauxc_disable_bit(i: u32) -> u32 {
    match i {
        0 => TSAUXC_DISABLE_SYSTIM0,
        1 => TSAUXC_DISABLE_SYSTIM1,
        2 => TSAUXC_DISABLE_SYSTIM2,
        _ => TSAUXC_DISABLE_SYSTIM3,
    }
}

/// Target time low/high pair for slot `i`.
#[must_use]
pub const fn trgttim(i: u32) -> (u32, u32) {
    if i == 0 { (0xB644, 0xB648) } else { (0xB64C, 0xB650) }
}

/// Aux timestamp low/high pair for slot `i`.
#[must_use]
pub const fn auxstmp(i: u32) -> (u32, u32) {
    if i == 0 { (0xB65C, 0xB660) } else { (0xB664, 0xB668) }
}

/// Captured flag for aux slot `i`.
#[must_use]
pub const fn tsauxc_autt(i: u32) -> u32 {
    if i == 0 { TSAUXC_AUTT0 } else { TSAUXC_AUTT1 }
}

/// Aux capture enable for slot `i`.
#[must_use]
pub const fn tsauxc_en_ts(i: u32) -> u32 {
    if i == 0 { TSAUXC_EN_TS0 } else { TSAUXC_EN_TS1 }
}

/// Target time enable for slot `i`.
#[must_use]
pub const fn tsauxc_en_tt(i: u32) -> u32 {
    if i == 0 { TSAUXC_EN_TT0 } else { TSAUXC_EN_TT1 }
}

// ===== MDIC fields =====

/// MDIC: data field.
pub const MDIC_DATA_MASK: u32 = 0xFFFF;
/// MDIC: PHY register shift.
pub const MDIC_REG_SHIFT: u32 = 16;
/// MDIC: PHY address shift.
pub const MDIC_PHY_SHIFT: u32 = 21;
/// MDIC: write opcode.
pub const MDIC_OP_WRITE: u32 = 0x1 << 26;
/// MDIC: read opcode.
pub const MDIC_OP_READ: u32 = 0x2 << 26;
/// MDIC: transaction complete.
pub const MDIC_READY: u32 = 1 << 28;
/// MDIC: transaction failed.
pub const MDIC_ERROR: u32 = 1 << 30;
/// Internal PHY address.
pub const MDIC_PHY_ADDR: u32 = 1;
/// PHY register selecting the active page.
pub const PHY_PAGE_SELECT: u32 = 31;
