//! Register-level model of an Intel NIC for tests and benches.
//!
//! The model keeps a sparse register file plus the few registers with side
//! effects: SYSTIM runs off the wall clock at the rate TIMINCA sets, TSAUXC
//! status bits are write-1-to-clear, SDP events capture into the aux slots
//! and MDIC transactions complete against a small PHY register file.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use crate::error::{AvbError, Result};
use crate::hal::{RegisterIo, split_u64};
use crate::hal::regs::{
    CTRL, MDIC, MDIC_DATA_MASK, MDIC_OP_READ, MDIC_OP_WRITE, MDIC_READY, MDIC_REG_SHIFT,
    PHY_PAGE_SELECT, RXPBSIZE, SYSTIMH, SYSTIML, TIMINCA, TSAUXC, TSAUXC_DISABLE_SYSTIM0,
    TSAUXC_STATUS_MASK, auxstmp, tsauxc_autt, tsauxc_en_ts,
};
use crate::registry::DeviceFamily;

/// CTRL value after power-on.
const CTRL_POWER_ON: u32 = 0x0014_0241;
/// RXPBSIZE value after power-on.
const RXPBSIZE_POWER_ON: u32 = 0x0000_00A2;
const MDIC_OP_MASK: u32 = 0x3 << 26;
const MDIC_REG_MASK: u32 = 0x1F;

struct SimState {
    regs: HashMap<u32, u32>,
    phy: HashMap<(u16, u32), u16>,
    phy_page: u16,
    clock_mhz: u32,
    freezes_on_disable: bool,
    clock_stopped: bool,
    unreadable_bar: bool,
    faults: HashSet<u32>,
    systim_at_anchor: u64,
    anchor: Instant,
    latched_high: Option<u32>,
    accesses: u64,
}

impl SimState {
    fn reg(&self, offset: u32) -> u32 {
        self.regs.get(&offset).copied().unwrap_or(0)
    }

    fn running(&self) -> bool {
        !self.clock_stopped
            && !(self.freezes_on_disable && self.reg(TSAUXC) & TSAUXC_DISABLE_SYSTIM0 != 0)
    }

    fn systim(&self) -> u64 {
        if !self.running() {
            return self.systim_at_anchor;
        }
        let elapsed = self.anchor.elapsed().as_nanos();
        let advance =
            elapsed * u128::from(self.clock_mhz) * u128::from(self.reg(TIMINCA)) / (1000u128 << 24);
        self.systim_at_anchor
            .wrapping_add(u64::try_from(advance).unwrap_or(u64::MAX))
    }

    /// Fold elapsed time into the anchor before anything that changes the rate.
    fn rebase(&mut self) {
        self.systim_at_anchor = self.systim();
        self.anchor = Instant::now();
    }

    fn check(&mut self, offset: u32) -> Result<()> {
        self.accesses += 1;
        if self.faults.contains(&offset) {
            return Err(AvbError::fault(offset, "injected access fault"));
        }
        Ok(())
    }

    fn read(&mut self, offset: u32) -> Result<u32> {
        self.check(offset)?;
        if self.unreadable_bar {
            return Ok(u32::MAX);
        }
        let value = match offset {
            SYSTIML => {
                let (lo, hi) = split_u64(self.systim());
                self.latched_high = Some(hi);
                lo
            }
            SYSTIMH => match self.latched_high.take() {
                Some(hi) => hi,
                None => split_u64(self.systim()).1,
            },
            _ => self.reg(offset),
        };
        Ok(value)
    }

    fn write(&mut self, offset: u32, value: u32) -> Result<()> {
        self.check(offset)?;
        if self.unreadable_bar {
            return Ok(());
        }
        match offset {
            SYSTIMH => {
                let now = self.systim();
                self.systim_at_anchor = (u64::from(value) << 32) | (now & 0xFFFF_FFFF);
                self.anchor = Instant::now();
            }
            SYSTIML => {
                let now = self.systim();
                self.systim_at_anchor = (now & !0xFFFF_FFFF) | u64::from(value);
                self.anchor = Instant::now();
            }
            TIMINCA => {
                self.rebase();
                self.regs.insert(TIMINCA, value);
            }
            TSAUXC => {
                self.rebase();
                let old = self.reg(TSAUXC);
                let status = old & TSAUXC_STATUS_MASK & !value;
                self.regs.insert(TSAUXC, (value & !TSAUXC_STATUS_MASK) | status);
            }
            MDIC => self.mdic(value),
            _ => {
                self.regs.insert(offset, value);
            }
        }
        Ok(())
    }

    fn mdic(&mut self, command: u32) {
        let reg = (command >> MDIC_REG_SHIFT) & MDIC_REG_MASK;
        #[allow(clippy::cast_possible_truncation)]
        let data = (command & MDIC_DATA_MASK) as u16;
        let result = match command & MDIC_OP_MASK {
            MDIC_OP_WRITE if reg == PHY_PAGE_SELECT => {
                self.phy_page = data;
                u32::from(data)
            }
            MDIC_OP_WRITE => {
                self.phy.insert((self.phy_page, reg), data);
                u32::from(data)
            }
            MDIC_OP_READ => u32::from(self.phy.get(&(self.phy_page, reg)).copied().unwrap_or(0)),
            _ => 0,
        };
        self.regs
            .insert(MDIC, (command & !MDIC_DATA_MASK) | result | MDIC_READY);
    }
}

/// Simulated adapter BAR0.
///
/// Clones share one model, so a test can keep a handle for event injection
/// after moving the device into a registry.
#[derive(Clone)]
pub struct SimulatedNic {
    state: Arc<Mutex<SimState>>,
}

impl SimulatedNic {
    /// Power-on model of `family`
    #[must_use]
    pub fn new(family: DeviceFamily) -> Self {
        Self::builder(family).build()
    }

    /// Builder for non-default hardware behaviour
    #[must_use]
    pub fn builder(family: DeviceFamily) -> SimulatedNicBuilder {
        SimulatedNicBuilder::new(family)
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current SYSTIM without latching or counting an access
    #[must_use]
    pub fn systim(&self) -> u64 {
        self.lock().systim()
    }

    /// Raw register contents without side effects
    #[must_use]
    pub fn register(&self, offset: u32) -> u32 {
        self.lock().reg(offset)
    }

    /// Overwrite a raw register without side effects
    pub fn set_register(&self, offset: u32, value: u32) {
        self.lock().regs.insert(offset, value);
    }

    /// PHY register contents on `page`
    #[must_use]
    pub fn phy_register(&self, page: u16, reg: u32) -> u16 {
        self.lock().phy.get(&(page, reg)).copied().unwrap_or(0)
    }

    /// Preload a PHY register on `page`
    pub fn set_phy_register(&self, page: u16, reg: u32, value: u16) {
        self.lock().phy.insert((page, reg), value);
    }

    /// Drive an edge on the SDP pin feeding aux slot `timer_index`.
    ///
    /// Returns whether the edge was captured; capture needs the slot's
    /// EN_TS bit in TSAUXC.
    pub fn trigger_sdp_event(&self, timer_index: u32) -> bool {
        let mut state = self.lock();
        let tsauxc = state.reg(TSAUXC);
        if tsauxc & tsauxc_en_ts(timer_index) == 0 {
            return false;
        }
        let (lo, hi) = split_u64(state.systim());
        let (lo_reg, hi_reg) = auxstmp(timer_index);
        state.regs.insert(lo_reg, lo);
        state.regs.insert(hi_reg, hi);
        state.regs.insert(TSAUXC, tsauxc | tsauxc_autt(timer_index));
        true
    }

    /// Make every access to `offset` fail with a hardware fault
    pub fn inject_fault(&self, offset: u32) {
        self.lock().faults.insert(offset);
    }

    /// Remove all injected faults
    pub fn clear_faults(&self) {
        self.lock().faults.clear();
    }

    /// Make the BAR read all ones, as after a surprise removal
    pub fn set_bar_unreadable(&self, unreadable: bool) {
        self.lock().unreadable_bar = unreadable;
    }

    /// Register accesses performed through [`RegisterIo`] so far
    #[must_use]
    pub fn access_count(&self) -> u64 {
        self.lock().accesses
    }
}

impl RegisterIo for SimulatedNic {
    fn read(&mut self, offset: u32) -> Result<u32> {
        self.lock().read(offset)
    }

    fn write(&mut self, offset: u32, value: u32) -> Result<()> {
        self.lock().write(offset, value)
    }
}

impl std::fmt::Debug for SimulatedNic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("SimulatedNic")
            .field("clock_mhz", &state.clock_mhz)
            .field("running", &state.running())
            .field("accesses", &state.accesses)
            .finish_non_exhaustive()
    }
}

/// Builder for [`SimulatedNic`]
#[derive(Debug, Clone)]
pub struct SimulatedNicBuilder {
    clock_mhz: u32,
    freezes_on_disable: bool,
    clock_stopped: bool,
    unreadable_bar: bool,
    initial_systim: u64,
    timinca: u32,
}

impl SimulatedNicBuilder {
    fn new(family: DeviceFamily) -> Self {
        let profile = family.profile();
        Self {
            clock_mhz: profile.clock_rate.as_mhz(),
            freezes_on_disable: profile.freezes_on_disable,
            clock_stopped: profile.nominal_timinca == 0,
            unreadable_bar: false,
            initial_systim: 0,
            timinca: 0,
        }
    }

    /// BAR reads all ones, so the echo test fails
    #[must_use]
    pub fn unreadable_bar(mut self, unreadable: bool) -> Self {
        self.unreadable_bar = unreadable;
        self
    }

    /// SYSTIM never advances, whatever TIMINCA holds
    #[must_use]
    pub fn clock_stopped(mut self, stopped: bool) -> Self {
        self.clock_stopped = stopped;
        self
    }

    /// Override whether the SYSTIM0 disable bit stops the counter
    #[must_use]
    pub fn freezes_on_disable(mut self, freezes: bool) -> Self {
        self.freezes_on_disable = freezes;
        self
    }

    /// SYSTIM value at power-on
    #[must_use]
    pub fn initial_systim(mut self, ns: u64) -> Self {
        self.initial_systim = ns;
        self
    }

    /// TIMINCA value at power-on (zero by default)
    #[must_use]
    pub fn timinca(mut self, word: u32) -> Self {
        self.timinca = word;
        self
    }

    /// Build the model
    #[must_use]
    pub fn build(self) -> SimulatedNic {
        let regs = HashMap::from([
            (CTRL, CTRL_POWER_ON),
            (RXPBSIZE, RXPBSIZE_POWER_ON),
            (TIMINCA, self.timinca),
            (TSAUXC, TSAUXC_DISABLE_SYSTIM0),
        ]);
        SimulatedNic {
            state: Arc::new(Mutex::new(SimState {
                regs,
                phy: HashMap::new(),
                phy_page: 0,
                clock_mhz: self.clock_mhz,
                freezes_on_disable: self.freezes_on_disable,
                clock_stopped: self.clock_stopped,
                unreadable_bar: self.unreadable_bar,
                faults: HashSet::new(),
                systim_at_anchor: self.initial_systim,
                anchor: Instant::now(),
                latched_high: None,
                accesses: 0,
            })),
        }
    }
}
