use super::sync_tqavctrl;
use crate::error::{AvbError, Result};
use crate::hal::RegisterIo;
use crate::hal::regs::{
    BASET_H, BASET_L, QBVCYCLET, QBVCYCLET_S, TAS_QUEUE_COUNT, TXQCTL_QUEUE_MODE_LAUNCHT, endqt,
    stqt, txqctl,
};
use crate::ptp::{ensure_ptp_ready, read_systim};
use crate::registry::adapter::ShaperShadow;
use crate::registry::{AdapterSession, Capabilities};
use crate::types::{TasActivation, TasScheduleConfig};

const NS_PER_SEC: u32 = 1_000_000_000;

/// Check a schedule before it goes anywhere near the hardware.
///
/// The live entries are those before the first zero duration; their
/// durations must add up to exactly one cycle.
pub fn validate_schedule(config: &TasScheduleConfig) -> Result<()> {
    if config.base_time_ns >= NS_PER_SEC {
        return Err(AvbError::invalid(
            "base_time_ns",
            format!("{} is not below one second", config.base_time_ns),
        ));
    }
    if config.cycle_time_ns >= NS_PER_SEC {
        return Err(AvbError::invalid(
            "cycle_time_ns",
            format!("{} is not below one second", config.cycle_time_ns),
        ));
    }
    let cycle = config.cycle_time();
    if cycle == 0 {
        return Err(AvbError::invalid("cycle_time", "cycle time must be non-zero"));
    }
    if u32::try_from(cycle).is_err() {
        return Err(AvbError::invalid(
            "cycle_time",
            format!("{cycle} ns exceeds the 32-bit cycle register"),
        ));
    }
    let mut live = 0usize;
    let mut total = 0u64;
    for (_, duration) in config.entries() {
        live += 1;
        total += u64::from(duration);
    }
    if live == 0 {
        return Err(AvbError::invalid("gate_durations", "gate list has no entries"));
    }
    if total != cycle {
        return Err(AvbError::invalid(
            "gate_durations",
            format!("{live} entries last {total} ns, cycle is {cycle} ns"),
        ));
    }
    Ok(())
}

/// Effective start of a schedule given the current time.
///
/// A base at or after `now` is kept. A past base moves forward by whole
/// cycles to the first boundary at or after `now + lead_ns`. Returns the
/// base and whether it moved.
pub fn next_cycle_boundary(base: u64, cycle: u64, now: u64, lead_ns: u64) -> Result<(u64, bool)> {
    if cycle == 0 {
        return Err(AvbError::invalid("cycle_time", "cycle time must be non-zero"));
    }
    if base >= now {
        return Ok((base, false));
    }
    let threshold = now.saturating_add(lead_ns);
    let cycles = (threshold - base).div_ceil(cycle).max(1);
    cycles
        .checked_mul(cycle)
        .and_then(|span| base.checked_add(span))
        .map(|effective| (effective, true))
        .ok_or_else(|| AvbError::invalid("base_time", "next cycle boundary overflows SYSTIM"))
}

/// Per-queue `(start, end)` gate window within one cycle.
///
/// The hardware holds one window per queue, so a queue gets the first
/// contiguous run of entries that open it. Queues never opened get an
/// empty window.
fn queue_windows(config: &TasScheduleConfig) -> [(u32, u32); TAS_QUEUE_COUNT as usize] {
    let mut windows = [(0u32, 0u32); TAS_QUEUE_COUNT as usize];
    for (q, window) in (0..TAS_QUEUE_COUNT).zip(windows.iter_mut()) {
        let bit = 1u8 << q;
        let mut offset = 0u32;
        let mut run: Option<(u32, u32)> = None;
        for (states, duration) in config.entries() {
            let open = states & bit != 0;
            match run {
                None if open => run = Some((offset, offset + duration)),
                Some((start, end)) if open && end == offset => run = Some((start, end + duration)),
                Some(_) if open => {
                    tracing::warn!(
                        queue = q,
                        offset,
                        "Queue reopens later in the cycle; only the first window is programmed"
                    );
                    break;
                }
                _ => {}
            }
            offset += duration;
        }
        if let Some(found) = run {
            *window = found;
        }
    }
    windows
}

/// Program cycle, windows and base time. TQAVCTRL is left to the caller.
fn program_schedule(
    io: &mut dyn RegisterIo,
    config: &TasScheduleConfig,
    activation: &TasActivation,
) -> Result<()> {
    #[allow(clippy::cast_possible_truncation)]
    let cycle = activation.cycle_time_ns as u32;
    io.write(QBVCYCLET_S, cycle)?;
    io.write(QBVCYCLET, cycle)?;
    for (q, (start, end)) in (0..TAS_QUEUE_COUNT).zip(queue_windows(config)) {
        io.modify(txqctl(q), TXQCTL_QUEUE_MODE_LAUNCHT, TXQCTL_QUEUE_MODE_LAUNCHT)?;
        io.write(stqt(q), start)?;
        io.write(endqt(q), end)?;
    }
    let seconds = activation.base_time_ns / u64::from(NS_PER_SEC);
    #[allow(clippy::cast_possible_truncation)]
    let nanos = (activation.base_time_ns % u64::from(NS_PER_SEC)) as u32;
    // The low write latches the base time.
    io.write(BASET_H, u32::try_from(seconds).unwrap_or(u32::MAX))?;
    io.write(BASET_L, nanos)
}

/// Anchor `config` to the current clock, program it and turn the gates on.
///
/// Gating is switched off before the first window is touched and only
/// switched back on once every register is written. A failure part way
/// leaves the gates closed and the previously accepted schedule stored.
fn start_schedule(
    io: &mut dyn RegisterIo,
    shadow: &mut ShaperShadow,
    config: &TasScheduleConfig,
    lead_ns: u64,
) -> Result<TasActivation> {
    let now = read_systim(io)?;
    let cycle_time_ns = config.cycle_time();
    let (base_time_ns, rolled_forward) =
        next_cycle_boundary(config.base_time(), cycle_time_ns, now, lead_ns)?;
    if rolled_forward {
        tracing::warn!(
            requested = config.base_time(),
            effective = base_time_ns,
            now,
            "TAS base time in the past, starting at next cycle boundary"
        );
    }
    let activation = TasActivation {
        base_time_ns,
        cycle_time_ns,
        rolled_forward,
    };
    if shadow.tas_enabled {
        shadow.tas_enabled = false;
        sync_tqavctrl(io, shadow)?;
    }
    if let Err(e) = program_schedule(io, config, &activation) {
        tracing::warn!(error = %e, "TAS programming failed, gates left closed");
        return Err(e);
    }
    shadow.tas = Some((*config, activation));
    shadow.tas_enabled = true;
    sync_tqavctrl(io, shadow)?;
    tracing::info!(
        base_time_ns,
        cycle_time_ns,
        entries = config.entries().count(),
        "TAS schedule active"
    );
    Ok(activation)
}

impl AdapterSession {
    /// Replace the gate schedule and start it.
    ///
    /// The whole sequence runs under the adapter lock. A base time already
    /// in the past is moved to the next cycle boundary and reported with
    /// `rolled_forward`.
    pub fn configure_tas(&self, config: &TasScheduleConfig) -> Result<TasActivation> {
        self.require_capability(Capabilities::TSN_TAS, "time-aware shaper")?;
        validate_schedule(config)?;
        let adapter = self.adapter();
        let mut inner = adapter.lock();
        ensure_ptp_ready(&mut inner, adapter.profile(), adapter.config())?;
        let (io, shadow) = inner.regs_and_shadow()?;
        start_schedule(io, shadow, config, adapter.config().tas_min_lead_ns)
    }

    /// Turn the stored gate schedule on or off.
    ///
    /// Enabling restarts the last accepted schedule at its next cycle
    /// boundary and is rejected when none was ever accepted. Disabling
    /// always succeeds and keeps the stored schedule.
    pub fn set_tas_enabled(&self, enable: bool) -> Result<()> {
        self.require_capability(Capabilities::TSN_TAS, "time-aware shaper")?;
        let adapter = self.adapter();
        let mut inner = adapter.lock();
        if enable {
            let Some((config, _)) = inner.shadow.tas else {
                return Err(AvbError::rejected("no gate schedule has been programmed"));
            };
            ensure_ptp_ready(&mut inner, adapter.profile(), adapter.config())?;
            let (io, shadow) = inner.regs_and_shadow()?;
            start_schedule(io, shadow, &config, adapter.config().tas_min_lead_ns)?;
            return Ok(());
        }

        inner.shadow.tas_enabled = false;
        if let Ok((io, shadow)) = inner.regs_and_shadow() {
            sync_tqavctrl(io, shadow)?;
        }
        tracing::info!("TAS schedule disabled");
        Ok(())
    }

    /// Last accepted schedule and how it was activated
    #[must_use]
    pub fn tas_schedule(&self) -> Option<(TasScheduleConfig, TasActivation)> {
        self.adapter().lock().shadow.tas
    }

    /// Whether the gate schedule is running
    #[must_use]
    pub fn tas_enabled(&self) -> bool {
        self.adapter().lock().shadow.tas_enabled
    }
}
