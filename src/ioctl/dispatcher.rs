use std::fmt;
use std::sync::Arc;

use super::codes::Command;
use super::wire::{
    AuxTimestampWire, ClockConfigWire, DeviceInfoWire, EnumWire, FREQUENCY_USE_PPB, FpWire,
    FrequencyWire, HwStateWire, HwTimestampingWire, MdioWire, OpenWire, PhcOffsetWire, PtmWire,
    QavWire, QueueTimestampWire, RegisterWire, RxTimestampWire, TargetTimeWire, TasWire,
    TimestampWire, VersionWire, WireStruct,
};
use crate::error::{AvbError, Result, STATUS_SUCCESS};
use crate::registry::{AdapterRegistry, AdapterSession};
use crate::state::HardwareState;
use crate::types::{CbsShaperConfig, FramePreemptionConfig, PtmConfig};

/// Interface version reported by `GET_VERSION`.
pub const INTERFACE_VERSION: (u16, u16) = (1, 0);

/// One open control handle.
///
/// Each handle carries its own adapter selection. Until `OPEN_ADAPTER`
/// succeeds, requests go to the adapter at ordinal 0.
pub struct ControlHandle {
    registry: Arc<AdapterRegistry>,
    session: Option<AdapterSession>,
}

impl ControlHandle {
    /// Open a handle on `registry` with nothing selected
    #[must_use]
    pub fn new(registry: Arc<AdapterRegistry>) -> Self {
        Self {
            registry,
            session: None,
        }
    }

    /// Session this handle talks to, selecting ordinal 0 on first use
    pub fn session(&mut self) -> Result<AdapterSession> {
        if let Some(session) = &self.session {
            return Ok(session.clone());
        }
        let session = self.registry.select_ordinal(0)?;
        self.session = Some(session.clone());
        Ok(session)
    }

    /// Handle one control request in place.
    ///
    /// `buf` holds the request structure on entry and the response on
    /// return. Returns the number of bytes of response. Transport-level
    /// failures (unknown code, short buffer) and failures of requests whose
    /// structure has no `status` word come back as `Err`; everything else
    /// is reported through `status`.
    pub fn control(&mut self, code: u32, buf: &mut [u8]) -> Result<usize> {
        let command = Command::from_code(code).ok_or(AvbError::UnknownCommand { code })?;
        tracing::trace!(?command, len = buf.len(), "Control request");
        match command {
            Command::InitDevice => {
                let state = self.session()?.initialize()?;
                tracing::debug!(%state, "Device initialized");
                Ok(0)
            }
            Command::GetVersion => self.exchange(buf, |_, _: VersionWire| {
                Ok(VersionWire {
                    major: INTERFACE_VERSION.0,
                    minor: INTERFACE_VERSION.1,
                })
            }),
            Command::GetDeviceInfo => self.exchange(buf, |h, req: DeviceInfoWire| {
                Ok(DeviceInfoWire {
                    info: h.session()?.device_info()?,
                    ..req
                })
            }),
            Command::EnumAdapters => self.exchange(buf, |h, req: EnumWire| {
                let found = h.registry.enumerate(req.index)?;
                Ok(EnumWire {
                    index: req.index,
                    count: found.count,
                    vendor_id: found.descriptor.vendor_id,
                    device_id: found.descriptor.device_id,
                    capabilities: found.descriptor.capabilities.bits(),
                    status: STATUS_SUCCESS,
                })
            }),
            Command::OpenAdapter => self.exchange(buf, |h, req: OpenWire| {
                let session = h.registry.select(req.vendor_id, req.device_id)?;
                h.session = Some(session);
                Ok(req)
            }),
            Command::GetHwState => self.exchange(buf, |h, _: HwStateWire| {
                let snapshot = h.session().map(|s| s.query_state()).unwrap_or_default();
                Ok(HwStateWire {
                    hw_state: snapshot.state.as_u32(),
                    vendor_id: snapshot.vendor_id,
                    device_id: snapshot.device_id,
                    capabilities: snapshot.capabilities.bits(),
                    reserved: 0,
                })
            }),
            Command::ReadRegister => self.exchange(buf, |h, req: RegisterWire| {
                let value = h.session()?.read_register(req.offset)?;
                Ok(RegisterWire { value, ..req })
            }),
            Command::WriteRegister => self.exchange(buf, |h, req: RegisterWire| {
                h.session()?.write_register(req.offset, req.value)?;
                Ok(req)
            }),
            Command::MdioRead => self.exchange(buf, |h, req: MdioWire| {
                let value = h.session()?.mdio_read(req.page, req.reg)?;
                Ok(MdioWire { value, ..req })
            }),
            Command::MdioWrite => self.exchange(buf, |h, req: MdioWire| {
                h.session()?.mdio_write(req.page, req.reg, req.value)?;
                Ok(req)
            }),
            Command::GetTimestamp => self.exchange(buf, |h, req: TimestampWire| {
                check_clock_id(req.clock_id)?;
                let session = h.clock_session()?;
                Ok(TimestampWire {
                    timestamp: session.get_systime()?,
                    ..req
                })
            }),
            Command::SetTimestamp => self.exchange(buf, |h, req: TimestampWire| {
                check_clock_id(req.clock_id)?;
                h.clock_session()?.set_systime(req.timestamp)?;
                Ok(req)
            }),
            Command::PhcOffsetAdjust => self.exchange(buf, |h, req: PhcOffsetWire| {
                h.session()?.adjust_systime(req.offset_ns)?;
                Ok(req)
            }),
            Command::AdjustFrequency => self.exchange(buf, |h, req: FrequencyWire| {
                let session = h.session()?;
                let change = if req.flags & FREQUENCY_USE_PPB != 0 {
                    session.adjust_frequency(i64::from(req.ppb))?
                } else {
                    session.set_increment(req.increment_ns, req.increment_frac)?
                };
                Ok(FrequencyWire {
                    previous: change.previous,
                    current: change.current,
                    ..req
                })
            }),
            Command::GetClockConfig => self.exchange(buf, |h, _: ClockConfigWire| {
                let config = h.session()?.get_clock_config()?;
                Ok(ClockConfigWire {
                    systim: config.systim,
                    timinca: config.timinca,
                    tsauxc: config.tsauxc,
                    clock_rate_mhz: config.clock_rate_mhz,
                    status: STATUS_SUCCESS,
                })
            }),
            Command::SetHwTimestamping => self.exchange(buf, |h, req: HwTimestampingWire| {
                let control = h.session()?.set_hw_timestamping(
                    req.enable,
                    req.timer_mask,
                    req.enable_target_time,
                    req.enable_aux_ts,
                )?;
                Ok(HwTimestampingWire {
                    previous_tsauxc: control.previous,
                    current_tsauxc: control.current,
                    ..req
                })
            }),
            Command::SetRxTimestamp => self.exchange(buf, |h, req: RxTimestampWire| {
                let change = h.session()?.set_rx_timestamp(req.enable)?;
                Ok(RxTimestampWire {
                    previous: change.previous,
                    current: change.current,
                    requires_reset: change.requires_reset,
                    ..req
                })
            }),
            Command::SetQueueTimestamp => self.exchange(buf, |h, req: QueueTimestampWire| {
                let change = h.session()?.set_queue_timestamp(req.queue_index, req.enable)?;
                Ok(QueueTimestampWire {
                    previous: change.previous,
                    current: change.current,
                    ..req
                })
            }),
            Command::SetTargetTime => self.exchange(buf, |h, req: TargetTimeWire| {
                let slot = h.session()?.set_target_time(
                    req.timer_index,
                    req.target_time,
                    req.enable_interrupt,
                    req.enable_sdp_output,
                )?;
                Ok(TargetTimeWire {
                    previous_target: slot.previous_target_ns,
                    ..req
                })
            }),
            Command::GetAuxTimestamp => self.exchange(buf, |h, req: AuxTimestampWire| {
                let aux = h.session()?.get_aux_timestamp(req.timer_index, req.clear_flag)?;
                Ok(AuxTimestampWire {
                    timestamp: aux.timestamp_ns,
                    valid: aux.valid,
                    ..req
                })
            }),
            Command::SetupTas => self.exchange(buf, |h, req: TasWire| {
                h.session()?.configure_tas(&req.config)?;
                Ok(req)
            }),
            Command::SetupQav => self.exchange(buf, |h, req: QavWire| {
                let traffic_class = u8::try_from(req.traffic_class).map_err(|_| {
                    AvbError::invalid("traffic_class", format!("{} is not a class", req.traffic_class))
                })?;
                h.session()?.configure_cbs(&CbsShaperConfig {
                    traffic_class,
                    idle_slope: req.idle_slope,
                    send_slope: req.send_slope,
                    hi_credit: req.hi_credit,
                    lo_credit: req.lo_credit,
                })?;
                Ok(req)
            }),
            Command::SetupFp => self.exchange(buf, |h, req: FpWire| {
                h.session()?.configure_frame_preemption(&FramePreemptionConfig {
                    preemptable_queue_mask: req.preemptable_queues,
                    min_fragment_size: req.min_fragment_size,
                    verify_disable: req.verify_disable,
                })?;
                Ok(req)
            }),
            Command::SetupPtm => self.exchange(buf, |h, req: PtmWire| {
                h.session()?.configure_ptm(&PtmConfig {
                    enabled: req.enabled,
                    clock_granularity: req.clock_granularity,
                })?;
                Ok(req)
            }),
        }
    }

    /// Encode `request`, run it through [`Self::control`] and decode the response
    pub fn request<T: WireStruct>(&mut self, command: Command, request: &T) -> Result<T> {
        let mut buf = vec![0u8; T::SIZE];
        request.encode(&mut buf)?;
        self.control(command.code(), &mut buf)?;
        T::decode(&buf)
    }

    /// Session for the timestamp commands, promoted towards `PTP_READY` if needed
    fn clock_session(&mut self) -> Result<AdapterSession> {
        let session = self.session()?;
        if session.query_state().state < HardwareState::PtpReady {
            let state = session.initialize()?;
            tracing::debug!(%state, "Clock request promoted adapter");
        }
        Ok(session)
    }

    /// Decode, handle, then write the response and its status.
    ///
    /// The size check happens in `decode`, before the handler runs.
    fn exchange<T, F>(&mut self, buf: &mut [u8], handler: F) -> Result<usize>
    where
        T: WireStruct,
        F: FnOnce(&mut Self, T) -> Result<T>,
    {
        let request = T::decode(buf)?;
        match handler(self, request) {
            Ok(response) => {
                response.encode(buf)?;
                super::wire::write_status::<T>(buf, STATUS_SUCCESS)?;
            }
            Err(err) if T::STATUS_OFFSET.is_some() => {
                tracing::debug!(
                    error = %err,
                    status = format_args!("{:#010x}", err.status_code()),
                    "Control request failed"
                );
                super::wire::write_status::<T>(buf, err.status_code())?;
            }
            Err(err) => return Err(err),
        }
        Ok(T::SIZE)
    }
}

fn check_clock_id(clock_id: u32) -> Result<()> {
    if clock_id != 0 {
        return Err(AvbError::invalid(
            "clock_id",
            format!("{clock_id} is not a clock instance"),
        ));
    }
    Ok(())
}

impl fmt::Debug for ControlHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlHandle")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
