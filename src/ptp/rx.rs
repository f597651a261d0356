use crate::error::{AvbError, Result};
use crate::hal::regs::{RX_QUEUE_COUNT, RXPBSIZE, RXPBSIZE_CFG_TS_EN, SRRCTL_TIMESTAMP, srrctl};
use crate::registry::{AdapterSession, Capabilities};
use crate::state::HardwareState;
use crate::types::{QueueTimestampChange, RxTimestampChange};

impl AdapterSession {
    /// Reserve (or release) receive buffer space for packet timestamps.
    ///
    /// Changing RXPBSIZE takes effect only after a port reset, reported as
    /// `requires_reset`.
    pub fn set_rx_timestamp(&self, enable: bool) -> Result<RxTimestampChange> {
        self.require_capability(Capabilities::BASIC_1588, "receive timestamping")?;
        let mut inner = self.adapter().lock();
        let io = inner.regs_at(HardwareState::BarMapped)?;
        let previous = io.read(RXPBSIZE)?;
        let value = if enable { RXPBSIZE_CFG_TS_EN } else { 0 };
        let current = io.modify(RXPBSIZE, RXPBSIZE_CFG_TS_EN, value)?;
        let requires_reset = previous != current;
        tracing::debug!(
            enable,
            previous = format_args!("{previous:#010x}"),
            current = format_args!("{current:#010x}"),
            requires_reset,
            "RX timestamp buffer updated"
        );
        Ok(RxTimestampChange {
            previous,
            current,
            requires_reset,
        })
    }

    /// Timestamp every packet received on `queue_index`
    pub fn set_queue_timestamp(&self, queue_index: u32, enable: bool) -> Result<QueueTimestampChange> {
        if queue_index >= RX_QUEUE_COUNT {
            return Err(AvbError::invalid(
                "queue_index",
                format!("{queue_index} >= {RX_QUEUE_COUNT}"),
            ));
        }
        self.require_capability(Capabilities::BASIC_1588, "receive timestamping")?;
        let mut inner = self.adapter().lock();
        let io = inner.regs_at(HardwareState::BarMapped)?;
        let offset = srrctl(queue_index);
        let previous = io.read(offset)?;
        let value = if enable { SRRCTL_TIMESTAMP } else { 0 };
        let current = io.modify(offset, SRRCTL_TIMESTAMP, value)?;
        tracing::debug!(queue_index, enable, "Queue timestamping updated");
        Ok(QueueTimestampChange {
            queue_index,
            previous,
            current,
        })
    }
}
