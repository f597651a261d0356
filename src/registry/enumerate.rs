use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use super::adapter::Adapter;
use super::device::{AdapterDescriptor, DeviceFamily};
use super::session::AdapterSession;
use crate::error::{AvbError, Result};
use crate::hal::RegisterIo;
use crate::types::DriverConfig;

/// A PCI function found by the host bus scan, before classification
pub struct ProbedDevice {
    /// PCI vendor ID
    pub vendor_id: u16,
    /// PCI device ID
    pub device_id: u16,
    /// BAR0 access for the function
    pub io: Box<dyn RegisterIo>,
}

impl ProbedDevice {
    /// Wrap a probed function
    pub fn new(vendor_id: u16, device_id: u16, io: impl RegisterIo + 'static) -> Self {
        Self {
            vendor_id,
            device_id,
            io: Box::new(io),
        }
    }
}

impl fmt::Debug for ProbedDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProbedDevice")
            .field("vendor_id", &format_args!("{:#06x}", self.vendor_id))
            .field("device_id", &format_args!("{:#06x}", self.device_id))
            .finish_non_exhaustive()
    }
}

/// One `enumerate` result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Enumerated {
    /// The adapter at the requested ordinal
    pub descriptor: AdapterDescriptor,
    /// Total adapter count as of the last refresh
    pub count: u32,
}

/// Ordered, index-stable list of recognized adapters
pub struct AdapterRegistry {
    config: Arc<DriverConfig>,
    adapters: RwLock<Vec<Arc<Adapter>>>,
    published: AtomicU32,
}

impl AdapterRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new(config: DriverConfig) -> Self {
        Self {
            config: Arc::new(config),
            adapters: RwLock::new(Vec::new()),
            published: AtomicU32::new(0),
        }
    }

    /// Create a registry from a bus scan; unrecognized functions are skipped
    pub fn with_devices(config: DriverConfig, devices: impl IntoIterator<Item = ProbedDevice>) -> Self {
        let registry = Self::new(config);
        for device in devices {
            registry.attach(device);
        }
        registry.refresh();
        registry
    }

    /// Driver configuration shared by every adapter
    #[must_use]
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Append a newly probed function (hot-plug).
    ///
    /// Returns the published descriptor, or `None` when the vendor/device
    /// pair is not a supported Intel part. The new adapter is visible to
    /// `select` immediately and to `enumerate` after the next refresh.
    pub fn attach(&self, device: ProbedDevice) -> Option<AdapterDescriptor> {
        let Some(family) = DeviceFamily::identify(device.vendor_id, device.device_id) else {
            tracing::debug!(?device, "Skipping unsupported PCI function");
            return None;
        };
        let mut adapters = self.adapters.write().unwrap_or_else(PoisonError::into_inner);
        let descriptor = AdapterDescriptor {
            vendor_id: device.vendor_id,
            device_id: device.device_id,
            capabilities: family.profile().capabilities,
            ordinal: u32::try_from(adapters.len()).unwrap_or(u32::MAX),
            family,
        };
        tracing::info!(
            ordinal = descriptor.ordinal,
            vendor_id = format_args!("{:#06x}", descriptor.vendor_id),
            device_id = format_args!("{:#06x}", descriptor.device_id),
            ?family,
            "Adapter attached"
        );
        adapters.push(Arc::new(Adapter::new(
            descriptor,
            device.io,
            Arc::clone(&self.config),
        )));
        Some(descriptor)
    }

    /// Adapter count as of the last refresh
    #[must_use]
    pub fn count(&self) -> u32 {
        self.published.load(Ordering::Acquire)
    }

    fn refresh(&self) -> u32 {
        let len = self.adapters.read().unwrap_or_else(PoisonError::into_inner).len();
        let count = u32::try_from(len).unwrap_or(u32::MAX);
        self.published.store(count, Ordering::Release);
        count
    }

    /// Adapter at a stable ordinal. Index 0 refreshes the count.
    pub fn enumerate(&self, index: u32) -> Result<Enumerated> {
        let count = if index == 0 { self.refresh() } else { self.count() };
        if index >= count {
            return Err(AvbError::NotFound {
                what: format!("adapter index {index} (count {count})"),
            });
        }
        let adapters = self.adapters.read().unwrap_or_else(PoisonError::into_inner);
        let descriptor = adapters
            .get(index as usize)
            .map(|a| a.descriptor())
            .ok_or_else(|| AvbError::NotFound {
                what: format!("adapter index {index}"),
            })?;
        Ok(Enumerated { descriptor, count })
    }

    /// Bind a session to the first adapter matching the pair.
    ///
    /// [`super::WILDCARD_ID`] in either field matches anything.
    pub fn select(&self, vendor_id: u16, device_id: u16) -> Result<AdapterSession> {
        let adapters = self.adapters.read().unwrap_or_else(PoisonError::into_inner);
        let adapter = adapters
            .iter()
            .find(|a| a.descriptor().matches(vendor_id, device_id))
            .ok_or_else(|| AvbError::NotFound {
                what: format!("adapter {vendor_id:04x}:{device_id:04x}"),
            })?;
        tracing::debug!(ordinal = adapter.descriptor().ordinal, "Adapter selected");
        Ok(AdapterSession::new(Arc::clone(adapter)))
    }

    /// Bind a session to the adapter at `ordinal`
    pub fn select_ordinal(&self, ordinal: u32) -> Result<AdapterSession> {
        let adapters = self.adapters.read().unwrap_or_else(PoisonError::into_inner);
        adapters
            .get(ordinal as usize)
            .map(|a| AdapterSession::new(Arc::clone(a)))
            .ok_or_else(|| AvbError::NotFound {
                what: format!("adapter index {ordinal}"),
            })
    }
}

impl fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("count", &self.count())
            .finish_non_exhaustive()
    }
}
