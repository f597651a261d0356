use thiserror::Error;

use crate::state::HardwareState;

/// Status word reported for a successful request.
pub const STATUS_SUCCESS: u32 = 0;
/// Status word for an absent adapter or enumeration slot.
pub const STATUS_NO_SUCH_DEVICE: u32 = 0xC000_000E;
/// Status word for an out-of-range request field.
pub const STATUS_INVALID_PARAMETER: u32 = 0xC000_000D;
/// Status word for an unmet hardware-state precondition.
pub const STATUS_ADAPTER_NOT_READY: u32 = 0xC001_0011;
/// Status word for a failed register access.
pub const STATUS_UNSUCCESSFUL: u32 = 0xC000_0001;
/// Status word for a configuration the hardware declined.
pub const STATUS_REQUEST_NOT_ACCEPTED: u32 = 0xC000_00D0;
/// Status word for a feature the selected family lacks.
pub const STATUS_NOT_SUPPORTED: u32 = 0xC000_00BB;
/// Status word for an undersized control buffer.
pub const STATUS_BUFFER_TOO_SMALL: u32 = 0xC000_0023;
/// Status word for an unknown control code.
pub const STATUS_INVALID_DEVICE_REQUEST: u32 = 0xC000_0010;

/// Errors produced by the adapter core and its control interface
#[derive(Debug, Error)]
pub enum AvbError {
    // ===== Registry Errors =====
    /// Enumeration index or vendor/device pair is not present
    #[error("not found: {what}")]
    NotFound {
        /// What was looked up
        what: String,
    },

    // ===== Validation Errors =====
    /// A request field is outside its legal domain
    #[error("invalid parameter: {name} - {message}")]
    InvalidParameter {
        /// The name of the parameter
        name: String,
        /// Description of the error
        message: String,
    },

    /// The adapter has not reached the state the operation needs
    #[error("adapter not ready: requires {required}, currently {current}")]
    NotReady {
        /// Minimum state the operation needs
        required: HardwareState,
        /// State the adapter is in
        current: HardwareState,
    },

    /// The selected device family lacks the capability
    #[error("not supported: {feature}")]
    NotSupported {
        /// The missing feature
        feature: String,
    },

    // ===== Hardware Errors =====
    /// A register access failed at the mapping or transport level
    #[error("hardware fault at {offset:#07x}: {message}")]
    HardwareFault {
        /// Register offset involved
        offset: u32,
        /// Description of the fault
        message: String,
    },

    /// A well-formed configuration was declined by the hardware
    #[error("rejected: {message}")]
    Rejected {
        /// Why the configuration was declined
        message: String,
    },

    // ===== Transport Errors =====
    /// Control buffer is smaller than the request structure
    #[error("buffer too small: need {needed} bytes, have {have}")]
    BufferTooSmall {
        /// Structure size
        needed: usize,
        /// Buffer size supplied
        have: usize,
    },

    /// Control code is not part of the command catalog
    #[error("unknown control code {code:#010x}")]
    UnknownCommand {
        /// The rejected code
        code: u32,
    },

    // ===== Configuration Errors =====
    /// Configuration file could not be read or written
    #[error("config I/O error: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("config format error: {0}")]
    ConfigFormat(#[from] serde_json::Error),
}

impl AvbError {
    /// Shorthand for an [`AvbError::InvalidParameter`]
    pub fn invalid(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Shorthand for an [`AvbError::HardwareFault`]
    pub fn fault(offset: u32, message: impl Into<String>) -> Self {
        Self::HardwareFault {
            offset,
            message: message.into(),
        }
    }

    /// Shorthand for an [`AvbError::Rejected`]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Shorthand for an [`AvbError::NotSupported`]
    pub fn unsupported(feature: impl Into<String>) -> Self {
        Self::NotSupported {
            feature: feature.into(),
        }
    }

    /// Status word carried in a control response for this error
    #[must_use]
    pub fn status_code(&self) -> u32 {
        match self {
            Self::NotFound { .. } => STATUS_NO_SUCH_DEVICE,
            Self::InvalidParameter { .. } => STATUS_INVALID_PARAMETER,
            Self::NotReady { .. } => STATUS_ADAPTER_NOT_READY,
            Self::NotSupported { .. } => STATUS_NOT_SUPPORTED,
            Self::HardwareFault { .. } | Self::ConfigIo(_) | Self::ConfigFormat(_) => {
                STATUS_UNSUCCESSFUL
            }
            Self::Rejected { .. } => STATUS_REQUEST_NOT_ACCEPTED,
            Self::BufferTooSmall { .. } => STATUS_BUFFER_TOO_SMALL,
            Self::UnknownCommand { .. } => STATUS_INVALID_DEVICE_REQUEST,
        }
    }

    /// Check if the caller may succeed by retrying after `initialize`
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NotReady { .. })
    }

    /// Check if the request never reached the device
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::BufferTooSmall { .. } | Self::UnknownCommand { .. }
        )
    }
}

/// Result type alias for adapter operations
pub type Result<T> = std::result::Result<T, AvbError>;
