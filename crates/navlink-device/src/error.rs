use std::path::PathBuf;

/// Errors from the simulated device's settings storage.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// The settings file could not be read or written.
    #[error("settings I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The settings file is not valid settings JSON.
    #[error("invalid settings file {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The stored values pass the checksum but break parameter rules.
    #[error("settings file {path} holds an invalid value: {source}")]
    InvalidSetting {
        path: PathBuf,
        source: ParamRejection,
    },

    /// The stored checksum does not match the stored values.
    #[error("settings file {path} checksum mismatch (stored {stored:#06x}, computed {computed:#06x})")]
    Checksum {
        path: PathBuf,
        stored: u16,
        computed: u16,
    },
}

pub type Result<T> = std::result::Result<T, DeviceError>;

/// Why a user parameter write was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamRejection {
    /// No parameter at this index.
    #[error("no user parameter {0}")]
    UnknownParam(u32),

    /// The parameter is derived by the device.
    #[error("user parameter {0} is read-only")]
    ReadOnly(&'static str),

    /// The value is outside the parameter's allowed set.
    #[error("invalid value {value} for user parameter {param}")]
    InvalidValue { param: &'static str, value: u64 },
}
