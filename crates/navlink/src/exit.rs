use std::fmt;
use std::io;

use navlink_catalog::CatalogError;
use navlink_device::DeviceError;
use navlink_dispatch::DispatchError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(USAGE, message)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::InvalidData => DATA_INVALID,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn catalog_error(context: &str, err: CatalogError) -> CliError {
    CliError::usage(format!("{context}: {err}"))
}

pub fn device_error(context: &str, err: DeviceError) -> CliError {
    match err {
        DeviceError::Io { source, .. } => io_error(context, source),
        DeviceError::Json { .. }
        | DeviceError::Checksum { .. }
        | DeviceError::InvalidSetting { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
    }
}

pub fn dispatch_error(context: &str, err: DispatchError) -> CliError {
    let code = match &err {
        DispatchError::UnknownOutputCode(_) => USAGE,
        DispatchError::InvalidType(_) | DispatchError::PayloadTooLarge { .. } => DATA_INVALID,
        DispatchError::Handler { .. }
        | DispatchError::OutputBuilder { .. }
        | DispatchError::PersistSelection { .. } => FAILURE,
        DispatchError::NoPendingInput | DispatchError::NoActiveOutput => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}
