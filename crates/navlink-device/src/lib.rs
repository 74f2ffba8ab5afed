//! Simulated navlink device.
//!
//! [`SimDevice`] implements every collaborator trait a dispatch
//! [`Session`](navlink_dispatch::Session) calls out to: user parameters with
//! validation, a JSON settings file standing in for flash, and telemetry
//! builders fed from a [`NavSnapshot`].

pub mod config;
pub mod device;
pub mod error;
pub mod nav;
pub mod settings;
pub mod store;

pub use config::DeviceConfig;
pub use device::{Clock, SimDevice};
pub use error::{DeviceError, ParamRejection, Result};
pub use nav::{GpsFix, NavSnapshot};
pub use settings::{UserParam, UserSettings, PARAM_BLOCK_SIZE, PARAM_COUNT};
pub use store::{SettingsFile, MAX_SETTINGS_FILE_SIZE, SETTINGS_FILE_VERSION};
