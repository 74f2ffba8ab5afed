use std::path::PathBuf;

/// Identity and storage location of a simulated device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Model string returned by ping.
    pub model: String,
    pub serial: u32,
    /// Version string returned by `gV`.
    pub firmware_version: String,
    /// Settings file; `None` keeps settings in memory only.
    pub settings_path: Option<PathBuf>,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            model: "NAVLINK-SIM".to_string(),
            serial: 1,
            firmware_version: format!("navlink-sim {}", env!("CARGO_PKG_VERSION")),
            settings_path: None,
        }
    }
}
