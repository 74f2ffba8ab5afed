use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DeviceError, Result};
use crate::settings::UserSettings;

/// Format version written to new settings files.
pub const SETTINGS_FILE_VERSION: u32 = 1;

/// Largest settings file accepted on load.
pub const MAX_SETTINGS_FILE_SIZE: u64 = 64 * 1024;

#[derive(Debug, Serialize, Deserialize)]
struct PersistedSettings {
    version: u32,
    crc: u16,
    settings: UserSettings,
}

/// JSON settings file standing in for device flash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsFile {
    path: PathBuf,
}

impl SettingsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read stored settings. A missing file is `Ok(None)`.
    pub fn load(&self) -> Result<Option<UserSettings>> {
        let file = match std::fs::File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(self.io_error(source)),
        };

        let mut content = String::new();
        file.take(MAX_SETTINGS_FILE_SIZE + 1)
            .read_to_string(&mut content)
            .map_err(|source| self.io_error(source))?;
        if content.len() as u64 > MAX_SETTINGS_FILE_SIZE {
            return Err(self.io_error(std::io::Error::new(
                ErrorKind::InvalidData,
                format!("settings file exceeds {MAX_SETTINGS_FILE_SIZE} bytes"),
            )));
        }

        let persisted: PersistedSettings =
            serde_json::from_str(&content).map_err(|source| DeviceError::Json {
                path: self.path.clone(),
                source,
            })?;

        let computed = persisted.settings.checksum();
        if computed != persisted.crc {
            return Err(DeviceError::Checksum {
                path: self.path.clone(),
                stored: persisted.crc,
                computed,
            });
        }

        persisted
            .settings
            .validate()
            .map_err(|source| DeviceError::InvalidSetting {
                path: self.path.clone(),
                source,
            })?;

        debug!(path = %self.path.display(), version = persisted.version, "loaded user settings");
        Ok(Some(persisted.settings))
    }

    /// Stored settings, or defaults when the file does not exist yet.
    pub fn load_or_default(&self) -> Result<UserSettings> {
        Ok(self.load()?.unwrap_or_default())
    }

    /// Write settings through a temporary file and rename it into place.
    pub fn save(&self, settings: &UserSettings) -> Result<()> {
        let persisted = PersistedSettings {
            version: SETTINGS_FILE_VERSION,
            crc: settings.checksum(),
            settings: settings.clone(),
        };
        let bytes = serde_json::to_vec_pretty(&persisted).map_err(|source| DeviceError::Json {
            path: self.path.clone(),
            source,
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }

        let tmp = self.tmp_path();
        std::fs::write(&tmp, &bytes).map_err(|source| DeviceError::Io {
            path: tmp.clone(),
            source,
        })?;
        if let Err(source) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(self.io_error(source));
        }

        debug!(path = %self.path.display(), crc = persisted.crc, "saved user settings");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> DeviceError {
        DeviceError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::UserParam;

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!(
                "navlink-device-{tag}-{}-{}",
                std::process::id(),
                std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .unwrap()
                    .as_nanos()
            ))
            .join("settings.json")
    }

    #[test]
    fn missing_file_loads_as_none() {
        let file = SettingsFile::new(temp_path("missing"));
        assert!(file.load().unwrap().is_none());
        assert_eq!(file.load_or_default().unwrap(), UserSettings::default());
    }

    #[test]
    fn save_then_load() {
        let path = temp_path("save");
        let file = SettingsFile::new(&path);
        let mut settings = UserSettings::default();
        settings.set(UserParam::BaudRate, 230_400).unwrap();

        file.save(&settings).unwrap();
        assert_eq!(file.load().unwrap(), Some(settings));
        assert!(!file.tmp_path().exists());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn tampered_file_fails_checksum() {
        let path = temp_path("tamper");
        let file = SettingsFile::new(&path);
        file.save(&UserSettings::default()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::write(&path, text.replace("115200", "57600")).unwrap();

        assert!(matches!(file.load(), Err(DeviceError::Checksum { .. })));
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn checksummed_but_invalid_settings_are_refused() {
        let path = temp_path("invalid");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let settings = UserSettings {
            baud_rate: 9_600,
            ..UserSettings::default()
        };
        let persisted = PersistedSettings {
            version: SETTINGS_FILE_VERSION,
            crc: settings.checksum(),
            settings,
        };
        std::fs::write(&path, serde_json::to_vec(&persisted).unwrap()).unwrap();

        let file = SettingsFile::new(&path);
        assert!(matches!(
            file.load(),
            Err(DeviceError::InvalidSetting { .. })
        ));
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn malformed_file_is_a_json_error() {
        let path = temp_path("malformed");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"{not json").unwrap();

        let file = SettingsFile::new(&path);
        assert!(matches!(file.load(), Err(DeviceError::Json { .. })));
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
