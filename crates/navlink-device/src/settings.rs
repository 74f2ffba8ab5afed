//! User parameter table.
//!
//! Slots are addressed by index and carried on the wire as `u64`. The first
//! two slots are derived (checksum and block size) and refuse writes.

use navlink_catalog::{PacketCatalog, PacketCode};
use navlink_payload::USER_PARAM_COUNT;
use serde::{Deserialize, Serialize};

use crate::error::ParamRejection;

/// Number of user parameter slots.
pub const PARAM_COUNT: usize = USER_PARAM_COUNT;

/// Size in bytes of the parameter block reported by the `DataSize` slot.
pub const PARAM_BLOCK_SIZE: u64 = (PARAM_COUNT * 8) as u64;

pub const BAUD_RATES: [u64; 4] = [38_400, 57_600, 115_200, 230_400];
pub const PACKET_RATES: [u64; 10] = [0, 1, 2, 5, 10, 20, 25, 50, 100, 200];
pub const LPF_CUTOFFS: [u64; 8] = [0, 2, 5, 10, 20, 25, 40, 50];
pub const MAX_ORIENTATION: u64 = 0xFFFF;

/// CRC-16/CCITT-FALSE (IBM-3740) over the parameter block.
const PARAM_CRC: crc::Crc<u16> = crc::Crc::<u16>::new(&crc::CRC_16_IBM_3740);

/// A user parameter slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UserParam {
    DataCrc,
    DataSize,
    BaudRate,
    PacketCode,
    PacketRate,
    AccelLpf,
    RateLpf,
    Orientation,
}

impl UserParam {
    /// Every slot in index order.
    pub const ALL: [UserParam; PARAM_COUNT] = [
        UserParam::DataCrc,
        UserParam::DataSize,
        UserParam::BaudRate,
        UserParam::PacketCode,
        UserParam::PacketRate,
        UserParam::AccelLpf,
        UserParam::RateLpf,
        UserParam::Orientation,
    ];

    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn index(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            UserParam::DataCrc => "data_crc",
            UserParam::DataSize => "data_size",
            UserParam::BaudRate => "baud_rate",
            UserParam::PacketCode => "packet_code",
            UserParam::PacketRate => "packet_rate",
            UserParam::AccelLpf => "accel_lpf",
            UserParam::RateLpf => "rate_lpf",
            UserParam::Orientation => "orientation",
        }
    }

    pub fn is_read_only(self) -> bool {
        matches!(self, UserParam::DataCrc | UserParam::DataSize)
    }
}

/// Writable user settings.
///
/// The derived slots are computed on read and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub baud_rate: u64,
    pub packet_code: PacketCode,
    pub packet_rate: u64,
    pub accel_lpf: u64,
    pub rate_lpf: u64,
    pub orientation: u64,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            baud_rate: 115_200,
            packet_code: PacketCode::ascii(b"z1"),
            packet_rate: 100,
            accel_lpf: 25,
            rate_lpf: 25,
            orientation: 0,
        }
    }
}

impl UserSettings {
    /// Current wire value of a slot.
    pub fn value(&self, param: UserParam) -> u64 {
        match param {
            UserParam::DataCrc => u64::from(self.checksum()),
            UserParam::DataSize => PARAM_BLOCK_SIZE,
            UserParam::BaudRate => self.baud_rate,
            UserParam::PacketCode => u64::from(self.packet_code.as_u16()),
            UserParam::PacketRate => self.packet_rate,
            UserParam::AccelLpf => self.accel_lpf,
            UserParam::RateLpf => self.rate_lpf,
            UserParam::Orientation => self.orientation,
        }
    }

    /// Every slot value in index order.
    pub fn values(&self) -> [u64; PARAM_COUNT] {
        UserParam::ALL.map(|param| self.value(param))
    }

    /// Check a write without applying it.
    pub fn check(param: UserParam, value: u64) -> Result<(), ParamRejection> {
        let allowed = match param {
            UserParam::DataCrc | UserParam::DataSize => {
                return Err(ParamRejection::ReadOnly(param.name()));
            }
            UserParam::BaudRate => BAUD_RATES.contains(&value),
            UserParam::PacketCode => u16::try_from(value)
                .ok()
                .map(PacketCode::from_u16)
                .is_some_and(|code| PacketCatalog::standard().lookup_output(code).is_some()),
            UserParam::PacketRate => PACKET_RATES.contains(&value),
            UserParam::AccelLpf | UserParam::RateLpf => LPF_CUTOFFS.contains(&value),
            UserParam::Orientation => value <= MAX_ORIENTATION,
        };

        if allowed {
            Ok(())
        } else {
            Err(ParamRejection::InvalidValue {
                param: param.name(),
                value,
            })
        }
    }

    /// Check every writable slot, as after loading from storage.
    pub fn validate(&self) -> Result<(), ParamRejection> {
        UserParam::ALL
            .iter()
            .filter(|param| !param.is_read_only())
            .try_for_each(|param| Self::check(*param, self.value(*param)))
    }

    /// Validate and apply a single write.
    pub fn set(&mut self, param: UserParam, value: u64) -> Result<(), ParamRejection> {
        Self::check(param, value)?;
        self.store(param, value);
        Ok(())
    }

    /// Apply consecutive slots starting at `first`.
    ///
    /// Read-only slots in the range are skipped. Every other value is checked
    /// before any is applied; on rejection nothing changes and the position
    /// of the offending value within `values` is returned.
    pub fn apply_range(
        &mut self,
        first: u32,
        values: &[u64],
    ) -> Result<(), (usize, ParamRejection)> {
        let mut writes = Vec::with_capacity(values.len());
        for (position, value) in values.iter().copied().enumerate() {
            let index = u64::from(first) + position as u64;
            let param = u32::try_from(index)
                .ok()
                .and_then(UserParam::from_index)
                .ok_or((position, ParamRejection::UnknownParam(index as u32)))?;
            if param.is_read_only() {
                continue;
            }
            Self::check(param, value).map_err(|reason| (position, reason))?;
            writes.push((param, value));
        }

        for (param, value) in writes {
            self.store(param, value);
        }
        Ok(())
    }

    /// CRC-16/CCITT-FALSE over the writable slots, little-endian.
    pub fn checksum(&self) -> u16 {
        let mut bytes = Vec::with_capacity(PARAM_COUNT * 8);
        for param in UserParam::ALL.iter().filter(|param| !param.is_read_only()) {
            bytes.extend_from_slice(&self.value(*param).to_le_bytes());
        }
        PARAM_CRC.checksum(&bytes)
    }

    fn store(&mut self, param: UserParam, value: u64) {
        match param {
            UserParam::DataCrc | UserParam::DataSize => {}
            UserParam::BaudRate => self.baud_rate = value,
            UserParam::PacketCode => self.packet_code = PacketCode::from_u16(value as u16),
            UserParam::PacketRate => self.packet_rate = value,
            UserParam::AccelLpf => self.accel_lpf = value,
            UserParam::RateLpf => self.rate_lpf = value,
            UserParam::Orientation => self.orientation = value,
        }
    }
}
