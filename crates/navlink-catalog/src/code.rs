use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CatalogError;

/// A two-byte user packet code as it appears in the packet header.
///
/// The numeric form packs the first byte into the high half, so `"pG"` is
/// `0x7047`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct PacketCode([u8; 2]);

impl PacketCode {
    /// Marker emitted when there is nothing to answer and nothing streaming.
    pub const IDLE: PacketCode = PacketCode([0, 0]);

    /// Create a code from its two wire bytes.
    pub const fn new(bytes: [u8; 2]) -> Self {
        Self(bytes)
    }

    /// Create a code from an ASCII literal such as `b"z1"`.
    pub const fn ascii(bytes: &[u8; 2]) -> Self {
        Self([bytes[0], bytes[1]])
    }

    /// Create a code from its packed numeric form.
    pub const fn from_u16(code: u16) -> Self {
        Self(code.to_be_bytes())
    }

    /// Packed numeric form, first byte high.
    pub const fn as_u16(self) -> u16 {
        u16::from_be_bytes(self.0)
    }

    /// The two wire bytes.
    pub const fn bytes(self) -> [u8; 2] {
        self.0
    }

    /// True for the `{0, 0}` marker.
    pub const fn is_idle(self) -> bool {
        self.0[0] == 0 && self.0[1] == 0
    }

    fn is_printable(self) -> bool {
        self.0.iter().all(|b| b.is_ascii_graphic())
    }
}

impl From<[u8; 2]> for PacketCode {
    fn from(bytes: [u8; 2]) -> Self {
        Self(bytes)
    }
}

impl From<u16> for PacketCode {
    fn from(code: u16) -> Self {
        Self::from_u16(code)
    }
}

impl From<PacketCode> for [u8; 2] {
    fn from(code: PacketCode) -> Self {
        code.0
    }
}

impl fmt::Display for PacketCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_printable() {
            write!(f, "{}{}", self.0[0] as char, self.0[1] as char)
        } else {
            write!(f, "0x{:04X}", self.as_u16())
        }
    }
}

impl FromStr for PacketCode {
    type Err = CatalogError;

    /// Accepts a two-character ASCII code (`"z1"`) or a hex form (`"0x7A31"`).
    /// A bare `"0x"` is the ASCII code `b"0x"`.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        if let Some(hex) = input
            .strip_prefix("0x")
            .or_else(|| input.strip_prefix("0X"))
            .filter(|hex| !hex.is_empty())
        {
            return u16::from_str_radix(hex, 16)
                .map(Self::from_u16)
                .map_err(|_| CatalogError::InvalidCode(input.to_string()));
        }

        match input.as_bytes() {
            [a, b] if a.is_ascii() && b.is_ascii() => Ok(Self([*a, *b])),
            _ => Err(CatalogError::InvalidCode(input.to_string())),
        }
    }
}

impl Serialize for PacketCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PacketCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_first_byte_high() {
        let code = PacketCode::ascii(b"pG");
        assert_eq!(code.as_u16(), 0x7047);
        assert_eq!(PacketCode::from_u16(0x7047), code);
        assert_eq!(code.bytes(), [0x70, 0x47]);
    }

    #[test]
    fn display_uses_ascii_when_printable() {
        assert_eq!(PacketCode::ascii(b"z1").to_string(), "z1");
        assert_eq!(PacketCode::IDLE.to_string(), "0x0000");
        assert_eq!(PacketCode::new([0xFF, 0x01]).to_string(), "0xFF01");
    }

    #[test]
    fn parses_ascii_and_hex_forms() {
        assert_eq!("a2".parse::<PacketCode>().unwrap(), PacketCode::ascii(b"a2"));
        assert_eq!(
            "0x7A31".parse::<PacketCode>().unwrap(),
            PacketCode::ascii(b"z1")
        );
        assert!("abc".parse::<PacketCode>().is_err());
        assert!("".parse::<PacketCode>().is_err());
        assert!("0xZZ".parse::<PacketCode>().is_err());
    }

    #[test]
    fn hex_prefix_lookalikes_are_ascii_codes() {
        for code in [PacketCode::ascii(b"0x"), PacketCode::ascii(b"0X")] {
            let text = code.to_string();
            assert_eq!(text.parse::<PacketCode>().unwrap(), code);

            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(serde_json::from_str::<PacketCode>(&json).unwrap(), code);
        }
        assert_eq!("0x0".parse::<PacketCode>().unwrap(), PacketCode::IDLE);
    }

    #[test]
    fn idle_marker() {
        assert!(PacketCode::IDLE.is_idle());
        assert!(!PacketCode::ascii(b"zT").is_idle());
    }
}
