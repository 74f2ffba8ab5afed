use std::fmt;

use navlink_catalog::PacketCode;
use serde::Serialize;

use crate::error::{DispatchError, Result};

/// Largest user payload; the length field on the wire is one byte.
pub const MAX_PAYLOAD_LEN: usize = 255;

/// Routing class of a packet as seen by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PacketClass {
    /// A host request for a user input handler.
    UserIn,
    /// A user response or telemetry packet going out.
    UserOut,
}

/// A user packet: header code plus a bounded payload buffer.
///
/// Handlers edit the buffer in place and report the new length, so the whole
/// buffer stays addressable while [`Packet::payload`] exposes the used part.
#[derive(Clone)]
pub struct Packet {
    pub code: PacketCode,
    pub class: PacketClass,
    buf: [u8; MAX_PAYLOAD_LEN],
    len: usize,
}

impl Packet {
    /// Create an empty packet.
    pub fn new(code: PacketCode, class: PacketClass) -> Self {
        Self {
            code,
            class,
            buf: [0; MAX_PAYLOAD_LEN],
            len: 0,
        }
    }

    /// Create a host request carrying `payload`.
    pub fn request(code: PacketCode, payload: &[u8]) -> Result<Self> {
        let mut packet = Self::new(code, PacketClass::UserIn);
        packet.set_payload(payload)?;
        Ok(packet)
    }

    /// Create an empty outgoing packet.
    pub fn outgoing() -> Self {
        Self::new(PacketCode::IDLE, PacketClass::UserOut)
    }

    /// The used part of the payload.
    pub fn payload(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// The whole payload buffer, for in-place edits.
    pub fn buffer_mut(&mut self) -> &mut [u8] {
        &mut self.buf
    }

    /// Replace the payload.
    pub fn set_payload(&mut self, payload: &[u8]) -> Result<()> {
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(DispatchError::PayloadTooLarge {
                size: payload.len(),
                max: MAX_PAYLOAD_LEN,
            });
        }
        self.buf[..payload.len()].copy_from_slice(payload);
        self.len = payload.len();
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Set the used length after an in-place edit.
    pub fn set_len(&mut self, len: usize) -> Result<()> {
        if len > MAX_PAYLOAD_LEN {
            return Err(DispatchError::PayloadTooLarge {
                size: len,
                max: MAX_PAYLOAD_LEN,
            });
        }
        self.len = len;
        Ok(())
    }

    /// Drop the payload, leaving a zero-length packet.
    pub fn clear(&mut self) {
        self.len = 0;
    }
}

impl fmt::Debug for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Packet")
            .field("code", &self.code)
            .field("class", &self.class)
            .field("len", &self.len)
            .field("payload", &self.payload())
            .finish()
    }
}
