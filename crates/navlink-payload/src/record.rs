use bytes::{Buf, BufMut};

use crate::error::{PayloadError, Result};

/// Three-axis value as carried on the wire.
pub type Vec3 = [f32; 3];

/// A packed little-endian record with a size known at compile time.
pub trait FixedRecord: Sized {
    /// Encoded size in bytes.
    const SIZE: usize;

    /// Write exactly [`Self::SIZE`] bytes.
    fn put<B: BufMut>(&self, dst: &mut B);

    /// Read exactly [`Self::SIZE`] bytes.
    fn get<B: Buf>(src: &mut B) -> Self;

    /// Encode at the start of `dst`, returning the number of bytes written.
    fn encode_into(&self, dst: &mut [u8]) -> Result<usize> {
        if dst.len() < Self::SIZE {
            return Err(PayloadError::BufferTooSmall {
                needed: Self::SIZE,
                available: dst.len(),
            });
        }
        let mut cursor = &mut dst[..Self::SIZE];
        self.put(&mut cursor);
        Ok(Self::SIZE)
    }

    /// Decode from the start of `src`. Trailing bytes are ignored.
    fn decode_from(src: &[u8]) -> Result<Self> {
        if src.len() < Self::SIZE {
            return Err(PayloadError::Truncated {
                needed: Self::SIZE,
                actual: src.len(),
            });
        }
        let mut cursor = &src[..Self::SIZE];
        Ok(Self::get(&mut cursor))
    }
}

pub(crate) fn put_vec3<B: BufMut>(dst: &mut B, v: &Vec3) {
    for axis in v {
        dst.put_f32_le(*axis);
    }
}

pub(crate) fn get_vec3<B: Buf>(src: &mut B) -> Vec3 {
    [src.get_f32_le(), src.get_f32_le(), src.get_f32_le()]
}

pub(crate) fn put_flag<B: BufMut>(dst: &mut B, flag: bool) {
    dst.put_u8(u8::from(flag));
}

pub(crate) fn get_flag<B: Buf>(src: &mut B) -> bool {
    src.get_u8() != 0
}
