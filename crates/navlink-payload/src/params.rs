//! User parameter request/response messages (`uC`, `uP`, `uA`, `gC`, `gP`, `gA`).
//!
//! Parameters are `u64` slots addressed by index. Range requests carry a count
//! and a first index followed by the values.

use bytes::{Buf, BufMut};
use serde::Serialize;

use crate::error::{PayloadError, Result};
use crate::record::FixedRecord;

/// Number of user parameter slots.
pub const USER_PARAM_COUNT: usize = 8;

/// Every value accepted.
pub const STATUS_OK: i32 = 0;
/// Single-parameter update refused (read-only slot or invalid value).
pub const STATUS_REJECTED: i32 = -1;

const RANGE_HEADER_SIZE: usize = 8;

fn check_range(first: u32, num: u32) -> Result<()> {
    let end = u64::from(first) + u64::from(num);
    if num == 0 || end > USER_PARAM_COUNT as u64 {
        return Err(PayloadError::ParamRange {
            first,
            end,
            count: USER_PARAM_COUNT,
        });
    }
    Ok(())
}

/// `gC` request: `num u32, first u32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RangeQuery {
    pub num: u32,
    pub first: u32,
}

impl RangeQuery {
    /// Decode and check that the range lies inside the parameter table.
    pub fn decode_checked(src: &[u8]) -> Result<Self> {
        let query = Self::decode_from(src)?;
        check_range(query.first, query.num)?;
        Ok(query)
    }

    pub fn indices(&self) -> std::ops::Range<usize> {
        let first = self.first as usize;
        first..first + self.num as usize
    }
}

impl FixedRecord for RangeQuery {
    const SIZE: usize = RANGE_HEADER_SIZE;

    fn put<B: BufMut>(&self, dst: &mut B) {
        dst.put_u32_le(self.num);
        dst.put_u32_le(self.first);
    }

    fn get<B: Buf>(src: &mut B) -> Self {
        Self {
            num: src.get_u32_le(),
            first: src.get_u32_le(),
        }
    }
}

/// `uC` request and `gC` response: `num u32, first u32, values u64 x num`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamRange {
    pub first: u32,
    pub values: Vec<u64>,
}

impl ParamRange {
    pub fn encoded_len(&self) -> usize {
        RANGE_HEADER_SIZE + self.values.len() * 8
    }

    pub fn decode(src: &[u8]) -> Result<Self> {
        let header = RangeQuery::decode_checked(src)?;
        let needed = RANGE_HEADER_SIZE + header.num as usize * 8;
        if src.len() < needed {
            return Err(PayloadError::Truncated {
                needed,
                actual: src.len(),
            });
        }

        let mut cursor = &src[RANGE_HEADER_SIZE..needed];
        let values = (0..header.num).map(|_| cursor.get_u64_le()).collect();
        Ok(Self {
            first: header.first,
            values,
        })
    }

    pub fn encode_into(&self, dst: &mut [u8]) -> Result<usize> {
        let needed = self.encoded_len();
        if dst.len() < needed {
            return Err(PayloadError::BufferTooSmall {
                needed,
                available: dst.len(),
            });
        }

        let mut cursor = &mut dst[..needed];
        cursor.put_u32_le(self.values.len() as u32);
        cursor.put_u32_le(self.first);
        for value in &self.values {
            cursor.put_u64_le(*value);
        }
        Ok(needed)
    }
}

/// `gP` request: `param u32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParamQuery {
    pub param: u32,
}

impl FixedRecord for ParamQuery {
    const SIZE: usize = 4;

    fn put<B: BufMut>(&self, dst: &mut B) {
        dst.put_u32_le(self.param);
    }

    fn get<B: Buf>(src: &mut B) -> Self {
        Self {
            param: src.get_u32_le(),
        }
    }
}

/// `uP` request and `gP` response: `param u32, value u64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParamValue {
    pub param: u32,
    pub value: u64,
}

impl FixedRecord for ParamValue {
    const SIZE: usize = 12;

    fn put<B: BufMut>(&self, dst: &mut B) {
        dst.put_u32_le(self.param);
        dst.put_u64_le(self.value);
    }

    fn get<B: Buf>(src: &mut B) -> Self {
        Self {
            param: src.get_u32_le(),
            value: src.get_u64_le(),
        }
    }
}

/// `uP` response: `param u32, status i32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParamStatus {
    pub param: u32,
    pub status: i32,
}

impl FixedRecord for ParamStatus {
    const SIZE: usize = 8;

    fn put<B: BufMut>(&self, dst: &mut B) {
        dst.put_u32_le(self.param);
        dst.put_i32_le(self.status);
    }

    fn get<B: Buf>(src: &mut B) -> Self {
        Self {
            param: src.get_u32_le(),
            status: src.get_i32_le(),
        }
    }
}

/// `uC` and `uA` response: `status i32`.
///
/// `0` when every value was applied, otherwise the 1-based position of the
/// first rejected value (and nothing was applied).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UpdateStatus {
    pub status: i32,
}

impl UpdateStatus {
    pub fn ok() -> Self {
        Self { status: STATUS_OK }
    }

    pub fn rejected_at(index: usize) -> Self {
        Self {
            status: index as i32 + 1,
        }
    }
}

impl FixedRecord for UpdateStatus {
    const SIZE: usize = 4;

    fn put<B: BufMut>(&self, dst: &mut B) {
        dst.put_i32_le(self.status);
    }

    fn get<B: Buf>(src: &mut B) -> Self {
        Self {
            status: src.get_i32_le(),
        }
    }
}

/// `uA` request and `gA` response: every slot in index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AllParams {
    pub values: [u64; USER_PARAM_COUNT],
}

impl FixedRecord for AllParams {
    const SIZE: usize = USER_PARAM_COUNT * 8;

    fn put<B: BufMut>(&self, dst: &mut B) {
        for value in &self.values {
            dst.put_u64_le(*value);
        }
    }

    fn get<B: Buf>(src: &mut B) -> Self {
        let mut values = [0u64; USER_PARAM_COUNT];
        for value in &mut values {
            *value = src.get_u64_le();
        }
        Self { values }
    }
}
