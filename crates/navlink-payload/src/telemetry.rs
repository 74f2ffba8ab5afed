//! Continuous output records.
//!
//! `timer_ms` is the device millisecond timer and `time_s` the same instant in
//! seconds as a double, matching what the navigation filter timestamps with.

use bytes::{Buf, BufMut};
use serde::Serialize;

use crate::record::{get_flag, get_vec3, put_flag, put_vec3, FixedRecord, Vec3};

/// `zT` payload: a free-running tick counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TestRecord {
    pub counter: u32,
}

impl FixedRecord for TestRecord {
    const SIZE: usize = 4;

    fn put<B: BufMut>(&self, dst: &mut B) {
        dst.put_u32_le(self.counter);
    }

    fn get<B: Buf>(src: &mut B) -> Self {
        Self {
            counter: src.get_u32_le(),
        }
    }
}

/// `z1` payload: raw sensor triads.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SensorRecord {
    pub timer_ms: u32,
    pub accels: Vec3,
    pub rates: Vec3,
    pub mags: Vec3,
}

impl FixedRecord for SensorRecord {
    const SIZE: usize = 4 + 3 * 12;

    fn put<B: BufMut>(&self, dst: &mut B) {
        dst.put_u32_le(self.timer_ms);
        put_vec3(dst, &self.accels);
        put_vec3(dst, &self.rates);
        put_vec3(dst, &self.mags);
    }

    fn get<B: Buf>(src: &mut B) -> Self {
        Self {
            timer_ms: src.get_u32_le(),
            accels: get_vec3(src),
            rates: get_vec3(src),
            mags: get_vec3(src),
        }
    }
}

/// `z2` payload: fixed-content record used to exercise host parsers.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Data2Record {
    pub timer_ms: u32,
    pub tag: u8,
    pub short: i16,
    pub int: i32,
    pub seconds: u64,
    pub double: f64,
}

impl Data2Record {
    pub const TAG: u8 = b'A';
    pub const SHORT: i16 = 1234;
    pub const INT: i32 = -5;
    pub const DOUBLE: f64 = 1.23456789;

    /// Record for a device timestamp in microseconds.
    pub fn at(timestamp_us: u64) -> Self {
        Self {
            timer_ms: (timestamp_us / 1_000) as u32,
            tag: Self::TAG,
            short: Self::SHORT,
            int: Self::INT,
            seconds: timestamp_us / 1_000_000,
            double: Self::DOUBLE,
        }
    }
}

impl FixedRecord for Data2Record {
    const SIZE: usize = 4 + 1 + 2 + 4 + 8 + 8;

    fn put<B: BufMut>(&self, dst: &mut B) {
        dst.put_u32_le(self.timer_ms);
        dst.put_u8(self.tag);
        dst.put_i16_le(self.short);
        dst.put_i32_le(self.int);
        dst.put_u64_le(self.seconds);
        dst.put_f64_le(self.double);
    }

    fn get<B: Buf>(src: &mut B) -> Self {
        Self {
            timer_ms: src.get_u32_le(),
            tag: src.get_u8(),
            short: src.get_i16_le(),
            int: src.get_i32_le(),
            seconds: src.get_u64_le(),
            double: src.get_f64_le(),
        }
    }
}

/// `s1` payload: scaled sensors and board temperature.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScaledRecord {
    pub timer_ms: u32,
    pub time_s: f64,
    pub accels: Vec3,
    pub rates: Vec3,
    pub mags: Vec3,
    pub temperature: f32,
}

impl FixedRecord for ScaledRecord {
    const SIZE: usize = 4 + 8 + 3 * 12 + 4;

    fn put<B: BufMut>(&self, dst: &mut B) {
        dst.put_u32_le(self.timer_ms);
        dst.put_f64_le(self.time_s);
        put_vec3(dst, &self.accels);
        put_vec3(dst, &self.rates);
        put_vec3(dst, &self.mags);
        dst.put_f32_le(self.temperature);
    }

    fn get<B: Buf>(src: &mut B) -> Self {
        Self {
            timer_ms: src.get_u32_le(),
            time_s: src.get_f64_le(),
            accels: get_vec3(src),
            rates: get_vec3(src),
            mags: get_vec3(src),
            temperature: src.get_f32_le(),
        }
    }
}

/// `a1` payload: attitude with filter state switches.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AngleRecord {
    pub timer_ms: u32,
    pub time_s: f64,
    pub euler: Vec3,
    pub rates: Vec3,
    pub accels: Vec3,
    pub op_mode: u8,
    pub lin_accel_switch: bool,
    pub turn_switch: bool,
}

impl FixedRecord for AngleRecord {
    const SIZE: usize = 4 + 8 + 3 * 12 + 3;

    fn put<B: BufMut>(&self, dst: &mut B) {
        dst.put_u32_le(self.timer_ms);
        dst.put_f64_le(self.time_s);
        put_vec3(dst, &self.euler);
        put_vec3(dst, &self.rates);
        put_vec3(dst, &self.accels);
        dst.put_u8(self.op_mode);
        put_flag(dst, self.lin_accel_switch);
        put_flag(dst, self.turn_switch);
    }

    fn get<B: Buf>(src: &mut B) -> Self {
        Self {
            timer_ms: src.get_u32_le(),
            time_s: src.get_f64_le(),
            euler: get_vec3(src),
            rates: get_vec3(src),
            accels: get_vec3(src),
            op_mode: src.get_u8(),
            lin_accel_switch: get_flag(src),
            turn_switch: get_flag(src),
        }
    }
}

/// `a2` payload: attitude, corrected rates and accels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AttitudeRecord {
    pub timer_ms: u32,
    pub time_s: f64,
    pub euler: Vec3,
    pub rates: Vec3,
    pub accels: Vec3,
}

impl FixedRecord for AttitudeRecord {
    const SIZE: usize = 4 + 8 + 3 * 12;

    fn put<B: BufMut>(&self, dst: &mut B) {
        dst.put_u32_le(self.timer_ms);
        dst.put_f64_le(self.time_s);
        put_vec3(dst, &self.euler);
        put_vec3(dst, &self.rates);
        put_vec3(dst, &self.accels);
    }

    fn get<B: Buf>(src: &mut B) -> Self {
        Self {
            timer_ms: src.get_u32_le(),
            time_s: src.get_f64_le(),
            euler: get_vec3(src),
            rates: get_vec3(src),
            accels: get_vec3(src),
        }
    }
}

/// `d1` payload: which aiding sources the filter currently trusts.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AidStatusRecord {
    pub timer_ms: u32,
    pub time_s: f64,
    pub op_mode: u8,
    pub gps_valid: bool,
    pub odo_valid: bool,
    pub pps_detected: bool,
}

impl FixedRecord for AidStatusRecord {
    const SIZE: usize = 4 + 8 + 4;

    fn put<B: BufMut>(&self, dst: &mut B) {
        dst.put_u32_le(self.timer_ms);
        dst.put_f64_le(self.time_s);
        dst.put_u8(self.op_mode);
        put_flag(dst, self.gps_valid);
        put_flag(dst, self.odo_valid);
        put_flag(dst, self.pps_detected);
    }

    fn get<B: Buf>(src: &mut B) -> Self {
        Self {
            timer_ms: src.get_u32_le(),
            time_s: src.get_f64_le(),
            op_mode: src.get_u8(),
            gps_valid: get_flag(src),
            odo_valid: get_flag(src),
            pps_detected: get_flag(src),
        }
    }
}

/// `d2` payload: NED velocity used for aiding, m/s.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct VelocityAidRecord {
    pub timer_ms: u32,
    pub time_s: f64,
    pub velocity_ned: Vec3,
}

impl FixedRecord for VelocityAidRecord {
    const SIZE: usize = 4 + 8 + 12;

    fn put<B: BufMut>(&self, dst: &mut B) {
        dst.put_u32_le(self.timer_ms);
        dst.put_f64_le(self.time_s);
        put_vec3(dst, &self.velocity_ned);
    }

    fn get<B: Buf>(src: &mut B) -> Self {
        Self {
            timer_ms: src.get_u32_le(),
            time_s: src.get_f64_le(),
            velocity_ned: get_vec3(src),
        }
    }
}

/// `d3` payload: geodetic position used for aiding (degrees, metres).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PositionAidRecord {
    pub timer_ms: u32,
    pub time_s: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

impl FixedRecord for PositionAidRecord {
    const SIZE: usize = 4 + 8 + 3 * 8;

    fn put<B: BufMut>(&self, dst: &mut B) {
        dst.put_u32_le(self.timer_ms);
        dst.put_f64_le(self.time_s);
        dst.put_f64_le(self.latitude);
        dst.put_f64_le(self.longitude);
        dst.put_f64_le(self.altitude);
    }

    fn get<B: Buf>(src: &mut B) -> Self {
        Self {
            timer_ms: src.get_u32_le(),
            time_s: src.get_f64_le(),
            latitude: src.get_f64_le(),
            longitude: src.get_f64_le(),
            altitude: src.get_f64_le(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PayloadError;
    use navlink_catalog::{OutputKind, PacketCatalog};

    #[test]
    fn record_sizes_match_catalog_lengths() {
        let catalog = PacketCatalog::standard();
        let expected = [
            (OutputKind::Test, TestRecord::SIZE),
            (OutputKind::Data1, SensorRecord::SIZE),
            (OutputKind::Scaled1, ScaledRecord::SIZE),
            (OutputKind::Ang1, AngleRecord::SIZE),
            (OutputKind::Ang2, AttitudeRecord::SIZE),
            (OutputKind::Aid1, AidStatusRecord::SIZE),
            (OutputKind::Aid2, VelocityAidRecord::SIZE),
            (OutputKind::Aid3, PositionAidRecord::SIZE),
        ];
        for (kind, size) in expected {
            assert_eq!(catalog.payload_length_for(kind), Some(size), "{kind:?}");
        }
    }

    #[test]
    fn data2_layout_is_packed_little_endian() {
        let record = Data2Record::at(12_345_678_901);
        let mut buf = [0u8; Data2Record::SIZE];
        assert_eq!(record.encode_into(&mut buf).unwrap(), 27);

        assert_eq!(&buf[0..4], &12_345_678u32.to_le_bytes());
        assert_eq!(buf[4], b'A');
        assert_eq!(&buf[5..7], &1234i16.to_le_bytes());
        assert_eq!(&buf[7..11], &(-5i32).to_le_bytes());
        assert_eq!(&buf[11..19], &12_345u64.to_le_bytes());
        assert_eq!(&buf[19..27], &1.23456789f64.to_le_bytes());

        assert_eq!(Data2Record::decode_from(&buf).unwrap(), record);
    }

    #[test]
    fn angle_record_round_trips() {
        let record = AngleRecord {
            timer_ms: 42,
            time_s: 0.042,
            euler: [0.1, -0.2, 3.0],
            rates: [1.0, 2.0, 3.0],
            accels: [0.0, 0.0, -9.81],
            op_mode: 3,
            lin_accel_switch: true,
            turn_switch: false,
        };
        let mut buf = [0u8; 64];
        let len = record.encode_into(&mut buf).unwrap();
        assert_eq!(len, AngleRecord::SIZE);
        assert_eq!(buf[48], 3);
        assert_eq!(buf[49], 1);
        assert_eq!(buf[50], 0);
        assert_eq!(AngleRecord::decode_from(&buf[..len]).unwrap(), record);
    }

    fn encode_and_decode<R: FixedRecord + PartialEq + std::fmt::Debug>(record: &R) -> Vec<u8> {
        let mut buf = vec![0u8; R::SIZE + 8];
        let len = record.encode_into(&mut buf).unwrap();
        assert_eq!(len, R::SIZE);
        buf.truncate(len);
        assert_eq!(&R::decode_from(&buf).unwrap(), record);
        buf
    }

    #[test]
    fn test_record_round_trips() {
        let buf = encode_and_decode(&TestRecord { counter: 0xDEAD_BEEF });
        assert_eq!(buf, 0xDEAD_BEEFu32.to_le_bytes());
    }

    #[test]
    fn sensor_record_keeps_triad_order() {
        let record = SensorRecord {
            timer_ms: 7,
            accels: [0.5, -1.0, 9.81],
            rates: [0.01, 0.02, 0.03],
            mags: [20.0, -4.5, 41.0],
        };
        let buf = encode_and_decode(&record);
        assert_eq!(&buf[0..4], &7u32.to_le_bytes());
        assert_eq!(&buf[4..8], &0.5f32.to_le_bytes());
        assert_eq!(&buf[16..20], &0.01f32.to_le_bytes());
        assert_eq!(&buf[36..40], &41.0f32.to_le_bytes());
    }

    #[test]
    fn scaled_record_ends_with_temperature() {
        let record = ScaledRecord {
            timer_ms: 1_000,
            time_s: 1.0,
            accels: [0.0, 0.1, -9.8],
            rates: [1.5, 2.5, 3.5],
            mags: [-0.2, 0.3, 0.4],
            temperature: 36.6,
        };
        let buf = encode_and_decode(&record);
        assert_eq!(&buf[4..12], &1.0f64.to_le_bytes());
        assert_eq!(&buf[24..28], &1.5f32.to_le_bytes());
        assert_eq!(&buf[48..52], &36.6f32.to_le_bytes());
    }

    #[test]
    fn attitude_record_round_trips() {
        let record = AttitudeRecord {
            timer_ms: 250,
            time_s: 0.25,
            euler: [0.3, -0.1, 1.25],
            rates: [-0.5, 0.0, 0.5],
            accels: [0.2, 0.1, -9.7],
        };
        let buf = encode_and_decode(&record);
        assert_eq!(&buf[12..16], &0.3f32.to_le_bytes());
        assert_eq!(&buf[44..48], &(-9.7f32).to_le_bytes());
    }

    #[test]
    fn aid_status_flags_are_single_bytes() {
        let record = AidStatusRecord {
            timer_ms: 3,
            time_s: 0.003,
            op_mode: 2,
            gps_valid: true,
            odo_valid: false,
            pps_detected: true,
        };
        let buf = encode_and_decode(&record);
        assert_eq!(&buf[12..16], &[2, 1, 0, 1]);
    }

    #[test]
    fn velocity_aid_record_round_trips() {
        let record = VelocityAidRecord {
            timer_ms: 90,
            time_s: 0.09,
            velocity_ned: [12.5, -3.25, 0.75],
        };
        let buf = encode_and_decode(&record);
        assert_eq!(&buf[12..16], &12.5f32.to_le_bytes());
        assert_eq!(&buf[20..24], &0.75f32.to_le_bytes());
    }

    #[test]
    fn position_aid_record_keeps_full_precision() {
        let record = PositionAidRecord {
            timer_ms: 5_000,
            time_s: 5.0,
            latitude: 37.774_929_123,
            longitude: -122.419_415_987,
            altitude: 16.5,
        };
        let buf = encode_and_decode(&record);
        assert_eq!(&buf[12..20], &37.774_929_123f64.to_le_bytes());
        assert_eq!(&buf[20..28], &(-122.419_415_987f64).to_le_bytes());
        assert_eq!(&buf[28..36], &16.5f64.to_le_bytes());
    }

    #[test]
    fn encode_rejects_short_buffer() {
        let mut buf = [0u8; 10];
        let err = SensorRecord::default().encode_into(&mut buf).unwrap_err();
        assert_eq!(
            err,
            PayloadError::BufferTooSmall {
                needed: 40,
                available: 10
            }
        );
    }

    #[test]
    fn decode_rejects_truncated_payload() {
        let err = PositionAidRecord::decode_from(&[0u8; 20]).unwrap_err();
        assert_eq!(
            err,
            PayloadError::Truncated {
                needed: 36,
                actual: 20
            }
        );
    }
}
