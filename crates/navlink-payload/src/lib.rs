//! Payload records carried by navlink user packets.
//!
//! All records are packed and little-endian. Telemetry records have a fixed
//! size; the user parameter range messages carry a count header.

pub mod error;
pub mod params;
pub mod record;
pub mod telemetry;

pub use error::{PayloadError, Result};
pub use params::{
    AllParams, ParamQuery, ParamRange, ParamStatus, ParamValue, RangeQuery, UpdateStatus,
    STATUS_OK, STATUS_REJECTED, USER_PARAM_COUNT,
};
pub use record::{FixedRecord, Vec3};
pub use telemetry::{
    AidStatusRecord, AngleRecord, AttitudeRecord, Data2Record, PositionAidRecord, ScaledRecord,
    SensorRecord, TestRecord, VelocityAidRecord,
};
