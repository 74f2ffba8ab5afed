//! Human-readable views of reply and telemetry payloads.

use navlink_catalog::{InputKind, OutputKind, PacketCatalog, PacketCode, PacketKind};
use navlink_payload::{
    AidStatusRecord, AllParams, AngleRecord, AttitudeRecord, Data2Record, FixedRecord, ParamRange,
    ParamStatus, ParamValue, PositionAidRecord, ScaledRecord, SensorRecord, TestRecord,
    UpdateStatus, VelocityAidRecord,
};
use serde::Serialize;
use serde_json::Value;

/// Decode a device-sent payload by its header code.
///
/// Returns `None` for empty payloads, unknown codes and payloads that do not
/// decode as the record the code implies.
pub fn describe(code: PacketCode, payload: &[u8]) -> Option<Value> {
    if payload.is_empty() {
        return None;
    }
    match PacketCatalog::standard().lookup(code)? {
        PacketKind::Input(kind) => describe_reply(kind, payload),
        PacketKind::Output(kind) => describe_output(kind, payload),
    }
}

fn describe_reply(kind: InputKind, payload: &[u8]) -> Option<Value> {
    match kind {
        InputKind::Ping | InputKind::GetVersion => std::str::from_utf8(payload)
            .ok()
            .map(|text| Value::String(text.to_string())),
        InputKind::UpdateConfig | InputKind::UpdateAll => record::<UpdateStatus>(payload),
        InputKind::UpdateParam => record::<ParamStatus>(payload),
        InputKind::GetConfig => ParamRange::decode(payload).ok().and_then(to_value),
        InputKind::GetParam => record::<ParamValue>(payload),
        InputKind::GetAll => record::<AllParams>(payload),
        InputKind::SaveConfig | InputKind::Reset => None,
    }
}

fn describe_output(kind: OutputKind, payload: &[u8]) -> Option<Value> {
    match kind {
        OutputKind::Test => record::<TestRecord>(payload),
        OutputKind::Data1 => record::<SensorRecord>(payload),
        OutputKind::Data2 => record::<Data2Record>(payload),
        OutputKind::Scaled1 => record::<ScaledRecord>(payload),
        OutputKind::Ang1 => record::<AngleRecord>(payload),
        OutputKind::Ang2 => record::<AttitudeRecord>(payload),
        OutputKind::Aid1 => record::<AidStatusRecord>(payload),
        OutputKind::Aid2 => record::<VelocityAidRecord>(payload),
        OutputKind::Aid3 => record::<PositionAidRecord>(payload),
    }
}

fn record<R: FixedRecord + Serialize>(payload: &[u8]) -> Option<Value> {
    R::decode_from(payload).ok().and_then(to_value)
}

fn to_value<T: Serialize>(value: T) -> Option<Value> {
    serde_json::to_value(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_test_counter() {
        let value = describe(PacketCode::ascii(b"zT"), &7u32.to_le_bytes()).unwrap();
        assert_eq!(value["counter"], 7);
    }

    #[test]
    fn describes_ping_text() {
        let value = describe(PacketCode::ascii(b"pG"), b"unit").unwrap();
        assert_eq!(value, Value::String("unit".to_string()));
    }

    #[test]
    fn skips_empty_and_unknown() {
        assert!(describe(PacketCode::ascii(b"pG"), &[]).is_none());
        assert!(describe(PacketCode::ascii(b"qq"), &[1, 2]).is_none());
        assert!(describe(PacketCode::ascii(b"z1"), &[1, 2]).is_none());
    }
}
