use std::path::PathBuf;

use navlink_catalog::{OutputKind, PacketCode};
use navlink_device::{DeviceConfig, SettingsFile, SimDevice, UserParam};
use navlink_dispatch::{Packet, Session};
use navlink_payload::{
    AllParams, FixedRecord, ParamRange, ParamValue, SensorRecord, UpdateStatus, STATUS_OK,
};

fn temp_settings(tag: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!(
            "navlink-device-session-{tag}-{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ))
        .join("settings.json")
}

fn send(session: &mut Session, device: &mut SimDevice, code: &[u8; 2], payload: &[u8]) -> Packet {
    let request = Packet::request(PacketCode::ascii(code), payload).unwrap();
    session.process(device, &request).unwrap()
}

fn code_value(code: &[u8; 2]) -> u64 {
    u64::from(PacketCode::ascii(code).as_u16())
}

#[test]
fn get_all_reports_current_settings() {
    let mut session = Session::new();
    let mut device = SimDevice::in_memory();

    let reply = send(&mut session, &mut device, b"gA", &[]);
    assert_eq!(reply.code, PacketCode::ascii(b"gA"));

    let all = AllParams::decode_from(reply.payload()).unwrap();
    assert_eq!(all.values, device.settings().values());
    assert_eq!(all.values[UserParam::BaudRate.index() as usize], 115_200);
}

#[test]
fn update_config_then_get_config() {
    let mut session = Session::new();
    let mut device = SimDevice::in_memory();

    let update = ParamRange {
        first: 4,
        values: vec![50, 10, 20],
    };
    let mut wire = [0u8; 64];
    let len = update.encode_into(&mut wire).unwrap();

    let reply = send(&mut session, &mut device, b"uC", &wire[..len]);
    assert_eq!(UpdateStatus::decode_from(reply.payload()).unwrap().status, STATUS_OK);

    let mut query = Vec::new();
    query.extend_from_slice(&3u32.to_le_bytes());
    query.extend_from_slice(&4u32.to_le_bytes());
    let reply = send(&mut session, &mut device, b"gC", &query);
    let got = ParamRange::decode(reply.payload()).unwrap();
    assert_eq!(got, update);
}

#[test]
fn rejected_range_reports_position_and_changes_nothing() {
    let mut session = Session::new();
    let mut device = SimDevice::in_memory();
    let before = device.settings().clone();

    let update = ParamRange {
        first: 5,
        values: vec![10, 11],
    };
    let mut wire = [0u8; 64];
    let len = update.encode_into(&mut wire).unwrap();

    let reply = send(&mut session, &mut device, b"uC", &wire[..len]);
    assert_eq!(UpdateStatus::decode_from(reply.payload()).unwrap().status, 2);
    assert_eq!(device.settings(), &before);
}

#[test]
fn malformed_range_gets_empty_reply_with_echoed_code() {
    let mut session = Session::new();
    let mut device = SimDevice::in_memory();

    let mut query = Vec::new();
    query.extend_from_slice(&4u32.to_le_bytes());
    query.extend_from_slice(&6u32.to_le_bytes());
    let reply = send(&mut session, &mut device, b"gC", &query);

    assert_eq!(reply.code, PacketCode::ascii(b"gC"));
    assert!(reply.is_empty());
}

#[test]
fn packet_code_update_switches_stream() {
    let mut session = Session::new();
    let mut device = SimDevice::in_memory();
    device.restore_output(&mut session).unwrap();
    assert_eq!(session.active_output(), Some(OutputKind::Data1));

    let mut req = Vec::new();
    req.extend_from_slice(&UserParam::PacketCode.index().to_le_bytes());
    req.extend_from_slice(&code_value(b"a2").to_le_bytes());
    send(&mut session, &mut device, b"uP", &req);

    assert_eq!(device.sync_output(&mut session).unwrap(), Some(OutputKind::Ang2));
    assert_eq!(session.output_payload_len(), 48);
    assert_eq!(device.sync_output(&mut session).unwrap(), None);

    let mut packet = Packet::outgoing();
    assert_eq!(session.tick_output(&mut device, &mut packet).unwrap(), 48);
    assert_eq!(session.emit_code(), PacketCode::ascii(b"a2"));
}

#[test]
fn data1_tick_carries_snapshot() {
    let mut session = Session::new();
    let mut device = SimDevice::in_memory();
    session
        .select_output(&mut device, PacketCode::ascii(b"z1"), false)
        .unwrap();
    device.advance_clock(1_500);

    let mut packet = Packet::outgoing();
    let len = session.tick_output(&mut device, &mut packet).unwrap();
    assert_eq!(len, 40);

    let record = SensorRecord::decode_from(packet.payload()).unwrap();
    assert_eq!(record.timer_ms, 1);
    assert_eq!(record.accels, device.nav().accels);
}

#[test]
fn selection_with_apply_persists_and_survives_restart() {
    let path = temp_settings("apply");
    let config = DeviceConfig {
        settings_path: Some(path.clone()),
        ..DeviceConfig::default()
    };

    let mut session = Session::new();
    let mut device = SimDevice::new(config.clone()).unwrap();
    session
        .select_output(&mut device, PacketCode::ascii(b"d3"), true)
        .unwrap();
    assert_eq!(device.saves(), 1);

    let stored = SettingsFile::new(&path).load().unwrap().unwrap();
    assert_eq!(stored.packet_code, PacketCode::ascii(b"d3"));

    let mut restarted = SimDevice::new(config).unwrap();
    let mut session = Session::new();
    assert_eq!(restarted.restore_output(&mut session).unwrap(), OutputKind::Aid3);
    assert_eq!(restarted.saves(), 0);

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn save_config_writes_file() {
    let path = temp_settings("save");
    let config = DeviceConfig {
        settings_path: Some(path.clone()),
        ..DeviceConfig::default()
    };
    let mut session = Session::new();
    let mut device = SimDevice::new(config).unwrap();

    let mut req = Vec::new();
    req.extend_from_slice(&UserParam::Orientation.index().to_le_bytes());
    req.extend_from_slice(&6u64.to_le_bytes());
    send(&mut session, &mut device, b"uP", &req);

    let reply = send(&mut session, &mut device, b"sC", &[]);
    assert_eq!(reply.code, PacketCode::ascii(b"sC"));
    assert_eq!(
        SettingsFile::new(&path).load().unwrap().unwrap().orientation,
        6
    );

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn reset_discards_unsaved_changes() {
    let path = temp_settings("reset");
    let config = DeviceConfig {
        settings_path: Some(path.clone()),
        ..DeviceConfig::default()
    };
    let mut session = Session::new();
    let mut device = SimDevice::new(config).unwrap();

    let mut req = Vec::new();
    req.extend_from_slice(&UserParam::RateLpf.index().to_le_bytes());
    req.extend_from_slice(&40u64.to_le_bytes());
    send(&mut session, &mut device, b"uP", &req);
    assert_eq!(device.settings().rate_lpf, 40);

    let reply = send(&mut session, &mut device, b"rS", &[]);
    assert_eq!(reply.code, PacketCode::ascii(b"rS"));
    assert_eq!(device.resets(), 1);
    assert_eq!(device.settings().rate_lpf, 25);

    let mut query = Vec::new();
    query.extend_from_slice(&UserParam::RateLpf.index().to_le_bytes());
    let reply = send(&mut session, &mut device, b"gP", &query);
    assert_eq!(ParamValue::decode_from(reply.payload()).unwrap().value, 25);
}

#[test]
fn version_reply_is_firmware_string() {
    let mut session = Session::new();
    let mut device = SimDevice::in_memory();
    let reply = send(&mut session, &mut device, b"gV", &[]);
    assert_eq!(
        reply.payload(),
        device.config().firmware_version.as_bytes()
    );
}

#[test]
fn reset_returns_stream_to_stored_selection() {
    let path = temp_settings("reset-stream");
    let config = DeviceConfig {
        settings_path: Some(path.clone()),
        ..DeviceConfig::default()
    };
    let mut session = Session::new();
    let mut device = SimDevice::new(config).unwrap();
    device.restore_output(&mut session).unwrap();
    session
        .select_output(&mut device, PacketCode::ascii(b"a2"), false)
        .unwrap();

    send(&mut session, &mut device, b"rS", &[]);
    assert_eq!(device.sync_output(&mut session).unwrap(), Some(OutputKind::Data1));

    let mut query = Vec::new();
    query.extend_from_slice(&UserParam::PacketCode.index().to_le_bytes());
    let reply = send(&mut session, &mut device, b"gP", &query);
    assert_eq!(
        ParamValue::decode_from(reply.payload()).unwrap().value,
        code_value(b"z1")
    );

    let mut packet = Packet::outgoing();
    assert_eq!(session.tick_output(&mut device, &mut packet).unwrap(), 40);
    assert_eq!(session.emit_code(), PacketCode::ascii(b"z1"));
    assert_eq!(session.output_payload_len(), 40);

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}
