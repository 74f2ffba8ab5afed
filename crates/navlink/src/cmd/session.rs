use navlink_catalog::PacketCode;
use navlink_device::{DeviceConfig, SimDevice};
use navlink_dispatch::{Packet, Session};
use tracing::{info, warn};

use crate::cmd::{Context, SessionArgs};
use crate::exit::{
    catalog_error, device_error, dispatch_error, CliError, CliResult, DATA_INVALID, SUCCESS,
};
use crate::output::{from_hex, print_packets, Direction, PacketLine};

/// Tick spacing used when the stored packet rate is zero.
const QUIET_TICK_US: u64 = 10_000;

pub fn run(args: SessionArgs, ctx: Context) -> CliResult<i32> {
    let requests = args
        .requests
        .iter()
        .map(|text| parse_request(text))
        .collect::<CliResult<Vec<_>>>()?;

    let mut device = SimDevice::new(DeviceConfig {
        settings_path: args.settings.clone(),
        ..DeviceConfig::default()
    })
    .map_err(|err| device_error("failed loading settings", err))?;
    let mut session = Session::with_config(ctx.dispatch);
    boot(&mut device, &mut session);

    if let Some(select) = &args.select {
        let code: PacketCode = select
            .parse()
            .map_err(|err| catalog_error("invalid --select code", err))?;
        session
            .select_output(&mut device, code, args.apply)
            .map_err(|err| dispatch_error("select failed", err))?;
    }

    let mut lines = Vec::new();
    for request in &requests {
        lines.push(PacketLine::new(
            lines.len(),
            Direction::Rx,
            request.code,
            request.payload(),
        ));

        let reply = session
            .process(&mut device, request)
            .map_err(|err| dispatch_error("request failed", err))?;
        lines.push(PacketLine::new(
            lines.len(),
            Direction::Tx,
            reply.code,
            reply.payload(),
        ));

        match device.sync_output(&mut session) {
            Ok(Some(kind)) => info!(kind = kind.name(), "continuous output follows parameter update"),
            Ok(None) => {}
            Err(err) => warn!(error = %err, "stored packet code not selectable"),
        }
    }

    let tick_us = tick_interval_us(device.settings().packet_rate);
    for _ in 0..args.ticks {
        device.advance_clock(tick_us);
        let mut packet = Packet::outgoing();
        if let Err(err) = session.tick_output(&mut device, &mut packet) {
            warn!(error = %err, "tick produced no payload");
        }
        packet.code = session.emit_code();
        lines.push(PacketLine::new(
            lines.len(),
            Direction::Tx,
            packet.code,
            packet.payload(),
        ));
    }

    print_packets(&lines, ctx.format);
    Ok(SUCCESS)
}

/// Restore the stored output selection; a bad stored code leaves nothing
/// streaming.
pub fn boot(device: &mut SimDevice, session: &mut Session) {
    match device.restore_output(session) {
        Ok(kind) => info!(kind = kind.name(), "restored continuous output"),
        Err(err) => warn!(error = %err, "stored output selection not restored"),
    }
}

pub fn tick_interval_us(rate_hz: u64) -> u64 {
    match rate_hz {
        0 => QUIET_TICK_US,
        rate => 1_000_000 / rate,
    }
}

fn parse_request(text: &str) -> CliResult<Packet> {
    let (code, hex) = match text.split_once(':') {
        Some((code, hex)) => (code, hex),
        None => (text, ""),
    };
    let code: PacketCode = code
        .parse()
        .map_err(|err| catalog_error("invalid --request code", err))?;
    let payload = from_hex(hex).ok_or_else(|| {
        CliError::new(DATA_INVALID, format!("invalid --request payload hex: {hex}"))
    })?;
    Packet::request(code, &payload).map_err(|err| dispatch_error("invalid --request", err))
}
