use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use navlink_catalog::PacketCode;
use navlink_device::{Clock, DeviceConfig, SimDevice};
use navlink_dispatch::{Packet, Session};
use tracing::warn;

use crate::cmd::session::{boot, tick_interval_us};
use crate::cmd::{Context, StreamArgs};
use crate::exit::{
    catalog_error, device_error, dispatch_error, CliError, CliResult, INTERNAL, SUCCESS, USAGE,
};
use crate::output::{print_packets, Direction, PacketLine};

pub fn run(args: StreamArgs, ctx: Context) -> CliResult<i32> {
    let mut device = SimDevice::new(DeviceConfig {
        settings_path: args.settings.clone(),
        ..DeviceConfig::default()
    })
    .map_err(|err| device_error("failed loading settings", err))?
    .with_clock(Clock::monotonic());
    let mut session = Session::with_config(ctx.dispatch);

    match &args.select {
        Some(select) => {
            let code: PacketCode = select
                .parse()
                .map_err(|err| catalog_error("invalid --select code", err))?;
            session
                .select_output(&mut device, code, false)
                .map_err(|err| dispatch_error("select failed", err))?;
        }
        None => boot(&mut device, &mut session),
    }

    let rate = match args.rate {
        Some(0) => return Err(CliError::new(USAGE, "--rate must be at least 1")),
        Some(rate) => u64::from(rate),
        None => device.settings().packet_rate,
    };
    let interval = Duration::from_micros(tick_interval_us(rate));

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut sent = 0usize;
    while running.load(Ordering::SeqCst) {
        if args.count.is_some_and(|count| sent >= count) {
            break;
        }

        let mut packet = Packet::outgoing();
        if let Err(err) = session.tick_output(&mut device, &mut packet) {
            warn!(error = %err, "tick produced no payload");
        }
        packet.code = session.emit_code();
        print_packets(
            &[PacketLine::new(sent, Direction::Tx, packet.code, packet.payload())],
            ctx.format,
        );
        sent = sent.saturating_add(1);

        std::thread::sleep(interval);
    }

    Ok(SUCCESS)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
