use std::time::Instant;

use navlink_catalog::{OutputKind, PacketCode};
use navlink_dispatch::{
    HandlerError, HandlerResult, InputHandlers, OutputBuilders, Platform, Session, SettingsStore,
};
use navlink_payload::{
    AidStatusRecord, AllParams, AngleRecord, AttitudeRecord, FixedRecord, ParamQuery, ParamRange,
    ParamStatus, ParamValue, PayloadError, PositionAidRecord, RangeQuery, ScaledRecord,
    SensorRecord, UpdateStatus, VelocityAidRecord, STATUS_OK, STATUS_REJECTED,
};
use tracing::{debug, info, warn};

use crate::config::DeviceConfig;
use crate::error::Result;
use crate::nav::NavSnapshot;
use crate::settings::{UserParam, UserSettings, PARAM_COUNT};
use crate::store::SettingsFile;

/// Time source behind [`Platform::timestamp_micros`].
#[derive(Debug, Clone, Copy)]
pub enum Clock {
    /// Advanced explicitly, for deterministic sessions.
    Manual(u64),
    Monotonic(Instant),
}

impl Clock {
    pub fn monotonic() -> Self {
        Clock::Monotonic(Instant::now())
    }

    fn micros(&self) -> u64 {
        match self {
            Clock::Manual(us) => *us,
            Clock::Monotonic(start) => {
                u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX)
            }
        }
    }
}

/// A device that serves user packets from in-memory state.
///
/// Settings are loaded from the configured [`SettingsFile`] on creation and
/// on reset. Requests read the parameter view refreshed by
/// [`InputHandlers::back_fill`], so a get after an update in the same
/// dispatch sees the value from before the update.
#[derive(Debug)]
pub struct SimDevice {
    config: DeviceConfig,
    settings: UserSettings,
    view: [u64; PARAM_COUNT],
    store: Option<SettingsFile>,
    nav: NavSnapshot,
    clock: Clock,
    resets: u32,
    saves: u32,
    output_change: Option<PacketCode>,
}

impl SimDevice {
    /// Create a device, loading stored settings when a file is configured.
    pub fn new(config: DeviceConfig) -> Result<Self> {
        let store = config.settings_path.clone().map(SettingsFile::new);
        let settings = match &store {
            Some(store) => store.load_or_default()?,
            None => UserSettings::default(),
        };

        Ok(Self {
            view: settings.values(),
            settings,
            store,
            config,
            nav: NavSnapshot::at_rest(),
            clock: Clock::Manual(0),
            resets: 0,
            saves: 0,
            output_change: None,
        })
    }

    /// An in-memory device with default identity.
    pub fn in_memory() -> Self {
        let settings = UserSettings::default();
        Self {
            view: settings.values(),
            settings,
            store: None,
            config: DeviceConfig::default(),
            nav: NavSnapshot::at_rest(),
            clock: Clock::Manual(0),
            resets: 0,
            saves: 0,
            output_change: None,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Select the stored output code on `session` without writing it back.
    pub fn restore_output(&mut self, session: &mut Session) -> navlink_dispatch::Result<OutputKind> {
        let code = self.settings.packet_code;
        session.restore_output(self, code)
    }

    /// Apply a packet-code change made through a parameter update, or the
    /// stored selection after a reset.
    ///
    /// Returns the new kind, or `None` when nothing changed since the last call.
    pub fn sync_output(
        &mut self,
        session: &mut Session,
    ) -> navlink_dispatch::Result<Option<OutputKind>> {
        match self.take_output_change() {
            Some(code) => session.select_output(self, code, false).map(Some),
            None => Ok(None),
        }
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub fn settings(&self) -> &UserSettings {
        &self.settings
    }

    pub fn stored_output_code(&self) -> PacketCode {
        self.settings.packet_code
    }

    /// Packet code the session should switch to, if any, since the last call.
    /// Set by packet-code parameter updates and by reset.
    pub fn take_output_change(&mut self) -> Option<PacketCode> {
        self.output_change.take()
    }

    pub fn nav(&self) -> &NavSnapshot {
        &self.nav
    }

    pub fn set_nav(&mut self, nav: NavSnapshot) {
        self.nav = nav;
    }

    /// Move a manual clock forward. A monotonic clock is left alone.
    pub fn advance_clock(&mut self, micros: u64) {
        if let Clock::Manual(now) = &mut self.clock {
            *now = now.saturating_add(micros);
        }
    }

    pub fn resets(&self) -> u32 {
        self.resets
    }

    pub fn saves(&self) -> u32 {
        self.saves
    }

    fn stamp(&self) -> (u32, f64) {
        let now = self.clock.micros();
        ((now / 1_000) as u32, now as f64 / 1_000_000.0)
    }

    fn apply_update(&mut self, first: u32, values: &[u64]) -> UpdateStatus {
        let before = self.settings.packet_code;
        match self.settings.apply_range(first, values) {
            Ok(()) => {
                self.note_output_change(before);
                UpdateStatus::ok()
            }
            Err((position, reason)) => {
                debug!(first, position, %reason, "user parameter update rejected");
                UpdateStatus::rejected_at(position)
            }
        }
    }

    fn note_output_change(&mut self, before: PacketCode) {
        let after = self.settings.packet_code;
        if after != before {
            info!(from = %before, to = %after, "packet code parameter changed");
            self.output_change = Some(after);
        }
    }
}

fn request(payload: &[u8], len: usize) -> HandlerResult<&[u8]> {
    payload.get(..len).ok_or_else(|| {
        PayloadError::Truncated {
            needed: len,
            actual: payload.len(),
        }
        .into()
    })
}

fn param_at(index: u32) -> HandlerResult<UserParam> {
    UserParam::from_index(index)
        .ok_or_else(|| HandlerError::Rejected(format!("no user parameter {index}")))
}

fn put_bytes(payload: &mut [u8], bytes: &[u8]) -> HandlerResult<usize> {
    let available = payload.len();
    let dst = payload
        .get_mut(..bytes.len())
        .ok_or(PayloadError::BufferTooSmall {
            needed: bytes.len(),
            available,
        })?;
    dst.copy_from_slice(bytes);
    Ok(bytes.len())
}

fn put_record<R: FixedRecord>(record: &R, payload: &mut [u8]) -> HandlerResult<usize> {
    Ok(record.encode_into(payload)?)
}

impl Platform for SimDevice {
    fn system_reset(&mut self) {
        self.resets = self.resets.saturating_add(1);
        if let Some(store) = &self.store {
            match store.load_or_default() {
                Ok(settings) => self.settings = settings,
                Err(err) => warn!(error = %err, "keeping in-memory settings across reset"),
            }
        }
        self.view = self.settings.values();
        self.output_change = Some(self.settings.packet_code);
        info!(resets = self.resets, "simulated device reset");
    }

    fn timestamp_micros(&self) -> u64 {
        self.clock.micros()
    }
}

impl SettingsStore for SimDevice {
    fn save_persistent_config(&mut self) -> HandlerResult<()> {
        if let Some(store) = &self.store {
            store
                .save(&self.settings)
                .map_err(|err| HandlerError::Storage(err.to_string()))?;
        }
        self.saves = self.saves.saturating_add(1);
        Ok(())
    }

    fn apply_output_selection(&mut self, code: PacketCode, apply: bool) -> HandlerResult<()> {
        self.settings
            .set(UserParam::PacketCode, u64::from(code.as_u16()))
            .map_err(|err| HandlerError::Rejected(err.to_string()))?;
        if self.output_change == Some(code) {
            self.output_change = None;
        }
        if apply {
            self.save_persistent_config()?;
        }
        Ok(())
    }
}

impl InputHandlers for SimDevice {
    fn back_fill(&mut self) {
        self.view = self.settings.values();
    }

    fn fill_ping(&mut self, payload: &mut [u8]) -> HandlerResult<usize> {
        let descriptor = format!("{} SN:{}", self.config.model, self.config.serial);
        put_bytes(payload, descriptor.as_bytes())
    }

    fn fill_version(&mut self, payload: &mut [u8]) -> HandlerResult<usize> {
        put_bytes(payload, self.config.firmware_version.as_bytes())
    }

    fn update_config(&mut self, payload: &mut [u8], len: usize) -> HandlerResult<usize> {
        let range = ParamRange::decode(request(payload, len)?)?;
        let status = self.apply_update(range.first, &range.values);
        put_record(&status, payload)
    }

    fn update_param(&mut self, payload: &mut [u8], len: usize) -> HandlerResult<usize> {
        let req = ParamValue::decode_from(request(payload, len)?)?;
        let param = param_at(req.param)?;
        let before = self.settings.packet_code;

        let status = match self.settings.set(param, req.value) {
            Ok(()) => {
                self.note_output_change(before);
                STATUS_OK
            }
            Err(reason) => {
                debug!(param = param.name(), %reason, "user parameter update rejected");
                STATUS_REJECTED
            }
        };

        put_record(
            &ParamStatus {
                param: req.param,
                status,
            },
            payload,
        )
    }

    fn update_all(&mut self, payload: &mut [u8], len: usize) -> HandlerResult<usize> {
        let all = AllParams::decode_from(request(payload, len)?)?;
        let status = self.apply_update(0, &all.values);
        put_record(&status, payload)
    }

    fn get_config(&mut self, payload: &mut [u8], len: usize) -> HandlerResult<usize> {
        let query = RangeQuery::decode_checked(request(payload, len)?)?;
        let reply = ParamRange {
            first: query.first,
            values: self.view[query.indices()].to_vec(),
        };
        Ok(reply.encode_into(payload)?)
    }

    fn get_param(&mut self, payload: &mut [u8], len: usize) -> HandlerResult<usize> {
        let query = ParamQuery::decode_from(request(payload, len)?)?;
        let param = param_at(query.param)?;
        put_record(
            &ParamValue {
                param: query.param,
                value: self.view[param.index() as usize],
            },
            payload,
        )
    }

    fn get_all(&mut self, payload: &mut [u8], _len: usize) -> HandlerResult<usize> {
        put_record(&AllParams { values: self.view }, payload)
    }
}

impl OutputBuilders for SimDevice {
    fn fill_data1(&mut self, payload: &mut [u8]) -> HandlerResult<usize> {
        let (timer_ms, _) = self.stamp();
        put_record(
            &SensorRecord {
                timer_ms,
                accels: self.nav.accels,
                rates: self.nav.rates,
                mags: self.nav.mags,
            },
            payload,
        )
    }

    fn fill_scaled1(&mut self, payload: &mut [u8]) -> HandlerResult<usize> {
        let (timer_ms, time_s) = self.stamp();
        put_record(
            &ScaledRecord {
                timer_ms,
                time_s,
                accels: self.nav.accels,
                rates: self.nav.rates,
                mags: self.nav.mags,
                temperature: self.nav.temperature,
            },
            payload,
        )
    }

    fn fill_ang1(&mut self, payload: &mut [u8]) -> HandlerResult<usize> {
        let (timer_ms, time_s) = self.stamp();
        put_record(
            &AngleRecord {
                timer_ms,
                time_s,
                euler: self.nav.euler,
                rates: self.nav.rates,
                accels: self.nav.accels,
                op_mode: self.nav.op_mode,
                lin_accel_switch: self.nav.lin_accel_switch,
                turn_switch: self.nav.turn_switch,
            },
            payload,
        )
    }

    fn fill_ang2(&mut self, payload: &mut [u8]) -> HandlerResult<usize> {
        let (timer_ms, time_s) = self.stamp();
        put_record(
            &AttitudeRecord {
                timer_ms,
                time_s,
                euler: self.nav.euler,
                rates: self.nav.rates,
                accels: self.nav.accels,
            },
            payload,
        )
    }

    fn fill_aid1(&mut self, payload: &mut [u8]) -> HandlerResult<usize> {
        let (timer_ms, time_s) = self.stamp();
        put_record(
            &AidStatusRecord {
                timer_ms,
                time_s,
                op_mode: self.nav.op_mode,
                gps_valid: self.nav.gps.valid,
                odo_valid: self.nav.odo_valid,
                pps_detected: self.nav.pps_detected,
            },
            payload,
        )
    }

    fn fill_aid2(&mut self, payload: &mut [u8]) -> HandlerResult<usize> {
        let (timer_ms, time_s) = self.stamp();
        put_record(
            &VelocityAidRecord {
                timer_ms,
                time_s,
                velocity_ned: self.nav.velocity_ned,
            },
            payload,
        )
    }

    fn fill_aid3(&mut self, payload: &mut [u8]) -> HandlerResult<usize> {
        let (timer_ms, time_s) = self.stamp();
        put_record(
            &PositionAidRecord {
                timer_ms,
                time_s,
                latitude: self.nav.gps.latitude,
                longitude: self.nav.gps.longitude,
                altitude: self.nav.gps.altitude,
            },
            payload,
        )
    }
}
