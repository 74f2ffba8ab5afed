use std::sync::Arc;

use navlink_catalog::{InputKind, OutputKind, PacketCatalog, PacketCode};
use navlink_payload::{
    AidStatusRecord, AngleRecord, AttitudeRecord, Data2Record, FixedRecord, PositionAidRecord,
    ScaledRecord, SensorRecord, TestRecord, VelocityAidRecord,
};
use tracing::{debug, info, warn};

use crate::config::DispatchConfig;
use crate::error::{DispatchError, HandlerResult, Result};
use crate::handler::{InputHandlers, OutputBuilders, Platform, SettingsStore};
use crate::packet::{Packet, PacketClass};

/// Dispatch state for one device session.
///
/// The transport drives it in a fixed order: [`classify`](Self::classify) a
/// received code, then act on it with [`dispatch_input`](Self::dispatch_input)
/// or [`select_output`](Self::select_output), then take the header code of the
/// next outgoing packet from [`emit_code`](Self::emit_code). Classification
/// hands the resolved kind to the next step through the session itself, so a
/// second classify before dispatch replaces the pending kind.
#[derive(Debug, Clone)]
pub struct Session {
    config: DispatchConfig,
    catalog: Arc<PacketCatalog>,
    pending_input: Option<InputKind>,
    response: Option<InputKind>,
    active_output: Option<OutputKind>,
    output_payload_len: usize,
    test_counter: u32,
}

impl Session {
    /// Create a session over the standard catalog with default config.
    pub fn new() -> Self {
        Self::with_config(DispatchConfig::default())
    }

    /// Create a session over the standard catalog with explicit config.
    pub fn with_config(config: DispatchConfig) -> Self {
        Self::with_catalog(PacketCatalog::shared(), config)
    }

    /// Create a session over a custom catalog, shared with any other holders.
    pub fn with_catalog(catalog: Arc<PacketCatalog>, config: DispatchConfig) -> Self {
        Self {
            config,
            catalog,
            pending_input: None,
            response: None,
            active_output: None,
            output_payload_len: 0,
            test_counter: 0,
        }
    }

    /// Resolve a received header code.
    ///
    /// The input table is searched first, so a code present in both tables
    /// resolves as input. An input hit becomes the pending request; an output
    /// hit becomes the active output kind (its payload length is left as is).
    /// Unknown codes leave the session untouched.
    pub fn classify(&mut self, received: u16) -> Result<PacketClass> {
        let code = PacketCode::from_u16(received);

        if let Some(kind) = self.catalog.lookup_input(code) {
            debug!(%code, kind = kind.name(), "classified user input packet");
            self.pending_input = Some(kind);
            return Ok(PacketClass::UserIn);
        }

        if let Some(kind) = self.catalog.lookup_output(code) {
            debug!(%code, kind = kind.name(), "classified user output packet");
            self.active_output = Some(kind);
            return Ok(PacketClass::UserOut);
        }

        debug!(%code, "unrecognized user packet code");
        Err(DispatchError::InvalidType(code))
    }

    /// Serve the pending request in place.
    ///
    /// On failure the payload is emptied. Either way the packet leaves tagged
    /// [`PacketClass::UserOut`] and the request's code is owed to the next
    /// [`emit_code`](Self::emit_code).
    pub fn dispatch_input<D>(&mut self, device: &mut D, packet: &mut Packet) -> Result<()>
    where
        D: Platform + SettingsStore + InputHandlers + ?Sized,
    {
        device.back_fill();

        let result = match self.pending_input.take() {
            Some(kind) => {
                self.response = Some(kind);
                serve_input(kind, device, packet)
            }
            None => Err(DispatchError::NoPendingInput),
        };

        if let Err(err) = &result {
            warn!(error = %err, "user input packet failed");
            packet.clear();
        }
        packet.class = PacketClass::UserOut;

        result
    }

    /// Switch the continuous output.
    ///
    /// Unknown codes fail without touching the session. A known code becomes
    /// the active kind with its fixed payload length and is then handed to the
    /// settings store; if the store fails the new selection stays active and
    /// the failure is returned.
    pub fn select_output<S>(
        &mut self,
        store: &mut S,
        code: PacketCode,
        apply: bool,
    ) -> Result<OutputKind>
    where
        S: SettingsStore + ?Sized,
    {
        let requested = self
            .catalog
            .lookup_output(code)
            .ok_or(DispatchError::UnknownOutputCode(code))?;

        let kind = match requested {
            OutputKind::Scaled1 if self.config.legacy_scaled1_fallthrough => OutputKind::Ang1,
            kind => kind,
        };

        self.active_output = Some(kind);
        self.output_payload_len = self.fixed_payload_len(kind);
        info!(
            %code,
            kind = kind.name(),
            payload_len = self.output_payload_len,
            apply,
            "selected continuous output"
        );

        store
            .apply_output_selection(code, apply)
            .map_err(|source| DispatchError::PersistSelection { code, source })?;

        Ok(kind)
    }

    /// Re-select a stored output code at startup without writing it back.
    pub fn restore_output<S>(&mut self, store: &mut S, code: PacketCode) -> Result<OutputKind>
    where
        S: SettingsStore + ?Sized,
    {
        self.select_output(store, code, false)
    }

    /// Fill one continuous output payload. Called once per telemetry tick.
    ///
    /// Returns the payload length. With nothing selected, or when the builder
    /// fails, the payload is emptied and an error returned.
    pub fn tick_output<D>(&mut self, device: &mut D, packet: &mut Packet) -> Result<usize>
    where
        D: Platform + OutputBuilders + ?Sized,
    {
        let result = match self.active_output {
            Some(kind) => self.build_output(kind, device, packet.buffer_mut()),
            None => Err(DispatchError::NoActiveOutput),
        };

        packet.class = PacketClass::UserOut;
        let len = match result.and_then(|len| packet.set_len(len).map(|()| len)) {
            Ok(len) => len,
            Err(err) => {
                packet.clear();
                return Err(err);
            }
        };

        if self.output_payload_len != 0 && len != self.output_payload_len {
            warn!(
                len,
                expected = self.output_payload_len,
                "continuous output length differs from selection"
            );
        }

        Ok(len)
    }

    /// Header code for the next outgoing packet.
    ///
    /// A request's code is echoed exactly once. Otherwise the active output
    /// code is repeated on every call, and with neither the idle marker is
    /// returned.
    pub fn emit_code(&mut self) -> PacketCode {
        if let Some(kind) = self.response.take().or_else(|| self.pending_input.take()) {
            if let Some(code) = self.catalog.input_code(kind) {
                return code;
            }
        }

        self.active_output
            .and_then(|kind| self.catalog.output_code(kind))
            .unwrap_or(PacketCode::IDLE)
    }

    /// Run one transport turn-around for a received packet.
    ///
    /// Requests are dispatched; an output code is answered with a single
    /// payload of that kind. The returned packet carries the emitted code.
    pub fn process<D>(&mut self, device: &mut D, received: &Packet) -> Result<Packet>
    where
        D: Platform + SettingsStore + InputHandlers + OutputBuilders + ?Sized,
    {
        let mut reply = received.clone();
        let outcome = match self.classify(received.code.as_u16())? {
            PacketClass::UserIn => self.dispatch_input(device, &mut reply),
            PacketClass::UserOut => self.tick_output(device, &mut reply).map(|_| ()),
        };
        reply.code = self.emit_code();
        reply.class = PacketClass::UserOut;

        if let Err(err) = outcome {
            debug!(error = %err, code = %reply.code, "replying with empty packet");
        }
        Ok(reply)
    }

    /// Payload length of the current continuous output, for sanity checks.
    pub fn output_payload_len(&self) -> usize {
        self.output_payload_len
    }

    pub fn pending_input(&self) -> Option<InputKind> {
        self.pending_input
    }

    pub fn active_output(&self) -> Option<OutputKind> {
        self.active_output
    }

    /// True while a served request's code has not been emitted yet.
    pub fn response_owed(&self) -> bool {
        self.response.is_some()
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    pub fn catalog(&self) -> &PacketCatalog {
        &self.catalog
    }

    fn fixed_payload_len(&self, kind: OutputKind) -> usize {
        self.catalog
            .payload_length_for(kind)
            .unwrap_or_else(|| record_size(kind))
    }

    fn build_output<D>(
        &mut self,
        kind: OutputKind,
        device: &mut D,
        buf: &mut [u8],
    ) -> Result<usize>
    where
        D: Platform + OutputBuilders + ?Sized,
    {
        let built: HandlerResult<usize> = match kind {
            OutputKind::Test => {
                let record = TestRecord {
                    counter: self.test_counter,
                };
                self.test_counter = self.test_counter.wrapping_add(1);
                record.encode_into(buf).map_err(Into::into)
            }
            OutputKind::Data2 => Data2Record::at(device.timestamp_micros())
                .encode_into(buf)
                .map_err(Into::into),
            OutputKind::Data1 => device.fill_data1(buf),
            OutputKind::Scaled1 => device.fill_scaled1(buf),
            OutputKind::Ang1 => device.fill_ang1(buf),
            OutputKind::Ang2 => device.fill_ang2(buf),
            OutputKind::Aid1 => device.fill_aid1(buf),
            OutputKind::Aid2 => device.fill_aid2(buf),
            OutputKind::Aid3 => device.fill_aid3(buf),
        };

        built.map_err(|source| DispatchError::OutputBuilder { kind, source })
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

fn serve_input<D>(kind: InputKind, device: &mut D, packet: &mut Packet) -> Result<()>
where
    D: Platform + SettingsStore + InputHandlers + ?Sized,
{
    let len = packet.len();
    let served: HandlerResult<Option<usize>> = match kind {
        InputKind::Reset => {
            info!("user reset requested");
            device.system_reset();
            Ok(None)
        }
        InputKind::Ping => device.fill_ping(packet.buffer_mut()).map(Some),
        InputKind::GetVersion => device.fill_version(packet.buffer_mut()).map(Some),
        InputKind::SaveConfig => device.save_persistent_config().map(|()| None),
        InputKind::UpdateConfig => device.update_config(packet.buffer_mut(), len).map(Some),
        InputKind::UpdateParam => device.update_param(packet.buffer_mut(), len).map(Some),
        InputKind::UpdateAll => device.update_all(packet.buffer_mut(), len).map(Some),
        InputKind::GetConfig => device.get_config(packet.buffer_mut(), len).map(Some),
        InputKind::GetParam => device.get_param(packet.buffer_mut(), len).map(Some),
        InputKind::GetAll => device.get_all(packet.buffer_mut(), len).map(Some),
    };

    match served.map_err(|source| DispatchError::Handler { kind, source })? {
        Some(reply_len) => packet.set_len(reply_len),
        None => Ok(()),
    }
}

/// Encoded size of the record a continuous output kind carries.
pub fn record_size(kind: OutputKind) -> usize {
    match kind {
        OutputKind::Test => TestRecord::SIZE,
        OutputKind::Data1 => SensorRecord::SIZE,
        OutputKind::Data2 => Data2Record::SIZE,
        OutputKind::Scaled1 => ScaledRecord::SIZE,
        OutputKind::Ang1 => AngleRecord::SIZE,
        OutputKind::Ang2 => AttitudeRecord::SIZE,
        OutputKind::Aid1 => AidStatusRecord::SIZE,
        OutputKind::Aid2 => VelocityAidRecord::SIZE,
        OutputKind::Aid3 => PositionAidRecord::SIZE,
    }
}
