//! Collaborator seams.
//!
//! The dispatch layer owns no hardware, storage or navigation state. It calls
//! out through these traits; a device (real or simulated) implements them.

use navlink_catalog::PacketCode;

use crate::error::HandlerResult;

/// Hardware services.
pub trait Platform {
    /// Restart the device. On hardware this does not return.
    fn system_reset(&mut self);

    /// Device timer in microseconds since start.
    fn timestamp_micros(&self) -> u64;
}

/// Persistent settings.
pub trait SettingsStore {
    /// Write the current settings to durable storage.
    fn save_persistent_config(&mut self) -> HandlerResult<()>;

    /// Record the continuous output selection. With `apply` the choice is
    /// written to durable storage immediately, otherwise only held in memory.
    fn apply_output_selection(&mut self, code: PacketCode, apply: bool) -> HandlerResult<()>;
}

/// Request handlers for input packets.
///
/// Handlers receive the whole payload buffer. Update and get handlers also
/// receive the request length; every handler returns the reply length.
pub trait InputHandlers {
    /// Refresh handler-side state before a request is served.
    fn back_fill(&mut self);

    fn fill_ping(&mut self, payload: &mut [u8]) -> HandlerResult<usize>;

    fn fill_version(&mut self, payload: &mut [u8]) -> HandlerResult<usize>;

    fn update_config(&mut self, payload: &mut [u8], len: usize) -> HandlerResult<usize>;

    fn update_param(&mut self, payload: &mut [u8], len: usize) -> HandlerResult<usize>;

    fn update_all(&mut self, payload: &mut [u8], len: usize) -> HandlerResult<usize>;

    fn get_config(&mut self, payload: &mut [u8], len: usize) -> HandlerResult<usize>;

    fn get_param(&mut self, payload: &mut [u8], len: usize) -> HandlerResult<usize>;

    fn get_all(&mut self, payload: &mut [u8], len: usize) -> HandlerResult<usize>;
}

/// Per-kind builders for continuous output payloads.
pub trait OutputBuilders {
    fn fill_data1(&mut self, payload: &mut [u8]) -> HandlerResult<usize>;

    fn fill_scaled1(&mut self, payload: &mut [u8]) -> HandlerResult<usize>;

    fn fill_ang1(&mut self, payload: &mut [u8]) -> HandlerResult<usize>;

    fn fill_ang2(&mut self, payload: &mut [u8]) -> HandlerResult<usize>;

    fn fill_aid1(&mut self, payload: &mut [u8]) -> HandlerResult<usize>;

    fn fill_aid2(&mut self, payload: &mut [u8]) -> HandlerResult<usize>;

    fn fill_aid3(&mut self, payload: &mut [u8]) -> HandlerResult<usize>;
}

/// Everything a session needs from a device.
pub trait Device: Platform + SettingsStore + InputHandlers + OutputBuilders {}

impl<T> Device for T where T: Platform + SettingsStore + InputHandlers + OutputBuilders + ?Sized {}
