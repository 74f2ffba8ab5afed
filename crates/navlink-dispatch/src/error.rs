use navlink_catalog::{InputKind, OutputKind, PacketCode};
use navlink_payload::PayloadError;

/// Failure reported by a collaborator (request handler, payload builder,
/// settings store).
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// The request payload could not be decoded or the reply did not fit.
    #[error("malformed payload: {0}")]
    Payload(#[from] PayloadError),

    /// The request was understood but refused.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// Persistent settings could not be written.
    #[error("settings storage failed: {0}")]
    Storage(String),
}

pub type HandlerResult<T> = std::result::Result<T, HandlerError>;

/// Errors surfaced by the dispatch layer to the transport.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The received code is in neither packet table.
    #[error("invalid user packet type {0}")]
    InvalidType(PacketCode),

    /// Dispatch was called without a classified input packet.
    #[error("no classified input packet pending")]
    NoPendingInput,

    /// An input handler reported failure.
    #[error("{} handler failed: {source}", .kind.name())]
    Handler {
        kind: InputKind,
        source: HandlerError,
    },

    /// A telemetry tick ran with no output kind selected.
    #[error("no continuous output selected")]
    NoActiveOutput,

    /// An output payload builder reported failure.
    #[error("{} payload builder failed: {source}", .kind.name())]
    OutputBuilder {
        kind: OutputKind,
        source: HandlerError,
    },

    /// The requested continuous output code is not in the output table.
    #[error("unknown output packet code {0}")]
    UnknownOutputCode(PacketCode),

    /// The selection took effect but could not be persisted.
    #[error("failed to persist output selection {code}: {source}")]
    PersistSelection {
        code: PacketCode,
        source: HandlerError,
    },

    /// A payload does not fit the packet buffer.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, DispatchError>;
