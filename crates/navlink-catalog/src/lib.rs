//! User packet catalog for the navlink protocol layer.
//!
//! Every user packet is identified by a two-byte code in the packet header:
//! - input codes are host requests (`pG`, `gA`, ...) answered once
//! - output codes select a continuous telemetry stream (`z1`, `a2`, ...)
//!
//! The tables are static. Lookups go through code-keyed indexes built once.

pub mod catalog;
pub mod code;
pub mod error;
pub mod kind;

pub use catalog::{
    CatalogViolation, InputEntry, OutputEntry, PacketCatalog, AID1_PAYLOAD_LEN, AID2_PAYLOAD_LEN,
    AID3_PAYLOAD_LEN, ANG1_PAYLOAD_LEN, ANG2_PAYLOAD_LEN, DATA1_PAYLOAD_LEN, INPUT_PACKETS,
    MIN_OUTPUT_CODE_LEAD, OUTPUT_PACKETS, SCALED1_PAYLOAD_LEN, TEST_PAYLOAD_LEN,
};
pub use code::PacketCode;
pub use error::{CatalogError, Result};
pub use kind::{InputKind, OutputKind, PacketKind};
