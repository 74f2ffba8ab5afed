//! User packet dispatch for the navlink protocol layer.
//!
//! The transport hands over a parsed header code and a payload buffer. A
//! [`Session`] classifies the code, serves requests through the collaborator
//! traits in [`handler`], assembles continuous telemetry payloads, and says
//! which code the next outgoing packet carries. Framing and checksums stay
//! with the transport.

pub mod config;
pub mod error;
pub mod handler;
pub mod packet;
pub mod session;

pub use config::DispatchConfig;
pub use error::{DispatchError, HandlerError, HandlerResult, Result};
pub use handler::{Device, InputHandlers, OutputBuilders, Platform, SettingsStore};
pub use packet::{Packet, PacketClass, MAX_PAYLOAD_LEN};
pub use session::{record_size, Session};
