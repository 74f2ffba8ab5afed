//! User packet layer for inertial navigation units.
//!
//! navlink classifies the two-byte codes of received user packets, serves
//! configuration requests through device collaborators, assembles continuous
//! telemetry payloads and picks the header code of each outgoing packet.
//!
//! # Crate Structure
//!
//! - [`catalog`]: packet tables and code lookup
//! - [`payload`]: little-endian payload records
//! - [`dispatch`]: the per-device session and collaborator traits
//! - [`device`]: a simulated device (behind the `device` feature)

/// Re-export catalog types.
pub mod catalog {
    pub use navlink_catalog::*;
}

/// Re-export payload records.
pub mod payload {
    pub use navlink_payload::*;
}

/// Re-export dispatch types.
pub mod dispatch {
    pub use navlink_dispatch::*;
}

/// Re-export the simulated device (requires `device` feature).
#[cfg(feature = "device")]
pub mod device {
    pub use navlink_device::*;
}
