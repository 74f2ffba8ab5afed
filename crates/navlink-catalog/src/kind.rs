//! User packet kinds.
//!
//! Input kinds are host requests answered once. Output kinds are telemetry
//! packets streamed every tick while selected.

use serde::Serialize;

/// Host request packet kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Ping,
    UpdateConfig,
    UpdateParam,
    UpdateAll,
    SaveConfig,
    GetConfig,
    GetParam,
    GetAll,
    GetVersion,
    Reset,
}

impl InputKind {
    /// All input kinds in catalog order.
    pub const ALL: [InputKind; 10] = [
        InputKind::Ping,
        InputKind::UpdateConfig,
        InputKind::UpdateParam,
        InputKind::UpdateAll,
        InputKind::SaveConfig,
        InputKind::GetConfig,
        InputKind::GetParam,
        InputKind::GetAll,
        InputKind::GetVersion,
        InputKind::Reset,
    ];

    pub fn name(self) -> &'static str {
        match self {
            InputKind::Ping => "PING",
            InputKind::UpdateConfig => "UPDATE_CONFIG",
            InputKind::UpdateParam => "UPDATE_PARAM",
            InputKind::UpdateAll => "UPDATE_ALL",
            InputKind::SaveConfig => "SAVE_CONFIG",
            InputKind::GetConfig => "GET_CONFIG",
            InputKind::GetParam => "GET_PARAM",
            InputKind::GetAll => "GET_ALL",
            InputKind::GetVersion => "GET_VERSION",
            InputKind::Reset => "RESET",
        }
    }
}

/// Continuous telemetry packet kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    Test,
    Data1,
    Data2,
    Scaled1,
    Ang1,
    Ang2,
    Aid1,
    Aid2,
    Aid3,
}

impl OutputKind {
    /// All output kinds in catalog order.
    pub const ALL: [OutputKind; 9] = [
        OutputKind::Test,
        OutputKind::Data1,
        OutputKind::Data2,
        OutputKind::Scaled1,
        OutputKind::Ang1,
        OutputKind::Ang2,
        OutputKind::Aid1,
        OutputKind::Aid2,
        OutputKind::Aid3,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OutputKind::Test => "TEST",
            OutputKind::Data1 => "DATA1",
            OutputKind::Data2 => "DATA2",
            OutputKind::Scaled1 => "SCALED1",
            OutputKind::Ang1 => "ANG1",
            OutputKind::Ang2 => "ANG2",
            OutputKind::Aid1 => "AID1",
            OutputKind::Aid2 => "AID2",
            OutputKind::Aid3 => "AID3",
        }
    }
}

/// Either family of user packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "family", content = "kind", rename_all = "snake_case")]
pub enum PacketKind {
    Input(InputKind),
    Output(OutputKind),
}

impl PacketKind {
    pub fn name(self) -> &'static str {
        match self {
            PacketKind::Input(kind) => kind.name(),
            PacketKind::Output(kind) => kind.name(),
        }
    }

    /// Returns true for host request kinds.
    pub fn is_input(self) -> bool {
        matches!(self, PacketKind::Input(_))
    }
}

impl From<InputKind> for PacketKind {
    fn from(kind: InputKind) -> Self {
        PacketKind::Input(kind)
    }
}

impl From<OutputKind> for PacketKind {
    fn from(kind: OutputKind) -> Self {
        PacketKind::Output(kind)
    }
}
