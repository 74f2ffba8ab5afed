use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use serde::Serialize;

use crate::code::PacketCode;
use crate::kind::{InputKind, OutputKind, PacketKind};

/// Lowest first byte allowed for an output code. Lower values belong to
/// system-level packets.
pub const MIN_OUTPUT_CODE_LEAD: u8 = 0x61;

/// `zT`: 4-byte tick counter.
pub const TEST_PAYLOAD_LEN: usize = 4;
/// `z1`: timer plus raw accels, rates, mags.
pub const DATA1_PAYLOAD_LEN: usize = 40;
/// `s1`: timer, time, scaled sensors and temperature.
pub const SCALED1_PAYLOAD_LEN: usize = 52;
/// `a1`: timer, time, euler, rates, accels and filter switches.
pub const ANG1_PAYLOAD_LEN: usize = 51;
/// `a2`: timer, time, euler, rates, accels.
pub const ANG2_PAYLOAD_LEN: usize = 48;
/// `d1`: aiding status flags.
pub const AID1_PAYLOAD_LEN: usize = 16;
/// `d2`: velocity aiding.
pub const AID2_PAYLOAD_LEN: usize = 24;
/// `d3`: position aiding.
pub const AID3_PAYLOAD_LEN: usize = 36;

/// One row of the input table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InputEntry {
    pub kind: InputKind,
    pub code: PacketCode,
}

/// One row of the output table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OutputEntry {
    pub kind: OutputKind,
    pub code: PacketCode,
    /// `None` when the length is the size of a record rather than a constant.
    pub payload_len: Option<usize>,
}

const fn input(kind: InputKind, code: &[u8; 2]) -> InputEntry {
    InputEntry {
        kind,
        code: PacketCode::ascii(code),
    }
}

const fn output(kind: OutputKind, code: &[u8; 2], payload_len: Option<usize>) -> OutputEntry {
    OutputEntry {
        kind,
        code: PacketCode::ascii(code),
        payload_len,
    }
}

/// Allowed input packets, in lookup order.
pub const INPUT_PACKETS: &[InputEntry] = &[
    input(InputKind::Ping, b"pG"),
    input(InputKind::UpdateConfig, b"uC"),
    input(InputKind::UpdateParam, b"uP"),
    input(InputKind::UpdateAll, b"uA"),
    input(InputKind::SaveConfig, b"sC"),
    input(InputKind::GetConfig, b"gC"),
    input(InputKind::GetParam, b"gP"),
    input(InputKind::GetAll, b"gA"),
    input(InputKind::GetVersion, b"gV"),
    input(InputKind::Reset, b"rS"),
];

/// Continuous output packets, in lookup order.
///
/// Codes must not overlap input or system codes, and the first byte must be
/// at least [`MIN_OUTPUT_CODE_LEAD`].
pub const OUTPUT_PACKETS: &[OutputEntry] = &[
    output(OutputKind::Test, b"zT", Some(TEST_PAYLOAD_LEN)),
    output(OutputKind::Data1, b"z1", Some(DATA1_PAYLOAD_LEN)),
    output(OutputKind::Data2, b"z2", None),
    output(OutputKind::Scaled1, b"s1", Some(SCALED1_PAYLOAD_LEN)),
    output(OutputKind::Ang1, b"a1", Some(ANG1_PAYLOAD_LEN)),
    output(OutputKind::Ang2, b"a2", Some(ANG2_PAYLOAD_LEN)),
    output(OutputKind::Aid1, b"d1", Some(AID1_PAYLOAD_LEN)),
    output(OutputKind::Aid2, b"d2", Some(AID2_PAYLOAD_LEN)),
    output(OutputKind::Aid3, b"d3", Some(AID3_PAYLOAD_LEN)),
];

/// A breach of the catalog authoring rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "violation", rename_all = "snake_case")]
pub enum CatalogViolation {
    /// Two rows share a code; lookups resolve to `first`.
    DuplicateCode {
        code: PacketCode,
        first: PacketKind,
        shadowed: PacketKind,
    },
    /// An output code starts below [`MIN_OUTPUT_CODE_LEAD`].
    ReservedOutputCode { kind: OutputKind, code: PacketCode },
}

/// Read-only packet tables with code-keyed indexes.
///
/// Indexes are filled in table order and keep the first row for a code, so a
/// duplicated code resolves the same way a front-to-back scan would.
#[derive(Debug, Clone)]
pub struct PacketCatalog {
    inputs: Vec<InputEntry>,
    outputs: Vec<OutputEntry>,
    input_by_code: HashMap<PacketCode, InputKind>,
    output_by_code: HashMap<PacketCode, usize>,
}

impl PacketCatalog {
    /// Build a catalog from explicit tables.
    pub fn from_tables(inputs: &[InputEntry], outputs: &[OutputEntry]) -> Self {
        let mut input_by_code = HashMap::with_capacity(inputs.len());
        for entry in inputs {
            input_by_code.entry(entry.code).or_insert(entry.kind);
        }

        let mut output_by_code = HashMap::with_capacity(outputs.len());
        for (index, entry) in outputs.iter().enumerate() {
            output_by_code.entry(entry.code).or_insert(index);
        }

        Self {
            inputs: inputs.to_vec(),
            outputs: outputs.to_vec(),
            input_by_code,
            output_by_code,
        }
    }

    /// The device's built-in catalog, built on first use.
    pub fn standard() -> &'static PacketCatalog {
        static STANDARD: OnceLock<PacketCatalog> = OnceLock::new();
        STANDARD.get_or_init(|| PacketCatalog::from_tables(INPUT_PACKETS, OUTPUT_PACKETS))
    }

    /// Shared handle to the standard catalog.
    pub fn shared() -> Arc<PacketCatalog> {
        static SHARED: OnceLock<Arc<PacketCatalog>> = OnceLock::new();
        Arc::clone(SHARED.get_or_init(|| Arc::new(PacketCatalog::standard().clone())))
    }

    pub fn lookup_input(&self, code: PacketCode) -> Option<InputKind> {
        self.input_by_code.get(&code).copied()
    }

    pub fn lookup_output(&self, code: PacketCode) -> Option<OutputKind> {
        self.output_entry_for_code(code).map(|entry| entry.kind)
    }

    /// Resolve a code against both tables, input table first.
    pub fn lookup(&self, code: PacketCode) -> Option<PacketKind> {
        self.lookup_input(code)
            .map(PacketKind::Input)
            .or_else(|| self.lookup_output(code).map(PacketKind::Output))
    }

    /// Output row for a code.
    pub fn output_entry_for_code(&self, code: PacketCode) -> Option<&OutputEntry> {
        self.output_by_code
            .get(&code)
            .map(|index| &self.outputs[*index])
    }

    /// Fixed payload length of an output kind, when tabulated.
    pub fn payload_length_for(&self, kind: OutputKind) -> Option<usize> {
        self.outputs
            .iter()
            .find(|entry| entry.kind == kind)
            .and_then(|entry| entry.payload_len)
    }

    pub fn input_code(&self, kind: InputKind) -> Option<PacketCode> {
        self.inputs
            .iter()
            .find(|entry| entry.kind == kind)
            .map(|entry| entry.code)
    }

    pub fn output_code(&self, kind: OutputKind) -> Option<PacketCode> {
        self.outputs
            .iter()
            .find(|entry| entry.kind == kind)
            .map(|entry| entry.code)
    }

    /// Wire code of any kind.
    pub fn code_of(&self, kind: PacketKind) -> Option<PacketCode> {
        match kind {
            PacketKind::Input(kind) => self.input_code(kind),
            PacketKind::Output(kind) => self.output_code(kind),
        }
    }

    pub fn inputs(&self) -> &[InputEntry] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[OutputEntry] {
        &self.outputs
    }

    /// Check the authoring rules. Lookups never call this.
    pub fn contract_violations(&self) -> Vec<CatalogViolation> {
        let mut violations = Vec::new();
        let mut seen: HashMap<PacketCode, PacketKind> = HashMap::new();

        let rows = self
            .inputs
            .iter()
            .map(|entry| (entry.code, PacketKind::Input(entry.kind)))
            .chain(
                self.outputs
                    .iter()
                    .map(|entry| (entry.code, PacketKind::Output(entry.kind))),
            );

        for (code, kind) in rows {
            match seen.get(&code) {
                Some(first) => violations.push(CatalogViolation::DuplicateCode {
                    code,
                    first: *first,
                    shadowed: kind,
                }),
                None => {
                    seen.insert(code, kind);
                }
            }
        }

        for entry in &self.outputs {
            if entry.code.bytes()[0] < MIN_OUTPUT_CODE_LEAD {
                violations.push(CatalogViolation::ReservedOutputCode {
                    kind: entry.kind,
                    code: entry.code,
                });
            }
        }

        violations
    }
}
