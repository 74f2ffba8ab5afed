use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use navlink_catalog::PacketCode;
use serde::Serialize;
use serde_json::Value;

use crate::decode::describe;

#[derive(Clone, Debug, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// Direction of a packet relative to the simulated device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Rx,
    Tx,
}

impl Direction {
    fn as_str(self) -> &'static str {
        match self {
            Direction::Rx => "rx",
            Direction::Tx => "tx",
        }
    }
}

/// One packet as the CLI reports it.
#[derive(Debug, Serialize)]
pub struct PacketLine {
    pub seq: usize,
    pub direction: Direction,
    pub code: PacketCode,
    pub code_hex: String,
    pub kind: Option<&'static str>,
    pub payload_len: usize,
    pub payload_hex: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decoded: Option<Value>,
    #[serde(skip)]
    pub payload: Vec<u8>,
}

impl PacketLine {
    pub fn new(seq: usize, direction: Direction, code: PacketCode, payload: &[u8]) -> Self {
        let kind = navlink_catalog::PacketCatalog::standard()
            .lookup(code)
            .map(|kind| kind.name());
        let decoded = match direction {
            Direction::Tx => describe(code, payload),
            Direction::Rx => None,
        };
        Self {
            seq,
            direction,
            code,
            code_hex: format!("0x{:04X}", code.as_u16()),
            kind,
            payload_len: payload.len(),
            payload_hex: to_hex(payload),
            decoded,
            payload: payload.to_vec(),
        }
    }
}

pub fn print_packets(lines: &[PacketLine], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            for line in lines {
                print_json(line);
            }
        }
        OutputFormat::Table => {
            let mut table = new_table(vec!["#", "DIR", "CODE", "KIND", "LEN", "PAYLOAD"]);
            for line in lines {
                table.add_row(vec![
                    line.seq.to_string(),
                    line.direction.as_str().to_string(),
                    line.code.to_string(),
                    line.kind.unwrap_or("-").to_string(),
                    line.payload_len.to_string(),
                    summary(line),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for line in lines {
                println!(
                    "#{} {} code={} ({}) len={} payload={}",
                    line.seq,
                    line.direction.as_str(),
                    line.code,
                    line.kind.unwrap_or("unknown"),
                    line.payload_len,
                    summary(line)
                );
            }
        }
        OutputFormat::Raw => {
            for line in lines {
                print_raw(&line.payload);
            }
        }
    }
}

pub fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

pub fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Parse an even-length hex string into bytes.
pub fn from_hex(text: &str) -> Option<Vec<u8>> {
    let text = text.trim();
    if text.len() % 2 != 0 || !text.is_ascii() {
        return None;
    }
    (0..text.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&text[i..i + 2], 16).ok())
        .collect()
}

fn summary(line: &PacketLine) -> String {
    match &line.decoded {
        Some(value) => value.to_string(),
        None if line.payload.is_empty() => "-".to_string(),
        None => line.payload_hex.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        assert_eq!(from_hex("0a0B ff"), None);
        assert_eq!(from_hex("0a0Bff"), Some(vec![0x0a, 0x0b, 0xff]));
        assert_eq!(from_hex(""), Some(vec![]));
        assert_eq!(from_hex("abc"), None);
        assert_eq!(to_hex(&[0x0a, 0xff]), "0aff");
    }
}
