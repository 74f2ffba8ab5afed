use navlink_catalog::{CatalogViolation, PacketCatalog, PacketCode, PacketKind};
use navlink_dispatch::record_size;
use serde::Serialize;

use crate::cmd::{CatalogArgs, Context};
use crate::exit::{CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{new_table, print_json, OutputFormat};

#[derive(Serialize)]
struct CatalogRow {
    #[serde(flatten)]
    kind: PacketKind,
    code: PacketCode,
    code_hex: String,
    /// Fixed continuous payload length; `record_size` rows take it from
    /// the record layout.
    payload_len: Option<usize>,
    record_size: bool,
}

pub fn run(args: CatalogArgs, ctx: Context) -> CliResult<i32> {
    let catalog = PacketCatalog::standard();
    let rows = rows(catalog);
    print_rows(&rows, ctx.format);

    if !args.check {
        return Ok(SUCCESS);
    }

    let violations = catalog.contract_violations();
    if violations.is_empty() {
        return Ok(SUCCESS);
    }

    for violation in &violations {
        eprintln!("violation: {}", describe(violation));
    }
    Err(CliError::new(
        DATA_INVALID,
        format!("catalog has {} violation(s)", violations.len()),
    ))
}

fn rows(catalog: &PacketCatalog) -> Vec<CatalogRow> {
    let inputs = catalog.inputs().iter().map(|entry| CatalogRow {
        kind: PacketKind::Input(entry.kind),
        code: entry.code,
        code_hex: format!("0x{:04X}", entry.code.as_u16()),
        payload_len: None,
        record_size: false,
    });
    let outputs = catalog.outputs().iter().map(|entry| CatalogRow {
        kind: PacketKind::Output(entry.kind),
        code: entry.code,
        code_hex: format!("0x{:04X}", entry.code.as_u16()),
        payload_len: Some(entry.payload_len.unwrap_or_else(|| record_size(entry.kind))),
        record_size: entry.payload_len.is_none(),
    });
    inputs.chain(outputs).collect()
}

fn print_rows(rows: &[CatalogRow], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&rows),
        OutputFormat::Table => {
            let mut table = new_table(vec!["FAMILY", "KIND", "CODE", "HEX", "PAYLOAD"]);
            for row in rows {
                table.add_row(vec![
                    family(row.kind).to_string(),
                    row.kind.name().to_string(),
                    row.code.to_string(),
                    row.code_hex.clone(),
                    payload_cell(row),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for row in rows {
                println!(
                    "{:<6} {:<14} {} {} {}",
                    family(row.kind),
                    row.kind.name(),
                    row.code,
                    row.code_hex,
                    payload_cell(row)
                );
            }
        }
        OutputFormat::Raw => {
            for row in rows {
                println!("{}", row.code);
            }
        }
    }
}

fn family(kind: PacketKind) -> &'static str {
    if kind.is_input() {
        "input"
    } else {
        "output"
    }
}

fn payload_cell(row: &CatalogRow) -> String {
    match (row.payload_len, row.record_size) {
        (Some(len), true) => format!("{len} (record)"),
        (Some(len), false) => len.to_string(),
        (None, _) => "-".to_string(),
    }
}

fn describe(violation: &CatalogViolation) -> String {
    match violation {
        CatalogViolation::DuplicateCode {
            code,
            first,
            shadowed,
        } => format!(
            "code {code} used by {} and {}; lookups resolve to {}",
            first.name(),
            shadowed.name(),
            first.name()
        ),
        CatalogViolation::ReservedOutputCode { kind, code } => {
            format!("output {} uses reserved code {code}", kind.name())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_cover_both_tables() {
        let rows = rows(PacketCatalog::standard());
        assert_eq!(rows.len(), 19);
        let z2 = rows
            .iter()
            .find(|row| row.code == PacketCode::ascii(b"z2"))
            .unwrap();
        assert_eq!(z2.payload_len, Some(27));
        assert!(z2.record_size);
    }
}
