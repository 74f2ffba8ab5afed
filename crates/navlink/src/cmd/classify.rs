use navlink_catalog::{PacketCode, PacketKind};
use navlink_dispatch::{record_size, PacketClass, Session};
use serde::Serialize;

use crate::cmd::{ClassifyArgs, Context};
use crate::exit::{catalog_error, dispatch_error, CliResult, SUCCESS};
use crate::output::{new_table, print_json, OutputFormat};

#[derive(Serialize)]
struct ClassifyOutput {
    code: PacketCode,
    code_hex: String,
    class: PacketClass,
    #[serde(flatten)]
    kind: PacketKind,
    payload_len: Option<usize>,
}

pub fn run(args: ClassifyArgs, ctx: Context) -> CliResult<i32> {
    let code: PacketCode = args
        .code
        .parse()
        .map_err(|err| catalog_error("invalid code", err))?;

    let mut session = Session::with_config(ctx.dispatch);
    let class = session
        .classify(code.as_u16())
        .map_err(|err| dispatch_error("classify failed", err))?;

    let catalog = session.catalog();
    let Some(kind) = catalog.lookup(code) else {
        return Err(dispatch_error(
            "classify failed",
            navlink_dispatch::DispatchError::InvalidType(code),
        ));
    };
    let payload_len = match kind {
        PacketKind::Output(kind) => {
            Some(catalog.payload_length_for(kind).unwrap_or_else(|| record_size(kind)))
        }
        PacketKind::Input(_) => None,
    };

    let out = ClassifyOutput {
        code,
        code_hex: format!("0x{:04X}", code.as_u16()),
        class,
        kind,
        payload_len,
    };
    print_output(&out, ctx.format);
    Ok(SUCCESS)
}

fn print_output(out: &ClassifyOutput, format: OutputFormat) {
    let class = match out.class {
        PacketClass::UserIn => "user_in",
        PacketClass::UserOut => "user_out",
    };
    let payload = out
        .payload_len
        .map(|len| len.to_string())
        .unwrap_or_else(|| "-".to_string());

    match format {
        OutputFormat::Json => print_json(out),
        OutputFormat::Table => {
            let mut table = new_table(vec!["CODE", "HEX", "CLASS", "KIND", "PAYLOAD"]);
            table.add_row(vec![
                out.code.to_string(),
                out.code_hex.clone(),
                class.to_string(),
                out.kind.name().to_string(),
                payload,
            ]);
            println!("{table}");
        }
        OutputFormat::Pretty => println!(
            "{} ({}) -> {} {} payload={}",
            out.code,
            out.code_hex,
            class,
            out.kind.name(),
            payload
        ),
        OutputFormat::Raw => println!("{}", out.kind.name()),
    }
}
