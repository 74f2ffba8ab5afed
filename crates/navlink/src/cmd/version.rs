use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("navlink {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: navlink");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!("target: {}", option_env!("NAVLINK_BUILD_TARGET").unwrap_or("unknown"));
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!("git_hash: {}", option_env!("GIT_HASH").unwrap_or("unknown"));
    println!(
        "features: device={}, cli=true",
        cfg!(feature = "device")
    );
    println!(
        "catalog: {} input, {} output",
        navlink_catalog::INPUT_PACKETS.len(),
        navlink_catalog::OUTPUT_PACKETS.len()
    );

    Ok(SUCCESS)
}
