//! Implementation of the `larch parts` command.

use std::io::Write;

use larch_common::FqName;
use larch_library::MetadataLibrary;

use crate::context::{write_json, CommandResult};
use crate::{GlobalArgs, OutputFormat, PartsArgs};

/// Runs the `larch parts` command.
pub fn run(args: &PartsArgs, global: &GlobalArgs) -> CommandResult<i32> {
    report(args, global, &mut std::io::stdout().lock())?;
    Ok(0)
}

fn report(args: &PartsArgs, global: &GlobalArgs, out: &mut impl Write) -> CommandResult<()> {
    let library = global.open_library(&args.library, None)?;
    let package = FqName::new(args.package.as_str());
    let parts = library.package_metadata_parts(&package)?;
    match global.format {
        OutputFormat::Text => {
            for part in &parts {
                writeln!(out, "{part}")?;
            }
        }
        OutputFormat::Json => write_json(out, &parts)?,
    }
    Ok(())
}
