//! Implementation of the `larch declaration` command.

use std::io::Write;

use larch_library::{DeclarationId, IrLibrary};
use serde::Serialize;

use crate::context::{write_json, CommandResult};
use crate::{DeclarationArgs, GlobalArgs, OutputFormat};

#[derive(Debug, Serialize)]
struct DeclarationSummary {
    index: u64,
    local: bool,
    size: usize,
}

/// Runs the `larch declaration` command.
///
/// With `--raw` the declaration bytes are written to stdout unchanged and
/// `--format` is ignored.
pub fn run(args: &DeclarationArgs, global: &GlobalArgs) -> CommandResult<i32> {
    let mut stdout = std::io::stdout().lock();
    report(args, global, &mut stdout)?;
    stdout.flush()?;
    Ok(0)
}

fn report(args: &DeclarationArgs, global: &GlobalArgs, out: &mut impl Write) -> CommandResult<()> {
    let library = global.open_library(&args.library, None)?;
    let bytes = library.ir_declaration(args.index, args.local)?;
    if args.raw {
        out.write_all(bytes)?;
        return Ok(());
    }
    match global.format {
        OutputFormat::Text => {
            let id = DeclarationId::new(args.index, args.local);
            writeln!(out, "{id}: {} bytes", bytes.len())?;
        }
        OutputFormat::Json => write_json(
            out,
            &DeclarationSummary {
                index: args.index,
                local: args.local,
                size: bytes.len(),
            },
        )?,
    }
    Ok(())
}
