//! Implementation of the `larch natives` command.

use std::io::Write;

use larch_library::BitcodeLibrary;

use crate::context::{write_json, CommandResult};
use crate::{GlobalArgs, NativesArgs, OutputFormat};

/// Runs the `larch natives` command.
///
/// Prints the absolute paths of the target's compiled code followed by its
/// native dependencies.
pub fn run(args: &NativesArgs, global: &GlobalArgs) -> CommandResult<i32> {
    report(args, global, &mut std::io::stdout().lock())?;
    Ok(0)
}

fn report(args: &NativesArgs, global: &GlobalArgs, out: &mut impl Write) -> CommandResult<()> {
    let library = global.open_library(&args.library, Some(&args.target))?;
    let paths = library.bitcode_paths()?;
    if paths.is_empty() {
        tracing::warn!(
            library = %args.library.display(),
            target = %args.target,
            "library has no native code for target"
        );
    }
    match global.format {
        OutputFormat::Text => {
            for path in &paths {
                writeln!(out, "{}", path.display())?;
            }
        }
        OutputFormat::Json => write_json(out, &paths)?,
    }
    Ok(())
}
