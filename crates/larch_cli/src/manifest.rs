//! Implementation of the `larch manifest` command.

use std::collections::BTreeMap;
use std::io::Write;

use larch_library::BaseLibrary;

use crate::context::{write_json, CommandResult};
use crate::{GlobalArgs, ManifestArgs, OutputFormat};

/// Runs the `larch manifest` command.
///
/// Prints one `key=value` line per property, sorted by key. With a target
/// the substituted manifest is printed.
pub fn run(args: &ManifestArgs, global: &GlobalArgs) -> CommandResult<i32> {
    report(args, global, &mut std::io::stdout().lock())?;
    Ok(0)
}

fn report(args: &ManifestArgs, global: &GlobalArgs, out: &mut impl Write) -> CommandResult<()> {
    let library = global.open_library(&args.library, args.target.as_deref())?;
    let properties = library.manifest_properties()?;
    match global.format {
        OutputFormat::Text => {
            for (key, value) in properties.iter() {
                writeln!(out, "{key}={value}")?;
            }
        }
        OutputFormat::Json => {
            let map: BTreeMap<&str, &str> = properties.iter().collect();
            write_json(out, &map)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::fixtures;

    #[test]
    fn raw_manifest_without_target() {
        let dir = tempfile::tempdir().unwrap();
        let args = ManifestArgs {
            library: fixtures::library(dir.path()),
            target: None,
        };
        let mut out = Vec::new();
        report(&args, &fixtures::global(OutputFormat::Text), &mut out).unwrap();
        let text = fixtures::output(out);
        assert!(text.contains("linkerOpts=-lfoo\n"));
        assert!(text.starts_with("abi_version=1.8.0\n"));
    }

    #[test]
    fn substituted_manifest_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let args = ManifestArgs {
            library: fixtures::library(dir.path()),
            target: Some("linux_x64".to_string()),
        };
        let mut out = Vec::new();
        report(&args, &fixtures::global(OutputFormat::Json), &mut out).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["linkerOpts"], "-lfoo -ldl");
        assert_eq!(json["linkerOpts.linux"], "-ldl");
    }
}
