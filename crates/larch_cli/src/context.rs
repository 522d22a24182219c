//! Settings shared by every subcommand.

use std::error::Error;
use std::io::Write;
use std::path::{Path, PathBuf};

use larch_common::Target;
use larch_library::{create_library, LibraryImpl};
use larch_properties::{load_substitution_config, SubstitutionConfig};
use serde::Serialize;

use crate::OutputFormat;

/// Result type of every subcommand.
pub type CommandResult<T> = Result<T, Box<dyn Error>>;

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Report format.
    pub format: OutputFormat,
    /// Optional substitution config file.
    pub config: Option<PathBuf>,
}

impl GlobalArgs {
    /// Resolves `name` against the built-in targets and the `--config` file.
    pub fn resolve_target(&self, name: &str) -> CommandResult<Target> {
        let config = match &self.config {
            Some(path) => load_substitution_config(path)
                .map_err(|e| format!("{}: {e}", path.display()))?,
            None => SubstitutionConfig::default(),
        };
        Ok(config.resolve_target(name)?)
    }

    /// Opens the library at `library`, optionally for a target.
    ///
    /// Fails early if `library` does not exist; everything else is loaded
    /// lazily by the library itself.
    pub fn open_library(&self, library: &Path, target: Option<&str>) -> CommandResult<LibraryImpl> {
        if !library.exists() {
            return Err(format!("library not found: {}", library.display()).into());
        }
        let target = target.map(|name| self.resolve_target(name)).transpose()?;
        tracing::debug!(
            library = %library.display(),
            target = target.as_ref().map(Target::name),
            "opening library"
        );
        Ok(create_library(library, target.as_ref(), false))
    }
}

/// Writes `value` as pretty JSON followed by a newline.
pub fn write_json<T: Serialize>(out: &mut impl Write, value: &T) -> CommandResult<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
