//! Implementation of the `larch info` command.

use std::io::Write;
use std::path::PathBuf;

use larch_library::{
    BaseLibrary, Library, LibraryExt, LibraryVersioning, TargetedLibrary, UnresolvedLibrary,
};
use serde::Serialize;

use crate::context::{write_json, CommandResult};
use crate::{GlobalArgs, InfoArgs, OutputFormat};

/// Summary printed by `larch info`.
#[derive(Debug, Serialize)]
struct LibraryInfo {
    name: String,
    path: PathBuf,
    unique_name: String,
    short_name: Option<String>,
    target: Option<String>,
    versions: LibraryVersioning,
    targets: Vec<String>,
    dependencies: Vec<UnresolvedLibrary>,
    interop: bool,
    package: Option<String>,
    linker_opts: Vec<String>,
}

impl LibraryInfo {
    fn collect(library: &impl Library, target: Option<&str>) -> CommandResult<Self> {
        Ok(Self {
            name: library.library_name().to_string(),
            path: library.library_file().to_path_buf(),
            unique_name: library.unique_name()?.to_string(),
            short_name: library.short_name()?.map(str::to_string),
            target: target.map(str::to_string),
            versions: library.versions()?.clone(),
            targets: library.target_list()?,
            dependencies: library.unresolved_dependencies()?,
            interop: library.is_interop()?,
            package: library.package_fq_name()?.map(str::to_string),
            linker_opts: library.linker_opts()?,
        })
    }

    fn write_text(&self, out: &mut impl Write) -> std::io::Result<()> {
        let none = || "-".to_string();
        writeln!(out, "name:          {}", self.name)?;
        writeln!(out, "path:          {}", self.path.display())?;
        writeln!(out, "unique name:   {}", self.unique_name)?;
        if let Some(short_name) = &self.short_name {
            writeln!(out, "short name:    {short_name}")?;
        }
        if let Some(target) = &self.target {
            writeln!(out, "target:        {target}")?;
        }
        let versions = &self.versions;
        writeln!(
            out,
            "version:       {}",
            versions.library_version.clone().unwrap_or_else(none)
        )?;
        writeln!(
            out,
            "abi version:   {}",
            versions.abi_version.map(|v| v.to_string()).unwrap_or_else(none)
        )?;
        writeln!(
            out,
            "compiler:      {}",
            versions.compiler_version.clone().unwrap_or_else(none)
        )?;
        writeln!(out, "targets:       {}", join_or_dash(&self.targets))?;
        let dependencies: Vec<String> = self
            .dependencies
            .iter()
            .map(|dep| match &dep.version {
                Some(version) => format!("{} ({version})", dep.name),
                None => dep.name.clone(),
            })
            .collect();
        writeln!(out, "dependencies:  {}", join_or_dash(&dependencies))?;
        writeln!(out, "interop:       {}", self.interop)?;
        writeln!(
            out,
            "package:       {}",
            self.package.clone().unwrap_or_else(none)
        )?;
        writeln!(out, "linker opts:   {}", join_or_dash(&self.linker_opts))?;
        Ok(())
    }
}

fn join_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

/// Runs the `larch info` command.
pub fn run(args: &InfoArgs, global: &GlobalArgs) -> CommandResult<i32> {
    report(args, global, &mut std::io::stdout().lock())?;
    Ok(0)
}

fn report(args: &InfoArgs, global: &GlobalArgs, out: &mut impl Write) -> CommandResult<()> {
    let library = global.open_library(&args.library, args.target.as_deref())?;
    let info = LibraryInfo::collect(&library, args.target.as_deref())?;
    match global.format {
        OutputFormat::Text => info.write_text(out)?,
        OutputFormat::Json => write_json(out, &info)?,
    }
    Ok(())
}
