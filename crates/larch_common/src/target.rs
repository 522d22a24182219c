//! Compilation targets a library archive may carry artifacts for.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// CPU architecture of a compilation target.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Architecture {
    /// 64-bit x86.
    X64,
    /// 32-bit x86.
    X86,
    /// 64-bit ARM.
    Arm64,
    /// 32-bit ARM.
    Arm32,
    /// 32-bit WebAssembly.
    Wasm32,
}

impl Architecture {
    /// Returns the lowercase name used in manifest property suffixes.
    pub fn name(self) -> &'static str {
        match self {
            Architecture::X64 => "x64",
            Architecture::X86 => "x86",
            Architecture::Arm64 => "arm64",
            Architecture::Arm32 => "arm32",
            Architecture::Wasm32 => "wasm32",
        }
    }
}

/// Operating system family of a compilation target.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    /// Linux.
    Linux,
    /// macOS.
    Osx,
    /// iOS and its simulators.
    Ios,
    /// Android.
    Android,
    /// Windows via MinGW.
    Mingw,
    /// WebAssembly hosts.
    Wasm,
}

impl Family {
    /// Returns the lowercase name used in manifest property suffixes.
    pub fn name(self) -> &'static str {
        match self {
            Family::Linux => "linux",
            Family::Osx => "osx",
            Family::Ios => "ios",
            Family::Android => "android",
            Family::Mingw => "mingw",
            Family::Wasm => "wasm",
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Built-in targets: `(name, architecture, family)`.
const KNOWN_TARGETS: &[(&str, Architecture, Family)] = &[
    ("linux_x64", Architecture::X64, Family::Linux),
    ("linux_arm64", Architecture::Arm64, Family::Linux),
    ("linux_arm32_hfp", Architecture::Arm32, Family::Linux),
    ("macos_x64", Architecture::X64, Family::Osx),
    ("macos_arm64", Architecture::Arm64, Family::Osx),
    ("ios_arm64", Architecture::Arm64, Family::Ios),
    ("ios_x64", Architecture::X64, Family::Ios),
    ("ios_simulator_arm64", Architecture::Arm64, Family::Ios),
    ("mingw_x64", Architecture::X64, Family::Mingw),
    ("android_arm32", Architecture::Arm32, Family::Android),
    ("android_arm64", Architecture::Arm64, Family::Android),
    ("android_x64", Architecture::X64, Family::Android),
    ("android_x86", Architecture::X86, Family::Android),
    ("wasm32", Architecture::Wasm32, Family::Wasm),
];

/// A named compilation target.
///
/// The name is what the archive uses for its per-target directories. The
/// architecture and family feed the default substitution table applied to
/// manifest properties when a library is opened for this target.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize)]
pub struct Target {
    name: String,
    architecture: Architecture,
    family: Family,
    extra_substitutions: BTreeMap<String, String>,
}

impl Target {
    /// Creates a target that is not part of the built-in table.
    pub fn custom(name: impl Into<String>, architecture: Architecture, family: Family) -> Self {
        Self {
            name: name.into(),
            architecture,
            family,
            extra_substitutions: BTreeMap::new(),
        }
    }

    /// Adds an entry to this target's substitution table.
    ///
    /// Extra entries are applied alongside `target`, `arch` and `family`; an
    /// entry with one of those keys replaces the default.
    pub fn with_substitution(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_substitutions.insert(key.into(), value.into());
        self
    }

    /// Returns every built-in target.
    pub fn known() -> impl Iterator<Item = Target> {
        KNOWN_TARGETS
            .iter()
            .map(|&(name, architecture, family)| Target::custom(name, architecture, family))
    }

    /// Returns `true` if `name` is one of the built-in targets.
    pub fn is_known_name(name: &str) -> bool {
        KNOWN_TARGETS.iter().any(|(known, _, _)| *known == name)
    }

    /// The target name, e.g. `linux_x64`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The target's CPU architecture.
    pub fn architecture(&self) -> Architecture {
        self.architecture
    }

    /// The target's operating system family.
    pub fn family(&self) -> Family {
        self.family
    }

    /// Default substitution table for this target.
    ///
    /// Maps `target`, `arch` and `family` to the corresponding names, plus any
    /// extra entries. Manifest keys suffixed with any of these values are
    /// folded into their base key.
    pub fn substitutions(&self) -> BTreeMap<String, String> {
        let mut table = BTreeMap::from([
            ("target".to_string(), self.name.clone()),
            ("arch".to_string(), self.architecture.name().to_string()),
            ("family".to_string(), self.family.name().to_string()),
        ]);
        table.extend(self.extra_substitutions.clone());
        table
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Error type for parsing target names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown target: '{input}'")]
pub struct ParseTargetError {
    /// The input string that failed to parse.
    pub input: String,
}

impl FromStr for Target {
    type Err = ParseTargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        KNOWN_TARGETS
            .iter()
            .find(|(known, _, _)| *known == name)
            .map(|&(name, architecture, family)| Target::custom(name, architecture, family))
            .ok_or_else(|| ParseTargetError {
                input: s.to_string(),
            })
    }
}
