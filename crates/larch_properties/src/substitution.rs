//! Target substitution over manifest properties.
//!
//! A manifest may carry target-specific variants of a property by suffixing
//! the key with a substitution value, e.g. `linkerOpts.linux` or
//! `linkerOpts.arm64`. When a library is opened for a target, each such
//! variant is folded into the base key. The substitution values come from
//! the target's table (`target`, `arch`, `family` plus any extras), which
//! can be extended from a TOML [`SubstitutionConfig`].

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use larch_common::{Architecture, Family, Target};
use serde::Deserialize;

use crate::error::PropertiesError;
use crate::properties::Properties;

/// Folds target-suffixed keys into their base key.
///
/// For every key `base.<suffix>` where `<suffix>` is one of the values in
/// `substitutions`, the key's value is appended to `base` separated by a
/// space, or becomes the value of `base` if `base` is absent. Suffixed keys
/// are visited in ascending order and are left in place. A value shared by
/// several substitution entries folds once.
pub fn substitute(properties: &mut Properties, substitutions: &BTreeMap<String, String>) {
    let suffixes: BTreeSet<String> = substitutions.values().map(|v| format!(".{v}")).collect();

    let folds: Vec<(String, String)> = properties
        .iter()
        .flat_map(|(key, value)| {
            suffixes.iter().filter_map(move |suffix| {
                key.strip_suffix(suffix.as_str())
                    .filter(|base| !base.is_empty())
                    .map(|base| (base.to_string(), value.to_string()))
            })
        })
        .collect();

    for (base, appended) in folds {
        let merged = match properties.get(&base) {
            Some(old) if !old.is_empty() => format!("{old} {appended}"),
            _ => appended,
        };
        properties.insert(base, merged);
    }
}

/// Per-target substitution overrides loaded from TOML.
///
/// ```toml
/// [targets.my_board]
/// arch = "arm32"
/// family = "linux"
/// extra = { abi = "gnueabihf" }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubstitutionConfig {
    /// Overrides keyed by target name.
    #[serde(default)]
    pub targets: BTreeMap<String, TargetOverride>,
}

/// Overrides for one target.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TargetOverride {
    /// Architecture; required for targets outside the built-in table.
    pub arch: Option<Architecture>,
    /// Family; required for targets outside the built-in table.
    pub family: Option<Family>,
    /// Additional substitution entries.
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl SubstitutionConfig {
    /// Resolves a target name against the built-in table and this config.
    ///
    /// Built-in targets take the config's overrides and extras if present.
    /// Other names must be fully defined by the config.
    pub fn resolve_target(&self, name: &str) -> Result<Target, PropertiesError> {
        let builtin = name.parse::<Target>().ok();
        let Some(overrides) = self.targets.get(name) else {
            return builtin.ok_or_else(|| {
                PropertiesError::ConfigError(format!("unknown target '{name}'"))
            });
        };

        let (arch, family) = match (&builtin, overrides.arch, overrides.family) {
            (_, Some(arch), Some(family)) => (arch, family),
            (Some(t), arch, family) => (
                arch.unwrap_or(t.architecture()),
                family.unwrap_or(t.family()),
            ),
            (None, _, _) => {
                return Err(PropertiesError::ConfigError(format!(
                    "target '{name}' needs both arch and family"
                )))
            }
        };

        let target = overrides
            .extra
            .iter()
            .fold(Target::custom(name, arch, family), |t, (k, v)| {
                t.with_substitution(k, v)
            });
        Ok(target)
    }

    fn validate(&self) -> Result<(), PropertiesError> {
        for name in self.targets.keys() {
            self.resolve_target(name)?;
        }
        Ok(())
    }
}

/// Loads and validates a substitution configuration file.
pub fn load_substitution_config(path: &Path) -> Result<SubstitutionConfig, PropertiesError> {
    let content = std::fs::read_to_string(path)?;
    load_substitution_config_from_str(&content)
}

/// Parses and validates a substitution configuration from a string.
pub fn load_substitution_config_from_str(
    content: &str,
) -> Result<SubstitutionConfig, PropertiesError> {
    let config: SubstitutionConfig =
        toml::from_str(content).map_err(|e| PropertiesError::ConfigError(e.to_string()))?;
    config.validate()?;
    tracing::debug!(targets = config.targets.len(), "loaded substitution config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::parse_properties;

    fn linux_x64() -> Target {
        "linux_x64".parse().unwrap()
    }

    #[test]
    fn suffix_appends_to_base() {
        let mut p = parse_properties("linkerOpts=-lm\nlinkerOpts.linux=-ldl").unwrap();
        substitute(&mut p, &linux_x64().substitutions());
        assert_eq!(p.get("linkerOpts"), Some("-lm -ldl"));
        assert_eq!(p.get("linkerOpts.linux"), Some("-ldl"));
    }

    #[test]
    fn suffix_creates_missing_base() {
        let mut p = parse_properties("linkerOpts.linux_x64=-lpthread").unwrap();
        substitute(&mut p, &linux_x64().substitutions());
        assert_eq!(p.get("linkerOpts"), Some("-lpthread"));
    }

    #[test]
    fn other_targets_ignored() {
        let mut p = parse_properties("linkerOpts=-lm\nlinkerOpts.osx=-framework Foundation").unwrap();
        substitute(&mut p, &linux_x64().substitutions());
        assert_eq!(p.get("linkerOpts"), Some("-lm"));
    }

    #[test]
    fn multiple_suffixes_fold_in_key_order() {
        let mut p =
            parse_properties("opts=base\nopts.x64=arch\nopts.linux=family\nopts.linux_x64=target")
                .unwrap();
        substitute(&mut p, &linux_x64().substitutions());
        assert_eq!(p.get("opts"), Some("base family target arch"));
    }

    #[test]
    fn empty_substitutions_change_nothing() {
        let mut p = parse_properties("opts=a\nopts.linux=b").unwrap();
        let before = p.clone();
        substitute(&mut p, &BTreeMap::new());
        assert_eq!(p, before);
    }

    #[test]
    fn shared_substitution_value_folds_once() {
        let mut props = parse_properties("linkerOpts.wasm32=-lc\n").unwrap();
        let wasm: Target = "wasm32".parse().unwrap();
        substitute(&mut props, &wasm.substitutions());
        assert_eq!(props.get("linkerOpts"), Some("-lc"));
    }

    #[test]
    fn extra_substitution_applies() {
        let mut p = parse_properties("opts.gnueabihf=-mfloat-abi=hard").unwrap();
        let target = linux_x64().with_substitution("abi", "gnueabihf");
        substitute(&mut p, &target.substitutions());
        assert_eq!(p.get("opts"), Some("-mfloat-abi=hard"));
    }

    #[test]
    fn config_defines_custom_target() {
        let toml = r#"
[targets.my_board]
arch = "arm32"
family = "linux"
extra = { abi = "gnueabihf" }
"#;
        let config = load_substitution_config_from_str(toml).unwrap();
        let target = config.resolve_target("my_board").unwrap();
        assert_eq!(target.architecture(), Architecture::Arm32);
        assert_eq!(target.family(), Family::Linux);
        assert_eq!(target.substitutions()["abi"], "gnueabihf");
    }

    #[test]
    fn config_extends_builtin_target() {
        let toml = r#"
[targets.linux_x64]
extra = { distro = "musl" }
"#;
        let config = load_substitution_config_from_str(toml).unwrap();
        let target = config.resolve_target("linux_x64").unwrap();
        assert_eq!(target.architecture(), Architecture::X64);
        assert_eq!(target.substitutions()["distro"], "musl");
    }

    #[test]
    fn builtin_target_without_config() {
        let config = SubstitutionConfig::default();
        assert_eq!(config.resolve_target("mingw_x64").unwrap().family(), Family::Mingw);
    }

    #[test]
    fn unknown_target_errors() {
        let config = SubstitutionConfig::default();
        let err = config.resolve_target("my_board").unwrap_err();
        assert!(matches!(err, PropertiesError::ConfigError(_)));
    }

    #[test]
    fn incomplete_custom_target_rejected_on_load() {
        let toml = r#"
[targets.my_board]
arch = "arm32"
"#;
        let err = load_substitution_config_from_str(toml).unwrap_err();
        assert!(err.to_string().contains("needs both arch and family"));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_substitution_config_from_str("targets = {{{").unwrap_err();
        assert!(matches!(err, PropertiesError::ConfigError(_)));
    }

    #[test]
    fn unknown_family_rejected() {
        let toml = r#"
[targets.my_board]
arch = "arm32"
family = "plan9"
"#;
        assert!(load_substitution_config_from_str(toml).is_err());
    }
}
