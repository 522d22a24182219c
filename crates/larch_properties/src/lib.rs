//! Manifest properties for larch library archives.
//!
//! This crate parses the `key=value` manifest stored in every library archive
//! into an ordered [`Properties`] map, splits list-valued properties with
//! optional quote escaping, and folds target-specific keys into their base
//! key via [`substitute`]. Substitution tables for targets outside the
//! built-in set can be supplied through a TOML [`SubstitutionConfig`].

#![warn(missing_docs)]

pub mod error;
pub mod list;
pub mod loader;
pub mod properties;
pub mod substitution;

pub use error::PropertiesError;
pub use list::parse_property_list;
pub use loader::{load_properties, parse_properties};
pub use properties::Properties;
pub use substitution::{
    load_substitution_config, load_substitution_config_from_str, substitute, SubstitutionConfig,
    TargetOverride,
};
