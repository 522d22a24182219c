//! Manifest property keys read by the library facets.

/// ABI version of the serialized format, e.g. `1.8.0`.
pub const ABI_VERSION: &str = "abi_version";
/// Version of the compiler that produced the library.
pub const COMPILER_VERSION: &str = "compiler_version";
/// Prefix of the per-dependency version keys, `dependency_version_<name>`.
pub const DEPENDENCY_VERSION: &str = "dependency_version";
/// The library's own version.
pub const LIBRARY_VERSION: &str = "library_version";
/// Version of the metadata format.
pub const METADATA_VERSION: &str = "metadata_version";
/// Version of the IR format.
pub const IR_VERSION: &str = "ir_version";
/// Globally unique library name.
pub const UNIQUE_NAME: &str = "unique_name";
/// Short display name.
pub const SHORT_NAME: &str = "short_name";
/// List of libraries this one depends on.
pub const DEPENDS: &str = "depends";
/// Package the library's interop declarations live in.
pub const PACKAGE: &str = "package";
/// Options passed to the linker when linking against the library.
pub const LINKER_OPTS: &str = "linkerOpts";
/// `true` if the library was generated from foreign headers.
pub const INTEROP: &str = "interop";
/// Declarations forwarded from foreign headers.
pub const EXPORT_FORWARD_DECLARATIONS: &str = "exportForwardDeclarations";
/// Foreign headers the library was generated from.
pub const INCLUDED_HEADERS: &str = "includedHeaders";

/// Key holding the version of the dependency called `name`.
pub fn dependency_version_key(name: &str) -> String {
    format!("{DEPENDENCY_VERSION}_{name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependency_key_format() {
        assert_eq!(dependency_version_key("libA"), "dependency_version_libA");
    }
}
