//! Error types for manifest properties and substitution configuration.

/// Errors that can occur when loading properties or substitution configuration.
#[derive(Debug, thiserror::Error)]
pub enum PropertiesError {
    /// An I/O error occurred while reading a properties or configuration file.
    #[error("failed to read properties: {0}")]
    IoError(#[from] std::io::Error),

    /// A properties line could not be parsed.
    #[error("malformed properties at line {line}: {reason}")]
    ParseError {
        /// 1-based line number of the offending line.
        line: usize,
        /// Description of the problem.
        reason: String,
    },

    /// A list-valued property could not be split.
    #[error("invalid list in property '{key}': {reason}")]
    InvalidList {
        /// The property key.
        key: String,
        /// Description of the problem.
        reason: String,
    },

    /// The substitution configuration could not be parsed or validated.
    #[error("invalid substitution configuration: {0}")]
    ConfigError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_parse_error() {
        let err = PropertiesError::ParseError {
            line: 3,
            reason: "missing '=' or ':' separator".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "malformed properties at line 3: missing '=' or ':' separator"
        );
    }

    #[test]
    fn display_invalid_list() {
        let err = PropertiesError::InvalidList {
            key: "linkerOpts".to_string(),
            reason: "unterminated quote".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "invalid list in property 'linkerOpts': unterminated quote"
        );
    }

    #[test]
    fn display_config_error() {
        let err = PropertiesError::ConfigError("unknown family".to_string());
        assert_eq!(
            format!("{err}"),
            "invalid substitution configuration: unknown family"
        );
    }

    #[test]
    fn display_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = PropertiesError::IoError(io_err);
        assert!(format!("{err}").starts_with("failed to read properties:"));
    }
}
