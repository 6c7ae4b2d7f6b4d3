//! Filesystem-safe name validation
//!
//! Model names and version labels end up as path segments in the blob store,
//! so they must be valid file names on every platform we ship to.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum length of a name in bytes
pub const MAX_NAME_LENGTH: usize = 255;

/// Characters rejected anywhere in a name (path separators, Windows
/// metacharacters and ASCII control characters)
static INVALID_NAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[/\\:*?"<>|\x00-\x1f\x7f]"#).unwrap());

/// Device names reserved on Windows, matched case-insensitively against the stem
static RESERVED_DEVICE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(CON|PRN|AUX|NUL|CLOCK\$|COM[1-9]|LPT[1-9])$").unwrap());

/// Name validation errors, each carrying a categorized reason tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameValidationError {
    /// Name is empty
    NullName,
    /// Name is a reserved file name
    ReservedName { name: String },
    /// Name contains characters that are invalid in file names
    InvalidCharacter { name: String, invalids: Vec<char> },
    /// Name ends with a space or a period
    InvalidTrailing { name: String },
    /// Name is longer than the platform allows
    InvalidLength { length: usize, max: usize },
}

impl NameValidationError {
    /// Categorized reason tag, e.g. `[PV1100]`
    pub fn tag(&self) -> &'static str {
        match self {
            Self::NullName => "[PV1001]",
            Self::ReservedName { .. } => "[PV1002]",
            Self::InvalidCharacter { .. } | Self::InvalidTrailing { .. } => "[PV1100]",
            Self::InvalidLength { .. } => "[PV1101]",
        }
    }

    fn description(&self) -> String {
        match self {
            Self::NullName => "the value must be a not empty".to_string(),
            Self::ReservedName { name } => format!("'{}' is a reserved name", name),
            Self::InvalidCharacter { name, invalids } => {
                let rendered: Vec<String> = invalids.iter().map(|c| format!("{:?}", c)).collect();
                format!(
                    "invalid characters found: invalids=({}), value='{}'",
                    rendered.join(", "),
                    name.escape_debug()
                )
            }
            Self::InvalidTrailing { name } => {
                format!("names must not end with a space or period: value='{}'", name)
            }
            Self::InvalidLength { length, max } => {
                format!("file name is too long: expected<={} bytes, actual={} bytes", max, length)
            }
        }
    }
}

impl fmt::Display for NameValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.tag(), self.description())
    }
}

impl std::error::Error for NameValidationError {}

/// Validate a name as a file name
pub fn validate_filename(name: &str) -> Result<(), NameValidationError> {
    if name.is_empty() {
        return Err(NameValidationError::NullName);
    }

    if name.len() > MAX_NAME_LENGTH {
        return Err(NameValidationError::InvalidLength {
            length: name.len(),
            max: MAX_NAME_LENGTH,
        });
    }

    let mut invalids: Vec<char> = INVALID_NAME_CHARS
        .find_iter(name)
        .filter_map(|m| m.as_str().chars().next())
        .collect();
    if !invalids.is_empty() {
        invalids.sort_unstable();
        invalids.dedup();
        return Err(NameValidationError::InvalidCharacter {
            name: name.to_string(),
            invalids,
        });
    }

    let stem = name.split('.').next().unwrap_or(name);
    if name == "." || name == ".." || RESERVED_DEVICE_NAME.is_match(stem) {
        return Err(NameValidationError::ReservedName {
            name: name.to_string(),
        });
    }

    if name.ends_with(' ') || name.ends_with('.') {
        return Err(NameValidationError::InvalidTrailing {
            name: name.to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(validate_filename("a").is_ok());
        assert!(validate_filename("churn model").is_ok());
        assert!(validate_filename("forecast_v2.1").is_ok());
        assert!(validate_filename("version_name_0").is_ok());
        assert!(validate_filename("Modèle-ünïcode").is_ok());
    }

    #[test]
    fn test_empty_name() {
        let err = validate_filename("").unwrap_err();
        assert_eq!(err, NameValidationError::NullName);
        assert_eq!(err.tag(), "[PV1001]");
    }

    #[test]
    fn test_invalid_characters() {
        let err = validate_filename("inva/lid*").unwrap_err();
        assert!(matches!(
            &err,
            NameValidationError::InvalidCharacter { invalids, .. } if invalids == &vec!['*', '/']
        ));
        assert!(err.to_string().starts_with("[PV1100] invalid characters found"));

        assert!(validate_filename("tab\there").is_err());
        assert!(validate_filename("back\\slash").is_err());
        assert!(validate_filename("colon:").is_err());
    }

    #[test]
    fn test_reserved_names() {
        for name in [".", "..", "CON", "nul", "com1", "LPT9.txt"] {
            let err = validate_filename(name).unwrap_err();
            assert_eq!(err.tag(), "[PV1002]", "expected {} to be reserved", name);
        }
        assert!(validate_filename("console").is_ok());
    }

    #[test]
    fn test_trailing_space_or_period() {
        assert_eq!(validate_filename("model ").unwrap_err().tag(), "[PV1100]");
        assert_eq!(validate_filename("model.").unwrap_err().tag(), "[PV1100]");
    }

    #[test]
    fn test_length_limit() {
        assert!(validate_filename(&"a".repeat(MAX_NAME_LENGTH)).is_ok());

        let err = validate_filename(&"a".repeat(MAX_NAME_LENGTH + 1)).unwrap_err();
        assert!(matches!(err, NameValidationError::InvalidLength { length: 256, max: 255 }));
    }
}
