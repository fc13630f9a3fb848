//! Validation helpers and regex patterns

use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;
use validator::ValidationError;

/// Regex pattern for validating hex color codes (e.g., #FFFFFF, #1f77b4)
pub static HEX_COLOR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("Invalid hex color regex pattern")
});

/// Characters rejected in file names on common filesystems
const INVALID_PATH_CHARS: [char; 6] = ['<', '>', '"', '|', '?', '*'];

/// Validate a hex color string
pub fn validate_hex_color(color: &str) -> Result<(), ValidationError> {
    if HEX_COLOR_REGEX.is_match(color) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_hex_color"))
    }
}

/// Validate every color of a metric-label to color mapping
pub fn validate_color_map(colors: &BTreeMap<String, String>) -> Result<(), ValidationError> {
    for (label, color) in colors {
        if label.trim().is_empty() {
            return Err(ValidationError::new("empty_color_label"));
        }
        validate_hex_color(color)?;
    }
    Ok(())
}

/// Validate the workbook path is set
pub fn validate_source_path(path: &Path) -> Result<(), ValidationError> {
    if path.as_os_str().is_empty() {
        return Err(ValidationError::new("empty_source_path"));
    }
    Ok(())
}

/// Validate an output file stem (no separators, no reserved characters)
pub fn validate_file_stem(stem: &str) -> Result<(), ValidationError> {
    if stem.trim().is_empty() {
        return Err(ValidationError::new("empty_file_stem"));
    }
    if stem.contains(['/', '\\']) || stem.chars().any(|c| INVALID_PATH_CHARS.contains(&c)) {
        return Err(ValidationError::new("invalid_file_stem_characters"));
    }
    Ok(())
}
