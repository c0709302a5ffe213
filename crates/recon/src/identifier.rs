//! Numeric error codes embedded in key strings.
//!
//! Source keys carry the code as the first run of four digits anywhere in the
//! key (`Error0101NoFlash`). Comparison keys must start with the `key` marker
//! followed by non-digit filler and three or four digits (`key101_noflash`).

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Case-insensitive marker every comparison-style key starts with.
pub const COMPARISON_PREFIX: &str = "key";

/// Width of a padded comparison code.
pub const CODE_WIDTH: usize = 4;

static SOURCE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{4}").expect("valid source code pattern"));

static COMPARISON_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)^{COMPARISON_PREFIX}[^0-9]*([0-9]{{3,4}})"))
        .expect("valid comparison code pattern")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identifier {
    digits: String,
    numeric_value: u32,
    padded_form: Option<String>,
}

impl Identifier {
    /// The digit run exactly as captured.
    pub fn digits(&self) -> &str {
        &self.digits
    }

    pub fn numeric_value(&self) -> u32 {
        self.numeric_value
    }

    /// Zero-padded four-digit form; only comparison identifiers have one.
    pub fn padded_form(&self) -> Option<&str> {
        self.padded_form.as_deref()
    }

    /// Whether this source identifier names the same code as a comparison identifier.
    pub fn matches_comparison(&self, comparison: &Identifier) -> bool {
        if self.numeric_value == comparison.numeric_value {
            return true;
        }
        comparison
            .padded_form
            .as_deref()
            .and_then(|p| p.parse::<u32>().ok())
            .is_some_and(|padded| padded == self.numeric_value)
    }
}

/// First run of four consecutive digits anywhere in the key.
pub fn extract_source_identifier(raw_key: &str) -> Option<Identifier> {
    let m = SOURCE_CODE.find(raw_key)?;
    let digits = m.as_str().to_string();
    let numeric_value = digits.parse().ok()?;
    Some(Identifier { digits, numeric_value, padded_form: None })
}

/// `key` prefix, non-digit filler, then three or four digits.
pub fn extract_comparison_identifier(raw_key: &str) -> Option<Identifier> {
    let caps = COMPARISON_CODE.captures(raw_key.trim())?;
    let digits = caps.get(1)?.as_str().to_string();
    let numeric_value = digits.parse().ok()?;
    let padded_form = format!("{digits:0>width$}", width = CODE_WIDTH);
    Some(Identifier { digits, numeric_value, padded_form: Some(padded_form) })
}
