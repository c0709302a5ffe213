use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::ReconError;
use crate::language::Language;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ReconConfig {
    pub name: String,
    pub source: TableConfig,
    pub comparison: TableConfig,
    #[serde(default)]
    pub languages: LanguagesConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct TableConfig {
    /// Path to the table file, relative to the config file.
    pub file: String,
    /// Worksheet name for spreadsheet files. Defaults to the first sheet.
    #[serde(default)]
    pub sheet: Option<String>,
    #[serde(default)]
    pub key_column: Option<KeyColumn>,
}

impl TableConfig {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            sheet: None,
            key_column: None,
        }
    }
}

/// A key column given either as a 1-based index or as a header name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum KeyColumn {
    Index(usize),
    Name(String),
}

impl std::str::FromStr for KeyColumn {
    type Err = std::convert::Infallible;

    /// Digits are an index; anything else is a header name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.parse::<usize>() {
            Ok(idx) => Self::Index(idx),
            Err(_) => Self::Name(s.to_string()),
        })
    }
}

impl std::fmt::Display for KeyColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Index(idx) => write!(f, "#{idx}"),
            Self::Name(name) => write!(f, "{name}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Languages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LanguagesConfig {
    /// Languages to compare. Empty means every language common to both tables.
    #[serde(default)]
    pub selected: Vec<Language>,
    /// Extra header labels, mapped to a canonical language.
    #[serde(default)]
    pub aliases: HashMap<String, Language>,
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportMode {
    /// Only the top-ranked candidate of each record is classified.
    #[default]
    Best,
    /// Every candidate is classified as its own verdict group.
    All,
}

impl std::fmt::Display for ReportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Best => write!(f, "best"),
            Self::All => write!(f, "all"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub mode: ReportMode,
    #[serde(default)]
    pub json: Option<String>,
    #[serde(default)]
    pub xlsx: Option<String>,
    #[serde(default)]
    pub csv: Option<String>,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    /// Config for a one-off comparison of two files with default settings.
    pub fn adhoc(source: TableConfig, comparison: TableConfig) -> Self {
        let name = format!("{} vs {}", source.file, comparison.file);
        Self {
            name,
            source,
            comparison,
            languages: LanguagesConfig::default(),
            report: ReportConfig::default(),
        }
    }

    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.name.trim().is_empty() {
            return Err(ReconError::ConfigValidation("name must not be empty".into()));
        }

        for (role, table) in [("source", &self.source), ("comparison", &self.comparison)] {
            if table.file.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "{role}: file must not be empty"
                )));
            }
            match &table.key_column {
                Some(KeyColumn::Index(0)) => {
                    return Err(ReconError::ConfigValidation(format!(
                        "{role}: key_column index is 1-based, got 0"
                    )));
                }
                Some(KeyColumn::Name(name)) if name.trim().is_empty() => {
                    return Err(ReconError::ConfigValidation(format!(
                        "{role}: key_column name must not be empty"
                    )));
                }
                _ => {}
            }
        }

        let mut seen = HashSet::new();
        for language in &self.languages.selected {
            if !seen.insert(*language) {
                return Err(ReconError::ConfigValidation(format!(
                    "language '{}' selected more than once",
                    language.code()
                )));
            }
        }

        for label in self.languages.aliases.keys() {
            if label.trim().is_empty() {
                return Err(ReconError::ConfigValidation(
                    "language alias label must not be empty".into(),
                ));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
name = "Firmware strings"

[source]
file = "source.xlsx"
sheet = "Translations"
key_column = "Key"

[comparison]
file = "translated.csv"
key_column = 2

[languages]
selected = ["cn", "英文（EN）English", "Deutsch"]

[languages.aliases]
"English (US)" = "en"

[report]
mode = "all"
json = "result.json"
xlsx = "result.xlsx"
"#;

    #[test]
    fn parse_valid() {
        let config = ReconConfig::from_toml(VALID).unwrap();
        assert_eq!(config.name, "Firmware strings");
        assert_eq!(config.source.file, "source.xlsx");
        assert_eq!(config.source.sheet.as_deref(), Some("Translations"));
        assert_eq!(config.source.key_column, Some(KeyColumn::Name("Key".into())));
        assert_eq!(config.comparison.key_column, Some(KeyColumn::Index(2)));
        assert_eq!(
            config.languages.selected,
            vec![Language::Chinese, Language::English, Language::German]
        );
        assert_eq!(config.languages.aliases["English (US)"], Language::English);
        assert_eq!(config.report.mode, ReportMode::All);
        assert_eq!(config.report.json.as_deref(), Some("result.json"));
        assert!(config.report.csv.is_none());
    }

    #[test]
    fn defaults_apply() {
        let input = r#"
name = "Minimal"
[source]
file = "a.csv"
[comparison]
file = "b.csv"
"#;
        let config = ReconConfig::from_toml(input).unwrap();
        assert!(config.languages.selected.is_empty());
        assert!(config.languages.aliases.is_empty());
        assert_eq!(config.report.mode, ReportMode::Best);
        assert!(config.source.key_column.is_none());
        assert!(config.comparison.sheet.is_none());
    }

    #[test]
    fn reject_unknown_language() {
        let input = r#"
name = "Bad"
[source]
file = "a.csv"
[comparison]
file = "b.csv"
[languages]
selected = ["klingon"]
"#;
        let err = ReconConfig::from_toml(input).unwrap_err();
        assert!(matches!(err, ReconError::ConfigParse(_)));
        assert!(err.to_string().contains("klingon"));
    }

    #[test]
    fn reject_invalid_mode() {
        let input = r#"
name = "Bad"
[source]
file = "a.csv"
[comparison]
file = "b.csv"
[report]
mode = "every"
"#;
        assert!(ReconConfig::from_toml(input).is_err());
    }

    #[test]
    fn reject_duplicate_selected_language() {
        let input = r#"
name = "Bad"
[source]
file = "a.csv"
[comparison]
file = "b.csv"
[languages]
selected = ["en", "English"]
"#;
        let err = ReconConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("'en' selected more than once"));
    }

    #[test]
    fn reject_zero_key_column() {
        let input = r#"
name = "Bad"
[source]
file = "a.csv"
key_column = 0
[comparison]
file = "b.csv"
"#;
        let err = ReconConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("1-based"));
    }

    #[test]
    fn reject_empty_file() {
        let input = r#"
name = "Bad"
[source]
file = ""
[comparison]
file = "b.csv"
"#;
        let err = ReconConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("source: file must not be empty"));
    }

    #[test]
    fn key_column_from_str() {
        assert_eq!("3".parse::<KeyColumn>().unwrap(), KeyColumn::Index(3));
        assert_eq!(" Key ".parse::<KeyColumn>().unwrap(), KeyColumn::Name("Key".into()));
    }

    #[test]
    fn adhoc_is_valid() {
        let config = ReconConfig::adhoc(TableConfig::new("a.xlsx"), TableConfig::new("b.xlsx"));
        assert_eq!(config.name, "a.xlsx vs b.xlsx");
        assert!(config.validate().is_ok());
    }
}
