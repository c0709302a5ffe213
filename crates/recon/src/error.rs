use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty file path, bad key column, duplicate language, etc.).
    ConfigValidation(String),
    /// A language label or code that maps to no canonical language.
    UnknownLanguage(String),
    /// A declared key column is not present in the table header.
    MissingColumn { table: String, column: String },
    /// Source and comparison share no language column to compare.
    NoLanguages { source: String, comparison: String },
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::UnknownLanguage(label) => write!(f, "unknown language: '{label}'"),
            Self::MissingColumn { table, column } => {
                write!(f, "table '{table}': missing key column '{column}'")
            }
            Self::NoLanguages { source, comparison } => {
                write!(f, "no comparable language columns between '{source}' and '{comparison}'")
            }
        }
    }
}

impl std::error::Error for ReconError {}
