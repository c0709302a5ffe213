use std::collections::HashMap;

use crate::identifier::{extract_comparison_identifier, Identifier};
use crate::model::Table;

/// Raw key → row for one table. Later rows replace earlier rows with the same key.
#[derive(Debug, Clone, Default)]
pub struct RecordIndex {
    rows: HashMap<String, usize>,
    duplicates: usize,
}

impl RecordIndex {
    pub fn get(&self, key: &str) -> Option<usize> {
        self.rows.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of insertions that replaced an earlier row.
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    /// (key, row) pairs in row order.
    pub fn entries(&self) -> Vec<(&str, usize)> {
        let mut entries: Vec<(&str, usize)> =
            self.rows.iter().map(|(k, r)| (k.as_str(), *r)).collect();
        entries.sort_by_key(|(_, row)| *row);
        entries
    }
}

/// Index every data row (row 2 onward) by the trimmed text of `key_column`.
/// Rows with an empty key are skipped.
pub fn build_index(table: &Table, key_column: usize) -> RecordIndex {
    let mut index = RecordIndex::default();
    for row in 2..=table.row_count() {
        let key = table.text(row, key_column).trim();
        if key.is_empty() {
            continue;
        }
        if let Some(previous) = index.rows.insert(key.to_string(), row) {
            log::debug!("{}: key '{key}' at row {row} replaces row {previous}", table.name);
            index.duplicates += 1;
        }
    }
    if index.duplicates > 0 {
        log::warn!(
            "{}: {} duplicate key(s), later rows win",
            table.name,
            index.duplicates
        );
    }
    index
}

#[derive(Debug, Clone)]
pub struct CodeEntry {
    pub key: String,
    pub row: usize,
    pub identifier: Identifier,
}

/// Comparison-style identifiers of every indexed key, in row order.
#[derive(Debug, Clone, Default)]
pub struct CodeIndex {
    entries: Vec<CodeEntry>,
    by_value: HashMap<u32, Vec<usize>>,
}

impl CodeIndex {
    pub fn build(index: &RecordIndex) -> Self {
        let mut code_index = CodeIndex::default();
        for (key, row) in index.entries() {
            let Some(identifier) = extract_comparison_identifier(key) else {
                continue;
            };
            let pos = code_index.entries.len();
            let mut values = vec![identifier.numeric_value()];
            if let Some(padded) = identifier.padded_form().and_then(|p| p.parse::<u32>().ok()) {
                if padded != identifier.numeric_value() {
                    values.push(padded);
                }
            }
            for value in values {
                code_index.by_value.entry(value).or_default().push(pos);
            }
            code_index.entries.push(CodeEntry { key: key.to_string(), row, identifier });
        }
        code_index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose identifier matches `source`, in row order.
    pub fn matching(&self, source: &Identifier) -> Vec<&CodeEntry> {
        self.by_value
            .get(&source.numeric_value())
            .map(|positions| {
                positions
                    .iter()
                    .map(|&pos| &self.entries[pos])
                    .filter(|entry| source.matches_comparison(&entry.identifier))
                    .collect()
            })
            .unwrap_or_default()
    }
}
