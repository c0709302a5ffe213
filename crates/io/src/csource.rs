// C source string tables → translation table
//
// Firmware declares one array per message:
//     const char *ERR_NO_FLASH[MAX_LANGUAGE] = { "无闪存", "No flash", ... };
// Each array becomes a row keyed by the array name, values in canonical
// language order.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use lexigrid_recon::language::Language;
use lexigrid_recon::model::{Cell, Table};

/// Sheet name used when an extracted table is written as a workbook.
pub const EXTRACT_SHEET: &str = "Translations";

static ARRAY_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)const\s+char\s*\*\s*([^\[\];{}]*?)\[MAX_LANGUAGE\]\s*=\s*\{([^}]*)\};")
        .expect("valid array declaration pattern")
});

static STRING_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""((?:[^"\\\n]|\\.)*)""#).expect("valid string literal pattern"));

/// One `const char *NAME[MAX_LANGUAGE]` array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringArray {
    pub name: String,
    /// Literal contents as written, escapes untouched, at most one per language.
    pub values: Vec<String>,
}

pub fn parse_c_source(content: &str) -> Vec<StringArray> {
    ARRAY_DECL
        .captures_iter(content)
        .map(|caps| {
            let name = caps.get(1).map_or("", |m| m.as_str()).trim().to_string();
            let block = caps.get(2).map_or("", |m| m.as_str());
            let values = STRING_LITERAL
                .captures_iter(block)
                .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
                .take(Language::ALL.len())
                .collect();
            StringArray { name, values }
        })
        .collect()
}

/// Header `Key` + canonical labels, one row per array.
pub fn to_table(name: &str, arrays: &[StringArray]) -> Table {
    let mut rows: Vec<Vec<Cell>> = Vec::with_capacity(arrays.len() + 1);
    let mut header = vec![Cell::from_text("Key")];
    header.extend(Language::ALL.iter().map(|l| Cell::from_text(l.label())));
    rows.push(header);

    for array in arrays {
        let mut row = vec![Cell::from_text(array.name.as_str())];
        row.extend(array.values.iter().map(|v| Cell::from_text(v.as_str())));
        rows.push(row);
    }
    Table::new(name, rows)
}

/// Read a C file and build its translation table.
pub fn extract(path: &Path) -> Result<Table, String> {
    let content = crate::csv::read_file_as_utf8(path)?;
    let arrays = parse_c_source(&content);
    if arrays.is_empty() {
        return Err(format!(
            "{}: no `const char *NAME[MAX_LANGUAGE] = {{ ... }};` arrays found",
            path.display()
        ));
    }
    log::info!("{}: {} string arrays", path.display(), arrays.len());

    let name = path
        .file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "source".to_string());
    Ok(to_table(&name, &arrays))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
#include "lang.h"

const char *ERR_NO_FLASH[MAX_LANGUAGE] = {
    "无闪存",
    "No flash",
    "Kein Flash"
};

const char *MSG_QUOTE[MAX_LANGUAGE] = { "说\"好\"", "Say \"ok\"" };

static const char *ignored[3] = { "a", "b", "c" };
"#;

    #[test]
    fn parses_arrays_across_lines() {
        let arrays = parse_c_source(SAMPLE);
        assert_eq!(arrays.len(), 2);
        assert_eq!(arrays[0].name, "ERR_NO_FLASH");
        assert_eq!(arrays[0].values, vec!["无闪存", "No flash", "Kein Flash"]);
    }

    #[test]
    fn escaped_quotes_are_kept() {
        let arrays = parse_c_source(SAMPLE);
        assert_eq!(arrays[1].name, "MSG_QUOTE");
        assert_eq!(arrays[1].values, vec![r#"说\"好\""#, r#"Say \"ok\""#]);
    }

    #[test]
    fn values_are_truncated_to_language_count() {
        let literals: Vec<String> = (0..15).map(|i| format!("\"v{i}\"")).collect();
        let src = format!("const char *K[MAX_LANGUAGE] = {{ {} }};", literals.join(", "));
        let arrays = parse_c_source(&src);
        assert_eq!(arrays[0].values.len(), 13);
        assert_eq!(arrays[0].values[12], "v12");
    }

    #[test]
    fn table_has_canonical_header() {
        let table = to_table("strings", &parse_c_source(SAMPLE));
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 14);
        assert_eq!(table.text(1, 1), "Key");
        assert_eq!(table.text(1, 2), "中文（CN）");
        assert_eq!(table.text(1, 14), "阿拉伯语عربية");
        assert_eq!(table.text(2, 1), "ERR_NO_FLASH");
        assert_eq!(table.text(2, 3), "No flash");
        assert_eq!(table.text(3, 5), "");
    }

    #[test]
    fn extract_rejects_files_without_arrays() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.c");
        std::fs::write(&path, "int main(void) { return 0; }\n").unwrap();
        assert!(extract(&path).unwrap_err().contains("no `const char"));
    }
}
