// JSON export

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use lexigrid_recon::model::ReconResult;

/// Export the full result (meta, summary, records, verdicts), pretty-printed.
pub fn export_report(result: &ReconResult, path: &Path) -> Result<(), String> {
    let file = File::create(path).map_err(|e| format!("cannot create {}: {e}", path.display()))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, result).map_err(|e| e.to_string())?;
    Ok(())
}

pub fn to_string(result: &ReconResult) -> Result<String, String> {
    serde_json::to_string_pretty(result).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    use lexigrid_recon::config::{ReconConfig, TableConfig};
    use lexigrid_recon::model::{ReconInput, Table};

    #[test]
    fn test_json_export() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("result.json");

        let source = Table::from_text_rows("s", vec![vec!["Key", "English"], vec!["k1", "Hello"]]);
        let comparison = Table::from_text_rows("c", vec![vec!["Key", "English"], vec!["k1", "Hello"]]);
        let config = ReconConfig::adhoc(TableConfig::new("s.csv"), TableConfig::new("c.csv"));
        let result = lexigrid_recon::run(&config, &ReconInput { source: &source, comparison: &comparison }).unwrap();

        export_report(&result, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["meta"]["config_name"], "s.csv vs c.csv");
        assert_eq!(parsed["summary"]["exact_matched"], 1);
        assert_eq!(parsed["verdicts"][0]["language"], "en");
        assert_eq!(parsed["verdicts"][0]["verdict"], "exact_match");
        assert_eq!(content, to_string(&result).unwrap());
    }
}
