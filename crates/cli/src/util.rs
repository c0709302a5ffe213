use std::path::{Path, PathBuf};

use unicode_width::UnicodeWidthStr;

/// Display width of a string, accounting for CJK double-width, etc.
pub(crate) fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Right-pad `s` with spaces to `width` display columns. Longer strings are returned as is.
pub(crate) fn pad_right(s: &str, width: usize) -> String {
    let sw = display_width(s);
    format!("{}{}", s, " ".repeat(width.saturating_sub(sw)))
}

/// `YYYYmmdd_HHMMSS_<suffix>` in the current directory, local time.
pub(crate) fn timestamped_path(suffix: &str) -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    PathBuf::from(format!("{stamp}_{suffix}"))
}

/// Resolve a path from a config file against the config's directory.
pub(crate) fn resolve_relative(base_dir: &Path, file: &str) -> PathBuf {
    let path = Path::new(file);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}
