//! Canonical languages and header-to-column resolution.
//!
//! Both tables label their language columns independently ("英文（EN）English",
//! "英文(EN)", "English", ...). Every header is mapped onto the fixed
//! [`Language`] enumeration so that columns can be paired across tables.

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::KeyColumn;
use crate::error::ReconError;
use crate::model::Cell;

// ---------------------------------------------------------------------------
// Canonical enumeration
// ---------------------------------------------------------------------------

/// Supported languages, in canonical display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Language {
    #[serde(rename = "cn")]
    Chinese,
    #[serde(rename = "en")]
    English,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "it")]
    Italian,
    #[serde(rename = "br")]
    Portuguese,
    #[serde(rename = "ru")]
    Russian,
    #[serde(rename = "tr")]
    Turkish,
    #[serde(rename = "jp")]
    Japanese,
    #[serde(rename = "kr")]
    Korean,
    #[serde(rename = "tw")]
    TraditionalChinese,
    #[serde(rename = "ar")]
    Arabic,
}

impl Language {
    pub const ALL: [Language; 13] = [
        Self::Chinese,
        Self::English,
        Self::German,
        Self::Spanish,
        Self::French,
        Self::Italian,
        Self::Portuguese,
        Self::Russian,
        Self::Turkish,
        Self::Japanese,
        Self::Korean,
        Self::TraditionalChinese,
        Self::Arabic,
    ];

    /// Header label used when this tool writes a table.
    pub fn label(self) -> &'static str {
        match self {
            Self::Chinese => "中文（CN）",
            Self::English => "英文（EN）English",
            Self::German => "德语(DE)Deutsch",
            Self::Spanish => "西语（ES）Español",
            Self::French => "法语(FR)Français",
            Self::Italian => "意大利语(IT)Italiano",
            Self::Portuguese => "巴西葡语(BR)Português",
            Self::Russian => "俄语（Pyc）Русский",
            Self::Turkish => "土耳其语(TR)Turkish",
            Self::Japanese => "日语(JP)日本語",
            Self::Korean => "韩语(KR)한국어",
            Self::TraditionalChinese => "繁体中文",
            Self::Arabic => "阿拉伯语عربية",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Chinese => "cn",
            Self::English => "en",
            Self::German => "de",
            Self::Spanish => "es",
            Self::French => "fr",
            Self::Italian => "it",
            Self::Portuguese => "br",
            Self::Russian => "ru",
            Self::Turkish => "tr",
            Self::Japanese => "jp",
            Self::Korean => "kr",
            Self::TraditionalChinese => "tw",
            Self::Arabic => "ar",
        }
    }

    /// Parse a canonical label, known alias or short code.
    pub fn parse(input: &str) -> Result<Self, ReconError> {
        BUILTIN_LABELS
            .lookup(input)
            .ok_or_else(|| ReconError::UnknownLanguage(input.to_string()))
    }

    /// Fragments used by the heuristic fallback: the part of the label before
    /// any parenthetical, and the label's first two characters.
    fn fragments(self) -> [String; 2] {
        let label = self.label();
        let before_paren = label
            .split(['(', '（'])
            .next()
            .unwrap_or(label)
            .trim()
            .to_string();
        let first_two: String = label.chars().take(2).collect();
        [before_paren, first_two]
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<String> for Language {
    type Error = ReconError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl std::str::FromStr for Language {
    type Err = ReconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ---------------------------------------------------------------------------
// Label table
// ---------------------------------------------------------------------------

/// Known header spellings per language. Bracket width, whitespace and ASCII case
/// are folded by [`normalize_label`], so each spelling is listed once.
const BUILTIN_ALIASES: &[(Language, &[&str])] = &[
    (
        Language::Chinese,
        &["中文（CN）", "中文", "简体中文", "中文简体", "Chinese", "Simplified Chinese", "CN", "zh", "zh-CN"],
    ),
    (
        Language::English,
        &["英文（EN）English", "英文(EN)", "英文", "英语", "English", "EN", "en-US", "en-GB"],
    ),
    (
        Language::German,
        &["德语(DE)Deutsch", "德语(DE)", "德语", "德文", "Deutsch", "German", "DE", "de-DE"],
    ),
    (
        Language::Spanish,
        &["西语（ES）Español", "西语(ES)", "西语", "西班牙语", "Español", "Espanol", "Spanish", "ES", "es-ES"],
    ),
    (
        Language::French,
        &["法语(FR)Français", "法语(FR)", "法语", "法文", "Français", "Francais", "French", "FR", "fr-FR"],
    ),
    (
        Language::Italian,
        &["意大利语(IT)Italiano", "意大利语(IT)", "意大利语", "Italiano", "Italian", "IT", "it-IT"],
    ),
    (
        Language::Portuguese,
        &[
            "巴西葡语(BR)Português",
            "巴西葡语(BR)",
            "巴西葡语",
            "葡萄牙语",
            "葡语",
            "Português",
            "Portugues",
            "Portuguese",
            "BR",
            "PT",
            "pt-BR",
        ],
    ),
    (
        Language::Russian,
        &["俄语（Pyc）Русский", "俄语(Pyc)", "俄语（RU）Русский", "俄语(RU)", "俄语", "Русский", "Russian", "RU", "Pyc", "ru-RU"],
    ),
    (
        Language::Turkish,
        &["土耳其语(TR)Turkish", "土耳其语(TR)", "土耳其语", "Türkçe", "Turkce", "Turkish", "TR", "tr-TR"],
    ),
    (
        Language::Japanese,
        &["日语(JP)日本語", "日语(JP)", "日语", "日文", "日本語", "Japanese", "JP", "JA", "ja-JP"],
    ),
    (
        Language::Korean,
        &["韩语(KR)한국어", "韩语(KR)", "韩语", "韩文", "한국어", "Korean", "KR", "KO", "ko-KR"],
    ),
    (
        Language::TraditionalChinese,
        &["繁体中文", "繁體中文", "繁体中文(TW)", "繁體中文(TW)", "中文繁体", "Traditional Chinese", "TW", "zh-TW", "zh-HK"],
    ),
    (
        Language::Arabic,
        &["阿拉伯语عربية", "阿拉伯语(AR)", "阿拉伯语", "عربية", "العربية", "Arabic", "AR", "ar-SA"],
    ),
];

static BUILTIN_LABELS: LazyLock<LabelTable> = LazyLock::new(LabelTable::build_builtin);

/// Fold the spelling differences the two authoring conventions disagree on.
pub fn normalize_label(label: &str) -> String {
    label
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '（' => '(',
            '）' => ')',
            '_' => '-',
            other => other,
        })
        .flat_map(char::to_lowercase)
        .collect()
}

/// Lookup table from header spellings to canonical languages.
#[derive(Debug, Clone)]
pub struct LabelTable {
    entries: HashMap<String, Language>,
}

impl LabelTable {
    fn build_builtin() -> Self {
        let mut entries = HashMap::new();
        for (language, aliases) in BUILTIN_ALIASES {
            for alias in *aliases {
                entries.entry(normalize_label(alias)).or_insert(*language);
            }
        }
        Self { entries }
    }

    /// The built-in table.
    pub fn builtin() -> Self {
        BUILTIN_LABELS.clone()
    }

    /// Built-in table plus user aliases; user aliases replace built-in spellings.
    pub fn with_aliases<'a, I>(aliases: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a Language)>,
    {
        let mut table = Self::builtin();
        for (label, language) in aliases {
            table.entries.insert(normalize_label(label), *language);
        }
        table
    }

    /// Exact (normalized) lookup only.
    pub fn lookup(&self, label: &str) -> Option<Language> {
        self.entries.get(&normalize_label(label)).copied()
    }

    /// Exact lookup, then the name around a parenthetical, then the fragment heuristic.
    pub fn resolve(&self, label: &str) -> Option<Language> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }
        self.lookup(label)
            .or_else(|| self.lookup_outside_parens(label))
            .or_else(|| resolve_by_fragment(label))
    }

    /// "Deutsch (DE)" and "(DE) Deutsch" resolve through the name alone.
    /// The parenthesized code is not consulted; "Notes (EN)" is no language.
    fn lookup_outside_parens(&self, label: &str) -> Option<Language> {
        let (head, rest) = label.split_once(['(', '（'])?;
        let tail = rest.split_once([')', '）']).map_or("", |(_, tail)| tail);
        [head, tail]
            .into_iter()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .find_map(|part| self.lookup(part))
    }
}

impl Default for LabelTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Longest fragment contained in the header wins; ties keep canonical order.
fn resolve_by_fragment(label: &str) -> Option<Language> {
    let mut best: Option<(usize, Language)> = None;
    for language in Language::ALL {
        for fragment in language.fragments() {
            if fragment.is_empty() || !label.contains(fragment.as_str()) {
                continue;
            }
            let len = fragment.chars().count();
            if best.map_or(true, |(best_len, _)| len > best_len) {
                best = Some((len, language));
            }
        }
    }
    best.map(|(_, language)| language)
}

// ---------------------------------------------------------------------------
// Column maps
// ---------------------------------------------------------------------------

/// Canonical language → 1-based column index for one table. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageColumnMap {
    columns: BTreeMap<Language, usize>,
}

impl LanguageColumnMap {
    pub fn get(&self, language: Language) -> Option<usize> {
        self.columns.get(&language).copied()
    }

    /// Languages present, in canonical order.
    pub fn languages(&self) -> impl Iterator<Item = Language> + '_ {
        self.columns.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Map each non-empty header cell to a canonical language. The first column
/// resolving to a language wins; unresolvable headers are skipped.
pub fn resolve_language_columns(header: &[Cell], labels: &LabelTable) -> LanguageColumnMap {
    let mut columns = BTreeMap::new();
    for (idx, cell) in header.iter().enumerate() {
        let text = cell.text().trim();
        if text.is_empty() {
            continue;
        }
        match labels.resolve(text) {
            Some(language) => {
                if columns.contains_key(&language) {
                    log::debug!("column {} '{text}': duplicate {language}, ignored", idx + 1);
                } else {
                    columns.insert(language, idx + 1);
                }
            }
            None => log::debug!("column {} '{text}': no language", idx + 1),
        }
    }
    LanguageColumnMap { columns }
}

// ---------------------------------------------------------------------------
// Key column detection
// ---------------------------------------------------------------------------

const CHINESE_MARKERS: &[&str] = &["中文（CN）", "中文(CN)", "中文", "Chinese", "CN", "简体中文", "中文简体"];

static CHINESE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"中[文国]|汉|简体").expect("valid chinese header pattern"));

/// First column whose header looks like the Chinese column, or column 1.
pub fn find_chinese_column(header: &[Cell]) -> usize {
    for (idx, cell) in header.iter().enumerate() {
        let text = cell.text().trim();
        if CHINESE_MARKERS.iter().any(|m| text.contains(m)) || CHINESE_PATTERN.is_match(text) {
            return idx + 1;
        }
    }
    1
}

/// Pick the key column: a declared column, else a header named `Key`, else
/// the Chinese column.
pub fn find_key_column(
    table_name: &str,
    header: &[Cell],
    declared: Option<&KeyColumn>,
) -> Result<usize, ReconError> {
    match declared {
        Some(KeyColumn::Index(idx)) => {
            if *idx >= 1 && *idx <= header.len().max(1) {
                Ok(*idx)
            } else {
                Err(ReconError::MissingColumn {
                    table: table_name.into(),
                    column: format!("#{idx}"),
                })
            }
        }
        Some(KeyColumn::Name(name)) => header
            .iter()
            .position(|c| header_matches(c.text(), name))
            .map(|i| i + 1)
            .ok_or_else(|| ReconError::MissingColumn {
                table: table_name.into(),
                column: name.clone(),
            }),
        None => Ok(header
            .iter()
            .position(|c| c.text().trim().eq_ignore_ascii_case("key"))
            .map(|i| i + 1)
            .unwrap_or_else(|| find_chinese_column(header))),
    }
}

fn header_matches(header: &str, name: &str) -> bool {
    let header = header.trim();
    let name = name.trim();
    header == name || header.to_lowercase() == name.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(labels: &[&str]) -> Vec<Cell> {
        labels.iter().map(|l| Cell::from_text(*l)).collect()
    }

    #[test]
    fn canonical_labels_resolve_to_themselves() {
        let labels = LabelTable::builtin();
        for language in Language::ALL {
            assert_eq!(labels.resolve(language.label()), Some(language), "{language:?}");
            assert_eq!(Language::parse(language.code()).unwrap(), language);
        }
    }

    #[test]
    fn bracket_and_case_variants_resolve() {
        let labels = LabelTable::builtin();
        assert_eq!(labels.resolve("中文(CN)"), Some(Language::Chinese));
        assert_eq!(labels.resolve(" 英文 (EN) english "), Some(Language::English));
        assert_eq!(labels.resolve("俄语(Pyc)Русский"), Some(Language::Russian));
        assert_eq!(labels.resolve("zh_TW"), Some(Language::TraditionalChinese));
    }

    #[test]
    fn heuristic_prefers_longest_fragment() {
        let labels = LabelTable::builtin();
        // "中文" (Chinese) and "繁体中文" (Traditional) both occur; longer wins.
        assert_eq!(labels.resolve("繁体中文 翻译"), Some(Language::TraditionalChinese));
        assert_eq!(labels.resolve("英文翻译"), Some(Language::English));
        assert_eq!(labels.resolve("阿拉伯"), Some(Language::Arabic));
        assert_eq!(labels.resolve("Remarks"), None);
    }

    #[test]
    fn native_name_with_code_resolves() {
        let labels = LabelTable::builtin();
        assert_eq!(labels.resolve("English (US)"), Some(Language::English));
        assert_eq!(labels.resolve("English(EN)"), Some(Language::English));
        assert_eq!(labels.resolve("Deutsch (DE)"), Some(Language::German));
        assert_eq!(labels.resolve("Français (FR)"), Some(Language::French));
        assert_eq!(labels.resolve("Español (LatAm)"), Some(Language::Spanish));
        assert_eq!(labels.resolve("日本語(JP)"), Some(Language::Japanese));
        assert_eq!(labels.resolve("(DE) Deutsch"), Some(Language::German));
        assert_eq!(labels.resolve("Notes (EN)"), None);
    }

    #[test]
    fn user_alias_overrides_builtin() {
        let aliases = HashMap::from([("CN".to_string(), Language::TraditionalChinese)]);
        let labels = LabelTable::with_aliases(&aliases);
        assert_eq!(labels.resolve("CN"), Some(Language::TraditionalChinese));
        assert_eq!(labels.resolve("中文（CN）"), Some(Language::Chinese));
    }

    #[test]
    fn column_map_first_occurrence_wins() {
        let h = header(&["Key", "English", "中文（CN）", "英文(EN)", "", "Notes"]);
        let map = resolve_language_columns(&h, &LabelTable::builtin());
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(Language::English), Some(2));
        assert_eq!(map.get(Language::Chinese), Some(3));
        assert_eq!(map.get(Language::German), None);
        let order: Vec<_> = map.languages().collect();
        assert_eq!(order, vec![Language::Chinese, Language::English]);
    }

    #[test]
    fn column_map_reads_native_names_with_codes() {
        let h = header(&["Key", "English (US)", "Deutsch (DE)"]);
        let map = resolve_language_columns(&h, &LabelTable::builtin());
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(Language::English), Some(2));
        assert_eq!(map.get(Language::German), Some(3));
    }

    #[test]
    fn chinese_column_detection() {
        assert_eq!(find_chinese_column(&header(&["ID", "English", "简体中文"])), 3);
        assert_eq!(find_chinese_column(&header(&["ID", "汉字"])), 2);
        assert_eq!(find_chinese_column(&header(&["ID", "English"])), 1);
    }

    #[test]
    fn key_column_resolution_order() {
        let h = header(&["中文（CN）", "key", "English"]);
        assert_eq!(find_key_column("t", &h, None).unwrap(), 2);

        let h = header(&["English", "中文（CN）"]);
        assert_eq!(find_key_column("t", &h, None).unwrap(), 2);

        let declared = KeyColumn::Name("english".into());
        assert_eq!(find_key_column("t", &h, Some(&declared)).unwrap(), 1);

        let declared = KeyColumn::Index(2);
        assert_eq!(find_key_column("t", &h, Some(&declared)).unwrap(), 2);

        let declared = KeyColumn::Name("Id".into());
        let err = find_key_column("t", &h, Some(&declared)).unwrap_err();
        assert!(err.to_string().contains("'Id'"));
    }

    #[test]
    fn parse_rejects_unknown() {
        let err = Language::parse("Klingon").unwrap_err();
        assert!(matches!(err, ReconError::UnknownLanguage(_)));
    }
}
