use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

static TERM_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(.+?)\s+(\d{4})\s*$").expect("Invalid term label regex"));

/// 学期日历
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/term.ts")]
pub struct TermInfo {
    pub name: String,
    pub year: i32,
    #[serde(default)]
    pub begins: Option<chrono::NaiveDate>,
    #[serde(default)]
    pub ends: Option<chrono::NaiveDate>,
    #[serde(default, alias = "nextTermBegins")]
    pub next_term_begins: Option<chrono::NaiveDate>,
}

/// 复合学期标签 "<TermName> <Year>"，如 "Term 1 2024"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermLabel {
    pub name: String,
    pub year: Option<i32>,
}

impl TermLabel {
    /// 无法识别年份时整段作为学期名
    pub fn parse(label: &str) -> Self {
        if let Some(caps) = TERM_LABEL_RE.captures(label)
            && let Ok(year) = caps[2].parse::<i32>()
        {
            return Self {
                name: caps[1].to_string(),
                year: Some(year),
            };
        }
        Self {
            name: label.trim().to_string(),
            year: None,
        }
    }

    pub fn matches(&self, term: &TermInfo) -> bool {
        self.year == Some(term.year) && self.name.eq_ignore_ascii_case(&term.name)
    }
}
