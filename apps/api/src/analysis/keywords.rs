//! Job-title keywords derived from the resume summary.

use serde::{Deserialize, Serialize};

/// The cleaned keyword completion and its parsed entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordList {
    /// Completion with line breaks removed and outer whitespace trimmed.
    pub raw: String,
    /// Comma-separated entries of `raw`, trimmed, empty entries dropped.
    pub parsed: Vec<String>,
}

impl KeywordList {
    pub fn parse(completion: &str) -> Self {
        let raw = completion.replace(['\r', '\n'], "").trim().to_string();
        let parsed = raw
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect();
        Self { raw, parsed }
    }

    pub fn first(&self) -> Option<&str> {
        self.parsed.first().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.parsed.is_empty()
    }
}
