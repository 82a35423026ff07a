//! Problem detail and problem record models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title reserved for the "all strategies exhausted" result.
pub const SENTINEL_TITLE: &str = "Unknown Problem";

/// Problem difficulty label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    #[default]
    Unknown,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
            Self::Unknown => "Unknown",
        }
    }

    /// Parse an exact label, ignoring case.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }

    /// Find a difficulty label anywhere in free text.
    ///
    /// Later labels win when several appear, so "Easy Medium" reads as Medium.
    pub fn from_text(text: &str) -> Self {
        let lower = text.to_lowercase();
        [Self::Hard, Self::Medium, Self::Easy]
            .into_iter()
            .find(|d| lower.contains(&d.as_str().to_lowercase()))
            .unwrap_or(Self::Unknown)
    }

    /// Map a `text-difficulty-*` CSS class to a difficulty.
    pub fn from_css_class(class: &str) -> Option<Self> {
        match class {
            "text-difficulty-easy" => Some(Self::Easy),
            "text-difficulty-medium" => Some(Self::Medium),
            "text-difficulty-hard" => Some(Self::Hard),
            _ => None,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized details of one problem page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDetails {
    pub title: String,
    pub numeric_id: Option<String>,
    pub difficulty: Difficulty,
    pub description_html: String,
    pub tags: Vec<String>,
}

impl ProblemDetails {
    /// The value returned when every strategy has failed.
    pub fn sentinel() -> Self {
        Self {
            title: SENTINEL_TITLE.to_string(),
            numeric_id: None,
            difficulty: Difficulty::Unknown,
            description_html: String::new(),
            tags: Vec::new(),
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.title == SENTINEL_TITLE && self.description_html.is_empty() && self.tags.is_empty()
    }
}

/// A problem record owned by the problem-management layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    /// Source URL the record was created from (unique key).
    pub url: String,
    /// Numeric id when known, otherwise the slug.
    pub problem_id: String,
    pub title: String,
    pub difficulty: Difficulty,
    pub description: String,
    pub tags: Vec<String>,
    pub last_updated: DateTime<Utc>,
}

impl Problem {
    /// Build a fresh record from fetched details.
    pub fn from_details(url: &str, slug: &str, details: ProblemDetails) -> Self {
        Self {
            url: url.to_string(),
            problem_id: details.numeric_id.unwrap_or_else(|| slug.to_string()),
            title: details.title,
            difficulty: details.difficulty,
            description: details.description_html,
            tags: details.tags,
            last_updated: Utc::now(),
        }
    }

    /// Overwrite the mutable fields with freshly fetched details.
    pub fn refresh(&mut self, details: ProblemDetails) {
        self.title = details.title;
        self.difficulty = details.difficulty;
        self.description = details.description_html;
        self.tags = details.tags;
        self.last_updated = Utc::now();
    }
}
