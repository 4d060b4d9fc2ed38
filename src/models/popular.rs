//! Popular-search output types.

use serde::{Deserialize, Serialize};

/// Placeholder image attached to every popular-search item.
pub const PLACEHOLDER_IMG: &str = "/images/popular-search-placeholder.png";

// == Search Category ==
/// Which job field a keyword was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchCategory {
    JobTitle,
    Occupation,
    Skill,
    Company,
}

// == Confidence ==
/// Whether `search_count` is a real frequency or an invented one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// Counted from job listings
    Measured,
    /// Random or hard-coded fallback value
    Synthetic,
}

// == Popular Search Item ==
/// One ranked search keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularSearchItem {
    /// 1-based position, reassigned on every recomputation
    pub id: u32,
    /// Same as `id`
    pub value: u32,
    pub label: String,
    pub search_count: u32,
    pub category: SearchCategory,
    pub img: String,
    pub confidence: Confidence,
}

impl PopularSearchItem {
    /// Builds an item at 1-based `position`.
    pub fn new(
        position: u32,
        label: impl Into<String>,
        search_count: u32,
        category: SearchCategory,
        confidence: Confidence,
    ) -> Self {
        Self {
            id: position,
            value: position,
            label: label.into(),
            search_count,
            category,
            img: PLACEHOLDER_IMG.to_string(),
            confidence,
        }
    }

    /// Reassigns `id` and `value` to `position`.
    pub fn renumber(&mut self, position: u32) {
        self.id = position;
        self.value = position;
    }
}

// == Cache Status ==
/// Diagnostics for the popular-search slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularCacheStatus {
    pub cached: bool,
    /// Seconds since the ranking was computed
    #[serde(rename = "age", skip_serializing_if = "Option::is_none")]
    pub age_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_count: Option<usize>,
}
