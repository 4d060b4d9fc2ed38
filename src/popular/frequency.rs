//! Keyword frequency table and ranking.

use indexmap::IndexMap;

use crate::models::{Confidence, PopularSearchItem, SearchCategory};

// == Keyword Stats ==
/// Accumulated occurrences of one cleaned keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordStats {
    pub count: u32,
    /// Category of the first occurrence
    pub category: SearchCategory,
    /// Distinct contributing job ids, in first-seen order
    pub job_ids: Vec<String>,
}

// == Keyword Frequency ==
/// Per-run frequency table keyed by cleaned keyword.
///
/// Insertion order is preserved so equal counts rank in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct KeywordFrequency {
    table: IndexMap<String, KeywordStats>,
}

impl KeywordFrequency {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one occurrence of `keyword`.
    pub fn record(&mut self, keyword: String, category: SearchCategory, job_id: Option<&str>) {
        let stats = self.table.entry(keyword).or_insert_with(|| KeywordStats {
            count: 0,
            category,
            job_ids: Vec::new(),
        });
        stats.count += 1;
        if let Some(id) = job_id {
            if !stats.job_ids.iter().any(|existing| existing == id) {
                stats.job_ids.push(id.to_string());
            }
        }
    }

    pub fn get(&self, keyword: &str) -> Option<&KeywordStats> {
        self.table.get(keyword)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Top `limit` keywords with at least `min_occurrences(total_jobs)` hits,
    /// numbered from 1.
    pub fn rank(&self, limit: usize, total_jobs: usize) -> Vec<PopularSearchItem> {
        let threshold = min_occurrences(total_jobs);
        let mut kept: Vec<(&String, &KeywordStats)> = self
            .table
            .iter()
            .filter(|(_, stats)| stats.count >= threshold)
            .collect();

        // Stable: ties keep insertion order
        kept.sort_by(|a, b| b.1.count.cmp(&a.1.count));

        kept.into_iter()
            .take(limit)
            .zip(1u32..)
            .map(|((label, stats), position)| {
                PopularSearchItem::new(
                    position,
                    label.clone(),
                    stats.count,
                    stats.category,
                    Confidence::Measured,
                )
            })
            .collect()
    }
}

/// Minimum count a keyword needs to be ranked: one per hundred jobs, at least 1.
pub fn min_occurrences(total_jobs: usize) -> u32 {
    ((total_jobs / 100) as u32).max(1)
}
