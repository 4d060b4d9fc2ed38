//! Popular-Search Module
//!
//! Mines job listings for frequently occurring keywords and serves them as
//! "popular searches", with layered fallbacks and a single-slot cache.

pub mod fallback;
pub mod frequency;
pub mod history;
pub mod keywords;
mod service;

pub use frequency::{min_occurrences, KeywordFrequency, KeywordStats};
pub use history::{FileHistory, MemoryHistory, SearchHistory, SearchHistoryEntry};
pub use keywords::{clean_job_title, extract_candidates};
pub use service::{
    dedup_jobs, rank_jobs, PopularSearchCache, PopularSearchService, SUGGESTION_WINDOW,
};
