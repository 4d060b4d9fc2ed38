//! Popular-Search Service
//!
//! Derives "trending" search keywords by mining the job listings the backend
//! already serves. The public entry points never fail: when mining yields
//! nothing they degrade to an occupation-based ranking, then to a fixed list.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::backend::PortalBackend;
use crate::clock::SharedClock;
use crate::config::AnalysisOptions;
use crate::models::{Job, Occupation, PopularCacheStatus, PopularSearchItem};
use crate::popular::fallback::{occupation_items, pad_unique, static_items};
use crate::popular::frequency::KeywordFrequency;
use crate::popular::history::{SearchHistory, SearchHistoryEntry};
use crate::popular::keywords::{clean_job_title, extract_candidates};

/// How many ranked keywords suggestions are drawn from.
pub const SUGGESTION_WINDOW: usize = 50;

// == Popular Search Cache ==
/// Single-slot cache of the last ranking.
#[derive(Debug, Clone)]
pub struct PopularSearchCache {
    pub data: Vec<PopularSearchItem>,
    /// Creation time, Unix milliseconds
    pub timestamp: u64,
    /// Number of jobs the ranking was derived from
    pub job_count: usize,
}

impl PopularSearchCache {
    /// Valid while younger than `duration` and non-empty.
    pub fn is_valid_at(&self, now_ms: u64, duration: Duration) -> bool {
        !self.data.is_empty()
            && now_ms.saturating_sub(self.timestamp) < duration.as_millis() as u64
    }
}

// == Popular Search Service ==
pub struct PopularSearchService {
    backend: Arc<dyn PortalBackend>,
    history: Arc<dyn SearchHistory>,
    clock: SharedClock,
    options: AnalysisOptions,
    cache_duration: Duration,
    slot: RwLock<Option<PopularSearchCache>>,
}

impl PopularSearchService {
    pub fn new(
        backend: Arc<dyn PortalBackend>,
        history: Arc<dyn SearchHistory>,
        clock: SharedClock,
        options: AnalysisOptions,
        cache_duration: Duration,
    ) -> Self {
        Self {
            backend,
            history,
            clock,
            options,
            cache_duration,
            slot: RwLock::new(None),
        }
    }

    pub fn history(&self) -> &Arc<dyn SearchHistory> {
        &self.history
    }

    // == Popular Keywords ==
    /// Returns up to `limit` ranked keywords.
    ///
    /// Served from the slot while it is valid; otherwise recomputed from job
    /// listings, padded from the fallback tiers if short, and cached.
    pub async fn get_popular_search_keywords(&self, limit: usize) -> Vec<PopularSearchItem> {
        if limit == 0 {
            return Vec::new();
        }

        if let Some(cached) = self.cached(limit).await {
            debug!(count = cached.len(), "popular searches served from cache");
            return cached;
        }

        let jobs = self.get_all_jobs_for_analysis().await;
        if jobs.is_empty() {
            warn!("no jobs available for keyword analysis, using fallback");
            return self.get_fallback_popular_searches(limit).await;
        }

        let mut ranked = rank_jobs(&jobs, limit);
        if ranked.len() < limit {
            debug!(
                measured = ranked.len(),
                limit, "padding popular searches from fallback"
            );
            let fallback = self.get_fallback_popular_searches(limit).await;
            pad_unique(&mut ranked, fallback, limit);
        }

        info!(
            jobs = jobs.len(),
            keywords = ranked.len(),
            "popular searches recomputed"
        );
        *self.slot.write().await = Some(PopularSearchCache {
            data: ranked.clone(),
            timestamp: self.clock.now_ms(),
            job_count: jobs.len(),
        });

        ranked.truncate(limit);
        ranked
    }

    async fn cached(&self, limit: usize) -> Option<Vec<PopularSearchItem>> {
        let now = self.clock.now_ms();
        let slot = self.slot.read().await;
        slot.as_ref()
            .filter(|cache| cache.is_valid_at(now, self.cache_duration))
            .map(|cache| cache.data.iter().take(limit).cloned().collect())
    }

    // == Job Collection ==
    /// Collects jobs for mining: paged job list first, then "latest jobs",
    /// deduplicated by id.
    ///
    /// Pages are requested one after another. A short page or a failed
    /// request ends the walk. The latest-jobs call is optional enrichment:
    /// an auth refusal or error just skips it.
    pub async fn get_all_jobs_for_analysis(&self) -> Vec<Job> {
        let AnalysisOptions {
            max_pages,
            page_size,
            page_delay,
        } = self.options;
        let mut jobs = Vec::new();

        for page in 1..=max_pages {
            if page > 1 && !page_delay.is_zero() {
                tokio::time::sleep(page_delay).await;
            }
            match self.backend.job_page(page, page_size).await {
                Ok(batch) => {
                    let fetched = batch.len();
                    debug!(page, fetched, "job page fetched");
                    jobs.extend(batch);
                    if fetched < page_size as usize {
                        break;
                    }
                }
                Err(e) => {
                    warn!(page, error = %e, "job page request failed, stopping pagination");
                    break;
                }
            }
        }

        match self.backend.latest_jobs().await {
            Ok(Some(latest)) => {
                debug!(fetched = latest.len(), "latest jobs fetched");
                jobs.extend(latest);
            }
            Ok(None) => debug!("latest jobs need authentication, skipped"),
            Err(e) => warn!(error = %e, "latest jobs request failed, skipped"),
        }

        dedup_jobs(jobs)
    }

    // == Fallback ==
    /// Ranking used when job listings give nothing usable.
    ///
    /// Tries occupations with synthetic counts (padded from the static list
    /// if short), then the static list alone.
    pub async fn get_fallback_popular_searches(&self, limit: usize) -> Vec<PopularSearchItem> {
        match self.backend.occupations().await {
            Ok(occupations) if !occupations.is_empty() => {
                let mut items = synthetic_ranking(&occupations, limit);
                if !items.is_empty() {
                    debug!(count = items.len(), "fallback ranking from occupations");
                    pad_unique(&mut items, static_items(usize::MAX), limit);
                    return items;
                }
                debug!("occupation names unusable, using static keywords");
            }
            Ok(_) => debug!("occupation list empty, using static keywords"),
            Err(e) => warn!(error = %e, "occupation request failed, using static keywords"),
        }
        static_items(limit)
    }

    // == Suggestions ==
    /// Labels from the ranking containing `partial`, prefix matches first.
    pub async fn get_search_suggestions(&self, partial: &str, limit: usize) -> Vec<String> {
        let needle = partial.trim().to_lowercase();
        if needle.is_empty() || limit == 0 {
            return Vec::new();
        }

        let ranked = self.get_popular_search_keywords(SUGGESTION_WINDOW).await;
        let (prefix, infix): (Vec<_>, Vec<_>) = ranked
            .into_iter()
            .filter(|item| item.label.to_lowercase().contains(&needle))
            .partition(|item| item.label.to_lowercase().starts_with(&needle));

        prefix
            .into_iter()
            .chain(infix)
            .take(limit)
            .map(|item| item.label)
            .collect()
    }

    // == Tracking ==
    /// Records a search in the history log. Failures are logged and dropped.
    pub async fn track_search_query(&self, keyword: &str, user_id: Option<String>) {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return;
        }
        let entry = SearchHistoryEntry::new(keyword, user_id);
        if let Err(e) = self.history.append(entry).await {
            debug!(error = %e, "could not record search query");
        }
    }

    // == Cache Control ==
    pub async fn clear_popular_search_cache(&self) {
        *self.slot.write().await = None;
        info!("popular search cache cleared");
    }

    pub async fn get_popular_search_cache_status(&self) -> PopularCacheStatus {
        let now = self.clock.now_ms();
        let slot = self.slot.read().await;
        match slot
            .as_ref()
            .filter(|cache| cache.is_valid_at(now, self.cache_duration))
        {
            Some(cache) => PopularCacheStatus {
                cached: true,
                age_secs: Some(now.saturating_sub(cache.timestamp) / 1000),
                job_count: Some(cache.job_count),
            },
            None => PopularCacheStatus {
                cached: false,
                age_secs: None,
                job_count: None,
            },
        }
    }
}

/// Counts cleaned keywords across `jobs` and ranks the top `limit`.
pub fn rank_jobs(jobs: &[Job], limit: usize) -> Vec<PopularSearchItem> {
    let mut frequency = KeywordFrequency::new();
    for job in jobs {
        for (raw, category) in extract_candidates(job) {
            if let Some(keyword) = clean_job_title(raw) {
                frequency.record(keyword, category, job.id.as_deref());
            }
        }
    }
    frequency.rank(limit, jobs.len())
}

/// Keeps the first job for each id. Jobs without an id are all kept.
pub fn dedup_jobs(jobs: Vec<Job>) -> Vec<Job> {
    let mut seen = HashSet::new();
    jobs.into_iter()
        .filter(|job| match job.id.as_deref() {
            Some(id) => seen.insert(id.to_string()),
            None => true,
        })
        .collect()
}

fn synthetic_ranking(occupations: &[Occupation], limit: usize) -> Vec<PopularSearchItem> {
    occupation_items(occupations, limit, &mut rand::rng())
}
