//! Resource presets for specific backend endpoints.
//!
//! Each preset only fixes the cache key, the fetch and the expiry.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::backend::PortalBackend;
use crate::cache::CacheService;
use crate::resource::{CachedResource, ResourceOptions};

pub const COURSE_EXPIRY: Duration = Duration::from_secs(10 * 60);
pub const INSTITUTE_EXPIRY: Duration = Duration::from_secs(15 * 60);
pub const ALL_COURSES_EXPIRY: Duration = Duration::from_secs(30 * 60);

pub const ALL_COURSES_KEY: &str = "all_courses";

pub fn course_key(id: &str) -> String {
    format!("course_{}", id)
}

pub fn institute_key(id: &str) -> String {
    format!("institute_{}", id)
}

/// Handle for one course record.
pub fn course_data(
    cache: CacheService,
    backend: Arc<dyn PortalBackend>,
    course_id: impl Into<String>,
) -> CachedResource<Value> {
    let id: String = course_id.into();
    let options = ResourceOptions::new(course_key(&id))
        .expiry(COURSE_EXPIRY)
        .dependencies([id.clone()]);
    CachedResource::new(cache, options, move || {
        let (backend, id) = (backend.clone(), id.clone());
        async move { backend.course(&id).await }
    })
}

/// Handle for one institute record.
pub fn institute_data(
    cache: CacheService,
    backend: Arc<dyn PortalBackend>,
    institute_id: impl Into<String>,
) -> CachedResource<Value> {
    let id: String = institute_id.into();
    let options = ResourceOptions::new(institute_key(&id))
        .expiry(INSTITUTE_EXPIRY)
        .dependencies([id.clone()]);
    CachedResource::new(cache, options, move || {
        let (backend, id) = (backend.clone(), id.clone());
        async move { backend.institute(&id).await }
    })
}

/// Handle for the full course catalogue.
pub fn all_courses_data(
    cache: CacheService,
    backend: Arc<dyn PortalBackend>,
) -> CachedResource<Value> {
    let options = ResourceOptions::new(ALL_COURSES_KEY).expiry(ALL_COURSES_EXPIRY);
    CachedResource::new(cache, options, move || {
        let backend = backend.clone();
        async move { backend.all_courses().await }
    })
}
