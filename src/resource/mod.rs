//! Resource Module
//!
//! Cache-backed fetch handles with loading, error and staleness tracking,
//! plus presets for the course and institute endpoints.

mod handle;
pub mod presets;

pub use handle::{CachedResource, ResourceOptions, ResourceState, DEFAULT_EXPIRY};
pub use presets::{all_courses_data, course_data, institute_data};
