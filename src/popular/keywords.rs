//! Keyword cleaning and extraction.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{Job, SearchCategory};

/// Shortest accepted keyword, in characters.
pub const MIN_KEYWORD_LEN: usize = 3;
/// Longest accepted keyword, in characters.
pub const MAX_KEYWORD_LEN: usize = 50;

/// Whole-keyword rejections, compared lowercase.
const STOPWORDS: &[&str] = &[
    "job",
    "work",
    "employment",
    "position",
    "role",
    "hiring",
    "urgent",
    "immediate",
    "required",
    "needed",
    "vacancy",
];

static LEADING_GENERIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:job|position|role|work|employment|urgent|immediate|hiring)(?:\s+|$)")
        .expect("valid regex")
});
static TRAILING_GENERIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|\s+)(?:job|position|role|work|employment|urgent|immediate|hiring)$")
        .expect("valid regex")
});
static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:\s+|$)").expect("valid regex"));
static TRAILING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s+)\d+$").expect("valid regex"));
static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("valid regex"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Normalises a raw job field into a display keyword.
///
/// Returns `None` when nothing meaningful is left: too short, too long,
/// or a bare generic word.
///
/// ```
/// use job_portal_cache::popular::clean_job_title;
///
/// assert_eq!(clean_job_title("urgent Electrician job").as_deref(), Some("Electrician"));
/// assert_eq!(clean_job_title("123"), None);
/// ```
pub fn clean_job_title(raw: &str) -> Option<String> {
    let mut current = raw.trim().to_string();

    // Strip generic words and stray numbers from both ends until stable
    loop {
        let mut next = LEADING_GENERIC.replace(&current, "").into_owned();
        next = TRAILING_GENERIC.replace(&next, "").into_owned();
        next = LEADING_NUMBER.replace(&next, "").into_owned();
        next = TRAILING_NUMBER.replace(&next, "").into_owned();
        let next = next.trim().to_string();
        if next == current {
            break;
        }
        current = next;
    }

    let stripped = DISALLOWED.replace_all(&current, "");
    let collapsed = WHITESPACE.replace_all(stripped.trim(), " ").into_owned();

    let len = collapsed.chars().count();
    if !(MIN_KEYWORD_LEN..=MAX_KEYWORD_LEN).contains(&len) {
        return None;
    }
    if STOPWORDS.contains(&collapsed.to_lowercase().as_str()) {
        return None;
    }

    Some(title_case(&collapsed))
}

/// Upper-cases the first letter of each space-separated word and lower-cases the rest.
pub fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Raw keyword candidates from a job: title, occupation, each skill, company.
pub fn extract_candidates(job: &Job) -> Vec<(&str, SearchCategory)> {
    let mut out = Vec::with_capacity(3 + job.skills.len());
    if let Some(title) = job.title.as_deref() {
        out.push((title, SearchCategory::JobTitle));
    }
    if let Some(occupation) = job.occupation.as_deref() {
        out.push((occupation, SearchCategory::Occupation));
    }
    out.extend(job.skills.iter().map(|s| (s.as_str(), SearchCategory::Skill)));
    if let Some(company) = job.company.as_deref() {
        out.push((company, SearchCategory::Company));
    }
    out
}
