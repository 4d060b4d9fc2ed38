//! Response-shape probing
//!
//! The backend is not consistent about envelopes or field names, so records
//! are located and read by trying several known spellings. A body that
//! matches none of them yields an empty list rather than an error.

use serde_json::Value;

use crate::models::{Job, Occupation};

const LIST_KEYS: &[&str] = &["jobs", "data", "occupations", "results", "items", "list"];
const MAX_DEPTH: usize = 3;

const ID_KEYS: &[&str] = &["id", "jobId", "job_id"];
const TITLE_KEYS: &[&str] = &["jobTitle", "title", "job_title", "jobName"];
const OCCUPATION_KEYS: &[&str] = &[
    "jobOccupation",
    "occupation",
    "occupationName",
    "department",
    "jobDepartment",
];
const SKILL_KEYS: &[&str] = &["skills", "jobSkills", "skill"];
const COMPANY_KEYS: &[&str] = &["companyName", "company", "cmpName", "company_name"];
const NAME_KEYS: &[&str] = &["name", "title", "occupation", "occupationName", "skill", "cmpName"];

/// Finds the first array in `body`, looking through common envelope keys.
pub fn find_list(body: &Value) -> &[Value] {
    find_list_at(body, 0).unwrap_or(&[])
}

fn find_list_at(body: &Value, depth: usize) -> Option<&[Value]> {
    match body {
        Value::Array(items) => Some(items.as_slice()),
        Value::Object(map) if depth < MAX_DEPTH => LIST_KEYS
            .iter()
            .filter_map(|key| map.get(*key))
            .find_map(|inner| find_list_at(inner, depth + 1)),
        _ => None,
    }
}

/// Reads every job record found in `body`.
pub fn parse_jobs(body: &Value) -> Vec<Job> {
    find_list(body).iter().filter_map(parse_job).collect()
}

/// Reads one job record. Non-object values are skipped.
pub fn parse_job(raw: &Value) -> Option<Job> {
    let map = raw.as_object()?;
    let first = |keys: &[&str]| keys.iter().find_map(|k| map.get(*k)).and_then(text_of);

    Some(Job {
        id: ID_KEYS.iter().find_map(|k| map.get(*k)).and_then(scalar_to_string),
        title: first(TITLE_KEYS),
        occupation: first(OCCUPATION_KEYS),
        skills: SKILL_KEYS
            .iter()
            .find_map(|k| map.get(*k))
            .map(skills_of)
            .unwrap_or_default(),
        company: first(COMPANY_KEYS),
    })
}

/// Reads every occupation found in `body`.
pub fn parse_occupations(body: &Value) -> Vec<Occupation> {
    find_list(body)
        .iter()
        .filter_map(|raw| {
            let name = text_of(raw)?;
            let id = raw
                .as_object()
                .and_then(|m| m.get("id"))
                .and_then(scalar_to_string);
            Some(Occupation { id, name })
        })
        .collect()
}

/// Non-empty text from a string or from a `{name}`-like object.
fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Object(map) => NAME_KEYS.iter().find_map(|k| map.get(*k)).and_then(text_of),
        _ => None,
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn skills_of(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(text_of).collect(),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        other => text_of(other).into_iter().collect(),
    }
}
