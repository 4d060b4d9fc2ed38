//! Job-portal domain records as consumed from the backend.

use serde::{Deserialize, Serialize};

// == Job ==
/// A job listing, reduced to the fields keyword mining needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Backend identifier (`id` or `jobId`), normalised to a string
    pub id: Option<String>,
    pub title: Option<String>,
    /// Occupation or department
    pub occupation: Option<String>,
    pub skills: Vec<String>,
    pub company: Option<String>,
}

impl Job {
    /// Convenience constructor used by tests and fixtures.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn with_occupation(mut self, occupation: impl Into<String>) -> Self {
        self.occupation = Some(occupation.into());
        self
    }

    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills = skills.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }
}

// == Occupation ==
/// Entry of the backend's occupation list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupation {
    pub id: Option<String>,
    pub name: String,
}

impl Occupation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}
