//! reqwest implementation of `PortalBackend`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::backend::{extract, PortalBackend};
use crate::error::{PortalError, Result};
use crate::models::{Job, Occupation};

const JOB_LIST_PATH: &str = "/job-list";
const LATEST_JOBS_PATH: &str = "/latest-job-list";
const OCCUPATIONS_PATH: &str = "/occupations";
const COURSES_PATH: &str = "/courses";
const COURSE_PATH: &str = "/course";
const INSTITUTE_PATH: &str = "/institute";

// == HTTP Backend ==
/// Talks JSON over HTTPS to the job-portal API.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Creates a backend rooted at `base_url` (no trailing slash needed).
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json(&self, path: &str) -> Result<Value> {
        let url = self.url(path);
        debug!("Sending request to {}", url);
        let response = self.client.get(&url).send().await?;
        read_json(response).await
    }
}

/// Turns a response into JSON, mapping non-success statuses to errors.
async fn read_json(response: Response) -> Result<Value> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(PortalError::AuthRequired(response.url().path().to_string()));
    }
    if status == StatusCode::NOT_FOUND {
        return Err(PortalError::NotFound(response.url().path().to_string()));
    }
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(PortalError::Backend {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response.json().await?)
}

#[async_trait]
impl PortalBackend for HttpBackend {
    async fn job_page(&self, page: u32, per_page: u32) -> Result<Vec<Job>> {
        let url = self.url(JOB_LIST_PATH);
        debug!(page, per_page, "Requesting job list page");
        let response = self
            .client
            .post(&url)
            .form(&[("page", page.to_string()), ("per_page", per_page.to_string())])
            .send()
            .await?;
        let body = read_json(response).await?;
        Ok(extract::parse_jobs(&body))
    }

    async fn latest_jobs(&self) -> Result<Option<Vec<Job>>> {
        match self.get_json(LATEST_JOBS_PATH).await {
            Ok(body) => Ok(Some(extract::parse_jobs(&body))),
            Err(PortalError::AuthRequired(_)) => {
                debug!("Latest jobs endpoint requires authentication, skipping");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn occupations(&self) -> Result<Vec<Occupation>> {
        let body = self.get_json(OCCUPATIONS_PATH).await?;
        Ok(extract::parse_occupations(&body))
    }

    async fn course(&self, id: &str) -> Result<Value> {
        self.get_json(&format!("{}/{}", COURSE_PATH, id)).await
    }

    async fn institute(&self, id: &str) -> Result<Value> {
        self.get_json(&format!("{}/{}", INSTITUTE_PATH, id)).await
    }

    async fn all_courses(&self) -> Result<Value> {
        self.get_json(COURSES_PATH).await
    }
}
