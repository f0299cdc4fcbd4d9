use std::fmt::Display;

use crate::backend::Backend;
use crate::error::Result;
use crate::http::HttpMethod;
use crate::response::Response;
use crate::types::{CreateJob, Pagination};

/// Transcoding jobs (`/jobs`).
#[derive(Debug, Clone)]
pub struct Job {
    backend: Backend,
    url: String,
}

impl Job {
    pub(crate) fn new(backend: Backend) -> Self {
        let url = backend.resource_url("jobs");
        Self { backend, url }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Submits a job. The client's test mode is sent as `"test"`.
    pub fn create(&self, job: &CreateJob) -> Result<Response> {
        let body = job.to_body(self.backend.config().test_mode());
        self.backend.post(&self.url, &body)
    }

    pub fn list(&self, pagination: Pagination) -> Result<Response> {
        self.backend.get(&self.url, &pagination.to_query())
    }

    pub fn details(&self, job_id: impl Display) -> Result<Response> {
        self.backend.get(&format!("{}/{job_id}", self.url), &[])
    }

    pub fn progress(&self, job_id: impl Display) -> Result<Response> {
        self.backend.get(&format!("{}/{job_id}/progress", self.url), &[])
    }

    pub fn resubmit(&self, job_id: impl Display) -> Result<Response> {
        self.backend.put(&format!("{}/{job_id}/resubmit", self.url), None)
    }

    /// Cancels a job. API v1 expects GET, every later version PUT.
    pub fn cancel(&self, job_id: impl Display) -> Result<Response> {
        let method = if self.backend.config().api_version() == "v1" {
            HttpMethod::Get
        } else {
            HttpMethod::Put
        };
        self.backend
            .request(method, &format!("{}/{job_id}/cancel", self.url), &[], None)
    }

    #[deprecated(note = "use `Job::cancel`")]
    pub fn delete(&self, job_id: impl Display) -> Result<Response> {
        self.cancel(job_id)
    }

    /// Ends a live-stream job.
    pub fn finish(&self, job_id: impl Display) -> Result<Response> {
        self.backend.put(&format!("{}/{job_id}/finish", self.url), None)
    }
}
