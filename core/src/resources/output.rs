use std::fmt::Display;

use crate::backend::Backend;
use crate::error::Result;
use crate::response::Response;

/// Output files of a job (`/outputs`).
#[derive(Debug, Clone)]
pub struct Output {
    backend: Backend,
    url: String,
}

impl Output {
    pub(crate) fn new(backend: Backend) -> Self {
        let url = backend.resource_url("outputs");
        Self { backend, url }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn details(&self, output_id: impl Display) -> Result<Response> {
        self.backend.get(&format!("{}/{output_id}", self.url), &[])
    }

    pub fn progress(&self, output_id: impl Display) -> Result<Response> {
        self.backend.get(&format!("{}/{output_id}/progress", self.url), &[])
    }
}
