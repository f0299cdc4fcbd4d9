use std::fmt::Display;

use crate::backend::Backend;
use crate::error::Result;
use crate::response::Response;

/// Input files of a job (`/inputs`).
#[derive(Debug, Clone)]
pub struct Input {
    backend: Backend,
    url: String,
}

impl Input {
    pub(crate) fn new(backend: Backend) -> Self {
        let url = backend.resource_url("inputs");
        Self { backend, url }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn details(&self, input_id: impl Display) -> Result<Response> {
        self.backend.get(&format!("{}/{input_id}", self.url), &[])
    }

    pub fn progress(&self, input_id: impl Display) -> Result<Response> {
        self.backend.get(&format!("{}/{input_id}/progress", self.url), &[])
    }
}
