use crate::backend::Backend;
use crate::error::Result;
use crate::response::Response;
use crate::types::ReportQuery;

/// Usage reports (`/reports`). Only available on API v2.
#[derive(Debug, Clone)]
pub struct Report {
    backend: Backend,
    url: String,
}

impl Report {
    pub(crate) fn new(backend: Backend) -> Self {
        let url = backend.resource_url("reports");
        Self { backend, url }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Encoded and billable minutes, the pre-VOD/live report.
    pub fn minutes(&self, query: &ReportQuery) -> Result<Response> {
        self.fetch("minutes", query)
    }

    /// VOD usage.
    pub fn vod(&self, query: &ReportQuery) -> Result<Response> {
        self.fetch("vod", query)
    }

    /// Live streaming usage.
    pub fn live(&self, query: &ReportQuery) -> Result<Response> {
        self.fetch("live", query)
    }

    /// VOD and live usage combined.
    pub fn all(&self, query: &ReportQuery) -> Result<Response> {
        self.fetch("all", query)
    }

    fn fetch(&self, report: &str, query: &ReportQuery) -> Result<Response> {
        self.backend.get(&format!("{}/{report}", self.url), &query.to_query())
    }
}
