//! Request parameters for the resource clients.
//!
//! Entities themselves (jobs, outputs, accounts) live only on the service and
//! come back as untyped JSON in `Response::body`. These types describe what
//! goes out.

use chrono::NaiveDate;
use serde_json::{Map, Value};

/// Parameters for `Job::create`.
///
/// A job either transcodes an input file or starts a live stream, never
/// both; the two constructors enforce that.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateJob {
    input: Option<String>,
    live_stream: bool,
    outputs: Option<Value>,
    options: Map<String, Value>,
}

impl CreateJob {
    /// A job transcoding the file at `input` (e.g. `s3://bucket/movie.mov`).
    pub fn from_input(input: impl Into<String>) -> Self {
        Self {
            input: Some(input.into()),
            ..Self::default()
        }
    }

    /// A live-stream job; it runs until `Job::finish` is called.
    pub fn live_stream() -> Self {
        Self {
            live_stream: true,
            ..Self::default()
        }
    }

    /// Output definitions, usually a JSON array of output objects.
    #[must_use]
    pub fn outputs(mut self, outputs: Value) -> Self {
        self.outputs = Some(outputs);
        self
    }

    /// Adds a top-level job option such as `notifications` or `region`.
    #[must_use]
    pub fn option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    /// Builds the request body. Options are merged over `input` and `test`;
    /// `live_stream` is set last.
    pub fn to_body(&self, test_mode: bool) -> Value {
        let mut body = Map::new();
        body.insert(
            "input".to_string(),
            self.input.clone().map_or(Value::Null, Value::String),
        );
        body.insert("test".to_string(), Value::Bool(test_mode));
        if let Some(outputs) = &self.outputs {
            body.insert("outputs".to_string(), outputs.clone());
        }
        body.extend(self.options.clone());
        if self.live_stream {
            body.insert("live_stream".to_string(), Value::Bool(true));
        }
        Value::Object(body)
    }
}

/// Parameters for `Account::create`.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateAccount {
    email: String,
    terms_of_service: u32,
    options: Map<String, Value>,
}

impl CreateAccount {
    /// Terms of service are accepted (`1`) by default.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            terms_of_service: 1,
            options: Map::new(),
        }
    }

    #[must_use]
    pub fn terms_of_service(mut self, tos: u32) -> Self {
        self.terms_of_service = tos;
        self
    }

    /// Adds an account option such as `password` or `affiliate_code`.
    #[must_use]
    pub fn option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    /// `terms_of_service` is sent as a string.
    pub fn to_body(&self) -> Value {
        let mut body = Map::new();
        body.insert("email".to_string(), Value::String(self.email.clone()));
        body.insert(
            "terms_of_service".to_string(),
            Value::String(self.terms_of_service.to_string()),
        );
        body.extend(self.options.clone());
        Value::Object(body)
    }
}

/// Page selection for `Job::list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Pagination {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    pub fn to_query(self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.to_string()),
            ("per_page", self.per_page.to_string()),
        ]
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 50,
        }
    }
}

/// Date range and grouping for the reporting endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub grouping: Option<String>,
}

impl ReportQuery {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    #[must_use]
    pub fn end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    #[must_use]
    pub fn grouping(mut self, grouping: impl Into<String>) -> Self {
        self.grouping = Some(grouping.into());
        self
    }

    /// Dates go out as `from`/`to` in `YYYY-MM-DD`; unset fields are omitted.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        const DATE_FORMAT: &str = "%Y-%m-%d";

        let mut query = Vec::new();
        if let Some(start) = self.start_date {
            query.push(("from", start.format(DATE_FORMAT).to_string()));
        }
        if let Some(end) = self.end_date {
            query.push(("to", end.format(DATE_FORMAT).to_string()));
        }
        if let Some(grouping) = &self.grouping {
            query.push(("grouping", grouping.clone()));
        }
        query
    }
}
