//! Blocking client for the Zencoder video transcoding API.
//!
//! # Overview
//! `Zencoder` resolves a `Config` once (API key, endpoint, transport
//! settings) and exposes one client per API resource: `job`, `account`,
//! `output`, `input` and, on API v2, `report`. Every operation performs a
//! single blocking round trip and returns a `Response` whatever the status
//! code; only configuration, payload decoding and transport failures are
//! errors.
//!
//! # Design
//! - Resource clients compose a shared `Backend` rather than each owning
//!   HTTP plumbing.
//! - The backend builds `HttpRequest` values and decodes `HttpResponse`
//!   values as plain data; a `Transport` performs the I/O. `UreqTransport`
//!   is the default.
//! - Headers are derived from the config on each call; the API key travels
//!   in the `Zencoder-Api-Key` header.

pub mod backend;
pub mod config;
pub mod error;
pub mod http;
pub mod resources;
pub mod response;
pub mod transport;
pub mod types;
mod zencoder;

pub use backend::Backend;
pub use config::{Config, ConfigBuilder};
pub use error::{Result, ZencoderError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use resources::{Account, Input, Job, Output, Report};
pub use response::Response;
pub use transport::UreqTransport;
pub use types::{CreateAccount, CreateJob, Pagination, ReportQuery};
pub use zencoder::Zencoder;
