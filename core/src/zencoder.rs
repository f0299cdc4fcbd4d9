//! Entry point tying the resource clients to one configuration.

use std::sync::Arc;

use crate::backend::Backend;
use crate::config::{Config, ConfigBuilder};
use crate::error::Result;
use crate::http::Transport;
use crate::resources::{Account, Input, Job, Output, Report};
use crate::transport::UreqTransport;

/// Client for the Zencoder API.
///
/// All resource clients share one `Config` and one transport (and with it one
/// connection pool). `report` is only available on API v2.
///
/// ```rust,no_run
/// use zencoder::{CreateJob, Zencoder};
///
/// # fn main() -> Result<(), zencoder::ZencoderError> {
/// let zen = Zencoder::builder().api_key("abcd123").build_client()?;
/// let response = zen.job.create(&CreateJob::from_input("s3://bucket/movie.mov"))?;
/// println!("{} {:?}", response.status_code(), response.body());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Zencoder {
    config: Arc<Config>,
    pub job: Job,
    pub account: Account,
    pub output: Output,
    pub input: Input,
    pub report: Option<Report>,
}

impl Zencoder {
    pub fn builder() -> ConfigBuilder {
        Config::builder()
    }

    /// Creates a client using `ZENCODER_API_KEY` and the default API version.
    ///
    /// # Errors
    ///
    /// Returns `ZencoderError::Configuration` if the variable is not set.
    pub fn from_env() -> Result<Self> {
        Self::new(Config::builder().build()?)
    }

    /// Creates a client over the default `ureq` transport.
    ///
    /// # Errors
    ///
    /// Fails if the transport cannot be built from the proxy or TLS
    /// settings.
    pub fn new(config: Config) -> Result<Self> {
        let transport = UreqTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Creates a client that sends every request through `transport`.
    pub fn with_transport(config: Config, transport: Arc<dyn Transport>) -> Self {
        let config = Arc::new(config);
        let backend = Backend::new(Arc::clone(&config), transport);

        let report = (config.api_version() == "v2").then(|| Report::new(backend.clone()));

        Self {
            job: Job::new(backend.clone()),
            account: Account::new(backend.clone()),
            output: Output::new(backend.clone()),
            input: Input::new(backend),
            report,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn api_key(&self) -> &str {
        self.config.api_key()
    }

    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }
}

impl ConfigBuilder {
    /// Resolves the configuration and builds a `Zencoder` over `ureq`.
    ///
    /// # Errors
    ///
    /// See `ConfigBuilder::build` and `Zencoder::new`.
    pub fn build_client(self) -> Result<Zencoder> {
        Zencoder::new(self.build()?)
    }
}
