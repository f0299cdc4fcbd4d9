//! Client configuration.
//!
//! A `Config` is resolved once by `ConfigBuilder::build` and never mutated
//! afterwards; every resource client shares it through an `Arc`.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Result, ZencoderError};

/// Root of every Zencoder API endpoint.
pub const API_ROOT: &str = "https://app.zencoder.com/api/";

/// API version used when none is given.
pub const DEFAULT_API_VERSION: &str = "v2";

/// Version token that selects the unversioned development API.
pub const EDGE_API_VERSION: &str = "edge";

/// Environment variable consulted when no API key is supplied.
pub const API_KEY_ENV: &str = "ZENCODER_API_KEY";

/// Resolved, immutable client configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    api_key: String,
    api_version: String,
    base_url: String,
    timeout: Option<Duration>,
    proxies: BTreeMap<String, String>,
    tls_verify: bool,
    cert: Option<PathBuf>,
    test_mode: bool,
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Base URL every resource name is appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Proxy URLs keyed by scheme (`http`, `https`).
    pub fn proxies(&self) -> &BTreeMap<String, String> {
        &self.proxies
    }

    pub fn tls_verify(&self) -> bool {
        self.tls_verify
    }

    pub fn cert(&self) -> Option<&Path> {
        self.cert.as_deref()
    }

    pub fn test_mode(&self) -> bool {
        self.test_mode
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("api_version", &self.api_version)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("proxies", &self.proxies)
            .field("tls_verify", &self.tls_verify)
            .field("cert", &self.cert)
            .field("test_mode", &self.test_mode)
            .finish()
    }
}

/// Builder for `Config`.
///
/// `api_version` and `base_url` are two ways of naming the endpoint; setting
/// both makes `build` fail.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    api_key: Option<String>,
    api_version: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    proxies: BTreeMap<String, String>,
    tls_verify: Option<bool>,
    cert: Option<PathBuf>,
    test_mode: bool,
}

impl ConfigBuilder {
    /// Sets the API key. When unset, `ZENCODER_API_KEY` is used.
    #[must_use]
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Selects the API version (`v1`, `v2`, `edge`).
    #[must_use]
    pub fn api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = Some(api_version.into());
        self
    }

    /// Overrides the endpoint. Used verbatim; resource names are appended
    /// directly, so it should end with `/`.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Routes requests for `scheme` through `proxy_url`.
    #[must_use]
    pub fn proxy(mut self, scheme: impl Into<String>, proxy_url: impl Into<String>) -> Self {
        self.proxies.insert(scheme.into(), proxy_url.into());
        self
    }

    #[must_use]
    pub fn tls_verify(mut self, tls_verify: bool) -> Self {
        self.tls_verify = Some(tls_verify);
        self
    }

    /// PEM file holding the client certificate chain and its private key.
    #[must_use]
    pub fn cert(mut self, path: impl Into<PathBuf>) -> Self {
        self.cert = Some(path.into());
        self
    }

    /// Marks created jobs as non-billable test jobs.
    #[must_use]
    pub fn test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }

    /// Resolves the configuration, reading `ZENCODER_API_KEY` if needed.
    ///
    /// # Errors
    ///
    /// Returns `ZencoderError::Configuration` if no API key can be found or
    /// if both `api_version` and `base_url` were set.
    pub fn build(self) -> Result<Config> {
        self.resolve(|name| std::env::var(name).ok())
    }

    pub(crate) fn resolve<F>(self, env: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.api_version.is_some() && self.base_url.is_some() {
            return Err(ZencoderError::Configuration(
                "cannot set both base_url and api_version".to_string(),
            ));
        }

        let api_key = self
            .api_key
            .filter(|key| !key.is_empty())
            .or_else(|| env(API_KEY_ENV).filter(|key| !key.is_empty()))
            .ok_or_else(|| ZencoderError::Configuration(format!("{API_KEY_ENV} not set")))?;

        let api_version = self
            .api_version
            .filter(|version| !version.is_empty())
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        let base_url = match self.base_url {
            Some(base_url) => base_url,
            None => versioned_base_url(&api_version),
        };

        Ok(Config {
            api_key,
            api_version,
            base_url,
            timeout: self.timeout,
            proxies: self.proxies,
            tls_verify: self.tls_verify.unwrap_or(true),
            cert: self.cert,
            test_mode: self.test_mode,
        })
    }
}

fn versioned_base_url(api_version: &str) -> String {
    if api_version == EDGE_API_VERSION {
        API_ROOT.to_string()
    } else {
        format!("{API_ROOT}{api_version}/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn explicit_api_key_wins_over_environment() {
        let config = Config::builder()
            .api_key("abcd123")
            .resolve(|_| Some("from-env".to_string()))
            .unwrap();
        assert_eq!(config.api_key(), "abcd123");
    }

    #[test]
    fn api_key_falls_back_to_environment() {
        let config = Config::builder()
            .resolve(|name| (name == API_KEY_ENV).then(|| "env-key".to_string()))
            .unwrap();
        assert_eq!(config.api_key(), "env-key");
    }

    #[test]
    fn empty_api_key_is_treated_as_missing() {
        let config = Config::builder()
            .api_key("")
            .resolve(|_| Some("env-key".to_string()))
            .unwrap();
        assert_eq!(config.api_key(), "env-key");
    }

    #[test]
    fn missing_api_key_is_a_configuration_error() {
        let err = Config::builder().resolve(no_env).unwrap_err();
        assert!(matches!(err, ZencoderError::Configuration(ref msg) if msg.contains(API_KEY_ENV)));
    }

    #[test]
    fn base_url_and_api_version_are_exclusive() {
        let err = Config::builder()
            .api_key("abcd123")
            .api_version("v1")
            .base_url("http://localhost:3000/")
            .resolve(no_env)
            .unwrap_err();
        assert!(matches!(err, ZencoderError::Configuration(_)));
    }

    #[test]
    fn default_base_url_is_v2() {
        let config = Config::builder().api_key("k").resolve(no_env).unwrap();
        assert_eq!(config.base_url(), "https://app.zencoder.com/api/v2/");
        assert_eq!(config.api_version(), "v2");
    }

    #[test]
    fn v1_base_url() {
        let config = Config::builder()
            .api_key("k")
            .api_version("v1")
            .resolve(no_env)
            .unwrap();
        assert_eq!(config.base_url(), "https://app.zencoder.com/api/v1/");
    }

    #[test]
    fn edge_has_no_version_segment() {
        let config = Config::builder()
            .api_key("k")
            .api_version("edge")
            .resolve(no_env)
            .unwrap();
        assert_eq!(config.base_url(), "https://app.zencoder.com/api/");
    }

    #[test]
    fn explicit_base_url_is_verbatim() {
        let config = Config::builder()
            .api_key("k")
            .base_url("http://localhost:3000")
            .resolve(no_env)
            .unwrap();
        assert_eq!(config.base_url(), "http://localhost:3000");
        assert_eq!(config.api_version(), DEFAULT_API_VERSION);
    }

    #[test]
    fn transport_defaults() {
        let config = Config::builder().api_key("k").resolve(no_env).unwrap();
        assert!(config.tls_verify());
        assert!(!config.test_mode());
        assert!(config.timeout().is_none());
        assert!(config.proxies().is_empty());
        assert!(config.cert().is_none());
    }

    #[test]
    fn builder_carries_transport_settings() {
        let config = Config::builder()
            .api_key("k")
            .timeout(Duration::from_secs(5))
            .proxy("https", "http://proxy.local:8080")
            .tls_verify(false)
            .cert("/etc/zencoder/client.pem")
            .test_mode(true)
            .resolve(no_env)
            .unwrap();
        assert_eq!(config.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(
            config.proxies().get("https").map(String::as_str),
            Some("http://proxy.local:8080")
        );
        assert!(!config.tls_verify());
        assert_eq!(config.cert(), Some(Path::new("/etc/zencoder/client.pem")));
        assert!(config.test_mode());
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = Config::builder().api_key("secret-key").resolve(no_env).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("<redacted>"));
    }
}
