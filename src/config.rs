//! client configuration
//!
//! build a [`ClientConfig`] with an access token and optional overrides.
//! pass it to [`crate::GraphClient::new`] to create a client.

use crate::error::{Error, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// default graph api endpoint
pub const DEFAULT_GRAPH_URL: &str = "https://graph.facebook.com";

/// access token and optional app secret used to authenticate calls
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    /// access token; empty means anonymous calls
    pub access_token: String,
    /// app secret used to sign `appsecret_proof`
    pub app_secret: Option<String>,
}

impl Credential {
    /// create a credential from a token and optional secret
    pub fn new(access_token: impl Into<String>, app_secret: Option<String>) -> Self {
        Self {
            access_token: access_token.into(),
            app_secret,
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"<redacted>")
            .field("app_secret", &self.app_secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// configuration for the graph client
#[derive(Clone)]
pub struct ClientConfig {
    /// original graph url input
    pub(crate) raw_graph_url: String,

    /// base url of the graph api (e.g., "<https://graph.facebook.com>")
    pub(crate) graph_url: Url,

    /// whether the provided graph url parsed successfully
    pub(crate) graph_url_valid: bool,

    /// token and secret injected into every call
    pub(crate) credential: Credential,

    /// api version prefix, e.g. "v19.0"
    pub(crate) api_version: Option<String>,

    /// request timeout duration
    pub(crate) timeout: Duration,

    /// user agent string
    pub(crate) user_agent: String,

    /// whether to verify ssl certificates
    pub(crate) verify_ssl: bool,

    /// additional headers to send with every request
    pub(crate) extra_headers: HeaderMap,

    /// prebuilt http client (takes precedence over http_client_builder)
    pub(crate) http_client: Option<reqwest::Client>,

    /// callback to customize the http client builder before building
    pub(crate) http_client_builder:
        Option<Arc<dyn Fn(reqwest::ClientBuilder) -> reqwest::ClientBuilder + Send + Sync>>,
}

impl ClientConfig {
    /// create a new client configuration
    ///
    /// # arguments
    ///
    /// * `access_token` - user, page, or app access token; pass an empty
    ///   string for anonymous calls
    ///
    /// # example
    ///
    /// ```
    /// use fbgraph::ClientConfig;
    ///
    /// let config = ClientConfig::new("your-token-here").with_app_secret("your-app-secret");
    /// ```
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            raw_graph_url: DEFAULT_GRAPH_URL.to_string(),
            graph_url: Url::parse(DEFAULT_GRAPH_URL).expect("default graph url is valid"),
            graph_url_valid: true,
            credential: Credential::new(access_token, None),
            api_version: None,
            timeout: Duration::from_secs(30),
            user_agent: format!("fbgraph-rs/{} (Rust)", env!("CARGO_PKG_VERSION")),
            verify_ssl: true,
            extra_headers: HeaderMap::new(),
            http_client: None,
            http_client_builder: None,
        }
    }

    /// set the app secret; enables `appsecret_proof` on every call by default
    pub fn with_app_secret(mut self, app_secret: impl Into<String>) -> Self {
        let app_secret = app_secret.into();
        self.credential.app_secret = (!app_secret.is_empty()).then_some(app_secret);
        self
    }

    /// point the client at a different graph endpoint (with or without trailing slash)
    pub fn with_graph_url(mut self, graph_url: impl AsRef<str>) -> Self {
        let raw = graph_url.as_ref();
        let normalized = raw.trim_end_matches('/');
        match Url::parse(normalized).or_else(|_| Url::parse(&format!("https://{}", normalized))) {
            Ok(url) => {
                self.graph_url = url;
                self.graph_url_valid = true;
            }
            Err(_) => self.graph_url_valid = false,
        }
        self.raw_graph_url = raw.to_string();
        self
    }

    /// prefix relative paths with an api version, e.g. "v19.0"
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// set the request timeout
    ///
    /// default: 30 seconds
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// set a custom user agent string
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// disable ssl certificate verification (not recommended for production)
    ///
    /// default: enabled
    pub fn with_ssl_verification(mut self, verify: bool) -> Self {
        self.verify_ssl = verify;
        self
    }

    /// add a header to every request
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.extra_headers.insert(name, value);
        self
    }

    /// add a set of headers to every request
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.extra_headers.extend(headers);
        self
    }

    /// inject a prebuilt http client.
    ///
    /// when set, this client is used as-is by [`crate::ReqwestTransport`] and
    /// takes precedence over `with_http_client_builder`. timeouts, tls, user
    /// agent, and default headers come from the prebuilt client.
    ///
    /// reqwest follows redirects by default; build the client with
    /// `redirect(reqwest::redirect::Policy::none())` or
    /// [`crate::GraphClient::get_picture`] never sees the `Location` header.
    pub fn with_http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// customize the http client builder before the client is created.
    ///
    /// the callback receives a builder that already has the extra headers,
    /// user agent, timeout, redirect policy, and ssl settings applied.
    ///
    /// ignored if `with_http_client` is also set.
    pub fn with_http_client_builder<F>(mut self, f: F) -> Self
    where
        F: Fn(reqwest::ClientBuilder) -> reqwest::ClientBuilder + Send + Sync + 'static,
    {
        self.http_client_builder = Some(Arc::new(f));
        self
    }

    /// access the credential
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// access extra headers configured on this client
    pub fn extra_headers(&self) -> &HeaderMap {
        &self.extra_headers
    }

    /// validate the configuration
    pub(crate) fn validate(&self) -> Result<()> {
        if !self.graph_url_valid {
            return Err(Error::Config(format!(
                "invalid graph url: {}",
                self.raw_graph_url
            )));
        }

        if self.graph_url.scheme() != "http" && self.graph_url.scheme() != "https" {
            return Err(Error::Config(format!(
                "invalid url scheme: {}. must be http or https",
                self.graph_url.scheme()
            )));
        }

        Ok(())
    }

    /// resolve a call path to a url
    ///
    /// absolute http(s) urls (paging cursors) are used as-is; anything else is
    /// joined onto the graph url, behind the api version when one applies.
    pub(crate) fn resolve_url(&self, path: &str, api_version: Option<&str>) -> Result<Url> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Url::parse(path).map_err(Error::from);
        }

        let base = self.graph_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        let version = api_version.or(self.api_version.as_deref());
        let url_str = match version {
            Some(version) if !version.is_empty() => format!("{}/{}/{}", base, version, path),
            _ => format!("{}/{}", base, path),
        };
        Url::parse(&url_str).map_err(Error::from)
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("graph_url", &self.graph_url)
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("verify_ssl", &self.verify_ssl)
            .field("extra_headers", &self.extra_headers.len())
            .field("http_client", &self.http_client.is_some())
            .field("http_client_builder", &self.http_client_builder.is_some())
            .field("credential", &self.credential)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_config() {
        let config = ClientConfig::new("test-token");
        assert_eq!(config.graph_url.as_str(), "https://graph.facebook.com/");
        assert_eq!(config.credential.access_token, "test-token");
        assert!(config.credential.app_secret.is_none());
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_app_secret() {
        let config = ClientConfig::new("token").with_app_secret("secret");
        assert_eq!(config.credential().app_secret.as_deref(), Some("secret"));

        let config = ClientConfig::new("token").with_app_secret("");
        assert!(config.credential().app_secret.is_none());
    }

    #[test]
    fn test_resolve_url_relative() {
        let config = ClientConfig::new("token");
        let url = config.resolve_url("/me/feed", None).unwrap();
        assert_eq!(url.as_str(), "https://graph.facebook.com/me/feed");
    }

    #[test]
    fn test_resolve_url_versioned() {
        let config = ClientConfig::new("token").with_api_version("v19.0");
        let url = config.resolve_url("me", None).unwrap();
        assert_eq!(url.as_str(), "https://graph.facebook.com/v19.0/me");

        let url = config.resolve_url("me", Some("v2.0")).unwrap();
        assert_eq!(url.as_str(), "https://graph.facebook.com/v2.0/me");
    }

    #[test]
    fn test_resolve_url_absolute() {
        let config = ClientConfig::new("token").with_api_version("v19.0");
        let url = config
            .resolve_url("https://graph.facebook.com/v2.0/me/feed?after=abc", None)
            .unwrap();
        assert_eq!(url.path(), "/v2.0/me/feed");
        assert_eq!(url.query(), Some("after=abc"));
    }

    #[test]
    fn test_custom_graph_url() {
        let config = ClientConfig::new("token").with_graph_url("http://localhost:1234/");
        let url = config.resolve_url("koppel", None).unwrap();
        assert_eq!(url.as_str(), "http://localhost:1234/koppel");
    }

    #[test]
    fn test_validation() {
        let config = ClientConfig::new("token");
        assert!(config.validate().is_ok());

        // anonymous calls are allowed
        let anonymous = ClientConfig::new("");
        assert!(anonymous.validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_url() {
        let mut config = ClientConfig::new("token");
        config.graph_url_valid = false;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_validation_invalid_scheme() {
        let config = ClientConfig::new("token").with_graph_url("ftp://example.com");
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_builder_helpers() {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("x-test"),
            HeaderValue::from_static("value"),
        );

        let config = ClientConfig::new("token")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("fbgraph-test")
            .with_ssl_verification(false)
            .with_headers(headers)
            .with_header(
                HeaderName::from_static("x-other"),
                HeaderValue::from_static("other"),
            );

        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "fbgraph-test");
        assert!(!config.verify_ssl);
        assert_eq!(config.extra_headers.get("x-test").unwrap(), "value");
        assert_eq!(config.extra_headers.get("x-other").unwrap(), "other");
        assert_eq!(config.extra_headers(), &config.extra_headers);
    }

    #[test]
    fn test_with_http_client() {
        let config = ClientConfig::new("token").with_http_client(reqwest::Client::new());
        assert!(config.http_client.is_some());
        assert!(config.http_client_builder.is_none());

        let config =
            ClientConfig::new("token").with_http_client_builder(|b| b.connection_verbose(true));
        assert!(config.http_client.is_none());
        assert!(config.http_client_builder.is_some());
    }

    #[test]
    fn test_debug_redacts_credential() {
        let config = ClientConfig::new("very-secret-token").with_app_secret("shh");
        let debug = format!("{config:?}");
        assert!(debug.contains("\"<redacted>\""));
        assert!(!debug.contains("very-secret-token"));
        assert!(!debug.contains("shh"));
        assert!(debug.contains("http_client: false"));
    }
}
