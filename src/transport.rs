//! http transport
//!
//! the [`Transport`] trait is the only place a graph call touches the
//! network. [`ReqwestTransport`] is the default implementation.

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::request::{TransportRequest, Verb};
use crate::response::RawResponse;
use async_trait::async_trait;
use reqwest::redirect::Policy;

/// executes a built request and returns the raw response
///
/// network failures must come back as [`Error::Transport`] (see
/// [`Error::transport`]); any response, whatever its status, is returned as
/// a [`RawResponse`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: TransportRequest) -> Result<RawResponse>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// wrap an existing reqwest client
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// build a reqwest client from the config
    ///
    /// redirects are not followed so `Location` headers reach the caller.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        if let Some(http) = &config.http_client {
            return Ok(Self::new(http.clone()));
        }

        let mut builder = reqwest::Client::builder()
            .default_headers(config.extra_headers.clone())
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .redirect(Policy::none())
            .danger_accept_invalid_certs(!config.verify_ssl);

        if let Some(customize) = &config.http_client_builder {
            builder = customize(builder);
        }

        let http = builder
            .build()
            .map_err(|err| Error::Config(format!("failed to build http client: {err}")))?;
        Ok(Self::new(http))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: TransportRequest) -> Result<RawResponse> {
        let builder = self
            .http
            .request(request.verb.as_method(), request.url)
            .headers(request.headers);
        let builder = match request.verb {
            Verb::Post => builder.form(&request.params),
            Verb::Get | Verb::Delete => builder.query(&request.params),
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await?;
        Ok(RawResponse::new(status, headers, body))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_from_config() {
        let config = ClientConfig::new("token")
            .with_timeout(Duration::from_secs(5))
            .with_http_client_builder(|b| b.no_proxy());
        assert!(ReqwestTransport::from_config(&config).is_ok());

        let config = ClientConfig::new("token").with_http_client(reqwest::Client::new());
        assert!(ReqwestTransport::from_config(&config).is_ok());
    }
}
