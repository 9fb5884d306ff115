//! request building
//!
//! turns a verb, path, and params into a transport-ready request, injecting
//! the access token and `appsecret_proof`.

use crate::config::{ClientConfig, Credential};
use crate::error::Result;
use hmac::{Hmac, Mac};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use sha2::Sha256;
use std::collections::BTreeMap;
use url::Url;

type HmacSha256 = Hmac<Sha256>;

/// query or form parameters for a call
pub type Params = BTreeMap<String, String>;

/// http verbs supported by the graph api
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
    Delete,
}

impl Verb {
    /// the matching reqwest method
    pub fn as_method(self) -> reqwest::Method {
        match self {
            Verb::Get => reqwest::Method::GET,
            Verb::Post => reqwest::Method::POST,
            Verb::Delete => reqwest::Method::DELETE,
        }
    }
}

/// which part of the http response the caller wants back
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HttpComponent {
    /// decode the body as json
    #[default]
    Body,
    /// hand back status, headers, and body undecoded
    Response,
}

/// per-call options; never retained by the client
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// response shape returned to the caller
    pub http_component: HttpComponent,
    /// `None` signs when a secret is configured, `Some(false)` never signs
    pub appsecret_proof: Option<bool>,
    /// extra wire params; explicit call params win on conflict
    pub extra_params: Params,
    /// extra request headers, e.g. `If-None-Match`
    pub headers: HeaderMap,
    /// api version override for this call
    pub api_version: Option<String>,
}

impl CallOptions {
    /// request the full http response instead of a decoded body
    pub fn full_response(mut self) -> Self {
        self.http_component = HttpComponent::Response;
        self
    }

    /// explicitly enable or disable `appsecret_proof`
    pub fn with_appsecret_proof(mut self, enabled: bool) -> Self {
        self.appsecret_proof = Some(enabled);
        self
    }

    /// add an extra wire parameter
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_params.insert(key.into(), value.into());
        self
    }

    /// add a request header
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// override the api version for this call
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }
}

/// a fully-built request ready for a [`crate::Transport`]
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    /// http verb
    pub verb: Verb,
    /// absolute url, without the params
    pub url: Url,
    /// query params (get, delete) or form fields (post)
    pub params: Params,
    /// per-call headers
    pub headers: HeaderMap,
}

/// hex-encoded hmac-sha256 of the access token keyed by the app secret
pub fn appsecret_proof(app_secret: &str, access_token: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(app_secret.as_bytes()).expect("HMAC can take any size key");
    mac.update(access_token.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// build a transport request
///
/// the caller's params are copied, never mutated. a caller-supplied
/// `access_token` is kept as-is and the proof is computed over the token
/// that is actually sent.
pub(crate) fn build(
    verb: Verb,
    path: &str,
    params: &Params,
    options: &CallOptions,
    credential: &Credential,
    config: &ClientConfig,
) -> Result<TransportRequest> {
    let url = config.resolve_url(path, options.api_version.as_deref())?;

    let mut wire = options.extra_params.clone();
    wire.extend(params.iter().map(|(k, v)| (k.clone(), v.clone())));

    if !wire.contains_key("access_token") && !credential.access_token.is_empty() {
        wire.insert("access_token".to_string(), credential.access_token.clone());
    }

    let sign = options.appsecret_proof != Some(false);
    if let (true, Some(secret)) = (sign, credential.app_secret.as_deref()) {
        match wire.get("access_token") {
            Some(token) if !token.is_empty() => {
                let proof = appsecret_proof(secret, token);
                wire.insert("appsecret_proof".to_string(), proof);
            }
            _ => {}
        }
    }

    Ok(TransportRequest {
        verb,
        url,
        params: wire,
        headers: options.headers.clone(),
    })
}
