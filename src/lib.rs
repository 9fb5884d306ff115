//! facebook graph api client
//!
//! this crate provides a small client for the facebook graph api.
//! start with [`GraphClient`] and [`ClientConfig`], then use `graph_call` for
//! ad-hoc requests or the named helpers (`get_object`, `get_connections`,
//! `get_picture`, `fql_multiquery`, ...) for common calls.
//!
//! ## quick start
//!
//! ```no_run
//! use fbgraph::{CallOptions, ClientConfig, GraphClient, Params};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GraphClient::new(ClientConfig::new("token").with_app_secret("secret"))?;
//! let me = client
//!     .get_object("me", Params::new(), CallOptions::default())
//!     .await?;
//! println!("{:?}", me.as_value());
//! # Ok(())
//! # }
//! ```
//!
//! ## post-processing
//!
//! every named operation has a `_with` variant taking a closure. the closure
//! runs once on the successful result and never sees errors.
//!
//! ```no_run
//! # use fbgraph::{CallOptions, ClientConfig, GraphClient, Params};
//! # async fn example(client: GraphClient) -> fbgraph::Result<()> {
//! let name = client
//!     .get_object_with("me", Params::new(), CallOptions::default(), |result| {
//!         result.as_value().and_then(|v| v["name"].as_str().map(str::to_string))
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod collection;
mod config;
mod error;
mod graph;
mod multiquery;
mod request;
mod response;
mod transport;

pub use client::{GraphClient, GraphResult};
pub use collection::GraphCollection;
pub use config::{ClientConfig, Credential};
pub use error::{BoxError, Error, ErrorKind, Result};
pub use graph::{GraphErrorDetail, PagingCursors};
pub use multiquery::{resolve as resolve_multiquery, MultiqueryResult};
pub use request::{appsecret_proof, CallOptions, HttpComponent, Params, TransportRequest, Verb};
pub use response::{interpret, Decoded, RawResponse, NOT_MODIFIED_MESSAGE};
pub use transport::{ReqwestTransport, Transport};
