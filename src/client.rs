//! main client
//!
//! includes the request pipeline (`api`, `graph_call`) and the named graph
//! operations built on top of it.

use crate::collection::GraphCollection;
use crate::config::{ClientConfig, Credential};
use crate::error::Result;
use crate::multiquery::{self, MultiqueryResult};
use crate::request::{self, CallOptions, Params, Verb};
use crate::response::{interpret, Decoded, RawResponse};
use crate::transport::{ReqwestTransport, Transport};
use serde_json::Value;
use std::collections::BTreeMap;
use std::convert::identity;
use std::sync::Arc;
use tracing::debug;

/// the successful result of a graph call
#[derive(Debug, Clone, PartialEq)]
pub enum GraphResult {
    /// plain json value
    Value(Value),
    /// a page of a list response
    Collection(GraphCollection),
    /// resolved fql multiquery
    Multiquery(MultiqueryResult),
    /// undecoded response, when the full response was requested
    Raw(RawResponse),
}

impl GraphResult {
    /// the plain value, if this is one
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            GraphResult::Value(value) => Some(value),
            _ => None,
        }
    }

    /// the plain value, or the items of a collection as a json array
    pub fn into_value(self) -> Option<Value> {
        match self {
            GraphResult::Value(value) => Some(value),
            GraphResult::Collection(collection) => Some(Value::Array(collection.into_items())),
            _ => None,
        }
    }

    /// the collection, if this is a list response
    pub fn as_collection(&self) -> Option<&GraphCollection> {
        match self {
            GraphResult::Collection(collection) => Some(collection),
            _ => None,
        }
    }

    /// take the collection, if this is a list response
    pub fn into_collection(self) -> Option<GraphCollection> {
        match self {
            GraphResult::Collection(collection) => Some(collection),
            _ => None,
        }
    }

    /// the resolved multiquery, if this is one
    pub fn as_multiquery(&self) -> Option<&MultiqueryResult> {
        match self {
            GraphResult::Multiquery(resolved) => Some(resolved),
            _ => None,
        }
    }

    /// the undecoded response, if the full response was requested
    pub fn as_raw(&self) -> Option<&RawResponse> {
        match self {
            GraphResult::Raw(raw) => Some(raw),
            _ => None,
        }
    }
}

/// client for the facebook graph api
#[derive(Clone)]
pub struct GraphClient {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
}

impl GraphClient {
    /// create a new client backed by reqwest
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::from_config(&config)?;
        Self::with_transport(config, transport)
    }

    /// create a client on top of a custom transport
    pub fn with_transport(config: ClientConfig, transport: impl Transport + 'static) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            transport: Arc::new(transport),
        })
    }

    /// access the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// access the credential used for every call
    pub fn credential(&self) -> &Credential {
        self.config.credential()
    }

    /// build, send, and interpret a single call
    pub async fn api(
        &self,
        path: &str,
        params: &Params,
        verb: Verb,
        options: &CallOptions,
    ) -> Result<Decoded> {
        let request = request::build(
            verb,
            path,
            params,
            options,
            self.config.credential(),
            &self.config,
        )?;
        debug!(?verb, path = request.url.path(), "dispatching graph call");

        let raw = self.transport.execute(request).await?;
        interpret(&raw, options.http_component)
    }

    /// make a graph call; list responses come back as a [`GraphCollection`]
    ///
    /// multiquery batches are not resolved here; only
    /// [`GraphClient::fql_multiquery`] reshapes them.
    pub async fn graph_call(
        &self,
        path: &str,
        params: Params,
        verb: Verb,
        options: CallOptions,
    ) -> Result<GraphResult> {
        self.graph_call_with(path, params, verb, options, identity)
            .await
    }

    /// make a graph call and post-process the successful result
    pub async fn graph_call_with<T, F>(
        &self,
        path: &str,
        params: Params,
        verb: Verb,
        options: CallOptions,
        post_process: F,
    ) -> Result<T>
    where
        F: FnOnce(GraphResult) -> T,
    {
        let result = match self.api(path, &params, verb, &options).await? {
            Decoded::Json(value) => GraphCollection::evaluate(value, None, self),
            Decoded::Raw(raw) => GraphResult::Raw(raw),
        };
        Ok(post_process(result))
    }

    /// fetch a single object by id or alias
    pub async fn get_object(
        &self,
        id: &str,
        params: Params,
        options: CallOptions,
    ) -> Result<GraphResult> {
        self.get_object_with(id, params, options, identity).await
    }

    /// fetch a single object and post-process the result
    pub async fn get_object_with<T, F>(
        &self,
        id: &str,
        params: Params,
        options: CallOptions,
        post_process: F,
    ) -> Result<T>
    where
        F: FnOnce(GraphResult) -> T,
    {
        self.graph_call_with(id, params, Verb::Get, options, post_process)
            .await
    }

    /// fetch several objects in one call through the `ids` param
    pub async fn get_objects<I, S>(
        &self,
        ids: I,
        params: Params,
        options: CallOptions,
    ) -> Result<GraphResult>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.get_objects_with(ids, params, options, identity).await
    }

    /// fetch several objects and post-process the result
    pub async fn get_objects_with<I, S, T, F>(
        &self,
        ids: I,
        mut params: Params,
        options: CallOptions,
        post_process: F,
    ) -> Result<T>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: FnOnce(GraphResult) -> T,
    {
        let ids: Vec<String> = ids.into_iter().map(|id| id.as_ref().to_string()).collect();
        params.insert("ids".to_string(), ids.join(","));
        self.graph_call_with("", params, Verb::Get, options, post_process)
            .await
    }

    /// fetch a connection of an object, e.g. `me/friends`
    pub async fn get_connections(
        &self,
        id: &str,
        connection: &str,
        params: Params,
        options: CallOptions,
    ) -> Result<GraphResult> {
        self.get_connections_with(id, connection, params, options, identity)
            .await
    }

    /// fetch a connection and post-process the result
    pub async fn get_connections_with<T, F>(
        &self,
        id: &str,
        connection: &str,
        params: Params,
        options: CallOptions,
        post_process: F,
    ) -> Result<T>
    where
        F: FnOnce(GraphResult) -> T,
    {
        let path = format!("{id}/{connection}");
        self.graph_call_with(&path, params, Verb::Get, options, post_process)
            .await
    }

    /// write to a connection of an object, e.g. `me/feed`
    pub async fn put_connections(
        &self,
        id: &str,
        connection: &str,
        params: Params,
        options: CallOptions,
    ) -> Result<GraphResult> {
        self.put_connections_with(id, connection, params, options, identity)
            .await
    }

    /// write to a connection and post-process the result
    pub async fn put_connections_with<T, F>(
        &self,
        id: &str,
        connection: &str,
        params: Params,
        options: CallOptions,
        post_process: F,
    ) -> Result<T>
    where
        F: FnOnce(GraphResult) -> T,
    {
        let path = format!("{id}/{connection}");
        self.graph_call_with(&path, params, Verb::Post, options, post_process)
            .await
    }

    /// delete an object
    pub async fn delete_object(&self, id: &str, options: CallOptions) -> Result<GraphResult> {
        self.delete_object_with(id, options, identity).await
    }

    /// delete an object and post-process the result
    pub async fn delete_object_with<T, F>(
        &self,
        id: &str,
        options: CallOptions,
        post_process: F,
    ) -> Result<T>
    where
        F: FnOnce(GraphResult) -> T,
    {
        self.graph_call_with(id, Params::new(), Verb::Delete, options, post_process)
            .await
    }

    /// url of an object's picture
    ///
    /// the full response is always requested. a json body with `data.url`
    /// (as returned with `redirect=false`) wins; otherwise the redirect's
    /// `Location` header is used.
    pub async fn get_picture(
        &self,
        object: &str,
        params: Params,
        options: CallOptions,
    ) -> Result<Option<String>> {
        self.get_picture_with(object, params, options, identity)
            .await
    }

    /// fetch a picture url and post-process it
    pub async fn get_picture_with<T, F>(
        &self,
        object: &str,
        params: Params,
        options: CallOptions,
        post_process: F,
    ) -> Result<T>
    where
        F: FnOnce(Option<String>) -> T,
    {
        let path = format!("{object}/picture");
        let result = self
            .graph_call(&path, params, Verb::Get, options.full_response())
            .await?;
        let location = match &result {
            GraphResult::Raw(raw) => {
                picture_url(&raw.body).or_else(|| raw.location().map(str::to_string))
            }
            GraphResult::Value(value) => picture_url_from_value(value),
            _ => None,
        };
        Ok(post_process(location))
    }

    /// fetch the access token of a page the current user manages
    pub async fn get_page_access_token(
        &self,
        id: &str,
        params: Params,
        options: CallOptions,
    ) -> Result<Option<String>> {
        self.get_page_access_token_with(id, params, options, identity)
            .await
    }

    /// fetch a page access token and post-process it
    pub async fn get_page_access_token_with<T, F>(
        &self,
        id: &str,
        mut params: Params,
        options: CallOptions,
        post_process: F,
    ) -> Result<T>
    where
        F: FnOnce(Option<String>) -> T,
    {
        params.insert("fields".to_string(), "access_token".to_string());
        let result = self.get_object(id, params, options).await?;
        let token = result
            .as_value()
            .and_then(|value| value.get("access_token"))
            .and_then(Value::as_str)
            .map(str::to_string);
        Ok(post_process(token))
    }

    /// run an fql query and return its rows
    ///
    /// anything other than a list response yields no rows.
    pub async fn fql_query(
        &self,
        query: &str,
        params: Params,
        options: CallOptions,
    ) -> Result<Vec<Value>> {
        self.fql_query_with(query, params, options, identity).await
    }

    /// run an fql query and post-process its rows
    pub async fn fql_query_with<T, F>(
        &self,
        query: &str,
        mut params: Params,
        options: CallOptions,
        post_process: F,
    ) -> Result<T>
    where
        F: FnOnce(Vec<Value>) -> T,
    {
        params.insert("q".to_string(), query.to_string());
        let rows = match self.get_object("fql", params, options).await? {
            GraphResult::Collection(collection) => collection.into_items(),
            GraphResult::Value(Value::Array(rows)) => rows,
            _ => Vec::new(),
        };
        Ok(post_process(rows))
    }

    /// run several named fql queries in one call
    ///
    /// a batch response is resolved into `name -> rows`; any other payload
    /// is passed through as-is.
    pub async fn fql_multiquery(
        &self,
        queries: &BTreeMap<String, String>,
        params: Params,
        options: CallOptions,
    ) -> Result<GraphResult> {
        self.fql_multiquery_with(queries, params, options, identity)
            .await
    }

    /// run an fql multiquery and post-process the result
    pub async fn fql_multiquery_with<T, F>(
        &self,
        queries: &BTreeMap<String, String>,
        mut params: Params,
        options: CallOptions,
        post_process: F,
    ) -> Result<T>
    where
        F: FnOnce(GraphResult) -> T,
    {
        params.insert("q".to_string(), serde_json::to_string(queries)?);
        let result = self.get_object("fql", params, options).await?;
        let resolved = match &result {
            GraphResult::Collection(collection) => {
                multiquery::resolve(&Value::Array(collection.items().to_vec()))
            }
            GraphResult::Value(value) => multiquery::resolve(value),
            _ => None,
        };
        let result = resolved.map(GraphResult::Multiquery).unwrap_or(result);
        Ok(post_process(result))
    }

    /// follow a paging cursor split by [`GraphCollection::next_page_params`]
    pub async fn get_page(&self, page: (String, Params)) -> Result<GraphResult> {
        self.get_page_with(page, identity).await
    }

    /// follow a paging cursor and post-process the result
    pub async fn get_page_with<T, F>(&self, page: (String, Params), post_process: F) -> Result<T>
    where
        F: FnOnce(GraphResult) -> T,
    {
        let (path, params) = page;
        self.graph_call_with(&path, params, Verb::Get, CallOptions::default(), post_process)
            .await
    }
}

impl std::fmt::Debug for GraphClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn picture_url(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()
        .as_ref()
        .and_then(picture_url_from_value)
}

fn picture_url_from_value(value: &Value) -> Option<String> {
    value
        .get("data")
        .and_then(|data| data.get("url"))
        .and_then(Value::as_str)
        .map(str::to_string)
}
