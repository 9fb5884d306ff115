//! paged collections
//!
//! list responses come back as `{"data": [...], "paging": {"next", "previous"}}`.
//! [`GraphCollection`] holds one page and fetches neighbours on demand.

use crate::client::{GraphClient, GraphResult};
use crate::error::{Error, ErrorKind, Result};
use crate::graph::PagingCursors;
use crate::request::Params;
use crate::response::{decode_body, RawResponse};
use reqwest::header::HeaderMap;
use serde_json::Value;
use tracing::debug;
use url::Url;

/// one page of a graph api list
///
/// a collection is immutable; paging returns a new collection and leaves
/// this one as it was.
#[derive(Clone)]
pub struct GraphCollection {
    items: Vec<Value>,
    paging: PagingCursors,
    summary: Option<Value>,
    headers: Option<HeaderMap>,
    client: GraphClient,
}

impl GraphCollection {
    /// wrap a list envelope, or `None` if `value` is not one
    pub(crate) fn from_value(
        value: &Value,
        headers: Option<HeaderMap>,
        client: &GraphClient,
    ) -> Option<Self> {
        let object = value.as_object()?;
        let items = object.get("data")?.as_array()?.clone();
        Some(Self {
            items,
            paging: PagingCursors::from_paging(object.get("paging")),
            summary: object.get("summary").cloned(),
            headers,
            client: client.clone(),
        })
    }

    /// decide the shape of a decoded payload: a paged list, else a plain value
    pub(crate) fn evaluate(
        value: Value,
        headers: Option<HeaderMap>,
        client: &GraphClient,
    ) -> GraphResult {
        match Self::from_value(&value, headers, client) {
            Some(collection) => GraphResult::Collection(collection),
            None => GraphResult::Value(value),
        }
    }

    /// decode a full response body and keep its headers on the collection
    pub fn from_raw(raw: &RawResponse, client: &GraphClient) -> Result<GraphResult> {
        let value = decode_body(raw)?;
        Ok(Self::evaluate(value, Some(raw.headers.clone()), client))
    }

    /// items on this page
    pub fn items(&self) -> &[Value] {
        &self.items
    }

    /// take the items on this page
    pub fn into_items(self) -> Vec<Value> {
        self.items
    }

    /// iterate over the items on this page
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    /// number of items on this page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// true if this page has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// paging cursors for this page
    pub fn paging(&self) -> &PagingCursors {
        &self.paging
    }

    /// the `summary` field, when the call asked for one
    pub fn summary(&self) -> Option<&Value> {
        self.summary.as_ref()
    }

    /// response headers, when built from a full response
    pub fn headers(&self) -> Option<&HeaderMap> {
        self.headers.as_ref()
    }

    /// path and params for the next page, if there is one
    pub fn next_page_params(&self) -> Result<Option<(String, Params)>> {
        self.paging.next.as_deref().map(split_page_url).transpose()
    }

    /// path and params for the previous page, if there is one
    pub fn previous_page_params(&self) -> Result<Option<(String, Params)>> {
        self.paging.previous.as_deref().map(split_page_url).transpose()
    }

    /// fetch the next page; `None` without a request when there is no cursor
    pub async fn next_page(&self) -> Result<Option<GraphCollection>> {
        match self.next_page_params()? {
            Some(page) => self.fetch(page).await.map(Some),
            None => Ok(None),
        }
    }

    /// fetch the previous page; `None` without a request when there is no cursor
    pub async fn previous_page(&self) -> Result<Option<GraphCollection>> {
        match self.previous_page_params()? {
            Some(page) => self.fetch(page).await.map(Some),
            None => Ok(None),
        }
    }

    async fn fetch(&self, page: (String, Params)) -> Result<GraphCollection> {
        debug!(path = %page.0, "following paging cursor");
        match self.client.get_page(page).await? {
            GraphResult::Collection(collection) => Ok(collection),
            other => {
                let body = other.into_value().unwrap_or(Value::Null);
                Err(Error::Graph {
                    kind: ErrorKind::BadFacebookResponse,
                    status: 200,
                    body: body.to_string(),
                    parsed: Some(body),
                    message: "paging cursor did not return a list".to_string(),
                })
            }
        }
    }
}

/// split a cursor url into its path and query params
fn split_page_url(page_url: &str) -> Result<(String, Params)> {
    let mut url = Url::parse(page_url)?;
    let params: Params = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    url.set_query(None);
    Ok((url.to_string(), params))
}

impl<'a> IntoIterator for &'a GraphCollection {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl PartialEq for GraphCollection {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
            && self.paging == other.paging
            && self.summary == other.summary
            && self.headers == other.headers
    }
}

impl std::fmt::Debug for GraphCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphCollection")
            .field("items", &self.items)
            .field("paging", &self.paging)
            .field("summary", &self.summary)
            .field("headers", &self.headers.as_ref().map(HeaderMap::len))
            .finish()
    }
}
