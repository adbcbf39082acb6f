//! The resource client
//!
//! Maps generic resource operations (list, fetch, filter, fetch-related,
//! create, update, delete) onto JSON:API-conventional HTTP requests and
//! unwraps the `{data: ...}` response envelope.

use crate::document::{Envelope, PrimaryData, Relationship, ResourceObject};
use crate::query::{FilterSpec, QueryOptions};
use crate::transport::{Transport, TransportFailure};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Media type JSON:API requires on request documents.
pub const MEDIA_TYPE: &str = "application/vnd.api+json";

const CONTENT_TYPE: (&str, &str) = ("Content-Type", MEDIA_TYPE);

/// Errors surfaced by resource operations.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The server rejected the request; carries its structured error
    /// body (JSON:API `errors` document) verbatim.
    #[error("server returned an error document")]
    Server(Value),
    /// The request never produced a response.
    #[error(transparent)]
    Transport(TransportFailure),
    /// The success body was not the expected `{data: ...}` envelope, or
    /// carried the wrong cardinality for the operation.
    #[error("unexpected response shape: {0}")]
    Decode(String),
}

impl From<TransportFailure> for ResourceError {
    fn from(failure: TransportFailure) -> Self {
        match failure {
            TransportFailure::Rejected { response } => Self::Server(response),
            network => Self::Transport(network),
        }
    }
}

/// Parameters for listing a collection.
#[derive(Debug, Clone, Default)]
pub struct ListParams {
    /// Full collection URL used verbatim when present (server-provided
    /// pagination links); bypasses name-based construction and `options`
    pub url: Option<String>,
    /// Query options appended when the URL is built from the resource name
    pub options: QueryOptions,
}

impl ListParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// List from a server-provided URL verbatim.
    pub fn at_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            options: QueryOptions::new(),
        }
    }

    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }
}

/// Parameters for fetching a resource's related collection.
#[derive(Debug, Clone)]
pub struct RelatedParams {
    /// The resource whose relationship is being followed
    pub parent: ResourceObject,
    /// Relationship name; defaults to the client's own resource name
    pub relationship: Option<String>,
    pub options: QueryOptions,
}

impl RelatedParams {
    pub fn new(parent: ResourceObject) -> Self {
        Self {
            parent,
            relationship: None,
            options: QueryOptions::new(),
        }
    }

    pub fn with_relationship(mut self, relationship: impl Into<String>) -> Self {
        self.relationship = Some(relationship.into());
        self
    }

    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }
}

/// Attributes and relationships for a create or update request.
///
/// Members left unset stay absent from the request document (never null).
#[derive(Debug, Clone, Default)]
pub struct RecordParams {
    pub attributes: Option<Map<String, Value>>,
    pub relationships: Option<BTreeMap<String, Relationship>>,
    pub options: QueryOptions,
}

impl RecordParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one attribute, creating the attributes member if needed.
    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes
            .get_or_insert_with(Map::new)
            .insert(key.into(), value);
        self
    }

    pub fn with_attributes(mut self, attributes: Map<String, Value>) -> Self {
        self.attributes = Some(attributes);
        self
    }

    /// Set one relationship, creating the relationships member if needed.
    pub fn with_relationship(
        mut self,
        name: impl Into<String>,
        relationship: Relationship,
    ) -> Self {
        self.relationships
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), relationship);
        self
    }

    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }
}

/// A client for one JSON:API resource type.
///
/// Holds only immutable configuration (the resource name and a transport
/// handle), so one instance serves concurrent calls without locking.
/// Each operation is a single stateless request/response cycle; retry,
/// timeout, and auth concerns belong to the transport.
pub struct ResourceClient {
    name: String,
    transport: Arc<dyn Transport>,
}

impl ResourceClient {
    /// Create a client for the named resource type.
    pub fn new(name: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            name: name.into(),
            transport,
        }
    }

    /// The resource type name this client addresses.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fetch the full collection at `{name}?{options}`, or a
    /// server-provided page URL verbatim.
    pub async fn all(&self, params: ListParams) -> Result<Vec<ResourceObject>, ResourceError> {
        let url = match params.url {
            Some(url) => url,
            None => format!("{}?{}", self.name, params.options.serialize()),
        };
        self.fetch_many(&url).await
    }

    /// Fetch a single resource at `{name}/{id}?{options}`.
    ///
    /// An empty `id` produces a malformed URL; that is a caller error
    /// and is not validated here.
    pub async fn find(
        &self,
        id: &str,
        options: QueryOptions,
    ) -> Result<ResourceObject, ResourceError> {
        let url = format!("{}/{}?{}", self.name, id, options.serialize());
        self.fetch_one(&url).await
    }

    /// Fetch the collection matching `filter`, at
    /// `{name}?{filter[k]=v&...}&{options}`. The filter segment always
    /// comes first and the joining `&` is always emitted.
    pub async fn find_where(
        &self,
        filter: FilterSpec,
        options: QueryOptions,
    ) -> Result<Vec<ResourceObject>, ResourceError> {
        let url = format!(
            "{}?{}&{}",
            self.name,
            filter.serialize(),
            options.serialize()
        );
        self.fetch_many(&url).await
    }

    /// Fetch a resource's related data.
    ///
    /// The URL is the parent's server-canonical
    /// `relationships[rel].links.related` when present, otherwise
    /// `{parent.type}/{parent.id}/{rel}`. Returns the raw primary data
    /// because relationship cardinality is the server's call.
    pub async fn related(&self, params: RelatedParams) -> Result<PrimaryData, ResourceError> {
        let relationship = params.relationship.as_deref().unwrap_or(&self.name);
        let base = related_url(&params.parent, relationship);
        let url = format!("{}?{}", base, params.options.serialize());
        debug!("GET {url}");
        let body = self.transport.get(&url).await?;
        Ok(decode_envelope(body)?.data)
    }

    /// Create a resource: POST `{data: {type, attributes?, relationships?}}`
    /// to `{name}?{options}` with the JSON:API content type.
    pub async fn create(&self, params: RecordParams) -> Result<ResourceObject, ResourceError> {
        let record = ResourceObject {
            kind: self.name.clone(),
            id: None,
            attributes: params.attributes,
            relationships: params.relationships,
        };
        let url = format!("{}?{}", self.name, params.options.serialize());
        debug!("POST {url}");
        let body = self
            .transport
            .post(&url, &json!({ "data": record }), &[CONTENT_TYPE])
            .await?;
        require_one(decode_envelope(body)?.data)
    }

    /// Update a resource: PATCH (never PUT, per JSON:API) the partial
    /// document to `{name}/{id}?{options}` with the JSON:API content type.
    pub async fn update(
        &self,
        id: &str,
        params: RecordParams,
    ) -> Result<ResourceObject, ResourceError> {
        let record = ResourceObject {
            kind: self.name.clone(),
            id: Some(id.to_string()),
            attributes: params.attributes,
            relationships: params.relationships,
        };
        let url = format!("{}/{}?{}", self.name, id, params.options.serialize());
        debug!("PATCH {url}");
        let body = self
            .transport
            .patch(&url, &json!({ "data": record }), &[CONTENT_TYPE])
            .await?;
        require_one(decode_envelope(body)?.data)
    }

    /// Delete a resource: DELETE `{name}/{id}`, no body, no query string.
    ///
    /// Returns the transport's raw response body unmodified — delete
    /// responses commonly have no envelope worth decoding.
    pub async fn delete(&self, id: &str) -> Result<Value, ResourceError> {
        let url = format!("{}/{}", self.name, id);
        debug!("DELETE {url}");
        Ok(self.transport.delete(&url).await?)
    }

    async fn fetch_many(&self, url: &str) -> Result<Vec<ResourceObject>, ResourceError> {
        debug!("GET {url}");
        let body = self.transport.get(url).await?;
        decode_envelope(body)?.data.into_many().ok_or_else(|| {
            ResourceError::Decode("expected a resource collection, got a single resource".into())
        })
    }

    async fn fetch_one(&self, url: &str) -> Result<ResourceObject, ResourceError> {
        debug!("GET {url}");
        let body = self.transport.get(url).await?;
        require_one(decode_envelope(body)?.data)
    }
}

/// Resolve the related-collection URL for a parent resource.
///
/// A missing parent id is a caller error and produces a malformed URL.
fn related_url(parent: &ResourceObject, relationship: &str) -> String {
    if let Some(link) = parent
        .relationships
        .as_ref()
        .and_then(|relationships| relationships.get(relationship))
        .and_then(|relationship| relationship.links.as_ref())
        .and_then(|links| links.related.as_ref())
    {
        return link.clone();
    }
    format!(
        "{}/{}/{}",
        parent.kind,
        parent.id.as_deref().unwrap_or_default(),
        relationship
    )
}

fn decode_envelope(body: Value) -> Result<Envelope, ResourceError> {
    serde_json::from_value(body).map_err(|e| ResourceError::Decode(e.to_string()))
}

fn require_one(data: PrimaryData) -> Result<ResourceObject, ResourceError> {
    data.into_one().ok_or_else(|| {
        ResourceError::Decode("expected a single resource, got a collection".into())
    })
}
