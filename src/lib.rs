//! jsonapi-client: a thin client-side JSON:API resource adapter
//!
//! Maps generic resource operations onto HTTP requests with
//! JSON:API-conventional URLs and `{data: ...}` payload envelopes,
//! delegating all I/O to an injected [`Transport`].
//!
//! # Core Concepts
//!
//! - **[`ResourceClient`]**: one client per resource type; builds URLs
//!   and request documents, unwraps response envelopes
//! - **[`Transport`]**: the injected HTTP collaborator; owns timeouts,
//!   retries, auth, and base-URL resolution
//! - **[`QueryOptions`]/[`FilterSpec`]**: insertion-ordered query-string
//!   builders with `encodeURIComponent`-style escaping
//!
//! # Example
//!
//! ```
//! use jsonapi_client::{ListParams, MockTransport, ResourceClient};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), jsonapi_client::ResourceError> {
//! let transport = Arc::new(MockTransport::new().with_response(json!({"data": []})));
//! let posts = ResourceClient::new("posts", transport);
//!
//! let records = posts.all(ListParams::new()).await?;
//! assert!(records.is_empty());
//! # Ok(())
//! # }
//! ```

mod client;
mod document;
mod query;
mod transport;

pub use client::{
    ListParams, RecordParams, RelatedParams, ResourceClient, ResourceError, MEDIA_TYPE,
};
pub use document::{
    Envelope, PrimaryData, Relationship, RelationshipLinks, ResourceIdentifier, ResourceObject,
};
pub use query::{FilterSpec, QueryOptions, QueryValue};
pub use transport::{Method, MockTransport, RecordedRequest, Transport, TransportFailure};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
