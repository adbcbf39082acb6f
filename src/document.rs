//! JSON:API document types
//!
//! Serde models of the wire shapes the client produces and consumes.
//! Optional members are absent from serialized output, never null.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Identifies a single resource instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    /// The resource type name (serialized as `type`)
    #[serde(rename = "type")]
    pub kind: String,
    /// The resource id
    pub id: String,
}

impl ResourceIdentifier {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
        }
    }
}

/// A resource object as sent to and received from the server.
///
/// Only the members the client actually handles are modeled; incoming
/// `links`/`meta` members are ignored on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceObject {
    /// The resource type name (serialized as `type`)
    #[serde(rename = "type")]
    pub kind: String,
    /// Server-assigned id; absent on create requests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Attribute members, arbitrary JSON values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Map<String, Value>>,
    /// Named relationships to other resources
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationships: Option<BTreeMap<String, Relationship>>,
}

impl ResourceObject {
    /// Create a resource object of the given type with no other members.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set one attribute, creating the attributes map if needed.
    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes
            .get_or_insert_with(Map::new)
            .insert(key.into(), value);
        self
    }

    /// Set one relationship, creating the relationships map if needed.
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
}

/// Describes a related resource or collection.
///
/// `data` is opaque to the client — a single identifier, an array of
/// identifiers, or null, depending on relationship cardinality.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<RelationshipLinks>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Relationship {
    /// A relationship carrying only a server-canonical related link.
    pub fn related_link(url: impl Into<String>) -> Self {
        Self {
            links: Some(RelationshipLinks {
                related: Some(url.into()),
                ..RelationshipLinks::default()
            }),
            data: None,
        }
    }

    /// A relationship carrying only linkage data.
    pub fn data(data: Value) -> Self {
        Self {
            links: None,
            data: Some(data),
        }
    }
}

/// Link members a server may attach to a relationship.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationshipLinks {
    #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    /// Canonical URL for fetching the related collection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related: Option<String>,
}

/// The top-level `{data: ...}` wrapper on responses and write requests.
///
/// Top-level `meta`, `links`, and `included` members are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub data: PrimaryData,
}

/// Primary data of an envelope: one resource or a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimaryData {
    Many(Vec<ResourceObject>),
    One(ResourceObject),
}

impl PrimaryData {
    /// The single resource, if this is single-resource data.
    pub fn into_one(self) -> Option<ResourceObject> {
        match self {
            Self::One(resource) => Some(resource),
            Self::Many(_) => None,
        }
    }

    /// The collection, if this is collection data.
    pub fn into_many(self) -> Option<Vec<ResourceObject>> {
        match self {
            Self::Many(resources) => Some(resources),
            Self::One(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_resource_serializes_type_only() {
        let record = ResourceObject::new("posts");
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"type": "posts"})
        );
    }

    #[test]
    fn absent_members_are_omitted_not_null() {
        let record = ResourceObject::new("posts").with_attribute("title", json!("Hi"));
        let serialized = serde_json::to_value(&record).unwrap();
        assert_eq!(
            serialized,
            json!({"type": "posts", "attributes": {"title": "Hi"}})
        );
        let object = serialized.as_object().unwrap();
        assert!(!object.contains_key("id"));
        assert!(!object.contains_key("relationships"));
    }

    #[test]
    fn deserializes_resource_with_unknown_members() {
        let record: ResourceObject = serde_json::from_value(json!({
            "type": "posts",
            "id": "1",
            "attributes": {"title": "Hi"},
            "links": {"self": "posts/1"},
            "meta": {"revision": 3}
        }))
        .unwrap();
        assert_eq!(record.kind, "posts");
        assert_eq!(record.id.as_deref(), Some("1"));
    }

    #[test]
    fn envelope_distinguishes_one_from_many() {
        let single: Envelope =
            serde_json::from_value(json!({"data": {"type": "posts", "id": "1"}})).unwrap();
        assert!(matches!(single.data, PrimaryData::One(_)));

        let collection: Envelope =
            serde_json::from_value(json!({"data": [{"type": "posts", "id": "1"}]})).unwrap();
        assert!(matches!(collection.data, PrimaryData::Many(_)));

        let empty: Envelope = serde_json::from_value(json!({"data": []})).unwrap();
        assert_eq!(empty.data.into_many().unwrap().len(), 0);
    }

    #[test]
    fn relationship_related_link_serializes_links_only() {
        let relationship = Relationship::related_link("custom/url");
        let serialized = serde_json::to_value(&relationship).unwrap();
        assert_eq!(serialized, json!({"links": {"related": "custom/url"}}));
    }

    #[test]
    fn identifier_serializes_as_linkage_data() {
        let author = ResourceIdentifier::new("people", "9");
        let relationship = Relationship::data(serde_json::to_value(&author).unwrap());
        assert_eq!(
            serde_json::to_value(&relationship).unwrap(),
            json!({"data": {"type": "people", "id": "9"}})
        );
    }
}
