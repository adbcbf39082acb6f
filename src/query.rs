//! Query-string construction
//!
//! Insertion-ordered key/value containers and the serializers that turn
//! them into JSON:API query strings. Values are percent-encoded with the
//! same character class as JavaScript's `encodeURIComponent`.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fmt;

/// `encodeURIComponent` leaves `-_.!~*'()` unescaped besides alphanumerics.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn encode(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// A scalar query-string value.
///
/// Richer values (arrays, objects) are not admitted; callers stringify
/// them first.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{}", n),
            Self::Float(n) => write!(f, "{}", n),
            Self::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        Self::Int(value as i64)
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        Self::Int(value as i64)
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Key/value pairs serialized verbatim into the query string.
///
/// Keys keep their insertion order; setting an existing key replaces its
/// value in place. Keys are emitted as-is, values are percent-encoded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOptions {
    pairs: Vec<(String, QueryValue)>,
}

impl QueryOptions {
    /// Create an empty set of options (serializes to an empty string).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a key, replacing any previous value but keeping its position.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(existing, _)| *existing == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key, value)),
        }
        self
    }

    /// Set a key only when a value is present; `None` is skipped entirely.
    pub fn with_opt<V: Into<QueryValue>>(
        self,
        key: impl Into<String>,
        value: Option<V>,
    ) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Serialize as `key=value&...` in insertion order.
    pub fn serialize(&self) -> String {
        self.pairs
            .iter()
            .map(|(key, value)| format!("{}={}", key, encode(&value.to_string())))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Filter criteria serialized as `filter[key]=value` pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    pairs: Vec<(String, QueryValue)>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter criterion, replacing any previous value for the key.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(existing, _)| *existing == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key, value)),
        }
        self
    }

    /// Serialize as `filter[key]=value&...` in insertion order.
    pub fn serialize(&self) -> String {
        self.pairs
            .iter()
            .map(|(key, value)| format!("filter[{}]={}", key, encode(&value.to_string())))
            .collect::<Vec<_>>()
            .join("&")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_in_insertion_order() {
        let options = QueryOptions::new()
            .with("include", "comments")
            .with("sort", "-created")
            .with("page[size]", 10);
        assert_eq!(
            options.serialize(),
            "include=comments&sort=-created&page[size]=10"
        );
    }

    #[test]
    fn replacing_a_key_keeps_its_position() {
        let options = QueryOptions::new()
            .with("a", 1)
            .with("b", 2)
            .with("a", 3);
        assert_eq!(options.serialize(), "a=3&b=2");
    }

    #[test]
    fn none_values_are_skipped_entirely() {
        let options = QueryOptions::new()
            .with("present", "yes")
            .with_opt("absent", None::<&str>)
            .with_opt("also-present", Some("yes"));
        assert_eq!(options.serialize(), "present=yes&also-present=yes");
    }

    #[test]
    fn empty_options_serialize_to_empty_string() {
        assert_eq!(QueryOptions::new().serialize(), "");
        assert!(QueryOptions::new().is_empty());
    }

    #[test]
    fn values_are_component_encoded() {
        let options = QueryOptions::new().with("q", "a b&c");
        assert_eq!(options.serialize(), "q=a%20b%26c");
    }

    #[test]
    fn unreserved_marks_pass_through() {
        let options = QueryOptions::new().with("q", "!~*'()-_.");
        assert_eq!(options.serialize(), "q=!~*'()-_.");
    }

    #[test]
    fn scalar_values_format_like_javascript() {
        let options = QueryOptions::new()
            .with("limit", 25)
            .with("threshold", 2.5)
            .with("round", 2.0)
            .with("active", true);
        assert_eq!(
            options.serialize(),
            "limit=25&threshold=2.5&round=2&active=true"
        );
    }

    #[test]
    fn filter_uses_bracket_convention() {
        let filter = FilterSpec::new().with("status", "open").with("assignee", "me");
        assert_eq!(filter.serialize(), "filter[status]=open&filter[assignee]=me");
    }

    #[test]
    fn filter_values_are_encoded() {
        let filter = FilterSpec::new().with("title", "a&b");
        assert_eq!(filter.serialize(), "filter[title]=a%26b");
    }

    #[test]
    fn empty_filter_serializes_to_empty_string() {
        assert_eq!(FilterSpec::new().serialize(), "");
    }
}
