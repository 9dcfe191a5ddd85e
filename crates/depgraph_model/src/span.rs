//! Span data model.
//!
//! A [`Span`] is the canonical record handed to dependency aggregation.
//! It is only constructed through [`SpanBuilder`], which normalizes ids and
//! rejects records that cannot be linked.

use crate::endpoint::Endpoint;
use crate::error::{Error, Result, UnknownKind};
use crate::id::{normalize_parent_id, normalize_span_id, normalize_trace_id};
use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::debug;

/// The role of a span in a request or message exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Kind {
    /// Making a synchronous request to a server.
    Client,
    /// Handling a synchronous request from a client.
    Server,
    /// Initiating an asynchronous message.
    Producer,
    /// Handling an asynchronous message.
    Consumer,
}

impl Kind {
    /// All known kinds.
    pub const ALL: [Self; 4] = [Self::Client, Self::Server, Self::Producer, Self::Consumer];

    /// The stored name of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Client => "CLIENT",
            Self::Server => "SERVER",
            Self::Producer => "PRODUCER",
            Self::Consumer => "CONSUMER",
        }
    }
}

impl FromStr for Kind {
    type Err = UnknownKind;

    /// Parses an exact, case-sensitive kind name.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// A canonical span. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Span {
    trace_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_id: Option<String>,
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<Kind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    local_endpoint: Option<Endpoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    remote_endpoint: Option<Endpoint>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    tags: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "is_false")]
    shared: bool,
}

impl Span {
    /// Starts building a span.
    #[must_use]
    pub fn builder() -> SpanBuilder {
        SpanBuilder::default()
    }

    /// Lower-hex trace id, 16 or 32 characters.
    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    /// Lower-hex parent span id, if any.
    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    /// Lower-hex span id, 16 characters.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The span kind, if known.
    pub const fn kind(&self) -> Option<Kind> {
        self.kind
    }

    /// Start time in epoch microseconds.
    pub const fn timestamp(&self) -> Option<u64> {
        self.timestamp
    }

    /// Whether the span id is shared with the client side.
    pub const fn shared(&self) -> bool {
        self.shared
    }

    /// Span tags.
    pub const fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    /// The service that recorded the span.
    pub const fn local_endpoint(&self) -> Option<&Endpoint> {
        self.local_endpoint.as_ref()
    }

    /// The peer service, if recorded.
    pub const fn remote_endpoint(&self) -> Option<&Endpoint> {
        self.remote_endpoint.as_ref()
    }

    /// Returns true if this is a root span (no parent).
    pub const fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Builds a [`Span`], validating ids as they are set.
///
/// Id validation failures are kept until [`SpanBuilder::build`] so calls
/// can be chained.
#[derive(Debug, Default)]
pub struct SpanBuilder {
    trace_id: Option<String>,
    parent_id: Option<String>,
    id: Option<String>,
    kind: Option<Kind>,
    timestamp: Option<u64>,
    local_endpoint: Option<Endpoint>,
    remote_endpoint: Option<Endpoint>,
    tags: BTreeMap<String, String>,
    shared: bool,
    error: Option<Error>,
}

impl SpanBuilder {
    /// Sets the trace id, normalizing it to 16 or 32 lower-hex characters.
    #[must_use]
    pub fn with_trace_id(mut self, trace_id: &str) -> Self {
        self.trace_id = self.check(normalize_trace_id(trace_id));
        self
    }

    /// Sets the parent span id. An all-zero id clears it.
    #[must_use]
    pub fn with_parent_id(mut self, parent_id: &str) -> Self {
        self.parent_id = self.check(normalize_parent_id(parent_id)).flatten();
        self
    }

    /// Sets the span id.
    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = self.check(normalize_span_id(id));
        self
    }

    /// Sets the span kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: Kind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Sets the start time in epoch microseconds. Non-positive values unset it.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = u64::try_from(timestamp).ok().filter(|&ts| ts > 0);
        self
    }

    /// Sets the shared flag.
    #[must_use]
    pub const fn with_shared(mut self, shared: bool) -> Self {
        self.shared = shared;
        self
    }

    /// Sets the local endpoint.
    #[must_use]
    pub fn with_local_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.local_endpoint = Some(endpoint);
        self
    }

    /// Sets the remote endpoint.
    #[must_use]
    pub fn with_remote_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.remote_endpoint = Some(endpoint);
        self
    }

    /// Adds a tag, replacing any previous value for the key.
    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Builds the span.
    ///
    /// A parent id equal to the span id is dropped, and the shared flag is
    /// dropped on client spans.
    ///
    /// # Errors
    ///
    /// Returns the first id validation error, or `Error::MissingField` if
    /// the trace id or span id was never set.
    pub fn build(self) -> Result<Span> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let trace_id = self.trace_id.ok_or(Error::MissingField("traceId"))?;
        let id = self.id.ok_or(Error::MissingField("id"))?;

        let mut parent_id = self.parent_id;
        if parent_id.as_deref() == Some(id.as_str()) {
            debug!(trace_id = %trace_id, span_id = %id, "undoing circular parent reference");
            parent_id = None;
        }

        let mut shared = self.shared;
        if shared && self.kind == Some(Kind::Client) {
            debug!(trace_id = %trace_id, span_id = %id, "removing shared flag on client span");
            shared = false;
        }

        Ok(Span {
            trace_id,
            parent_id,
            id,
            kind: self.kind,
            timestamp: self.timestamp,
            local_endpoint: self.local_endpoint,
            remote_endpoint: self.remote_endpoint,
            tags: self.tags,
            shared,
        })
    }

    /// Keeps the first validation error and passes successes through.
    fn check<T>(&mut self, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.error.get_or_insert(error);
                None
            }
        }
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_false(value: &bool) -> bool {
    !*value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> SpanBuilder {
        Span::builder()
            .with_trace_id("463ac35c9f6413ad")
            .with_id("a2fb4a1d1a96d312")
    }

    #[test]
    fn kind_parses_exact_names() {
        for kind in Kind::ALL {
            assert_eq!(kind.as_str().parse::<Kind>(), Ok(kind));
        }
    }

    #[test]
    fn kind_rejects_other_names() {
        assert_eq!("client".parse::<Kind>(), Err(UnknownKind("client".to_string())));
        assert_eq!("RPC".parse::<Kind>(), Err(UnknownKind("RPC".to_string())));
        assert!("".parse::<Kind>().is_err());
    }

    #[test]
    fn span_builder() {
        let span = minimal()
            .with_parent_id("1")
            .with_kind(Kind::Server)
            .with_timestamp(1_472_470_996_199_000)
            .with_local_endpoint(Endpoint::new("frontend").unwrap())
            .with_tag("error", "boom")
            .build()
            .unwrap();

        assert_eq!(span.trace_id(), "463ac35c9f6413ad");
        assert_eq!(span.id(), "a2fb4a1d1a96d312");
        assert_eq!(span.parent_id(), Some("0000000000000001"));
        assert_eq!(span.kind(), Some(Kind::Server));
        assert_eq!(span.timestamp(), Some(1_472_470_996_199_000));
        assert_eq!(span.local_endpoint().map(Endpoint::service_name), Some("frontend"));
        assert_eq!(span.remote_endpoint(), None);
        assert_eq!(span.tags().get("error").map(String::as_str), Some("boom"));
        assert!(!span.is_root());
    }

    #[test]
    fn missing_id_fails() {
        let result = Span::builder().with_trace_id("463ac35c9f6413ad").build();
        assert!(matches!(result, Err(Error::MissingField("id"))));
    }

    #[test]
    fn missing_trace_id_fails() {
        let result = Span::builder().with_id("a2fb4a1d1a96d312").build();
        assert!(matches!(result, Err(Error::MissingField("traceId"))));
    }

    #[test]
    fn first_invalid_id_reported() {
        let result = Span::builder()
            .with_trace_id("not-hex")
            .with_id("0")
            .build();
        assert!(matches!(
            result,
            Err(Error::InvalidId { field: "traceId", .. })
        ));
    }

    #[test]
    fn invalid_parent_fails() {
        let result = minimal().with_parent_id("zz").build();
        assert!(matches!(
            result,
            Err(Error::InvalidId { field: "parentId", .. })
        ));
    }

    #[test]
    fn zero_parent_is_root() {
        let span = minimal().with_parent_id("0000000000000000").build().unwrap();
        assert!(span.is_root());
    }

    #[test]
    fn circular_parent_dropped() {
        let span = minimal().with_parent_id("a2fb4a1d1a96d312").build().unwrap();
        assert_eq!(span.parent_id(), None);
    }

    #[test]
    fn shared_dropped_on_client() {
        let client = minimal()
            .with_kind(Kind::Client)
            .with_shared(true)
            .build()
            .unwrap();
        let server = minimal()
            .with_kind(Kind::Server)
            .with_shared(true)
            .build()
            .unwrap();

        assert!(!client.shared());
        assert!(server.shared());
    }

    #[test]
    fn non_positive_timestamp_unset() {
        assert_eq!(minimal().with_timestamp(0).build().unwrap().timestamp(), None);
        assert_eq!(minimal().with_timestamp(-5).build().unwrap().timestamp(), None);
    }

    #[test]
    fn serializes_minimal_span() {
        let span = minimal().build().unwrap();
        let json = serde_json::to_string(&span).unwrap();
        assert_eq!(json, r#"{"traceId":"463ac35c9f6413ad","id":"a2fb4a1d1a96d312"}"#);
    }

    #[test]
    fn serializes_full_span() {
        let span = minimal()
            .with_parent_id("1")
            .with_kind(Kind::Server)
            .with_timestamp(1_472_470_996_199_000)
            .with_shared(true)
            .with_local_endpoint(Endpoint::new("frontend").unwrap())
            .with_remote_endpoint(Endpoint::new("backend").unwrap())
            .with_tag("error", "boom")
            .build()
            .unwrap();

        insta::assert_json_snapshot!(span, @r#"
        {
          "traceId": "463ac35c9f6413ad",
          "parentId": "0000000000000001",
          "id": "a2fb4a1d1a96d312",
          "kind": "SERVER",
          "timestamp": 1472470996199000,
          "localEndpoint": {
            "serviceName": "frontend"
          },
          "remoteEndpoint": {
            "serviceName": "backend"
          },
          "tags": {
            "error": "boom"
          },
          "shared": true
        }
        "#);
    }
}
