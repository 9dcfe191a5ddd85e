//! Endpoint data model.

use serde::Serialize;

/// The service identity on one side of a span.
///
/// Only the service name is kept; addresses and ports play no part in
/// dependency linking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    service_name: String,
}

impl Endpoint {
    /// Creates an endpoint, or `None` if the service name is empty.
    #[must_use]
    pub fn new(service_name: impl Into<String>) -> Option<Self> {
        let service_name = service_name.into();
        if service_name.is_empty() {
            return None;
        }
        Some(Self { service_name })
    }

    /// The service name. Never empty.
    pub fn service_name(&self) -> &str {
        &self.service_name
    }
}
