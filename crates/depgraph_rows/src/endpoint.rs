//! Endpoint extraction from nested row values.

use crate::row::Udt;
use depgraph_model::Endpoint;

/// Field of the endpoint value holding the service name.
pub const SERVICE_FIELD: &str = "service";

/// Reads the service identity from an endpoint value.
///
/// Returns `None` when the value is absent, or its service name is null,
/// empty, or unreadable. Every other endpoint field is ignored.
pub fn read_endpoint<U: Udt>(endpoint: Option<&U>) -> Option<Endpoint> {
    let service_name = endpoint?.string(SERVICE_FIELD).ok().flatten()?;
    Endpoint::new(service_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::JsonUdt;
    use crate::row::Row;
    use crate::JsonRow;
    use serde_json::json;

    fn udt(value: serde_json::Value) -> Option<JsonUdt> {
        JsonRow::try_from(json!({ "ep": value }))
            .unwrap()
            .udt("ep")
            .unwrap()
    }

    #[test]
    fn absent_value() {
        assert_eq!(read_endpoint::<JsonUdt>(None), None);
        assert_eq!(read_endpoint(udt(json!(null)).as_ref()), None);
    }

    #[test]
    fn null_or_empty_service() {
        assert_eq!(read_endpoint(udt(json!({"service": null})).as_ref()), None);
        assert_eq!(read_endpoint(udt(json!({"service": ""})).as_ref()), None);
        assert_eq!(read_endpoint(udt(json!({"ipv4": "10.0.0.1"})).as_ref()), None);
    }

    #[test]
    fn unreadable_service() {
        assert_eq!(read_endpoint(udt(json!({"service": 42})).as_ref()), None);
    }

    #[test]
    fn keeps_only_service_name() {
        let endpoint = read_endpoint(
            udt(json!({"service": "backend", "ipv4": "10.0.0.1", "port": 9411})).as_ref(),
        );
        assert_eq!(endpoint, Endpoint::new("backend"));
    }
}
