//! JSON bodies exchanged with the ordering microservice

use serde::{Deserialize, Serialize};

/// Error text for an address no store delivers to
pub const NO_STORE_ERROR: &str = "no nearby store found";

/// `POST /store-lookup` request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreLookupBody {
    pub address: String,
}

/// `POST /store-lookup` response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreLookupReply {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `POST /place-order` request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderBody {
    pub address: String,
    pub pizza_type: String,
    pub size: String,
}

/// `POST /place-order` response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderReply {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_order_body_is_camel_case() {
        let body = PlaceOrderBody {
            address: "10 Main St".to_string(),
            pizza_type: "pepperoni".to_string(),
            size: "large".to_string(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["pizzaType"], "pepperoni");
        assert!(json.get("pizza_type").is_none());
    }

    #[test]
    fn test_failure_reply_omits_ids() {
        let reply = StoreLookupReply {
            success: false,
            store_id: None,
            error: Some("no nearby store found".to_string()),
        };
        let json = serde_json::to_string(&reply).unwrap();
        assert_eq!(json, r#"{"success":false,"error":"no nearby store found"}"#);
    }

    #[test]
    fn test_minimal_reply_parses() {
        let reply: PlaceOrderReply = serde_json::from_str(r#"{"success":false}"#).unwrap();
        assert!(!reply.success);
        assert!(reply.order_id.is_none());
    }
}
