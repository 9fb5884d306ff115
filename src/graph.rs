//! graph api wire types
//!
//! serde models for the error and paging envelopes returned by the graph api.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// structured error detail from an `{"error": {...}}` or `{type, message}` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphErrorDetail {
    /// error message
    #[serde(default)]
    pub message: String,
    /// error type, e.g. `OAuthException`
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    /// numeric error code
    #[serde(default)]
    pub code: Option<i64>,
    /// numeric error subcode
    #[serde(default)]
    pub error_subcode: Option<i64>,
    /// title suitable for end users
    #[serde(default)]
    pub error_user_title: Option<String>,
    /// message suitable for end users
    #[serde(default)]
    pub error_user_msg: Option<String>,
    /// trace id for facebook support
    #[serde(default)]
    pub fbtrace_id: Option<String>,
}

impl GraphErrorDetail {
    /// extract the error detail from a parsed response body
    ///
    /// graph-style bodies nest the detail under `error`; older rest-style
    /// bodies put `type` and `message` at the top level.
    pub fn from_body(body: &Value) -> Option<Self> {
        let object = body.as_object()?;
        match object.get("error") {
            Some(Value::Object(_)) => Some(Self::lenient(&object["error"])),
            Some(Value::String(message)) => Some(Self::from_message(message.clone())),
            Some(_) => Some(Self::from_message("unknown error".to_string())),
            None if object.contains_key("type") && object.contains_key("message") => {
                Some(Self::lenient(body))
            }
            None => None,
        }
    }

    /// typed decode, falling back to field-by-field reads when a field has
    /// an unexpected type (e.g. `code` as a string or `message: null`)
    fn lenient(detail: &Value) -> Self {
        if let Ok(parsed) = serde_json::from_value(detail.clone()) {
            return parsed;
        }

        let text = |key: &str| detail.get(key).and_then(Value::as_str).map(str::to_string);
        let number = |key: &str| match detail.get(key) {
            Some(Value::Number(n)) => n.as_i64(),
            Some(Value::String(s)) => s.parse().ok(),
            _ => None,
        };
        let message = match detail.get("message") {
            Some(Value::String(message)) => message.clone(),
            Some(Value::Null) | None => "unknown error".to_string(),
            Some(other) => other.to_string(),
        };

        Self {
            message,
            error_type: text("type"),
            code: number("code"),
            error_subcode: number("error_subcode"),
            error_user_title: text("error_user_title"),
            error_user_msg: text("error_user_msg"),
            fbtrace_id: text("fbtrace_id"),
        }
    }

    fn from_message(message: String) -> Self {
        Self {
            message,
            error_type: None,
            code: None,
            error_subcode: None,
            error_user_title: None,
            error_user_msg: None,
            fbtrace_id: None,
        }
    }
}

/// cursor urls from a list envelope's `paging` field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingCursors {
    /// url of the next page
    #[serde(default)]
    pub next: Option<String>,
    /// url of the previous page
    #[serde(default)]
    pub previous: Option<String>,
}

impl PagingCursors {
    /// read cursors from a `paging` value, tolerating a missing or odd shape
    pub fn from_paging(paging: Option<&Value>) -> Self {
        paging
            .and_then(|paging| serde_json::from_value(paging.clone()).ok())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_error_detail() {
        let body = json!({
            "error": {
                "message": "(#803) Some of the aliases you requested do not exist",
                "type": "OAuthException",
                "code": 803,
                "error_subcode": 33
            }
        });
        let detail = GraphErrorDetail::from_body(&body).unwrap();
        assert_eq!(detail.code, Some(803));
        assert_eq!(detail.error_subcode, Some(33));
        assert!(detail.message.starts_with("(#803)"));
    }

    #[test]
    fn test_rest_style_error_detail() {
        let body = json!({"type": "OAuthException", "message": "expired"});
        let detail = GraphErrorDetail::from_body(&body).unwrap();
        assert_eq!(detail.error_type.as_deref(), Some("OAuthException"));
        assert_eq!(detail.message, "expired");
    }

    #[test]
    fn test_string_error_detail() {
        let detail = GraphErrorDetail::from_body(&json!({"error": "nope"})).unwrap();
        assert_eq!(detail.message, "nope");
        assert!(detail.error_type.is_none());
    }

    #[test]
    fn test_error_detail_with_odd_field_types() {
        let detail =
            GraphErrorDetail::from_body(&json!({"error": {"message": "bad token", "code": "190"}}))
                .unwrap();
        assert_eq!(detail.message, "bad token");
        assert_eq!(detail.code, Some(190));

        let detail = GraphErrorDetail::from_body(
            &json!({"error": {"message": null, "type": "OAuthException"}}),
        )
        .unwrap();
        assert_eq!(detail.message, "unknown error");
        assert_eq!(detail.error_type.as_deref(), Some("OAuthException"));

        let detail =
            GraphErrorDetail::from_body(&json!({"type": "OAuthException", "message": 5})).unwrap();
        assert_eq!(detail.message, "5");
        assert_eq!(detail.error_type.as_deref(), Some("OAuthException"));
    }

    #[test]
    fn test_no_error_detail() {
        assert!(GraphErrorDetail::from_body(&json!({"id": "1"})).is_none());
        assert!(GraphErrorDetail::from_body(&json!({"message": "only"})).is_none());
        assert!(GraphErrorDetail::from_body(&json!([1, 2])).is_none());
    }

    #[test]
    fn test_paging_cursors() {
        let paging = json!({"next": "https://n", "cursors": {"after": "x"}});
        let cursors = PagingCursors::from_paging(Some(&paging));
        assert_eq!(cursors.next.as_deref(), Some("https://n"));
        assert!(cursors.previous.is_none());

        assert_eq!(PagingCursors::from_paging(None), PagingCursors::default());
        assert_eq!(
            PagingCursors::from_paging(Some(&json!("garbage"))),
            PagingCursors::default()
        );
    }
}
