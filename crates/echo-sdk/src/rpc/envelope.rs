//! JSON envelopes of the socket protocol

use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};

use crate::SdkError;

/// Serialize a `call` request
pub fn encode_request(call_id: u64, api_id: u64, method: &str, params: Value) -> String {
    json!({
        "id": call_id,
        "method": "call",
        "params": [api_id, method, params],
    })
    .to_string()
}

/// Unsolicited push from the node
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    /// Callback id the notice was registered under
    pub callback_id: u64,
    /// Notice body
    pub payload: Value,
}

/// A parsed inbound frame
#[derive(Debug)]
pub enum Inbound {
    /// Response to a call
    Response {
        /// Call id
        id: u64,
        /// `result`, or the node error
        outcome: Result<Value, SdkError>,
    },
    /// Push notification
    Notice(Notice),
}

#[derive(Deserialize)]
struct RawFrame {
    id: Option<u64>,
    method: Option<String>,
    params: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    result: Option<Value>,
    error: Option<RawError>,
}

#[derive(Deserialize)]
struct RawError {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

/// Distinguishes `"result": null` (Some(Null)) from a missing member (None)
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// Parse an inbound text frame.
///
/// A frame that carries a call id but is otherwise malformed still yields a
/// [`Inbound::Response`] with a decode error, so the call it answers fails
/// instead of waiting forever.
pub fn parse_inbound(text: &str) -> Result<Inbound, SdkError> {
    let value: Value = serde_json::from_str(text)?;
    let frame = match RawFrame::deserialize(&value) {
        Ok(frame) => frame,
        Err(e) => {
            let is_notice = value.get("method").and_then(Value::as_str) == Some("notice");
            return match value.get("id").and_then(Value::as_u64) {
                Some(id) if !is_notice => Ok(Inbound::Response {
                    id,
                    outcome: Err(SdkError::Decode(format!("malformed response {id}: {e}"))),
                }),
                _ => Err(e.into()),
            };
        }
    };

    if frame.method.as_deref() == Some("notice") {
        let params = frame
            .params
            .ok_or_else(|| SdkError::Decode("notice without params".to_string()))?;
        return parse_notice(params).map(Inbound::Notice);
    }

    let id = frame
        .id
        .ok_or_else(|| SdkError::Decode("frame is neither a response nor a notice".to_string()))?;

    let outcome = match (frame.error, frame.result) {
        (Some(error), _) => Err(SdkError::Rpc {
            code: error.code,
            message: error.message,
            data: error.data,
        }),
        (None, Some(result)) => Ok(result),
        (None, None) => Err(SdkError::Decode(format!("response {id} has no result"))),
    };
    Ok(Inbound::Response { id, outcome })
}

fn parse_notice(params: Value) -> Result<Notice, SdkError> {
    let mut parts = match params {
        Value::Array(parts) if parts.len() == 2 => parts,
        other => {
            return Err(SdkError::Decode(format!(
                "notice params must be [callback_id, payload], got {other}"
            )))
        }
    };
    let payload = parts.pop().unwrap_or(Value::Null);
    let callback_id = parts
        .pop()
        .and_then(|id| id.as_u64())
        .ok_or_else(|| SdkError::Decode("notice callback id is not an integer".to_string()))?;
    Ok(Notice {
        callback_id,
        payload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_request() {
        let frame: Value =
            serde_json::from_str(&encode_request(7, 2, "get_objects", json!([["1.2.5"]]))).unwrap();
        assert_eq!(frame, json!({"id": 7, "method": "call", "params": [2, "get_objects", [["1.2.5"]]]}));
    }

    #[test]
    fn test_parse_result() {
        match parse_inbound(r#"{"id":3,"jsonrpc":"2.0","result":"abc"}"#).unwrap() {
            Inbound::Response { id, outcome } => {
                assert_eq!(id, 3);
                assert_eq!(outcome.unwrap(), json!("abc"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_null_result_is_present() {
        match parse_inbound(r#"{"id":4,"result":null}"#).unwrap() {
            Inbound::Response { outcome, .. } => assert_eq!(outcome.unwrap(), Value::Null),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_missing_result_fails() {
        match parse_inbound(r#"{"id":5}"#).unwrap() {
            Inbound::Response { outcome, .. } => {
                assert!(matches!(outcome, Err(SdkError::Decode(_))))
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_parse_error() {
        let text = r#"{"id":6,"error":{"code":1,"message":"missing required active authority","data":{"code":3030001,"name":"tx_missing_active_auth","message":"missing required active authority"}}}"#;
        match parse_inbound(text).unwrap() {
            Inbound::Response {
                outcome: Err(SdkError::Rpc { code, message, data }),
                ..
            } => {
                assert_eq!(code, 1);
                assert_eq!(message, "missing required active authority");
                assert_eq!(data.unwrap()["name"], "tx_missing_active_auth");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_parse_notice() {
        let text = r#"{"method":"notice","params":[12,[[{"id":"2.1.0"}]]]}"#;
        match parse_inbound(text).unwrap() {
            Inbound::Notice(notice) => {
                assert_eq!(notice.callback_id, 12);
                assert_eq!(notice.payload[0][0]["id"], "2.1.0");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_malformed_response_keeps_id() {
        for text in [
            r#"{"id":8,"error":{"code":1}}"#,
            r#"{"id":8,"error":"boom"}"#,
            r#"{"id":8,"method":7,"result":true}"#,
        ] {
            match parse_inbound(text).unwrap() {
                Inbound::Response { id, outcome } => {
                    assert_eq!(id, 8);
                    assert!(matches!(outcome, Err(SdkError::Decode(_))), "{text}");
                }
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn test_malformed_frames() {
        assert!(parse_inbound("not json").is_err());
        assert!(parse_inbound(r#"{"method":"notice","params":[1]}"#).is_err());
        assert!(parse_inbound(r#"{"method":"notice","params":["x", []]}"#).is_err());
        assert!(parse_inbound(r#"{"result":1}"#).is_err());
    }
}
