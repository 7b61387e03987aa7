//! Status envelope and the success payload wrapper.
//!
//! Every response from the lvlup API carries an [`Envelope`]: the numeric
//! status, its reason phrase and the URL that produced it. Successful calls
//! hand the decoded body back inside an [`ApiResponse`] together with that
//! envelope.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// `{statusCode, statusText, source}` triple attached to every response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    /// HTTP status code
    pub status_code: u16,
    /// Reason phrase of the status code
    pub status_text: String,
    /// Full request URL, including the query string
    pub source: String,
}

impl Envelope {
    /// Build an envelope from a status and the request URL.
    #[must_use]
    pub fn new(status: StatusCode, source: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            source: source.into(),
        }
    }

    /// Returns true for the only status the API treats as success.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status_code == 200
    }

    fn decorate(&self, object: &mut Map<String, Value>) {
        object.insert("statusCode".to_string(), Value::from(self.status_code));
        object.insert(
            "statusText".to_string(),
            Value::from(self.status_text.clone()),
        );
        object.insert("source".to_string(), Value::from(self.source.clone()));
    }
}

/// Successful API call: decoded payload plus its status envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    /// Decoded response body
    pub data: T,
    /// Status envelope of the request
    pub envelope: Envelope,
    /// Human-readable note added by the client for some endpoints
    pub info: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Wrap a payload with its envelope.
    #[must_use]
    pub const fn new(data: T, envelope: Envelope) -> Self {
        Self {
            data,
            envelope,
            info: None,
        }
    }

    /// Attach an informational note.
    #[must_use]
    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }

    /// Transform the payload while keeping envelope and note.
    pub fn map<U, F>(self, f: F) -> ApiResponse<U>
    where
        F: FnOnce(T) -> U,
    {
        ApiResponse {
            data: f(self.data),
            envelope: self.envelope,
            info: self.info,
        }
    }

    /// Consume the response, returning the payload only.
    pub fn into_data(self) -> T {
        self.data
    }
}

impl<T: Serialize> ApiResponse<T> {
    /// Render the response in the decorated JSON form.
    ///
    /// Object payloads get `statusCode`, `statusText`, `source` (and `info`)
    /// merged in. Any other payload is placed under `data`; a unit payload
    /// yields the envelope fields alone.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be serialized.
    pub fn into_json(self) -> Result<Value> {
        let mut object = match serde_json::to_value(&self.data)? {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("data".to_string(), other);
                map
            }
        };

        if let Some(info) = self.info {
            object.insert("info".to_string(), Value::from(info));
        }
        self.envelope.decorate(&mut object);

        Ok(Value::Object(object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ok_envelope() -> Envelope {
        Envelope::new(StatusCode::OK, "https://api.lvlup.pro/v4/wallet")
    }

    #[test]
    fn envelope_uses_canonical_reason() {
        let envelope = Envelope::new(StatusCode::NOT_FOUND, "https://x.test/a");
        assert_eq!(envelope.status_code, 404);
        assert_eq!(envelope.status_text, "Not Found");
        assert!(!envelope.is_ok());
        assert!(ok_envelope().is_ok());
    }

    #[test]
    fn envelope_serializes_camel_case() {
        let json = serde_json::to_value(ok_envelope()).unwrap();
        assert_eq!(
            json,
            json!({
                "statusCode": 200,
                "statusText": "OK",
                "source": "https://api.lvlup.pro/v4/wallet"
            })
        );
    }

    #[test]
    fn into_json_merges_envelope_into_object() {
        let response = ApiResponse::new(
            json!({"balancePlnInt": 1337, "balancePlnFormatted": "13.37"}),
            ok_envelope(),
        );
        let json = response.into_json().unwrap();

        assert_eq!(json["balancePlnInt"], 1337);
        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["statusText"], "OK");
        assert_eq!(json["source"], "https://api.lvlup.pro/v4/wallet");
        assert!(json.get("info").is_none());
    }

    #[test]
    fn into_json_wraps_arrays_and_keeps_info() {
        let response = ApiResponse::new(json!([{"id": 1}]), ok_envelope()).with_info("Done!");
        let json = response.into_json().unwrap();

        assert_eq!(json["data"][0]["id"], 1);
        assert_eq!(json["info"], "Done!");
        assert_eq!(json["statusCode"], 200);
    }

    #[test]
    fn into_json_unit_payload_is_bare_envelope() {
        let json = ApiResponse::new((), ok_envelope()).into_json().unwrap();
        assert_eq!(json, serde_json::to_value(ok_envelope()).unwrap());
    }

    #[test]
    fn map_keeps_envelope() {
        let response = ApiResponse::new(2_u32, ok_envelope()).with_info("note");
        let mapped = response.map(|value| value * 2);
        assert_eq!(mapped.data, 4);
        assert_eq!(mapped.info.as_deref(), Some("note"));
        assert_eq!(mapped.envelope, ok_envelope());
    }
}
