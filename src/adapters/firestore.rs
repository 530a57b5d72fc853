//! Cloud Firestore client over the v1 REST API.
//!
//! A collection is read with a single `documents:runQuery` call, which streams the
//! whole result set back as one JSON array, so no page tokens are involved.

use crate::domain::model::{CollectionRef, Document, FieldValue, Fields, Snapshot};
use crate::domain::ports::{ConfigProvider, DocumentStore};
use crate::utils::error::{Result, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com";
pub const DEFAULT_DATABASE: &str = "(default)";

/// Google APIs accept the key as a header, which keeps it out of URLs.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// 模擬器接受任何 token，官方 SDK 固定送 `owner`。
const EMULATOR_TOKEN: &str = "owner";

pub struct FirestoreClient {
    client: Client,
    documents_url: String,
    api_key: Option<String>,
    bearer_token: Option<String>,
}

impl FirestoreClient {
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_seconds() {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        let (base_url, bearer_token) = match config.emulator_host() {
            Some(host) => {
                tracing::debug!("Using Firestore emulator at {}", host);
                (format!("http://{}", host), Some(EMULATOR_TOKEN.to_string()))
            }
            None => (
                config.base_url().trim_end_matches('/').to_string(),
                config.access_token().map(str::to_string),
            ),
        };

        let documents_url = format!(
            "{}/v1/projects/{}/databases/{}/documents",
            base_url,
            config.project_id(),
            config.database_id()
        );
        tracing::debug!("Firestore documents endpoint: {}", documents_url);

        Ok(Self {
            client,
            documents_url,
            api_key: config.api_key().map(str::to_string),
            bearer_token,
        })
    }

    async fn run_query(&self, collection: &CollectionRef) -> Result<Vec<RunQueryItem>> {
        let body = serde_json::json!({
            "structuredQuery": {
                "from": [{ "collectionId": collection.id() }]
            }
        });

        let mut request = self
            .client
            .post(format!("{}:runQuery", self.documents_url))
            .json(&body);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("runQuery response status: {}", status);

        let bytes = response.bytes().await?;
        if !status.is_success() {
            return Err(error_from_body(status.as_u16(), &bytes));
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl DocumentStore for FirestoreClient {
    async fn get_documents(&self, collection: &CollectionRef) -> Result<Snapshot> {
        let items = self.run_query(collection).await?;

        let mut snapshot = Snapshot::default();
        for item in items {
            // 串流中途的錯誤會以陣列元素回傳
            if let Some(status) = item.error {
                return Err(status.into_error(500));
            }
            if let Some(time) = item.read_time.as_deref() {
                snapshot.read_time = Some(parse_timestamp(time)?);
            }
            if let Some(doc) = item.document {
                snapshot.documents.push(Document::try_from(doc)?);
            }
        }

        Ok(snapshot)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RunQueryItem {
    document: Option<WireDocument>,
    read_time: Option<String>,
    error: Option<WireStatus>,
}

#[derive(Debug, Deserialize)]
struct WireDocument {
    name: String,
    #[serde(default)]
    fields: HashMap<String, WireValue>,
}

#[derive(Debug, Deserialize)]
struct WireStatus {
    #[serde(default)]
    code: Option<u16>,
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

impl WireStatus {
    fn into_error(self, http_status: u16) -> StoreError {
        StoreError::api(
            self.code.unwrap_or(http_status),
            self.status.as_deref(),
            self.message,
        )
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: WireStatus,
}

fn error_from_body(http_status: u16, body: &[u8]) -> StoreError {
    if let Ok(envelope) = serde_json::from_slice::<ErrorEnvelope>(body) {
        return envelope.error.into_error(http_status);
    }
    if let Ok(mut envelopes) = serde_json::from_slice::<Vec<ErrorEnvelope>>(body) {
        if !envelopes.is_empty() {
            return envelopes.swap_remove(0).error.into_error(http_status);
        }
    }

    let text = String::from_utf8_lossy(body).trim().to_string();
    let message = if text.is_empty() {
        format!("HTTP {}", http_status)
    } else {
        text
    };
    StoreError::api(http_status, None, message)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
enum WireValue {
    NullValue(serde_json::Value),
    BooleanValue(bool),
    IntegerValue(String),
    DoubleValue(WireDouble),
    TimestampValue(String),
    StringValue(String),
    BytesValue(String),
    ReferenceValue(String),
    GeoPointValue(WireLatLng),
    ArrayValue(WireArray),
    MapValue(WireMap),
}

/// proto3 JSON 以字串表示非有限浮點數。
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireDouble {
    Number(f64),
    Special(String),
}

#[derive(Debug, Deserialize)]
struct WireLatLng {
    #[serde(default)]
    latitude: f64,
    #[serde(default)]
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct WireArray {
    #[serde(default)]
    values: Vec<WireValue>,
}

#[derive(Debug, Deserialize)]
struct WireMap {
    #[serde(default)]
    fields: HashMap<String, WireValue>,
}

impl TryFrom<WireDocument> for Document {
    type Error = StoreError;

    fn try_from(doc: WireDocument) -> Result<Self> {
        let id = doc
            .name
            .rsplit('/')
            .next()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                StoreError::invalid_document(format!("bad document name '{}'", doc.name))
            })?
            .to_string();

        Ok(Document::new(id, decode_fields(doc.fields)?))
    }
}

fn decode_fields(fields: HashMap<String, WireValue>) -> Result<Fields> {
    fields
        .into_iter()
        .map(|(key, value)| FieldValue::try_from(value).map(|v| (key, v)))
        .collect()
}

impl TryFrom<WireValue> for FieldValue {
    type Error = StoreError;

    fn try_from(value: WireValue) -> Result<Self> {
        let decoded = match value {
            WireValue::NullValue(_) => FieldValue::Null,
            WireValue::BooleanValue(b) => FieldValue::Boolean(b),
            WireValue::IntegerValue(text) => FieldValue::Integer(text.parse().map_err(|_| {
                StoreError::invalid_document(format!("bad integerValue '{}'", text))
            })?),
            WireValue::DoubleValue(WireDouble::Number(d)) => FieldValue::Double(d),
            WireValue::DoubleValue(WireDouble::Special(text)) => {
                FieldValue::Double(match text.as_str() {
                    "NaN" => f64::NAN,
                    "Infinity" => f64::INFINITY,
                    "-Infinity" => f64::NEG_INFINITY,
                    other => other.parse().map_err(|_| {
                        StoreError::invalid_document(format!("bad doubleValue '{}'", other))
                    })?,
                })
            }
            WireValue::TimestampValue(text) => FieldValue::Timestamp(parse_timestamp(&text)?),
            WireValue::StringValue(s) => FieldValue::String(s),
            WireValue::BytesValue(b) => FieldValue::Bytes(b),
            WireValue::ReferenceValue(r) => FieldValue::Reference(r),
            WireValue::GeoPointValue(p) => FieldValue::GeoPoint {
                latitude: p.latitude,
                longitude: p.longitude,
            },
            WireValue::ArrayValue(a) => FieldValue::Array(
                a.values
                    .into_iter()
                    .map(FieldValue::try_from)
                    .collect::<Result<Vec<_>>>()?,
            ),
            WireValue::MapValue(m) => FieldValue::Map(decode_fields(m.fields)?),
        };
        Ok(decoded)
    }
}

fn parse_timestamp(text: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::invalid_document(format!("bad timestamp '{}': {}", text, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn decode(json: serde_json::Value) -> Result<FieldValue> {
        let wire: WireValue = serde_json::from_value(json)?;
        FieldValue::try_from(wire)
    }

    #[test]
    fn test_decode_scalar_values() {
        assert_eq!(
            decode(serde_json::json!({"nullValue": null})).unwrap(),
            FieldValue::Null
        );
        assert_eq!(
            decode(serde_json::json!({"booleanValue": true})).unwrap(),
            FieldValue::Boolean(true)
        );
        assert_eq!(
            decode(serde_json::json!({"integerValue": "42"})).unwrap(),
            FieldValue::Integer(42)
        );
        assert_eq!(
            decode(serde_json::json!({"doubleValue": 2.5})).unwrap(),
            FieldValue::Double(2.5)
        );
        assert_eq!(
            decode(serde_json::json!({"doubleValue": "-Infinity"})).unwrap(),
            FieldValue::Double(f64::NEG_INFINITY)
        );
        assert_eq!(
            decode(serde_json::json!({"stringValue": "Chess Club"})).unwrap(),
            FieldValue::String("Chess Club".to_string())
        );
    }

    #[test]
    fn test_decode_timestamp_and_geopoint() {
        assert_eq!(
            decode(serde_json::json!({"timestampValue": "2024-01-02T03:04:05Z"})).unwrap(),
            FieldValue::Timestamp(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap())
        );
        // proto3 省略為零的欄位
        assert_eq!(
            decode(serde_json::json!({"geoPointValue": {"latitude": 18.5}})).unwrap(),
            FieldValue::GeoPoint {
                latitude: 18.5,
                longitude: 0.0
            }
        );
    }

    #[test]
    fn test_decode_nested_containers() {
        let value = decode(serde_json::json!({
            "mapValue": {"fields": {
                "tags": {"arrayValue": {"values": [{"stringValue": "a"}, {"integerValue": "1"}]}},
                "empty": {"arrayValue": {}},
                "inner": {"mapValue": {}}
            }}
        }))
        .unwrap();

        let FieldValue::Map(fields) = value else {
            panic!("expected map");
        };
        assert_eq!(
            fields["tags"],
            FieldValue::Array(vec![FieldValue::from("a"), FieldValue::Integer(1)])
        );
        assert_eq!(fields["empty"], FieldValue::Array(vec![]));
        assert_eq!(fields["inner"], FieldValue::Map(Fields::new()));
    }

    #[test]
    fn test_decode_rejects_bad_integer() {
        let err = decode(serde_json::json!({"integerValue": "twelve"})).unwrap_err();
        assert!(matches!(err, StoreError::InvalidDocument { .. }));
    }

    #[test]
    fn test_document_id_from_name() {
        let wire: WireDocument = serde_json::from_value(serde_json::json!({
            "name": "projects/demo/databases/(default)/documents/society/a1",
            "fields": {"name": {"stringValue": "Chess Club"}}
        }))
        .unwrap();

        let doc = Document::try_from(wire).unwrap();
        assert_eq!(doc.id, "a1");
        assert_eq!(doc.data["name"], FieldValue::from("Chess Club"));
    }

    #[test]
    fn test_document_without_fields() {
        let wire: WireDocument = serde_json::from_value(serde_json::json!({
            "name": "projects/demo/databases/(default)/documents/society/empty"
        }))
        .unwrap();

        let doc = Document::try_from(wire).unwrap();
        assert_eq!(doc.id, "empty");
        assert!(doc.data.is_empty());
    }

    #[test]
    fn test_error_from_body_variants() {
        let body = br#"{"error":{"code":403,"message":"Missing or insufficient permissions.","status":"PERMISSION_DENIED"}}"#;
        let err = error_from_body(403, body);
        assert_eq!(
            err.to_string(),
            "permission-denied: Missing or insufficient permissions."
        );

        let body = br#"[{"error":{"code":400,"message":"bad query","status":"INVALID_ARGUMENT"}}]"#;
        assert_eq!(error_from_body(400, body).code(), "invalid-argument");

        let err = error_from_body(502, b"Bad Gateway");
        assert_eq!(err.to_string(), "unknown: Bad Gateway");

        let err = error_from_body(401, b"");
        assert_eq!(err.to_string(), "unauthenticated: HTTP 401");
    }
}
