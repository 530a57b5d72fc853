//! Console rendering of document payloads, e.g. `{name: "Chess Club"}`.

use crate::domain::model::{FieldValue, Fields};
use chrono::SecondsFormat;

pub fn render_fields(fields: &Fields) -> String {
    if fields.is_empty() {
        return "{}".to_string();
    }

    let entries: Vec<String> = fields
        .iter()
        .map(|(key, value)| format!("{}: {}", render_key(key), render_value(value)))
        .collect();
    format!("{{{}}}", entries.join(", "))
}

pub fn render_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Null => "null".to_string(),
        FieldValue::Boolean(b) => b.to_string(),
        FieldValue::Integer(i) => i.to_string(),
        FieldValue::Double(d) => render_double(*d),
        FieldValue::Timestamp(ts) => ts.to_rfc3339_opts(SecondsFormat::Millis, true),
        FieldValue::String(s) => format!("{:?}", s),
        FieldValue::Bytes(b64) => format!("Bytes({:?})", b64),
        FieldValue::Reference(path) => format!("DocumentReference({:?})", path),
        FieldValue::GeoPoint {
            latitude,
            longitude,
        } => format!(
            "GeoPoint {{latitude: {}, longitude: {}}}",
            render_double(*latitude),
            render_double(*longitude)
        ),
        FieldValue::Array(items) => {
            let rendered: Vec<String> = items.iter().map(render_value).collect();
            format!("[{}]", rendered.join(", "))
        }
        FieldValue::Map(fields) => render_fields(fields),
    }
}

fn render_double(d: f64) -> String {
    if d.is_nan() {
        "NaN".to_string()
    } else if d == f64::INFINITY {
        "Infinity".to_string()
    } else if d == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        d.to_string()
    }
}

fn render_key(key: &str) -> String {
    if is_identifier(key) {
        key.to_string()
    } else {
        format!("{:?}", key)
    }
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
