//! Builders for service response envelopes.

use serde_json::{Value, json};

/// Result metadata with the given outcome.
pub fn metadata(success: bool, code: &str, message: &str) -> Value {
    json!({
        "success": if success { "T" } else { "F" },
        "resultCode": code,
        "resultMessage": message,
    })
}

/// A successful envelope: `{tag: {resultMetadata: SUCCESS, ..fields}}`.
pub fn success(tag: &str, fields: Value) -> Value {
    envelope(tag, metadata(true, "SUCCESS", ""), fields)
}

/// A failed envelope carrying whatever partial fields the service included.
pub fn failure(tag: &str, code: &str, message: &str, fields: Value) -> Value {
    envelope(tag, metadata(false, code, message), fields)
}

fn envelope(tag: &str, metadata: Value, fields: Value) -> Value {
    let mut inner = fields.as_object().cloned().unwrap_or_default();
    inner.insert("resultMetadata".to_string(), metadata);
    json!({ tag: inner })
}

pub fn group_json(name: &str, uuid: &str) -> Value {
    let extension = name.rsplit(':').next().unwrap_or(name);
    json!({"name": name, "uuid": uuid, "extension": extension, "displayExtension": extension})
}

pub fn stem_json(name: &str, uuid: &str) -> Value {
    let extension = name.rsplit(':').next().unwrap_or(name);
    json!({"name": name, "uuid": uuid, "extension": extension})
}

/// One entry of an add-member or delete-member result.
pub fn member_entry(subject_id: &str, code: &str) -> Value {
    json!({
        "wsSubject": {"id": subject_id, "sourceId": "ldap"},
        "resultMetadata": {"success": if code.starts_with("SUCCESS") { "T" } else { "F" }, "resultCode": code},
    })
}

/// One entry of a group or stem delete result.
pub fn delete_entry(field: &str, entity: Value, code: &str) -> Value {
    json!({
        field: entity,
        "resultMetadata": {"success": if code.starts_with("SUCCESS") { "T" } else { "F" }, "resultCode": code},
    })
}
