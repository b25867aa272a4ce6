use mongodb::bson::{self, Bson, Document};
use serde_json::Value;

/// Converts a stored document into the JSON shape returned to clients.
///
/// ObjectIds (including `_id`) are rendered as plain hex strings; everything
/// else follows relaxed extended JSON.
pub fn document_to_json(doc: Document) -> Value {
    bson_to_json(Bson::Document(doc))
}

pub fn documents_to_json(docs: Vec<Document>) -> Vec<Value> {
    docs.into_iter().map(document_to_json).collect()
}

pub fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::Document(doc) => Value::Object(
            doc.into_iter()
                .map(|(key, value)| (key, bson_to_json(value)))
                .collect(),
        ),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}

/// Converts a request body into a document ready for insertion.
///
/// Only JSON objects are accepted; any other JSON value is rejected.
pub fn json_to_document(value: &Value) -> Result<Document, String> {
    if !value.is_object() {
        return Err("request body must be a JSON object".to_string());
    }

    bson::to_document(value).map_err(|e| format!("request body is not a valid document: {}", e))
}

/// Value of `field` used as a lookup key. A missing field looks up `null`,
/// which the store matches against documents lacking the field.
pub fn lookup_key(doc: &Document, field: &str) -> Bson {
    doc.get(field).cloned().unwrap_or(Bson::Null)
}
