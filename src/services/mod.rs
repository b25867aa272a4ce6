pub mod shop_service;
pub mod user_service;

use crate::database::InsertOutcome;
use crate::models::bson_to_json;

/// Result of a create-if-absent request.
#[derive(Debug)]
pub enum CreateOutcome {
    Created(InsertOutcome),
    AlreadyExists,
}

impl CreateOutcome {
    /// Body sent to the client: the insert result, or a `null` insertedId and
    /// `already_exists` as message when nothing was written.
    pub fn into_json(self, already_exists: &str) -> serde_json::Value {
        match self {
            CreateOutcome::Created(outcome) => serde_json::json!({
                "acknowledged": true,
                "insertedId": bson_to_json(outcome.inserted_id)
            }),
            CreateOutcome::AlreadyExists => serde_json::json!({
                "message": already_exists,
                "insertedId": null
            }),
        }
    }
}
