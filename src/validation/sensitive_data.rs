use serde_json::{Map, Value};

use crate::error::{AppError, Result};
use crate::models::record::SensitiveRecord;

/// Validates a full-save request body into a typed record.
///
/// The body must be a JSON object and must match the record schema;
/// anything else is a validation error, checked before the service layer
/// sees the data.
pub fn parse_record(body: Value) -> Result<SensitiveRecord> {
    if !body.is_object() {
        return Err(AppError::Validation(
            "Request body must be a JSON object".to_string(),
        ));
    }

    serde_json::from_value(body)
        .map_err(|e| AppError::Validation(format!("Invalid sensitive data payload: {}", e)))
}

/// Validates a partial-update request body.
///
/// The body must be a JSON object whose present fields match the record
/// schema; the raw top-level map is returned so the service can merge it
/// over the stored record (explicit nulls clear fields).
pub fn parse_partial(body: Value) -> Result<Map<String, Value>> {
    let Value::Object(map) = body else {
        return Err(AppError::Validation(
            "Request body must be a JSON object".to_string(),
        ));
    };

    // Field-wise schema check; the map itself is what gets merged.
    serde_json::from_value::<SensitiveRecord>(Value::Object(map.clone()))
        .map_err(|e| AppError::Validation(format!("Invalid sensitive data payload: {}", e)))?;

    Ok(map)
}
