//! Unwrapping of the two response shapes the volcano APIs use: a bare
//! payload, or the payload nested under `"result"`.

use serde_json::Value;
use volcwatch_core::fields::JsonObject;

use crate::error::SourceError;

/// Extracts the list of objects from `[...]` or `{ "result": [...] }`.
///
/// Non-object array entries are skipped with a debug log.
///
/// # Errors
///
/// Returns [`SourceError::UnexpectedShape`] for any other shape.
pub fn unwrap_list(body: Value, context: &str) -> Result<Vec<JsonObject>, SourceError> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("result") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(SourceError::UnexpectedShape {
                    context: context.to_owned(),
                    expected: "an array or an object with a \"result\" array",
                })
            }
        },
        _ => {
            return Err(SourceError::UnexpectedShape {
                context: context.to_owned(),
                expected: "an array or an object with a \"result\" array",
            })
        }
    };

    let total = items.len();
    let objects: Vec<JsonObject> = items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(obj) => Some(obj),
            _ => None,
        })
        .collect();

    if objects.len() != total {
        tracing::debug!(
            context,
            skipped = total - objects.len(),
            "skipped non-object list entries"
        );
    }

    Ok(objects)
}

/// Extracts the detail object from `{...}` or `{ "result": {...} }`.
///
/// An object whose `"result"` member is itself an object is treated as the
/// wrapped form; any other object is returned as-is.
///
/// # Errors
///
/// Returns [`SourceError::UnexpectedShape`] if the body is not an object.
pub fn unwrap_object(body: Value, context: &str) -> Result<JsonObject, SourceError> {
    match body {
        Value::Object(mut obj) => {
            if matches!(obj.get("result"), Some(Value::Object(_))) {
                if let Some(Value::Object(inner)) = obj.remove("result") {
                    return Ok(inner);
                }
            }
            Ok(obj)
        }
        _ => Err(SourceError::UnexpectedShape {
            context: context.to_owned(),
            expected: "an object or an object with a \"result\" object",
        }),
    }
}
