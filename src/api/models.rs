use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Common part of the body returned by a `status` endpoint.
///
/// Missing and `null` flags both read as `false`.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct StatusEnvelope {
    #[serde(deserialize_with = "null_as_false")]
    pub finished: bool,
    #[serde(deserialize_with = "null_as_false")]
    pub succeeded: bool,
    #[serde(deserialize_with = "null_as_false")]
    pub failed: bool,
    pub error: Option<String>,
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_default())
}

impl StatusEnvelope {
    /// # Errors
    ///
    /// Returns `Err` when a known field has an unexpected type.
    pub fn from_json(json: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(json)
    }
}

/// Extracts the identifier of a freshly created resource.
///
/// Falls back to `"?"`, which makes every later request on the resource
/// fail with a 404 instead of failing here.
pub fn resource_id(json: &Value) -> String {
    match json.get("id") {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => {
            log::warn!("Response creating a resource carries no id: {json}");
            "?".to_owned()
        }
    }
}
