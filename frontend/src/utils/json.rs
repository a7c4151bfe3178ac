use serde::de::DeserializeOwned;
use serde::Serialize;

/// Clone a JSON-compatible value through its serialized representation.
/// The result shares no structure with the input.
pub fn deep_clone<T>(value: &T) -> Result<T, serde_json::Error>
where
    T: Serialize + DeserializeOwned,
{
    serde_json::from_value(serde_json::to_value(value)?)
}
