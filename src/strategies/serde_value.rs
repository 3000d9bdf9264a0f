use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::MapError;

/// Map by name: serialize `src` into a `serde_json::Value` tree, then
/// deserialize the destination from it. Fields are matched by their
/// serialized names at run time.
pub fn map_via_value<S, D>(src: &S) -> Result<D, MapError>
where
    S: Serialize,
    D: DeserializeOwned,
{
    let value = serde_json::to_value(src).map_err(|e| MapError::Conversion(e.to_string()))?;
    serde_json::from_value(value).map_err(|e| MapError::Conversion(e.to_string()))
}
