//! Shapes shared by several API groups

use serde::{Deserialize, Deserializer, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

/// Deserialize an explicit `null` as `T::default()`.
///
/// Xano sends `null` for unset columns; `#[serde(default)]` alone only covers
/// missing keys.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body for endpoints that address a record by numeric id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRequest {
    pub id: i64,
}

/// Acknowledgement returned by delete endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct DeleteResponse {
    #[serde(default, deserialize_with = "crate::types::common::null_as_default")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}
