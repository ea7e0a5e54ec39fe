//! Tri-state request fields for partial updates
//!
//! With `#[serde(default, deserialize_with = "nullable::deserialize")]` on an
//! `Option<Option<T>>` field an absent key stays `None` (leave unchanged),
//! `null` becomes `Some(None)` (clear) and a value becomes `Some(Some(v))`.

use serde::{Deserialize, Deserializer};

pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
