//! Presence-tagged values for partial updates.
//!
//! A `Presence<T>` field is `Absent` when the key was left out of the JSON
//! body and `Present(T)` when it was sent. An explicit `null` is not a third
//! state: it fails to decode as `T`, so the request is rejected.
//!
//! Fields of this type must carry `#[serde(default)]`.

use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presence<T> {
    Absent,
    Present(T),
}

impl<T> Default for Presence<T> {
    fn default() -> Self {
        Presence::Absent
    }
}

impl<T> Presence<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Presence::Absent)
    }
}

impl<'de, T> Deserialize<'de> for Presence<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Presence::Present)
    }
}
