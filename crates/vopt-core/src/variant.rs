use rustc_hash::FxHashMap;
#[cfg(feature = "tree-json")]
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::scalar::Scalar;

/// Prefix under which environment settings may be registered in the map.
pub const ENV_KEY_PREFIX: &str = "<env>:";

/// The build-time configuration: variant key to resolved value.
///
/// The optimizer only ever reads from it.
#[cfg_attr(feature = "tree-json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "tree-json", serde(transparent))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariantMap {
    values: FxHashMap<SmolStr, Scalar>,
}

impl VariantMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<SmolStr>, value: impl Into<Scalar>) -> Option<Scalar> {
        self.values.insert(key.into(), value.into())
    }

    /// Looks `key` up verbatim, then as `"<env>:" + key`.
    ///
    /// `None` means "not configured", which callers treat as "leave the call
    /// site alone" rather than as an error. A key configured as `null` is
    /// found and yields `Some(&Scalar::Null)`.
    pub fn lookup(&self, key: &str) -> Option<&Scalar> {
        self.values
            .get(key)
            .or_else(|| self.values.get(format!("{ENV_KEY_PREFIX}{key}").as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SmolStr, &Scalar)> {
        self.values.iter()
    }

    #[cfg(feature = "tree-json")]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl<K: Into<SmolStr>, V: Into<Scalar>> FromIterator<(K, V)> for VariantMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl<K: Into<SmolStr>, V: Into<Scalar>> Extend<(K, V)> for VariantMap {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.values.extend(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into())),
        );
    }
}
