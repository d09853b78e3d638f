//! Serde adapter storing [`Method`] as its name.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serializer};
use tmd_archive::Method;

pub(crate) fn serialize<S: Serializer>(method: &Method, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(method)
}

pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Method, D::Error> {
    let name = String::deserialize(deserializer)?;
    name.parse().map_err(|err: tmd_archive::error::Error| D::Error::custom(&*err))
}
