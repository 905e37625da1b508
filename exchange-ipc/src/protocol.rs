//! Shapes of the JSON documents exchanged with the host

use std::collections::BTreeMap;

use exchange_config::Resource;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::error::{ExchangeError, ExchangeResult};

/// Input name to value, in document order
pub type InputValues = Map<String, JsonValue>;

/// State variable name to value, in document order
pub type StateVariables = Map<String, JsonValue>;

/// Output name to every value emitted on it during the run, in emission order
pub type OutputValues = BTreeMap<String, Vec<JsonValue>>;

/// Run number used when the host supplied none
pub const UNKNOWN_RUN_NUMBER: i64 = -1;

/// Declared outputs, sent either as a list of names or as an object keyed by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeclaredOutputs {
    Names(Vec<String>),
    Mapping(Map<String, JsonValue>),
}

impl DeclaredOutputs {
    pub fn into_names(self) -> Vec<String> {
        match self {
            DeclaredOutputs::Names(names) => names,
            DeclaredOutputs::Mapping(mapping) => mapping.into_iter().map(|(name, _)| name).collect(),
        }
    }
}

/// Parse a resource body
pub fn decode<T: DeserializeOwned>(resource: Resource, body: &str) -> ExchangeResult<T> {
    serde_json::from_str(body).map_err(|e| ExchangeError::serialization(resource, e))
}

/// Render a resource body
pub fn encode<T: Serialize + ?Sized>(resource: Resource, value: &T) -> ExchangeResult<String> {
    serde_json::to_string(value).map_err(|e| ExchangeError::serialization(resource, e))
}
