//! Host side of the exchange: staging a run and collecting what it produced

use exchange_config::Resource;
use serde::{Deserialize, Serialize};

use crate::error::ExchangeResult;
use crate::protocol::{
    decode, encode, InputValues, OutputValues, StateVariables, UNKNOWN_RUN_NUMBER,
};
use crate::store::ResourceStore;

/// Everything the host hands a worker before it starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeRequest {
    pub inputs: InputValues,
    pub required_if_connected: Vec<String>,
    pub output_names: Vec<String>,
    pub state: StateVariables,
    pub run_number: i64,
}

impl Default for ExchangeRequest {
    fn default() -> Self {
        Self {
            inputs: InputValues::new(),
            required_if_connected: Vec::new(),
            output_names: Vec::new(),
            state: StateVariables::new(),
            run_number: UNKNOWN_RUN_NUMBER,
        }
    }
}

impl ExchangeRequest {
    /// Write the five init resources
    pub fn stage(&self, store: &mut dyn ResourceStore) -> ExchangeResult<()> {
        store.write(
            Resource::InputValues,
            &encode(Resource::InputValues, &self.inputs)?,
        )?;
        store.write(
            Resource::RequiredIfConnected,
            &encode(Resource::RequiredIfConnected, &self.required_if_connected)?,
        )?;
        store.write(
            Resource::DeclaredOutputs,
            &encode(Resource::DeclaredOutputs, &self.output_names)?,
        )?;
        store.write(
            Resource::StateVariables,
            &encode(Resource::StateVariables, &self.state)?,
        )?;
        store.write(
            Resource::RunNumber,
            &encode(Resource::RunNumber, &self.run_number)?,
        )?;

        tracing::debug!(
            inputs = self.inputs.len(),
            outputs = self.output_names.len(),
            run_number = self.run_number,
            "Exchange staged"
        );
        Ok(())
    }
}

/// Everything a finished worker left behind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExchangeOutcome {
    pub outputs: OutputValues,
    pub closed: Vec<String>,
    pub state: StateVariables,
    pub indefinite: Vec<String>,
}

impl ExchangeOutcome {
    /// Read the four finalize resources; any missing or malformed one is an error
    pub fn collect(store: &dyn ResourceStore) -> ExchangeResult<Self> {
        let read = |resource: Resource| store.read(resource);

        Ok(Self {
            outputs: decode(Resource::OutputValues, &read(Resource::OutputValues)?)?,
            closed: decode(Resource::CloseOutputs, &read(Resource::CloseOutputs)?)?,
            state: decode(Resource::StateOutput, &read(Resource::StateOutput)?)?,
            indefinite: decode(
                Resource::IndefiniteOutputs,
                &read(Resource::IndefiniteOutputs)?,
            )?,
        })
    }

    /// Last value emitted on an output
    pub fn last_value(&self, name: &str) -> Option<&serde_json::Value> {
        self.outputs.get(name).and_then(|values| values.last())
    }

    pub fn is_closed(&self, name: &str) -> bool {
        self.closed.iter().any(|n| n == name)
    }

    pub fn is_indefinite(&self, name: &str) -> bool {
        self.indefinite.iter().any(|n| n == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExchangeError;
    use crate::store::MemoryStore;
    use serde_json::json;

    #[test]
    fn test_stage_writes_init_resources() {
        let mut request = ExchangeRequest {
            output_names: vec!["out1".to_string()],
            run_number: 3,
            ..Default::default()
        };
        request.inputs.insert("a".to_string(), json!(1));

        let mut store = MemoryStore::new();
        request.stage(&mut store).unwrap();

        assert_eq!(store.get(Resource::InputValues), Some(r#"{"a":1}"#));
        assert_eq!(store.get(Resource::RequiredIfConnected), Some("[]"));
        assert_eq!(store.get(Resource::DeclaredOutputs), Some(r#"["out1"]"#));
        assert_eq!(store.get(Resource::StateVariables), Some("{}"));
        assert_eq!(store.get(Resource::RunNumber), Some("3"));
    }

    #[test]
    fn test_request_document_defaults() {
        let request: ExchangeRequest =
            serde_json::from_str(r#"{"output_names": ["o"]}"#).unwrap();
        assert_eq!(request.run_number, -1);
        assert!(request.inputs.is_empty());
    }

    #[test]
    fn test_collect_requires_every_resource() {
        let store = MemoryStore::new()
            .with(Resource::OutputValues, r#"{"o": [1, 2]}"#)
            .with(Resource::CloseOutputs, r#"["o"]"#)
            .with(Resource::StateOutput, "{}");

        let err = ExchangeOutcome::collect(&store).unwrap_err();
        assert!(matches!(
            err,
            ExchangeError::Io {
                resource: Resource::IndefiniteOutputs,
                ..
            }
        ));
    }

    #[test]
    fn test_collect_outcome() {
        let store = MemoryStore::new()
            .with(Resource::OutputValues, r#"{"o": [1, 2]}"#)
            .with(Resource::CloseOutputs, r#"["o"]"#)
            .with(Resource::StateOutput, r#"{"k": true}"#)
            .with(Resource::IndefiniteOutputs, r#"["p"]"#);

        let outcome = ExchangeOutcome::collect(&store).unwrap();
        assert_eq!(outcome.last_value("o"), Some(&json!(2)));
        assert_eq!(outcome.last_value("p"), None);
        assert!(outcome.is_closed("o"));
        assert!(outcome.is_indefinite("p"));
        assert_eq!(outcome.state["k"], json!(true));
    }
}
