//! Start-up loaders, one per init resource
//!
//! Every loader is isolated: a missing, unreadable or malformed file yields
//! that resource's empty default and never affects the others.

use exchange_config::Resource;
use crate::error::ExchangeResult;
use crate::protocol::{
    decode, DeclaredOutputs, InputValues, StateVariables, UNKNOWN_RUN_NUMBER,
};
use crate::store::ResourceStore;

/// A loaded resource and whether its default was substituted
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    pub value: T,
    pub defaulted: bool,
}

fn load_or_default<T>(
    store: &dyn ResourceStore,
    resource: Resource,
    parse: impl FnOnce(&str) -> ExchangeResult<T>,
    default: impl FnOnce() -> T,
) -> Loaded<T> {
    match store.read(resource).and_then(|body| parse(&body)) {
        Ok(value) => Loaded {
            value,
            defaulted: false,
        },
        Err(e) => {
            tracing::debug!("Using default for {}: {}", resource, e);
            Loaded {
                value: default(),
                defaulted: true,
            }
        }
    }
}

pub fn load_input_values(store: &dyn ResourceStore) -> Loaded<InputValues> {
    load_or_default(
        store,
        Resource::InputValues,
        |body| decode(Resource::InputValues, body),
        InputValues::new,
    )
}

pub fn load_required_if_connected(store: &dyn ResourceStore) -> Loaded<Vec<String>> {
    load_or_default(
        store,
        Resource::RequiredIfConnected,
        |body| decode(Resource::RequiredIfConnected, body),
        Vec::new,
    )
}

pub fn load_output_names(store: &dyn ResourceStore) -> Loaded<Vec<String>> {
    load_or_default(
        store,
        Resource::DeclaredOutputs,
        |body| {
            decode::<DeclaredOutputs>(Resource::DeclaredOutputs, body)
                .map(DeclaredOutputs::into_names)
        },
        Vec::new,
    )
}

pub fn load_state_variables(store: &dyn ResourceStore) -> Loaded<StateVariables> {
    load_or_default(
        store,
        Resource::StateVariables,
        |body| decode(Resource::StateVariables, body),
        StateVariables::new,
    )
}

pub fn load_run_number(store: &dyn ResourceStore) -> Loaded<i64> {
    load_or_default(
        store,
        Resource::RunNumber,
        |body| decode::<i64>(Resource::RunNumber, body),
        || UNKNOWN_RUN_NUMBER,
    )
}

/// Everything a worker reads at start-up
#[derive(Debug, Clone, PartialEq)]
pub struct InitSnapshot {
    pub inputs: InputValues,
    pub required_if_connected: Vec<String>,
    pub output_names: Vec<String>,
    pub state: StateVariables,
    pub run_number: i64,
    /// Resources that fell back to their default
    pub defaulted: Vec<Resource>,
}

impl InitSnapshot {
    pub fn load(store: &dyn ResourceStore) -> Self {
        let mut defaulted = Vec::new();
        let mut note = |resource: Resource, flag: bool| {
            if flag {
                defaulted.push(resource);
            }
        };

        let inputs = load_input_values(store);
        note(Resource::InputValues, inputs.defaulted);
        let required = load_required_if_connected(store);
        note(Resource::RequiredIfConnected, required.defaulted);
        let state = load_state_variables(store);
        note(Resource::StateVariables, state.defaulted);
        let outputs = load_output_names(store);
        note(Resource::DeclaredOutputs, outputs.defaulted);
        let run_number = load_run_number(store);
        note(Resource::RunNumber, run_number.defaulted);

        Self {
            inputs: inputs.value,
            required_if_connected: required.value,
            output_names: outputs.value,
            state: state.value,
            run_number: run_number.value,
            defaulted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::{json, Value as JsonValue};

    #[test]
    fn test_empty_store_yields_all_defaults() {
        let snapshot = InitSnapshot::load(&MemoryStore::new());

        assert!(snapshot.inputs.is_empty());
        assert!(snapshot.required_if_connected.is_empty());
        assert!(snapshot.output_names.is_empty());
        assert!(snapshot.state.is_empty());
        assert_eq!(snapshot.run_number, -1);
        assert_eq!(snapshot.defaulted, Resource::INIT.to_vec());
    }

    #[test]
    fn test_failures_are_isolated_per_resource() {
        let store = MemoryStore::new()
            .with(Resource::InputValues, r#"{"a": 1"#)
            .with(Resource::DeclaredOutputs, r#"["out1"]"#)
            .with(Resource::RunNumber, "3");

        let snapshot = InitSnapshot::load(&store);

        assert!(snapshot.inputs.is_empty());
        assert_eq!(snapshot.output_names, vec!["out1"]);
        assert_eq!(snapshot.run_number, 3);
        assert_eq!(
            snapshot.defaulted,
            vec![
                Resource::InputValues,
                Resource::RequiredIfConnected,
                Resource::StateVariables
            ]
        );
    }

    #[test]
    fn test_names_keep_document_order() {
        let store = MemoryStore::new()
            .with(Resource::InputValues, r#"{"zeta": 1, "alpha": 2}"#)
            .with(Resource::StateVariables, r#"{"z": 0, "a": 0}"#)
            .with(Resource::DeclaredOutputs, r#"{"z_out": "Float", "a_out": "Float"}"#);

        let snapshot = InitSnapshot::load(&store);

        let inputs: Vec<&str> = snapshot.inputs.keys().map(String::as_str).collect();
        assert_eq!(inputs, vec!["zeta", "alpha"]);
        let state: Vec<&str> = snapshot.state.keys().map(String::as_str).collect();
        assert_eq!(state, vec!["z", "a"]);
        assert_eq!(snapshot.output_names, vec!["z_out", "a_out"]);
    }

    #[test]
    fn test_run_number_must_be_integer() {
        let store = MemoryStore::new().with(Resource::RunNumber, "\"three\"");
        let loaded = load_run_number(&store);
        assert_eq!(loaded.value, -1);
        assert!(loaded.defaulted);
    }

    #[test]
    fn test_input_values_loaded() {
        let store = MemoryStore::new().with(Resource::InputValues, r#"{"x": [1, 2], "y": null}"#);
        let snapshot = InitSnapshot::load(&store);

        assert_eq!(snapshot.inputs.get("x"), Some(&json!([1, 2])));
        assert_eq!(snapshot.inputs.get("y"), Some(&JsonValue::Null));
        assert_eq!(snapshot.inputs.get("z"), None);
    }
}
