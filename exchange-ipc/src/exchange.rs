//! Worker side of the exchange
//!
//! A [`ChannelExchange`] is created once when the worker starts, handed to user
//! code for the duration of the run, and finalized once afterwards. Nothing is
//! shared between processes while it is alive: the worker owns its snapshot of
//! the init files and the host reads the finalize files after the worker exits.

use exchange_config::Resource;
use serde_json::Value as JsonValue;

use crate::error::{ExchangeError, ExchangeResult};
use crate::loader::InitSnapshot;
use crate::protocol::{encode, InputValues, OutputValues, StateVariables};
use crate::store::ResourceStore;

/// In-memory exchange context for one worker run
#[derive(Debug, Clone, Default)]
pub struct ChannelExchange {
    inputs: InputValues,
    required_if_connected: Vec<String>,
    output_names: Vec<String>,
    outputs: OutputValues,
    closed: Vec<String>,
    indefinite: Vec<String>,
    state: StateVariables,
    run_number: i64,
    defaulted: Vec<Resource>,
}

/// A JSON `null` default counts as no default at all.
fn supplied(default: Option<JsonValue>) -> Option<JsonValue> {
    default.filter(|value| !value.is_null())
}

impl ChannelExchange {
    /// Load the init resources, substituting a default for any that are unavailable
    pub fn load(store: &dyn ResourceStore) -> Self {
        Self::from_snapshot(InitSnapshot::load(store))
    }

    pub fn from_snapshot(snapshot: InitSnapshot) -> Self {
        Self {
            inputs: snapshot.inputs,
            required_if_connected: snapshot.required_if_connected,
            output_names: snapshot.output_names,
            outputs: OutputValues::new(),
            closed: Vec::new(),
            indefinite: Vec::new(),
            state: snapshot.state,
            run_number: snapshot.run_number,
            defaulted: snapshot.defaulted,
        }
    }

    /// Value of an input.
    ///
    /// An input that is only required if connected yields `default`; without
    /// one (or with a `null` one) it fails with
    /// [`ExchangeError::InputNotConnected`], even if the host also supplied a
    /// value for it.
    pub fn read_input(&self, name: &str, default: Option<JsonValue>) -> ExchangeResult<JsonValue> {
        if self.required_if_connected.iter().any(|n| n == name) {
            return supplied(default)
                .ok_or_else(|| ExchangeError::InputNotConnected(name.to_string()));
        }

        self.inputs
            .get(name)
            .cloned()
            .ok_or_else(|| ExchangeError::InputNotDefined(name.to_string()))
    }

    fn ensure_declared(&self, name: &str) -> ExchangeResult<()> {
        if self.output_names.iter().any(|n| n == name) {
            Ok(())
        } else {
            Err(ExchangeError::OutputNotDefined(name.to_string()))
        }
    }

    /// Mark an output as receiving no further values
    pub fn close_output(&mut self, name: &str) -> ExchangeResult<()> {
        self.ensure_declared(name)?;
        if !self.closed.iter().any(|n| n == name) {
            self.closed.push(name.to_string());
        }
        Ok(())
    }

    /// Append a value to an output; earlier values in the same run are kept
    pub fn write_output(&mut self, name: &str, value: JsonValue) -> ExchangeResult<()> {
        self.ensure_declared(name)?;
        self.outputs.entry(name.to_string()).or_default().push(value);
        Ok(())
    }

    /// Mark an output as intentionally without a value this run
    pub fn write_not_a_value_output(&mut self, name: &str) -> ExchangeResult<()> {
        self.ensure_declared(name)?;
        if !self.indefinite.iter().any(|n| n == name) {
            self.indefinite.push(name.to_string());
        }
        Ok(())
    }

    /// Close every declared output
    pub fn close_all_outputs(&mut self) -> ExchangeResult<()> {
        for name in self.output_names.clone() {
            self.close_output(&name)?;
        }
        Ok(())
    }

    /// Names with a value followed by conditionally-required names.
    ///
    /// A name present in both lists appears twice.
    pub fn get_all_inputs(&self) -> Vec<String> {
        self.inputs
            .keys()
            .cloned()
            .chain(self.required_if_connected.iter().cloned())
            .collect()
    }

    pub fn get_input_names_with_datum(&self) -> Vec<String> {
        self.inputs.keys().cloned().collect()
    }

    pub fn get_output_names(&self) -> &[String] {
        &self.output_names
    }

    pub fn write_state_variable(&mut self, name: &str, value: JsonValue) {
        self.state.insert(name.to_string(), value);
    }

    /// Stored state value, or `default` which is then stored as well.
    ///
    /// With no default (or a `null` one) nothing is stored and `None` is
    /// returned for an absent name.
    pub fn read_state_variable(
        &mut self,
        name: &str,
        default: Option<JsonValue>,
    ) -> Option<JsonValue> {
        if let Some(value) = self.state.get(name) {
            return Some(value.clone());
        }

        let default = supplied(default)?;
        self.state.insert(name.to_string(), default.clone());
        Some(default)
    }

    /// Deprecated spelling of [`read_state_variable`](Self::read_state_variable)
    pub fn read_state_variable_default(
        &mut self,
        name: &str,
        default: JsonValue,
    ) -> Option<JsonValue> {
        tracing::warn!(
            "The method 'read_state_variable_default' is deprecated. Please use 'read_state_variable(name, default)'."
        );
        self.read_state_variable(name, Some(default))
    }

    /// Strict state read that fails when nothing is stored
    pub fn require_state_variable(&self, name: &str) -> ExchangeResult<&JsonValue> {
        self.state
            .get(name)
            .ok_or_else(|| ExchangeError::MissingStateVariable(name.to_string()))
    }

    pub fn get_state_dict(&self) -> &StateVariables {
        &self.state
    }

    /// Run number supplied by the host, `-1` if none
    pub fn get_execution_count(&self) -> i64 {
        self.run_number
    }

    /// Abort the run with `reason`
    pub fn fail<T>(&self, reason: impl Into<String>) -> ExchangeResult<T> {
        Err(ExchangeError::UserFail(reason.into()))
    }

    pub fn input_values(&self) -> &InputValues {
        &self.inputs
    }

    pub fn outputs(&self) -> &OutputValues {
        &self.outputs
    }

    pub fn closed_outputs(&self) -> &[String] {
        &self.closed
    }

    pub fn indefinite_outputs(&self) -> &[String] {
        &self.indefinite
    }

    pub fn required_if_connected(&self) -> &[String] {
        &self.required_if_connected
    }

    /// Init resources that were unavailable and replaced by their default
    pub fn defaulted_resources(&self) -> &[Resource] {
        &self.defaulted
    }

    /// Write outputs, close list, state and indefinite list.
    ///
    /// The first failing write aborts; earlier files stay written.
    pub fn finalize(&self, store: &mut dyn ResourceStore) -> ExchangeResult<()> {
        store.write(
            Resource::OutputValues,
            &encode(Resource::OutputValues, &self.outputs)?,
        )?;
        store.write(
            Resource::CloseOutputs,
            &encode(Resource::CloseOutputs, &self.closed)?,
        )?;
        store.write(
            Resource::StateOutput,
            &encode(Resource::StateOutput, &self.state)?,
        )?;
        store.write(
            Resource::IndefiniteOutputs,
            &encode(Resource::IndefiniteOutputs, &self.indefinite)?,
        )?;

        tracing::info!(
            outputs = self.outputs.len(),
            closed = self.closed.len(),
            indefinite = self.indefinite.len(),
            state = self.state.len(),
            "Exchange finalized"
        );
        Ok(())
    }
}

/// Load an exchange, run `work` against it and finalize on success.
///
/// An error from `work` is returned unchanged and no result file is written.
pub fn run_worker<T, F>(store: &mut dyn ResourceStore, work: F) -> ExchangeResult<T>
where
    F: FnOnce(&mut ChannelExchange) -> ExchangeResult<T>,
{
    let mut exchange = ChannelExchange::load(store);
    let result = work(&mut exchange)?;
    exchange.finalize(store)?;
    Ok(result)
}
