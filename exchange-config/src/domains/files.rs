//! Exchange file layout

use crate::error::ConfigResult;
use crate::validation::{validate_file_name, Validatable};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// One of the well-known files exchanged between worker and host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    /// Input name to value mapping, read at init
    InputValues,
    /// Names of inputs only required if connected, read at init
    RequiredIfConnected,
    /// Persisted state mapping, read at init
    StateVariables,
    /// Declared output names, read at init
    DeclaredOutputs,
    /// Current run number, read at init
    RunNumber,
    /// Output name to emitted values mapping, written at finalize
    OutputValues,
    /// Closed output names, written at finalize
    CloseOutputs,
    /// Updated state mapping, written at finalize
    StateOutput,
    /// Output names marked indefinite, written at finalize
    IndefiniteOutputs,
}

impl Resource {
    /// Resources the worker reads when it starts
    pub const INIT: [Resource; 5] = [
        Resource::InputValues,
        Resource::RequiredIfConnected,
        Resource::StateVariables,
        Resource::DeclaredOutputs,
        Resource::RunNumber,
    ];

    /// Resources the worker writes when it finishes, in write order
    pub const FINALIZE: [Resource; 4] = [
        Resource::OutputValues,
        Resource::CloseOutputs,
        Resource::StateOutput,
        Resource::IndefiniteOutputs,
    ];

    /// Stable identifier used in logs and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::InputValues => "input_values",
            Resource::RequiredIfConnected => "required_if_connected",
            Resource::StateVariables => "state_variables",
            Resource::DeclaredOutputs => "declared_outputs",
            Resource::RunNumber => "run_number",
            Resource::OutputValues => "output_values",
            Resource::CloseOutputs => "close_outputs",
            Resource::StateOutput => "state_output",
            Resource::IndefiniteOutputs => "indefinite_outputs",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the exchange files live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLayout {
    /// Directory all file names are resolved against
    pub working_dir: PathBuf,

    pub input_values: String,
    pub required_if_connected: String,
    pub state_variables: String,
    pub declared_outputs: String,
    pub run_number: String,

    pub output_values: String,
    pub close_outputs: String,
    pub state_output: String,
    pub indefinite_outputs: String,
}

impl Default for FileLayout {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::from("."),
            input_values: "pythonInput.rced".to_string(),
            required_if_connected: "pythonInputReqIfConnected.rced".to_string(),
            state_variables: "pythonStateVariables.rces".to_string(),
            declared_outputs: "outputs.rceo".to_string(),
            run_number: "pythonRunNumber.rcen".to_string(),
            output_values: "pythonOutput.rced".to_string(),
            close_outputs: "pythonCloseOutputChannelsList.rced".to_string(),
            state_output: "pythonStateOutput.rces".to_string(),
            indefinite_outputs: "pythonSetOutputsIndefinit.rceo".to_string(),
        }
    }
}

impl FileLayout {
    /// Default file names rooted at `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            working_dir: dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// File name configured for a resource
    pub fn file_name(&self, resource: Resource) -> &str {
        match resource {
            Resource::InputValues => &self.input_values,
            Resource::RequiredIfConnected => &self.required_if_connected,
            Resource::StateVariables => &self.state_variables,
            Resource::DeclaredOutputs => &self.declared_outputs,
            Resource::RunNumber => &self.run_number,
            Resource::OutputValues => &self.output_values,
            Resource::CloseOutputs => &self.close_outputs,
            Resource::StateOutput => &self.state_output,
            Resource::IndefiniteOutputs => &self.indefinite_outputs,
        }
    }

    /// Full path of a resource
    pub fn resolve(&self, resource: Resource) -> PathBuf {
        self.working_dir.join(self.file_name(resource))
    }
}

impl Validatable for FileLayout {
    fn validate(&self) -> ConfigResult<()> {
        let mut seen = HashSet::new();

        for resource in Resource::INIT.into_iter().chain(Resource::FINALIZE) {
            let name = self.file_name(resource);
            validate_file_name(name, resource.as_str(), self.domain_name())?;

            if !seen.insert(name) {
                return Err(self.validation_error(format!(
                    "{} reuses file name '{}'",
                    resource, name
                )));
            }
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "files"
    }
}
