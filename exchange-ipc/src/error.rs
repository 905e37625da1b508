//! Exchange error types

use exchange_config::Resource;
use thiserror::Error;

/// Exchange result type
pub type ExchangeResult<T> = Result<T, ExchangeError>;

/// Exchange error types
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// A conditionally-required input was read without a default
    #[error("Input {0} not connected.")]
    InputNotConnected(String),

    /// The input is neither supplied nor conditionally required
    #[error("Input '{0}' is not defined or it has no value")]
    InputNotDefined(String),

    /// The output is not among the declared outputs
    #[error("Output '{0}' is not defined")]
    OutputNotDefined(String),

    /// Strict state read found nothing stored
    #[error("No state variable stored for '{0}'")]
    MissingStateVariable(String),

    /// Run aborted by user code
    #[error("{0}")]
    UserFail(String),

    /// IO error on an exchange file
    #[error("IO error on {resource}: {source}")]
    Io {
        resource: Resource,
        #[source]
        source: std::io::Error,
    },

    /// JSON error on an exchange file
    #[error("Invalid JSON in {resource}: {source}")]
    Serialization {
        resource: Resource,
        #[source]
        source: serde_json::Error,
    },
}

impl ExchangeError {
    /// Check if this error comes from naming a channel outside its declared set
    pub fn is_channel_error(&self) -> bool {
        matches!(
            self,
            ExchangeError::InputNotConnected(_)
                | ExchangeError::InputNotDefined(_)
                | ExchangeError::OutputNotDefined(_)
        )
    }

    /// Check if this error is an explicit abort requested by user code
    pub fn is_user_fail(&self) -> bool {
        matches!(self, ExchangeError::UserFail(_))
    }

    pub(crate) fn io(resource: Resource, source: std::io::Error) -> Self {
        ExchangeError::Io { resource, source }
    }

    pub(crate) fn serialization(resource: Resource, source: serde_json::Error) -> Self {
        ExchangeError::Serialization { resource, source }
    }
}
