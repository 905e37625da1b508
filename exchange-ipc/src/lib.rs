//! File-based channel exchange
//!
//! A short-lived worker process exchanges named values with its host by
//! reading a handful of JSON files when it starts and writing another handful
//! when it finishes. [`ChannelExchange`] is the worker side of that contract;
//! [`ExchangeRequest`] and [`ExchangeOutcome`] are the host side.

pub mod error;
pub mod exchange;
pub mod host;
pub mod loader;
pub mod protocol;
pub mod store;

// Re-export commonly used types
pub use error::{ExchangeError, ExchangeResult};
pub use exchange::{run_worker, ChannelExchange};
pub use exchange_config::{FileLayout, Resource};
pub use host::{ExchangeOutcome, ExchangeRequest};
pub use protocol::{InputValues, OutputValues, StateVariables};
pub use store::{DirectoryStore, MemoryStore, ResourceStore};
