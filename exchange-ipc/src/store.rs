//! Storage backends for the exchange files

use std::collections::HashMap;
use std::io;

use exchange_config::{FileLayout, Resource};

use crate::error::{ExchangeError, ExchangeResult};

/// Where exchange resources are read from and written to
pub trait ResourceStore {
    /// Read the raw contents of a resource
    fn read(&self, resource: Resource) -> ExchangeResult<String>;

    /// Replace the contents of a resource
    fn write(&mut self, resource: Resource, contents: &str) -> ExchangeResult<()>;
}

/// Resources stored as files under a [`FileLayout`]
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    layout: FileLayout,
}

impl DirectoryStore {
    /// Create a store over an explicit layout
    pub fn new(layout: FileLayout) -> Self {
        Self { layout }
    }

    /// Create a store using the default file names under `dir`
    pub fn in_dir(dir: impl AsRef<std::path::Path>) -> Self {
        Self::new(FileLayout::in_dir(dir))
    }

    pub fn layout(&self) -> &FileLayout {
        &self.layout
    }
}

impl Default for DirectoryStore {
    fn default() -> Self {
        Self::new(FileLayout::default())
    }
}

impl ResourceStore for DirectoryStore {
    fn read(&self, resource: Resource) -> ExchangeResult<String> {
        let path = self.layout.resolve(resource);
        std::fs::read_to_string(&path).map_err(|e| ExchangeError::io(resource, e))
    }

    fn write(&mut self, resource: Resource, contents: &str) -> ExchangeResult<()> {
        let path = self.layout.resolve(resource);
        tracing::trace!("Writing {} to {}", resource, path.display());
        std::fs::write(&path, contents).map_err(|e| ExchangeError::io(resource, e))
    }
}

/// Resources kept in memory, for exercising worker logic without a directory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    resources: HashMap<Resource, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a resource, replacing any previous contents
    pub fn with(mut self, resource: Resource, contents: impl Into<String>) -> Self {
        self.resources.insert(resource, contents.into());
        self
    }

    /// Raw contents of a resource, if present
    pub fn get(&self, resource: Resource) -> Option<&str> {
        self.resources.get(&resource).map(String::as_str)
    }
}

impl ResourceStore for MemoryStore {
    fn read(&self, resource: Resource) -> ExchangeResult<String> {
        self.resources.get(&resource).cloned().ok_or_else(|| {
            ExchangeError::io(
                resource,
                io::Error::new(io::ErrorKind::NotFound, "resource not present"),
            )
        })
    }

    fn write(&mut self, resource: Resource, contents: &str) -> ExchangeResult<()> {
        self.resources.insert(resource, contents.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_directory_store_reads_what_it_writes() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = DirectoryStore::in_dir(temp_dir.path());

        store.write(Resource::OutputValues, "{}").unwrap();

        assert!(temp_dir.path().join("pythonOutput.rced").exists());
        assert_eq!(store.read(Resource::OutputValues).unwrap(), "{}");
    }

    #[test]
    fn test_directory_store_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = DirectoryStore::in_dir(temp_dir.path());

        match store.read(Resource::InputValues) {
            Err(ExchangeError::Io { resource, source }) => {
                assert_eq!(resource, Resource::InputValues);
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("expected io error, got {:?}", other),
        }
    }

    #[test]
    fn test_directory_store_write_into_missing_dir_fails() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = DirectoryStore::in_dir(temp_dir.path().join("gone"));

        let result = store.write(Resource::StateOutput, "{}");
        assert!(matches!(
            result,
            Err(ExchangeError::Io {
                resource: Resource::StateOutput,
                ..
            })
        ));
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new().with(Resource::RunNumber, "4");

        assert_eq!(store.read(Resource::RunNumber).unwrap(), "4");
        assert!(store.read(Resource::InputValues).is_err());

        store.write(Resource::CloseOutputs, "[]").unwrap();
        assert_eq!(store.get(Resource::CloseOutputs), Some("[]"));
    }
}
