use super::catalog::builtin_definitions;
use crate::error::{FilterError, Result};
use crate::model::FilterDefinition;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Where a registry gets its catalog from.
#[async_trait]
pub trait DefinitionSource: Send + Sync {
    /// Fetch the full catalog.
    async fn fetch(&self) -> Result<Vec<FilterDefinition>>;

    /// Short description used in log lines.
    fn describe(&self) -> String;
}

/// Serves a fixed catalog after a simulated latency.
#[derive(Debug, Clone)]
pub struct MockSource {
    definitions: Vec<FilterDefinition>,
    latency: Duration,
}

impl MockSource {
    pub fn new(definitions: Vec<FilterDefinition>) -> Self {
        Self {
            definitions,
            latency: Duration::ZERO,
        }
    }

    /// The built-in catalog.
    pub fn builtin() -> Self {
        Self::new(builtin_definitions())
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

#[async_trait]
impl DefinitionSource for MockSource {
    async fn fetch(&self) -> Result<Vec<FilterDefinition>> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(self.definitions.clone())
    }

    fn describe(&self) -> String {
        format!("mock catalog ({} definitions)", self.definitions.len())
    }
}

/// Reads a JSON catalog file: a top-level array of definitions.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DefinitionSource for FileSource {
    async fn fetch(&self) -> Result<Vec<FilterDefinition>> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            FilterError::Registry(format!("cannot read {}: {}", self.path.display(), e))
        })?;
        let definitions: Vec<FilterDefinition> = serde_json::from_str(&content)?;
        Ok(definitions)
    }

    fn describe(&self) -> String {
        format!("catalog file {}", self.path.display())
    }
}
