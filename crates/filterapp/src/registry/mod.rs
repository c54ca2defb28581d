//! # Filter Definition Registry
//!
//! The registry is the catalog of filter types. It is fetched once, asynchronously,
//! from a [`DefinitionSource`], validated, and cached. Every other lookup is
//! synchronous against the cached catalog.
//!
//! ## Sources
//!
//! - [`source::MockSource`]: the built-in catalog ([`catalog::builtin_definitions`])
//!   served after a simulated latency
//! - [`source::FileSource`]: a JSON catalog file (top-level array of definitions)
//!
//! ## Readiness
//!
//! Before the fetch resolves, [`FilterRegistry::get_filter_definition`] and
//! [`FilterRegistry::get_default_operator`] return `None`. Callers treat that as
//! "not ready", never as an error.
//!
//! ## Validation
//!
//! A fetched catalog is rejected as a whole when a definition has an empty or
//! duplicate id, no operators, duplicate operator ids, or is a select type without
//! options. Linked targets are not checked here: a dangling target only means no
//! child gets created (see [`crate::linked`]).

use crate::error::{FilterError, Result};
use crate::model::{FilterDefinition, OperatorConfig};
use std::collections::HashSet;

pub mod catalog;
pub mod source;

pub use source::{DefinitionSource, FileSource, MockSource};

pub struct FilterRegistry {
    source: Box<dyn DefinitionSource>,
    definitions: Option<Vec<FilterDefinition>>,
}

impl std::fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("source", &self.source.describe())
            .field("definitions", &self.definitions)
            .finish()
    }
}

impl FilterRegistry {
    pub fn new(source: impl DefinitionSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            definitions: None,
        }
    }

    /// A registry that is ready immediately, without going through a fetch.
    pub fn with_definitions(definitions: Vec<FilterDefinition>) -> Result<Self> {
        validate_definitions(&definitions)?;
        Ok(Self {
            source: Box::new(MockSource::new(definitions.clone())),
            definitions: Some(definitions),
        })
    }

    /// Fetch, validate and cache the catalog.
    ///
    /// On failure the previous cache (if any) is kept.
    pub async fn fetch_filter_definitions(&mut self) -> Result<Vec<FilterDefinition>> {
        tracing::debug!(source = %self.source.describe(), "fetching filter definitions");
        let definitions = self.source.fetch().await?;
        validate_definitions(&definitions)?;
        tracing::info!(
            count = definitions.len(),
            source = %self.source.describe(),
            "filter definitions loaded"
        );
        self.definitions = Some(definitions.clone());
        Ok(definitions)
    }

    pub fn is_ready(&self) -> bool {
        self.definitions.is_some()
    }

    /// The cached catalog, empty while not ready.
    pub fn definitions(&self) -> &[FilterDefinition] {
        self.definitions.as_deref().unwrap_or_default()
    }

    pub fn get_filter_definition(&self, id: &str) -> Option<&FilterDefinition> {
        self.definitions().iter().find(|def| def.id == id)
    }

    pub fn get_default_operator(&self, id: &str) -> Option<&OperatorConfig> {
        self.get_filter_definition(id)?.default_operator()
    }

    /// Definitions offered for top-level selection.
    pub fn get_primary_filter_definitions(&self) -> Vec<&FilterDefinition> {
        self.definitions()
            .iter()
            .filter(|def| !def.child_only)
            .collect()
    }

    pub fn describe_source(&self) -> String {
        self.source.describe()
    }
}

pub fn validate_definitions(definitions: &[FilterDefinition]) -> Result<()> {
    let mut seen = HashSet::new();
    for def in definitions {
        let invalid = |reason: &str| FilterError::InvalidDefinition {
            id: def.id.clone(),
            reason: reason.to_string(),
        };

        if def.id.is_empty() {
            return Err(invalid("id is empty"));
        }
        if !seen.insert(def.id.as_str()) {
            return Err(invalid("duplicate id"));
        }
        if def.operators.is_empty() {
            return Err(invalid("no operators"));
        }
        let mut op_ids = HashSet::new();
        if !def.operators.iter().all(|op| op_ids.insert(op.id.as_str())) {
            return Err(invalid("duplicate operator id"));
        }
        if def.value_type.is_select() && def.options.is_empty() {
            return Err(invalid("select filter without options"));
        }
    }
    Ok(())
}
