//! Model capability table.
//!
//! Maps model identifiers to the call shape they speak. New models are added
//! as entries here or under `[models]` in the config file; the invocation
//! logic never changes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{InsightsError, Result};

/// The call shape a model understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelProtocol {
    /// Role-tagged messages (system/user/assistant).
    Chat,
    /// One flat prompt string returning continuation text.
    Completion,
}

impl ModelProtocol {
    /// Returns the protocol as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Completion => "completion",
        }
    }
}

impl std::fmt::Display for ModelProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One row of the capability table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelSpec {
    pub name: String,
    pub protocol: ModelProtocol,
}

impl ModelSpec {
    pub fn new(name: impl Into<String>, protocol: ModelProtocol) -> Self {
        Self {
            name: name.into(),
            protocol,
        }
    }

    /// Returns true if the model takes role-tagged messages.
    pub fn uses_chat_protocol(&self) -> bool {
        self.protocol == ModelProtocol::Chat
    }
}

/// Capability table keyed by model identifier.
#[derive(Debug, Clone, Default)]
pub struct ModelCatalog {
    models: HashMap<String, ModelProtocol>,
}

impl ModelCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the catalog of models the dataset demo ships with.
    pub fn builtin() -> Self {
        Self::new()
            .with_model("text-davinci-003", ModelProtocol::Completion)
            .with_model("gpt-3.5-turbo", ModelProtocol::Chat)
            .with_model("gpt-4", ModelProtocol::Chat)
    }

    /// Adds or replaces an entry.
    pub fn with_model(mut self, name: impl Into<String>, protocol: ModelProtocol) -> Self {
        self.insert(name, protocol);
        self
    }

    /// Adds or replaces an entry in place.
    pub fn insert(&mut self, name: impl Into<String>, protocol: ModelProtocol) {
        self.models.insert(name.into(), protocol);
    }

    /// Merges entries from another map, overriding existing ones.
    pub fn extend<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (String, ModelProtocol)>,
    {
        self.models.extend(entries);
    }

    /// Looks up a model, failing with `UnknownModel` if it is not listed.
    pub fn lookup(&self, name: &str) -> Result<ModelSpec> {
        self.models
            .get(name)
            .map(|protocol| ModelSpec::new(name, *protocol))
            .ok_or_else(|| InsightsError::unknown_model(name))
    }

    /// Returns true if the model is listed.
    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    /// Returns all entries sorted by name.
    pub fn specs(&self) -> Vec<ModelSpec> {
        let mut specs: Vec<ModelSpec> = self
            .models
            .iter()
            .map(|(name, protocol)| ModelSpec::new(name.clone(), *protocol))
            .collect();
        specs.sort_by(|a, b| a.name.cmp(&b.name));
        specs
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
