// travelcard/src/dispatch/builder.rs

use crate::card::{default_families, CardFamily};
use crate::dispatch::Dispatcher;
use crate::{Error, Result};

/// Helper to construct a Dispatcher with a custom registry or preference.
#[derive(Debug, Default)]
pub struct DispatcherBuilder {
    families: Option<Vec<CardFamily>>,
    preferred: Option<String>,
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a family. The first call replaces the built-in registry.
    pub fn with_family(mut self, family: CardFamily) -> Self {
        self.families.get_or_insert_with(Vec::new).push(family);
        self
    }

    pub fn with_families(mut self, families: impl IntoIterator<Item = CardFamily>) -> Self {
        self.families.get_or_insert_with(Vec::new).extend(families);
        self
    }

    /// Family to try first.
    pub fn preferred(mut self, card_type: &str) -> Self {
        self.preferred = Some(card_type.to_string());
        self
    }

    /// Consume the builder. Fails with `UnknownCardType` when the preferred
    /// family is not registered.
    pub fn build(self) -> Result<Dispatcher> {
        let families = self.families.unwrap_or_else(default_families);
        let preferred = match self.preferred {
            Some(name) => families
                .iter()
                .position(|f| f.name == name)
                .ok_or(Error::UnknownCardType(name))?,
            None => 0,
        };
        Ok(Dispatcher::with_registry(families, preferred))
    }
}
