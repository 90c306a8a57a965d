//! Named reflectance profiles defined by `constants` commands.

use std::collections::HashMap;

use crate::operation::Reflectance;

/// Symbol table mapping constants names to reflectance profiles.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    constants: HashMap<String, Reflectance>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define or redefine a profile. Returns the previous definition.
    pub fn define(&mut self, name: impl Into<String>, reflectance: Reflectance) -> Option<Reflectance> {
        let name = name.into();
        let previous = self.constants.insert(name.clone(), reflectance);
        if previous.is_some() {
            log::debug!("Redefined constants '{}'", name);
        }
        previous
    }

    pub fn lookup(&self, name: &str) -> Option<&Reflectance> {
        self.constants.get(name)
    }

    pub fn len(&self) -> usize {
        self.constants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }

    /// Iterate over all definitions, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Reflectance)> {
        let mut entries: Vec<_> = self.constants.iter().map(|(k, v)| (k.as_str(), v)).collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter()
    }
}
