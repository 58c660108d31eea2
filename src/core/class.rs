//! core::class
//!
//! Command classes: named groups of commands for help output.
//!
//! Classes carry no execution semantics. They never take part in
//! dependency checks or option validation.

use serde::Serialize;

use super::registry::RegistryError;
use super::types::ClassId;

/// An organizational group of commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandClass {
    pub(crate) id: ClassId,
    pub(crate) name: String,
    pub(crate) description: String,
}

impl CommandClass {
    pub fn id(&self) -> ClassId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Registry of command classes, in creation order.
#[derive(Debug, Default)]
pub struct ClassRegistry {
    classes: Vec<CommandClass>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a class.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateClass` if `name` is taken.
    pub fn add(&mut self, name: &str, description: &str) -> Result<ClassId, RegistryError> {
        if name.trim().is_empty() {
            return Err(RegistryError::InvalidClassName(name.to_string()));
        }
        if self.classes.iter().any(|c| c.name == name) {
            return Err(RegistryError::DuplicateClass(name.to_string()));
        }

        let id = ClassId::from_index(self.classes.len());
        self.classes.push(CommandClass {
            id,
            name: name.to_string(),
            description: description.to_string(),
        });
        Ok(id)
    }

    /// Find a class by name.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotFound` if no class has that name.
    pub fn find(&self, name: &str) -> Result<ClassId, RegistryError> {
        self.classes
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.id)
            .ok_or_else(|| RegistryError::NotFound {
                kind: "command class",
                name: name.to_string(),
            })
    }

    pub fn get(&self, id: ClassId) -> Option<&CommandClass> {
        self.classes.get(id.index())
    }

    pub fn contains(&self, id: ClassId) -> bool {
        id.index() < self.classes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandClass> {
        self.classes.iter()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
