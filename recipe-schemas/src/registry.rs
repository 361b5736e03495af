//! Schema registry: the runtime schema selector.
//!
//! Entities are compiled types, but the contract export and the CLI need to
//! enumerate them and pick one by name. The registry keeps them in
//! registration order, which is also the order they are exported in.

use serde::Serialize;

use crate::entities::{
    CreateRecipe, KosherType, Login, RateRecipe, RecipeId, Register, RegisterWithConfirm,
    UpdateRecipe, UserRole,
};
use crate::schema::Schema;
use crate::traits::EntitySchema;

/// One registered entity.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SchemaEntry {
    /// Type name, e.g. `"Login"`
    pub type_name: &'static str,
    /// Schema constant name, e.g. `"LoginSchema"`
    pub schema_name: &'static str,
    pub schema: &'static Schema,
}

impl SchemaEntry {
    /// The entry for an entity type.
    pub fn of<T: EntitySchema>() -> Self {
        Self {
            type_name: T::type_name(),
            schema_name: T::schema_name(),
            schema: T::schema(),
        }
    }

    fn matches(&self, name: &str) -> bool {
        self.schema_name == name || self.type_name == name
    }
}

/// A registry of entity schemas.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    entries: Vec<SchemaEntry>,
}

impl SchemaRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every entity this crate defines, picklists first so the exported
    /// module reads top-down.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry
            .register::<KosherType>()
            .register::<UserRole>()
            .register::<RecipeId>()
            .register::<Register>()
            .register::<RegisterWithConfirm>()
            .register::<Login>()
            .register::<CreateRecipe>()
            .register::<UpdateRecipe>()
            .register::<RateRecipe>();
        registry
    }

    /// Register an entity. Registering the same schema name again replaces
    /// the earlier entry in place.
    pub fn register<T: EntitySchema>(&mut self) -> &mut Self {
        self.insert(SchemaEntry::of::<T>())
    }

    pub fn insert(&mut self, entry: SchemaEntry) -> &mut Self {
        match self
            .entries
            .iter_mut()
            .find(|existing| existing.schema_name == entry.schema_name)
        {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        self
    }

    /// Look up by schema name (`LoginSchema`) or type name (`Login`).
    pub fn get(&self, name: &str) -> Option<&SchemaEntry> {
        self.entries.iter().find(|entry| entry.matches(name))
    }

    /// Get all registered entries in registration order.
    pub fn entries(&self) -> impl Iterator<Item = &SchemaEntry> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.schema_name)
    }

    /// Get the number of registered schemas.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
