pub mod build_type;
pub mod project;
pub mod step;
pub mod user;

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

pub use build_type::{BuildType, ProjectRef};
pub use project::Project;
pub use step::Step;
pub use user::{Role, Roles, User};

/// Class of random value a parametrizable field takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Server-safe identifier: starts with a letter, alphanumeric, bounded.
    Identifier,
    /// Human-readable display name.
    Name,
}

/// A field whose value must be unique among generated instances of the same
/// entity type within one test run.
#[derive(Debug, Clone, Copy)]
pub struct ParamField {
    /// Serialized field name, as it appears on the wire.
    pub name: &'static str,
    pub kind: ValueKind,
}

/// Static per-type metadata consulted by the generator.
///
/// Lists the parametrizable fields and the parent entity (if any) instead of
/// discovering them through reflection; each entity type exposes exactly one
/// descriptor through [`Entity::descriptor`].
#[derive(Debug, Clone, Copy)]
pub struct EntityDescriptor {
    /// Entity type name used in error messages.
    pub entity: &'static str,
    pub parametrizable: &'static [ParamField],
    /// Entity type name of the required parent, if the type has one.
    pub parent: Option<&'static str>,
}

/// Error for by-name field access on an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub entity: &'static str,
    pub message: String,
}

impl FieldError {
    pub(crate) fn unknown(entity: &'static str, field: &str) -> Self {
        Self {
            entity,
            message: format!("no field named \"{field}\""),
        }
    }

    pub(crate) fn no_parent(entity: &'static str) -> Self {
        Self {
            entity,
            message: "entity has no parent reference".to_string(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.entity, self.message)
    }
}

impl std::error::Error for FieldError {}

/// Common identity shape shared by every domain resource.
///
/// Entities are pure value types: an opaque string id, a human-readable name,
/// and at most one parent reference held as a plain id. By-name field access
/// exists for the generator (uniqueness checks and single-field overrides);
/// field names are the serialized names.
pub trait Entity: Clone + Serialize + DeserializeOwned {
    /// Static metadata for this entity type.
    fn descriptor() -> &'static EntityDescriptor;

    /// The id, if one is set. Server-assigned ids are absent until the entity
    /// has been created remotely.
    fn id(&self) -> Option<&str>;

    /// The human-readable name (the username for users).
    fn name(&self) -> &str;

    /// Read a named field's current value.
    fn field(&self, field: &str) -> Option<String>;

    /// Write a named field.
    ///
    /// # Errors
    ///
    /// Returns a [`FieldError`] if the type has no field with that name.
    fn set_field(&mut self, field: &str, value: &str) -> Result<(), FieldError>;

    /// Set the parent reference to the given id.
    ///
    /// # Errors
    ///
    /// Returns a [`FieldError`] for types without a parent slot.
    fn set_parent(&mut self, parent_id: &str) -> Result<(), FieldError>;
}
