use serde::{Deserialize, Serialize};

use super::{Entity, EntityDescriptor, FieldError, ParamField, ValueKind};

/// A top-level project. The id is client-chosen and must satisfy the server's
/// id rules unless a test deliberately overrides it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
}

static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    entity: "Project",
    parametrizable: &[
        ParamField {
            name: "id",
            kind: ValueKind::Identifier,
        },
        ParamField {
            name: "name",
            kind: ValueKind::Name,
        },
    ],
    parent: None,
};

impl Entity for Project {
    fn descriptor() -> &'static EntityDescriptor {
        &DESCRIPTOR
    }

    fn id(&self) -> Option<&str> {
        Some(&self.id)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn field(&self, field: &str) -> Option<String> {
        match field {
            "id" => Some(self.id.clone()),
            "name" => Some(self.name.clone()),
            _ => None,
        }
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), FieldError> {
        match field {
            "id" => self.id = value.to_owned(),
            "name" => self.name = value.to_owned(),
            _ => return Err(FieldError::unknown("Project", field)),
        }
        Ok(())
    }

    fn set_parent(&mut self, _parent_id: &str) -> Result<(), FieldError> {
        Err(FieldError::no_parent("Project"))
    }
}
