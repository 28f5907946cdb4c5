use serde::{Deserialize, Serialize};

use super::{Entity, EntityDescriptor, FieldError, ParamField, ValueKind};

/// Parent project reference carried inside a build type payload. The owning
/// project is referenced by id only, never embedded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub id: String,
}

/// A build configuration owned by a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildType {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectRef>,
}

static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    entity: "BuildType",
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
    parent: Some("Project"),
};

impl Entity for BuildType {
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
            "project" => self.project.as_ref().map(|p| p.id.clone()),
            _ => None,
        }
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), FieldError> {
        match field {
            "id" => self.id = value.to_owned(),
            "name" => self.name = value.to_owned(),
            "project" => {
                self.project = Some(ProjectRef {
                    id: value.to_owned(),
                });
            }
            _ => return Err(FieldError::unknown("BuildType", field)),
        }
        Ok(())
    }

    fn set_parent(&mut self, parent_id: &str) -> Result<(), FieldError> {
        self.project = Some(ProjectRef {
            id: parent_id.to_owned(),
        });
        Ok(())
    }
}
