use serde::{Deserialize, Serialize};

use super::{Entity, EntityDescriptor, FieldError, ParamField, ValueKind};

fn default_step_type() -> String {
    "simpleRunner".to_string()
}

/// A build step owned by a build type. Steps are created nested under their
/// build type, so the owning id travels in the request path rather than the
/// payload; `build_type_id` exists for path construction only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type", default = "default_step_type")]
    pub step_type: String,
    #[serde(skip)]
    pub build_type_id: Option<String>,
}

impl Default for Step {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            step_type: default_step_type(),
            build_type_id: None,
        }
    }
}

static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    entity: "Step",
    parametrizable: &[ParamField {
        name: "name",
        kind: ValueKind::Name,
    }],
    parent: Some("BuildType"),
};

impl Entity for Step {
    fn descriptor() -> &'static EntityDescriptor {
        &DESCRIPTOR
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn field(&self, field: &str) -> Option<String> {
        match field {
            "id" => self.id.clone(),
            "name" => Some(self.name.clone()),
            "type" => Some(self.step_type.clone()),
            _ => None,
        }
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), FieldError> {
        match field {
            "id" => self.id = Some(value.to_owned()),
            "name" => self.name = value.to_owned(),
            "type" => self.step_type = value.to_owned(),
            _ => return Err(FieldError::unknown("Step", field)),
        }
        Ok(())
    }

    fn set_parent(&mut self, parent_id: &str) -> Result<(), FieldError> {
        self.build_type_id = Some(parent_id.to_owned());
        Ok(())
    }
}
