use serde::{Deserialize, Serialize};

use super::{Entity, EntityDescriptor, FieldError, ParamField, ValueKind};

/// A role grant carried in a user payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    #[serde(rename = "roleId")]
    pub role_id: String,
    pub scope: String,
}

impl Role {
    /// Project administrator scoped to a single project.
    pub fn project_admin(project_id: &str) -> Self {
        Self {
            role_id: "PROJECT_ADMIN".to_string(),
            scope: format!("p:{project_id}"),
        }
    }

    /// System administrator with global scope.
    pub fn system_admin() -> Self {
        Self {
            role_id: "SYSTEM_ADMIN".to_string(),
            scope: "g".to_string(),
        }
    }
}

/// Role list wrapper matching the server's `roles` object shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roles {
    pub role: Vec<Role>,
}

impl Roles {
    pub fn single(role: Role) -> Self {
        Self { role: vec![role] }
    }
}

/// A server user account. The id is server-assigned on creation; the server
/// never echoes the password back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Roles>,
}

static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    entity: "User",
    parametrizable: &[ParamField {
        name: "username",
        kind: ValueKind::Identifier,
    }],
    parent: None,
};

impl Entity for User {
    fn descriptor() -> &'static EntityDescriptor {
        &DESCRIPTOR
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn name(&self) -> &str {
        &self.username
    }

    fn field(&self, field: &str) -> Option<String> {
        match field {
            "id" => self.id.clone(),
            "username" => Some(self.username.clone()),
            "password" => Some(self.password.clone()),
            _ => None,
        }
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), FieldError> {
        match field {
            "id" => self.id = Some(value.to_owned()),
            "username" => self.username = value.to_owned(),
            "password" => self.password = value.to_owned(),
            _ => return Err(FieldError::unknown("User", field)),
        }
        Ok(())
    }

    fn set_parent(&mut self, _parent_id: &str) -> Result<(), FieldError> {
        Err(FieldError::no_parent("User"))
    }
}
