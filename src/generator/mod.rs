pub mod random;

use crate::model::{BuildType, Entity, FieldError, Project, ProjectRef, Step, User};

/// Per-type construction of a fully valid instance.
///
/// Every parametrizable field receives a fresh random value and every
/// required parent reference is satisfied by generating a new valid parent
/// recursively: a build type generates a project and references its id, a
/// step generates a build type chain. Callers that want to share a parent
/// across instances overwrite the reference afterwards with
/// [`Entity::set_parent`].
pub trait Generate: Entity {
    /// Build a fully valid instance.
    fn generate_valid() -> Self;
}

impl Generate for User {
    fn generate_valid() -> Self {
        Self {
            id: None,
            username: random::identifier(),
            password: random::random_string(12, random::ALPHANUMERIC),
            roles: None,
        }
    }
}

impl Generate for Project {
    fn generate_valid() -> Self {
        Self {
            id: random::identifier(),
            name: random::display_name(),
        }
    }
}

impl Generate for BuildType {
    fn generate_valid() -> Self {
        let parent = Project::generate_valid();
        Self {
            id: random::identifier(),
            name: random::display_name(),
            project: Some(ProjectRef { id: parent.id }),
        }
    }
}

impl Generate for Step {
    fn generate_valid() -> Self {
        let parent = BuildType::generate_valid();
        Self {
            id: None,
            name: random::display_name(),
            build_type_id: Some(parent.id),
            ..Self::default()
        }
    }
}

/// Produce a fully valid instance of `T`.
pub fn generate<T: Generate>() -> T {
    T::generate_valid()
}

/// Produce a valid instance of `T` whose parametrizable field values collide
/// with none of `existing`.
///
/// Collisions are checked by exact value equality per field independently and
/// re-rolled until the combined set is collision-free.
pub fn generate_unique<T: Generate>(existing: &[T]) -> T {
    let mut instance = T::generate_valid();
    reroll_collisions(&mut instance, existing, None);
    instance
}

/// Produce an instance of `T` that is valid in every field except the one
/// named `field`, which is forced to `value` even if invalid.
///
/// This is how negative scenarios are built: exactly one dimension deviates
/// from validity.
///
/// # Errors
///
/// Returns a [`FieldError`] if `T` has no field named `field`.
pub fn generate_with<T: Generate>(field: &str, value: &str) -> Result<T, FieldError> {
    let mut instance = T::generate_valid();
    instance.set_field(field, value)?;
    Ok(instance)
}

/// Combined form: uniqueness against `existing` for every parametrizable
/// field except `field`, which is forced to `value` afterwards.
///
/// The override always wins over uniqueness; a colliding override is kept as
/// supplied, since duplicate-id scenarios depend on it.
///
/// # Errors
///
/// Returns a [`FieldError`] if `T` has no field named `field`.
pub fn generate_unique_with<T: Generate>(
    existing: &[T],
    field: &str,
    value: &str,
) -> Result<T, FieldError> {
    let mut instance = T::generate_valid();
    reroll_collisions(&mut instance, existing, Some(field));
    instance.set_field(field, value)?;
    Ok(instance)
}

/// Re-roll every parametrizable field of `instance` that collides with a
/// value already present in `existing`, skipping `skip` when set.
fn reroll_collisions<T: Generate>(instance: &mut T, existing: &[T], skip: Option<&str>) {
    for param in T::descriptor().parametrizable {
        if skip == Some(param.name) {
            continue;
        }
        while collides(instance, existing, param.name) {
            // Descriptor-listed fields are settable by construction.
            let _ = instance.set_field(param.name, &random::value_for(param.kind));
        }
    }
}

fn collides<T: Entity>(instance: &T, existing: &[T], field: &str) -> bool {
    let Some(value) = instance.field(field) else {
        return false;
    };
    existing
        .iter()
        .any(|other| other.field(field).as_deref() == Some(value.as_str()))
}
