use crate::generator;
use crate::model::{BuildType, Project, ProjectRef, Step, User};

/// Per-test aggregate of generated entities, built once at setup and
/// referenced throughout the test body.
///
/// Instances are mutually consistent: the build type references the
/// container's project and the step references the container's build type.
/// All four are plain in-memory values; the test decides what to submit, in
/// which order, and whether to keep working with the in-memory copy or a
/// server-confirmed one.
#[derive(Debug, Clone)]
pub struct TestData {
    pub user: User,
    pub project: Project,
    pub build_type: BuildType,
    pub step: Step,
}

impl TestData {
    /// Generate one valid instance of each entity type, wired together.
    pub fn generate() -> Self {
        let user = generator::generate::<User>();
        let project = generator::generate::<Project>();
        let mut build_type = generator::generate::<BuildType>();
        build_type.project = Some(ProjectRef {
            id: project.id.clone(),
        });
        let mut step = generator::generate::<Step>();
        step.build_type_id = Some(build_type.id.clone());
        Self {
            user,
            project,
            build_type,
            step,
        }
    }
}
