use std::marker::PhantomData;

use crate::auth::Specification;
use crate::model::{BuildType, Entity, Project, Step, User};

use super::{Endpoint, RawResponse, RequestError, RequestErrorKind};

/// Request surface that enforces the expected success outcome.
///
/// Every operation issues the call, asserts the 2xx class and decodes the
/// server-confirmed entity. A deviating status is surfaced immediately as an
/// [`RequestErrorKind::UnexpectedStatus`] error carrying the response body;
/// nothing is retried, since a wrong status signals a setup bug or a genuine
/// defect in the server under test.
pub struct CheckedApi<T: Entity> {
    spec: Specification,
    endpoint: Endpoint,
    _entity: PhantomData<T>,
}

impl<T: Entity> CheckedApi<T> {
    pub fn new(spec: Specification, endpoint: Endpoint) -> Self {
        Self {
            spec,
            endpoint,
            _entity: PhantomData,
        }
    }

    /// Create the entity remotely and return the server-confirmed copy.
    ///
    /// The confirmed copy may carry server-assigned fields; it is never
    /// merged back into the submitted instance.
    ///
    /// # Errors
    ///
    /// Returns a [`RequestError`] on transport failure, a non-2xx status, or
    /// an undecodable body.
    pub fn create(&self, entity: &T) -> Result<T, RequestError> {
        let response = super::raw_create(&self.spec, &self.endpoint, entity)?;
        ensure_success(response)?.json()
    }

    /// Read the entity with the given id (or locator).
    ///
    /// # Errors
    ///
    /// Returns a [`RequestError`] on transport failure, a non-2xx status, or
    /// an undecodable body.
    pub fn read(&self, id: &str) -> Result<T, RequestError> {
        let response = super::raw_read(&self.spec, &self.endpoint, id)?;
        ensure_success(response)?.json()
    }

    /// Replace the entity with the given id.
    ///
    /// # Errors
    ///
    /// Returns a [`RequestError`] on transport failure, a non-2xx status, or
    /// an undecodable body.
    pub fn update(&self, id: &str, entity: &T) -> Result<T, RequestError> {
        let response = super::raw_update(&self.spec, &self.endpoint, id, entity)?;
        ensure_success(response)?.json()
    }

    /// Delete the entity with the given id. Asserts the success class but
    /// decodes nothing.
    ///
    /// # Errors
    ///
    /// Returns a [`RequestError`] on transport failure or a non-2xx status.
    pub fn delete(&self, id: &str) -> Result<(), RequestError> {
        let response = super::raw_delete(&self.spec, &self.endpoint, id)?;
        ensure_success(response).map(|_| ())
    }
}

/// Enforce the 2xx contract shared by every checked operation.
fn ensure_success(response: RawResponse) -> Result<RawResponse, RequestError> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(RequestError {
            kind: RequestErrorKind::UnexpectedStatus(response.status),
            message: format!("expected a success status, got {}", response.status),
            detail: Some(response.body),
        })
    }
}

/// Per-Specification bundle of checked endpoint surfaces.
pub struct CheckedRequests {
    spec: Specification,
}

impl CheckedRequests {
    pub fn new(spec: Specification) -> Self {
        Self { spec }
    }

    pub fn users(&self) -> CheckedApi<User> {
        CheckedApi::new(self.spec.clone(), Endpoint::Users)
    }

    pub fn projects(&self) -> CheckedApi<Project> {
        CheckedApi::new(self.spec.clone(), Endpoint::Projects)
    }

    pub fn build_types(&self) -> CheckedApi<BuildType> {
        CheckedApi::new(self.spec.clone(), Endpoint::BuildTypes)
    }

    pub fn steps(&self, build_type_id: &str) -> CheckedApi<Step> {
        CheckedApi::new(
            self.spec.clone(),
            Endpoint::Steps {
                build_type_id: build_type_id.to_owned(),
            },
        )
    }
}
