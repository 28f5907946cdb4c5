use serde::Serialize;

use crate::auth::Specification;

use super::{Endpoint, RawResponse, RequestError};

/// Request surface that performs the call and returns the raw outcome.
///
/// Nothing about the response is judged here; negative-path scenarios assert
/// arbitrary status codes and error-message substrings themselves. Only a
/// failure of the HTTP call itself is an error.
pub struct UncheckedApi {
    spec: Specification,
    endpoint: Endpoint,
}

impl UncheckedApi {
    pub fn new(spec: Specification, endpoint: Endpoint) -> Self {
        Self { spec, endpoint }
    }

    /// # Errors
    ///
    /// Returns a [`RequestError`] only when the call fails to complete.
    pub fn create(&self, entity: &impl Serialize) -> Result<RawResponse, RequestError> {
        super::raw_create(&self.spec, &self.endpoint, entity)
    }

    /// # Errors
    ///
    /// Returns a [`RequestError`] only when the call fails to complete.
    pub fn read(&self, id: &str) -> Result<RawResponse, RequestError> {
        super::raw_read(&self.spec, &self.endpoint, id)
    }

    /// # Errors
    ///
    /// Returns a [`RequestError`] only when the call fails to complete.
    pub fn update(&self, id: &str, entity: &impl Serialize) -> Result<RawResponse, RequestError> {
        super::raw_update(&self.spec, &self.endpoint, id, entity)
    }

    /// # Errors
    ///
    /// Returns a [`RequestError`] only when the call fails to complete.
    pub fn delete(&self, id: &str) -> Result<RawResponse, RequestError> {
        super::raw_delete(&self.spec, &self.endpoint, id)
    }
}

/// Per-Specification bundle of unchecked endpoint surfaces.
pub struct UncheckedRequests {
    spec: Specification,
}

impl UncheckedRequests {
    pub fn new(spec: Specification) -> Self {
        Self { spec }
    }

    pub fn users(&self) -> UncheckedApi {
        UncheckedApi::new(self.spec.clone(), Endpoint::Users)
    }

    pub fn projects(&self) -> UncheckedApi {
        UncheckedApi::new(self.spec.clone(), Endpoint::Projects)
    }

    pub fn build_types(&self) -> UncheckedApi {
        UncheckedApi::new(self.spec.clone(), Endpoint::BuildTypes)
    }

    pub fn steps(&self, build_type_id: &str) -> UncheckedApi {
        UncheckedApi::new(
            self.spec.clone(),
            Endpoint::Steps {
                build_type_id: build_type_id.to_owned(),
            },
        )
    }
}
