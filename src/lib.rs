//! Conformance-test framework for the Forge build server REST API.
//!
//! The crate has two halves. The generation half produces structurally valid,
//! mutually consistent graphs of domain entities (users, projects, build
//! configurations, steps) with controllable single-field overrides for
//! negative scenarios. The request half issues CRUD operations against named
//! endpoints through an authenticated [`auth::Specification`], in one of two
//! modes: checked operations enforce the expected success outcome and return
//! the decoded entity, unchecked operations return the raw response for the
//! test to assert against.
//!
//! Everything is built for parallel test execution: generators are stateless,
//! and Specifications and request surfaces are immutable per-test values.

pub mod auth;
pub mod config;
pub mod container;
pub mod generator;
pub mod model;
pub mod request;
