//! Container errors module

use thiserror::Error;

/// Errors produced while building or querying the container
#[derive(Error, Debug)]
pub enum ContainerError {
    #[error("Duplicate component name: {name}")]
    DuplicateName { name: String },

    #[error("Duplicate component type {type_name} (already registered as '{existing}')")]
    DuplicateType {
        type_name: &'static str,
        existing: String,
    },

    #[error("Component not found: {name}")]
    NotFound { name: String },

    #[error("No component of type {type_name}")]
    TypeNotFound { type_name: &'static str },

    #[error("Component '{name}' is not of type {expected}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
    },

    #[error("Component '{component}' depends on unregistered type {dependency}")]
    MissingDependency {
        component: String,
        dependency: &'static str,
    },

    #[error("Circular dependency involving: {cycle}")]
    CircularDependency { cycle: String },

    #[error("Failed to construct component '{name}': {reason}")]
    ConstructionFailed { name: String, reason: String },
}
