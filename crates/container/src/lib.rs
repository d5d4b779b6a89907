//! Melt component container
//!
//! This crate provides the inversion-of-control core of Melt: component
//! definitions with stereotype roles, a singleton registry indexed by type
//! and by name, and an application context that constructs components in
//! dependency order.

pub mod context;
pub mod definition;
pub mod errors;
pub mod registry;

// Re-export key types for easy access
pub use context::{ApplicationContext, ContextBuilder};
pub use definition::{
    default_component_name, ComponentDefinition, ComponentRole, Dependency, SharedComponent,
};
pub use errors::ContainerError;
pub use registry::ComponentRegistry;

/// Result type for container operations
pub type Result<T> = std::result::Result<T, ContainerError>;
