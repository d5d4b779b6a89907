//! Component definitions.
//!
//! A definition describes a component before it exists: its registry name,
//! its stereotype role, the dependencies it needs, and a constructor closure
//! that produces the instance once those dependencies are available.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::errors::ContainerError;
use crate::registry::ComponentRegistry;

/// A constructed component as stored in the registry.
pub type SharedComponent = Arc<dyn Any + Send + Sync>;

type Constructor =
    Box<dyn Fn(&ComponentRegistry) -> Result<SharedComponent, ContainerError> + Send + Sync>;

/// Stereotype roles a component can be registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentRole {
    /// General-purpose component
    Component,
    /// Business logic layer
    Service,
    /// Data access layer
    Repository,
    /// Web request handling layer
    Controller,
}

impl ComponentRole {
    /// Get all available roles
    pub fn all() -> Vec<ComponentRole> {
        vec![
            ComponentRole::Component,
            ComponentRole::Service,
            ComponentRole::Repository,
            ComponentRole::Controller,
        ]
    }
}

/// A dependency declared by a component definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dependency {
    type_id: TypeId,
    type_name: &'static str,
}

impl Dependency {
    /// Declare a dependency on a component of type `T`.
    pub fn of<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// The depended-on component type.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Human-readable name of the depended-on type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

/// Derive a registry name from a type: the last path segment with its first
/// character lower-cased (`app::UserService` becomes `userService`).
pub fn default_component_name<T: 'static>() -> String {
    let type_name = std::any::type_name::<T>();
    let base = type_name.split('<').next().unwrap_or(type_name);
    let simple = base.rsplit("::").next().unwrap_or(base);

    let mut chars = simple.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Declarative description of a component: nothing is constructed until the
/// application context builds.
pub struct ComponentDefinition {
    name: String,
    role: ComponentRole,
    type_id: TypeId,
    type_name: &'static str,
    dependencies: Vec<Dependency>,
    constructor: Constructor,
}

impl ComponentDefinition {
    /// Create a definition with an explicit name.
    ///
    /// The constructor receives the registry with all declared dependencies
    /// already constructed, so it can fetch them by type.
    pub fn new<T, F>(name: impl Into<String>, role: ComponentRole, constructor: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&ComponentRegistry) -> Result<T, ContainerError> + Send + Sync + 'static,
    {
        ComponentDefinition {
            name: name.into(),
            role,
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            dependencies: Vec::new(),
            constructor: Box::new(move |registry| {
                constructor(registry).map(|component| Arc::new(component) as SharedComponent)
            }),
        }
    }

    /// Create a definition named after its type (see [`default_component_name`]).
    pub fn of<T, F>(role: ComponentRole, constructor: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&ComponentRegistry) -> Result<T, ContainerError> + Send + Sync + 'static,
    {
        Self::new(default_component_name::<T>(), role, constructor)
    }

    /// Declare a dependency on a component of type `D`.
    ///
    /// Declared dependencies drive construction order and cycle detection;
    /// the constructor can rely on them being present in the registry.
    pub fn depends_on<D: 'static>(mut self) -> Self {
        let dependency = Dependency::of::<D>();
        if !self.dependencies.contains(&dependency) {
            self.dependencies.push(dependency);
        }
        self
    }

    /// Registry name for this component.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stereotype role for this component.
    pub fn role(&self) -> ComponentRole {
        self.role
    }

    /// Concrete type identity of the component this definition constructs.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Human-readable name of the component type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Dependencies declared for this component.
    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    pub(crate) fn construct(
        &self,
        registry: &ComponentRegistry,
    ) -> Result<SharedComponent, ContainerError> {
        (self.constructor)(registry)
    }
}

impl fmt::Debug for ComponentDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDefinition")
            .field("name", &self.name)
            .field("role", &self.role)
            .field("type_name", &self.type_name)
            .field("dependencies", &self.dependencies)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct UserService;
    struct UserRepository;

    #[test]
    fn test_default_component_name() {
        assert_eq!(default_component_name::<UserService>(), "userService");
        assert_eq!(default_component_name::<UserRepository>(), "userRepository");
    }

    #[test]
    fn test_default_name_strips_generics() {
        assert_eq!(default_component_name::<Vec<UserService>>(), "vec");
    }

    #[test]
    fn test_definition_metadata() {
        let definition =
            ComponentDefinition::new("userService", ComponentRole::Service, |_| Ok(UserService));

        assert_eq!(definition.name(), "userService");
        assert_eq!(definition.role(), ComponentRole::Service);
        assert_eq!(definition.type_id(), TypeId::of::<UserService>());
        assert!(definition.dependencies().is_empty());
    }

    #[test]
    fn test_depends_on_deduplicates() {
        let definition = ComponentDefinition::of::<UserService, _>(ComponentRole::Service, |_| {
            Ok(UserService)
        })
        .depends_on::<UserRepository>()
        .depends_on::<UserRepository>();

        assert_eq!(definition.dependencies().len(), 1);
        assert_eq!(
            definition.dependencies()[0].type_id(),
            TypeId::of::<UserRepository>()
        );
    }

    #[test]
    fn test_role_all() {
        assert_eq!(ComponentRole::all().len(), 4);
    }
}
