//! Application context.
//!
//! `ContextBuilder` collects component definitions; `build` runs the
//! container pipeline: validate the definition set, order it by declared
//! dependencies, construct each component, and hand back a context over the
//! finished registry.

use std::any::TypeId;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use tracing::{debug, info};

use crate::definition::{ComponentDefinition, ComponentRole, SharedComponent};
use crate::errors::ContainerError;
use crate::registry::ComponentRegistry;

/// Builder collecting definitions before anything is constructed.
#[derive(Default)]
pub struct ContextBuilder {
    definitions: Vec<ComponentDefinition>,
}

impl ContextBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component definition.
    pub fn register(mut self, definition: ComponentDefinition) -> Self {
        debug!(component = definition.name(), "registered definition");
        self.definitions.push(definition);
        self
    }

    /// Number of definitions registered so far.
    pub fn definition_count(&self) -> usize {
        self.definitions.len()
    }

    /// Construct every registered component, dependencies first.
    pub fn build(self) -> Result<ApplicationContext, ContainerError> {
        validate(&self.definitions)?;
        let order = construction_order(&self.definitions)?;

        let mut registry = ComponentRegistry::new();
        for index in order {
            let definition = &self.definitions[index];
            let instance = construct(definition, &registry)?;
            registry.insert(
                definition.name().to_string(),
                definition.role(),
                definition.type_id(),
                definition.type_name(),
                instance,
            )?;
            debug!(
                component = definition.name(),
                type_name = definition.type_name(),
                "constructed component"
            );
        }

        info!(components = registry.len(), "application context ready");
        Ok(ApplicationContext { registry })
    }
}

fn construct(
    definition: &ComponentDefinition,
    registry: &ComponentRegistry,
) -> Result<SharedComponent, ContainerError> {
    definition
        .construct(registry)
        .map_err(|source| ContainerError::ConstructionFailed {
            name: definition.name().to_string(),
            reason: source.to_string(),
        })
}

/// Reject duplicate names, duplicate types, and dependencies on types that
/// no definition provides.
fn validate(definitions: &[ComponentDefinition]) -> Result<(), ContainerError> {
    let mut names: HashMap<&str, ()> = HashMap::new();
    let mut types: HashMap<TypeId, &str> = HashMap::new();

    for definition in definitions {
        if names.insert(definition.name(), ()).is_some() {
            return Err(ContainerError::DuplicateName {
                name: definition.name().to_string(),
            });
        }
        if let Some(existing) = types.insert(definition.type_id(), definition.name()) {
            return Err(ContainerError::DuplicateType {
                type_name: definition.type_name(),
                existing: existing.to_string(),
            });
        }
    }

    for definition in definitions {
        for dependency in definition.dependencies() {
            if !types.contains_key(&dependency.type_id()) {
                return Err(ContainerError::MissingDependency {
                    component: definition.name().to_string(),
                    dependency: dependency.type_name(),
                });
            }
        }
    }

    Ok(())
}

/// Topological construction order over the declared dependency edges,
/// ties broken by registration order.
fn construction_order(definitions: &[ComponentDefinition]) -> Result<Vec<usize>, ContainerError> {
    let index_of: HashMap<TypeId, usize> = definitions
        .iter()
        .enumerate()
        .map(|(index, definition)| (definition.type_id(), index))
        .collect();

    let mut in_degree = vec![0usize; definitions.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); definitions.len()];

    for (index, definition) in definitions.iter().enumerate() {
        for dependency in definition.dependencies() {
            if let Some(&dep_index) = index_of.get(&dependency.type_id()) {
                dependents[dep_index].push(index);
                in_degree[index] += 1;
            }
        }
    }

    let mut queue: VecDeque<usize> = (0..definitions.len())
        .filter(|&index| in_degree[index] == 0)
        .collect();
    let mut order = Vec::with_capacity(definitions.len());

    while let Some(index) = queue.pop_front() {
        order.push(index);
        for &dependent in &dependents[index] {
            in_degree[dependent] -= 1;
            if in_degree[dependent] == 0 {
                queue.push_back(dependent);
            }
        }
    }

    if order.len() != definitions.len() {
        let cycle = definitions
            .iter()
            .enumerate()
            .filter(|(index, _)| in_degree[*index] > 0)
            .map(|(_, definition)| definition.name())
            .collect::<Vec<_>>()
            .join(" -> ");
        return Err(ContainerError::CircularDependency { cycle });
    }

    Ok(order)
}

/// The finished container: every component constructed and shared.
pub struct ApplicationContext {
    registry: ComponentRegistry,
}

impl std::fmt::Debug for ApplicationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplicationContext").finish_non_exhaustive()
    }
}

impl ApplicationContext {
    /// Start collecting definitions for a new context.
    pub fn builder() -> ContextBuilder {
        ContextBuilder::new()
    }

    /// Look up a component by type.
    pub fn get<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, ContainerError> {
        self.registry.get()
    }

    /// Look up a component by name and downcast it to a concrete type.
    pub fn get_by_name<T: Send + Sync + 'static>(
        &self,
        name: &str,
    ) -> Result<Arc<T>, ContainerError> {
        self.registry.get_by_name(name)
    }

    /// Whether a component of type `T` was constructed.
    pub fn contains<T: 'static>(&self) -> bool {
        self.registry.contains::<T>()
    }

    /// Names of components with the given role, in registration order.
    pub fn names_with_role(&self, role: ComponentRole) -> Vec<&str> {
        self.registry.names_with_role(role)
    }

    /// Access the underlying registry.
    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Number of constructed components.
    pub fn component_count(&self) -> usize {
        self.registry.len()
    }
}
