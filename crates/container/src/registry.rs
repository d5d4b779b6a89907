//! Component registry.
//!
//! Constructed components are stored once and shared: lookups hand out
//! clones of the same `Arc`, so every consumer sees the same instance.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use crate::definition::{ComponentRole, SharedComponent};
use crate::errors::ContainerError;

/// A component after construction, with its registration metadata.
struct RegisteredComponent {
    name: String,
    role: ComponentRole,
    type_name: &'static str,
    instance: SharedComponent,
}

/// Registry of constructed singletons, indexed by type and by name.
#[derive(Default)]
pub struct ComponentRegistry {
    /// Components in construction order
    components: Vec<RegisteredComponent>,
    /// Name index into `components`
    by_name: HashMap<String, usize>,
    /// Type index into `components`
    by_type: HashMap<TypeId, usize>,
}

impl ComponentRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a constructed component under its name and type.
    pub(crate) fn insert(
        &mut self,
        name: String,
        role: ComponentRole,
        type_id: TypeId,
        type_name: &'static str,
        instance: SharedComponent,
    ) -> Result<(), ContainerError> {
        if self.by_name.contains_key(&name) {
            return Err(ContainerError::DuplicateName { name });
        }
        if let Some(&index) = self.by_type.get(&type_id) {
            return Err(ContainerError::DuplicateType {
                type_name,
                existing: self.components[index].name.clone(),
            });
        }

        let index = self.components.len();
        self.by_name.insert(name.clone(), index);
        self.by_type.insert(type_id, index);
        self.components.push(RegisteredComponent {
            name,
            role,
            type_name,
            instance,
        });
        Ok(())
    }

    /// Look up a component by type.
    pub fn get<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, ContainerError> {
        let index = self
            .by_type
            .get(&TypeId::of::<T>())
            .copied()
            .ok_or(ContainerError::TypeNotFound {
                type_name: std::any::type_name::<T>(),
            })?;
        self.downcast(index)
    }

    /// Look up a component by name and downcast it to a concrete type.
    pub fn get_by_name<T: Send + Sync + 'static>(
        &self,
        name: &str,
    ) -> Result<Arc<T>, ContainerError> {
        let index = self
            .by_name
            .get(name)
            .copied()
            .ok_or_else(|| ContainerError::NotFound {
                name: name.to_string(),
            })?;
        self.downcast(index)
    }

    /// Untyped lookup by name.
    pub fn get_any(&self, name: &str) -> Result<SharedComponent, ContainerError> {
        self.by_name
            .get(name)
            .map(|&index| self.components[index].instance.clone())
            .ok_or_else(|| ContainerError::NotFound {
                name: name.to_string(),
            })
    }

    fn downcast<T: Send + Sync + 'static>(&self, index: usize) -> Result<Arc<T>, ContainerError> {
        let component = &self.components[index];
        component
            .instance
            .clone()
            .downcast::<T>()
            .map_err(|_| ContainerError::TypeMismatch {
                name: component.name.clone(),
                expected: std::any::type_name::<T>(),
            })
    }

    /// Whether a component of type `T` is registered.
    pub fn contains<T: 'static>(&self) -> bool {
        self.by_type.contains_key(&TypeId::of::<T>())
    }

    /// Whether a component is registered under the given name.
    pub fn contains_name(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Names of components with the given role, in registration order.
    pub fn names_with_role(&self, role: ComponentRole) -> Vec<&str> {
        self.components
            .iter()
            .filter(|component| component.role == role)
            .map(|component| component.name.as_str())
            .collect()
    }

    /// All component names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.components
            .iter()
            .map(|component| component.name.as_str())
            .collect()
    }

    /// `(name, type name)` pairs for every component, in registration order.
    pub fn describe(&self) -> Vec<(&str, &'static str)> {
        self.components
            .iter()
            .map(|component| (component.name.as_str(), component.type_name))
            .collect()
    }

    /// Number of registered components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct UserRepository;
    #[derive(Debug)]
    struct UserService;

    fn registry_with<T: Send + Sync + 'static>(
        name: &str,
        role: ComponentRole,
        instance: T,
    ) -> ComponentRegistry {
        let mut registry = ComponentRegistry::new();
        registry
            .insert(
                name.to_string(),
                role,
                TypeId::of::<T>(),
                std::any::type_name::<T>(),
                Arc::new(instance),
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_lookups_share_one_instance() {
        let registry = registry_with("userRepository", ComponentRole::Repository, UserRepository);

        let by_type = registry.get::<UserRepository>().unwrap();
        let by_name = registry
            .get_by_name::<UserRepository>("userRepository")
            .unwrap();

        assert!(Arc::ptr_eq(&by_type, &by_name));
    }

    #[test]
    fn test_missing_component_errors_name_what_was_asked() {
        let registry = ComponentRegistry::new();

        let err = registry.get::<UserService>().unwrap_err();
        assert!(matches!(err, ContainerError::TypeNotFound { .. }));

        let err = registry.get_by_name::<UserService>("userService").unwrap_err();
        assert!(matches!(err, ContainerError::NotFound { .. }));
        assert!(err.to_string().contains("userService"));
    }

    #[test]
    fn test_wrong_type_downcast_is_an_error() {
        let registry = registry_with("userRepository", ComponentRole::Repository, UserRepository);

        let err = registry
            .get_by_name::<UserService>("userRepository")
            .unwrap_err();
        assert!(matches!(err, ContainerError::TypeMismatch { .. }));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut registry =
            registry_with("userRepository", ComponentRole::Repository, UserRepository);

        let err = registry
            .insert(
                "userRepository".to_string(),
                ComponentRole::Service,
                TypeId::of::<UserService>(),
                std::any::type_name::<UserService>(),
                Arc::new(UserService),
            )
            .unwrap_err();
        assert!(matches!(err, ContainerError::DuplicateName { .. }));
    }

    #[test]
    fn test_names_with_role_preserves_registration_order() {
        let mut registry = ComponentRegistry::new();
        registry
            .insert(
                "userRepository".to_string(),
                ComponentRole::Repository,
                TypeId::of::<UserRepository>(),
                std::any::type_name::<UserRepository>(),
                Arc::new(UserRepository),
            )
            .unwrap();
        registry
            .insert(
                "userService".to_string(),
                ComponentRole::Service,
                TypeId::of::<UserService>(),
                std::any::type_name::<UserService>(),
                Arc::new(UserService),
            )
            .unwrap();

        assert_eq!(registry.names(), vec!["userRepository", "userService"]);
        assert_eq!(
            registry.names_with_role(ComponentRole::Service),
            vec!["userService"]
        );
        assert!(registry
            .names_with_role(ComponentRole::Controller)
            .is_empty());
    }
}
