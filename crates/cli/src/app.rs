//! Demo application wired through the Melt container.
//!
//! A small user-management app: an in-memory repository, a service with the
//! repository injected, and two controllers declaring the HTTP surface.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;
use tracing::debug;

use melt_container::{ComponentDefinition, ComponentRole};
use melt_web::{Controller, Request, Response, Route, WebContext, WebError};

/// A stored user.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: u64,
    pub name: String,
}

/// In-memory user store.
pub struct UserRepository {
    users: RwLock<Vec<User>>,
}

impl UserRepository {
    /// Create a repository seeded with a few users.
    pub fn seeded() -> Self {
        let users = ["user1", "user2", "user3"]
            .iter()
            .enumerate()
            .map(|(index, name)| User {
                id: index as u64 + 1,
                name: (*name).to_string(),
            })
            .collect();
        Self {
            users: RwLock::new(users),
        }
    }

    /// Create an empty repository.
    pub fn empty() -> Self {
        Self {
            users: RwLock::new(Vec::new()),
        }
    }

    pub fn find_all(&self) -> Vec<User> {
        self.read().clone()
    }

    pub fn find_by_id(&self, id: u64) -> Option<User> {
        self.read().iter().find(|user| user.id == id).cloned()
    }

    pub fn count(&self) -> usize {
        self.read().len()
    }

    /// Store a new user under the next free id.
    pub fn save(&self, name: &str) -> User {
        let mut users = self.write();
        let id = users.iter().map(|user| user.id).max().unwrap_or(0) + 1;
        let user = User {
            id,
            name: name.to_string(),
        };
        users.push(user.clone());
        user
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<User>> {
        self.users
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<User>> {
        self.users
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Business layer over the user repository.
pub struct UserService {
    repository: Arc<UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<UserRepository>) -> Self {
        Self { repository }
    }

    pub fn list_users(&self) -> Vec<User> {
        self.repository.find_all()
    }

    pub fn find_user(&self, id: u64) -> Option<User> {
        self.repository.find_by_id(id)
    }

    pub fn user_count(&self) -> usize {
        self.repository.count()
    }

    pub fn create_user(&self, name: &str) -> User {
        debug!(name, "saving user");
        self.repository.save(name)
    }

    /// The injected repository (shared with the container).
    pub fn repository(&self) -> &Arc<UserRepository> {
        &self.repository
    }
}

/// Web surface for the user app.
pub struct UserController {
    service: Arc<UserService>,
}

impl UserController {
    pub fn new(service: Arc<UserService>) -> Self {
        Self { service }
    }
}

impl Controller for UserController {
    fn routes(self: Arc<Self>) -> Result<Vec<Route>, WebError> {
        Ok(vec![
            Route::get("/hello", "UserController.hello", |_req: &Request| {
                Ok(Response::text("Hello from UserController!"))
            })?,
            Route::get("/users", "UserController.users", {
                let this = Arc::clone(&self);
                move |_req: &Request| Response::json(&this.service.list_users())
            })?,
            Route::get("/users/count", "UserController.user_count", {
                let this = Arc::clone(&self);
                move |_req: &Request| {
                    Ok(Response::text(format!(
                        "Total Users: {}",
                        this.service.user_count()
                    )))
                }
            })?,
            Route::get("/users/{id}", "UserController.user_by_id", {
                let this = Arc::clone(&self);
                move |req: &Request| {
                    let id = req.require_path_var_as::<u64>("id")?;
                    match this.service.find_user(id) {
                        Some(user) => Response::json(&user),
                        None => Ok(Response::text(format!("User not found: {id}"))
                            .with_status(404)),
                    }
                }
            })?,
            Route::post("/users", "UserController.create_user", {
                let this = Arc::clone(&self);
                move |req: &Request| {
                    let name = req.require_query_param("name")?;
                    let user = this.service.create_user(name);
                    Ok(Response::json(&user)?.with_status(201))
                }
            })?,
        ])
    }
}

/// Plain status endpoints.
pub struct StatusController;

impl Controller for StatusController {
    fn routes(self: Arc<Self>) -> Result<Vec<Route>, WebError> {
        Ok(vec![
            Route::get("/test", "StatusController.test", |_req: &Request| {
                Ok(Response::text("Test Controller Works!"))
            })?,
            Route::get("/health", "StatusController.health", |_req: &Request| {
                Ok(Response::text("Server is healthy!"))
            })?,
        ])
    }
}

/// Wire the demo application into a web context.
pub fn build_web_context() -> Result<WebContext, WebError> {
    WebContext::builder()
        .component(ComponentDefinition::of::<UserRepository, _>(
            ComponentRole::Repository,
            |_| Ok(UserRepository::seeded()),
        ))
        .component(
            ComponentDefinition::of::<UserService, _>(ComponentRole::Service, |registry| {
                Ok(UserService::new(registry.get::<UserRepository>()?))
            })
            .depends_on::<UserRepository>(),
        )
        .controller::<UserController>(
            ComponentDefinition::of::<UserController, _>(ComponentRole::Controller, |registry| {
                Ok(UserController::new(registry.get::<UserService>()?))
            })
            .depends_on::<UserService>(),
        )
        .controller::<StatusController>(ComponentDefinition::of::<StatusController, _>(
            ComponentRole::Controller,
            |_| Ok(StatusController),
        ))
        .build()
}
