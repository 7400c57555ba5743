//! Persistence collaborators.
//!
//! Handlers only see the [`UserStore`] and [`TodoStore`] traits. Production
//! uses [`PgStorage`]; tests and local runs can use [`MemoryStorage`].
//! Nothing here knows about tokens or identities: authorization has already
//! happened by the time a store method is called.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{Credential, NewTodo, NewUser, Todo, TodoUpdate, User};

pub use memory::MemoryStorage;
pub use postgres::PgStorage;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user. Fails with `BadRequest` if the email is taken.
    async fn create_user(&self, user: NewUser) -> Result<User, AppError>;

    async fn find_credential_by_email(&self, email: &str) -> Result<Option<Credential>, AppError>;
}

#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn create_todo(&self, todo: NewTodo) -> Result<Todo, AppError>;

    /// All items owned by `user_id`, oldest first.
    async fn list_todos(&self, user_id: i32) -> Result<Vec<Todo>, AppError>;

    /// One item, only if it belongs to `user_id`.
    async fn get_todo(&self, user_id: i32, todo_id: i32) -> Result<Todo, AppError>;

    /// Replaces title and content of the item with `update.todo_id`.
    async fn update_todo(&self, update: TodoUpdate) -> Result<Todo, AppError>;

    /// Removes the item and returns what was removed.
    async fn delete_todo(&self, todo_id: i32) -> Result<Todo, AppError>;
}

pub(crate) fn todo_not_found() -> AppError {
    AppError::NotFound("Todo not found".into())
}

pub(crate) fn email_taken() -> AppError {
    AppError::BadRequest("Email already registered".into())
}
