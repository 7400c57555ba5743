use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{email_taken, todo_not_found, TodoStore, UserStore};
use crate::error::AppError;
use crate::models::{Credential, NewTodo, NewUser, Todo, TodoUpdate, User};

/// In-process storage with the same query semantics as [`PgStorage`](super::PgStorage).
///
/// Ids are assigned sequentially from 1. Data lives as long as the value.
#[derive(Default)]
pub struct MemoryStorage {
    inner: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<i32, (User, String)>,
    todos: BTreeMap<i32, Todo>,
    last_user_id: i32,
    last_todo_id: i32,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStorage {
    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        let mut tables = self.inner.write().await;
        if tables.users.values().any(|(u, _)| u.email == user.email) {
            return Err(email_taken());
        }

        tables.last_user_id += 1;
        let created = User {
            user_id: tables.last_user_id,
            username: user.username,
            email: user.email,
            created_at: Utc::now(),
        };
        tables
            .users
            .insert(created.user_id, (created.clone(), user.password_hash));
        Ok(created)
    }

    async fn find_credential_by_email(&self, email: &str) -> Result<Option<Credential>, AppError> {
        let tables = self.inner.read().await;
        Ok(tables
            .users
            .values()
            .find(|(u, _)| u.email == email)
            .map(|(u, hash)| Credential {
                user_id: u.user_id,
                username: u.username.clone(),
                email: u.email.clone(),
                password_hash: hash.clone(),
            }))
    }
}

#[async_trait]
impl TodoStore for MemoryStorage {
    async fn create_todo(&self, todo: NewTodo) -> Result<Todo, AppError> {
        let mut tables = self.inner.write().await;
        tables.last_todo_id += 1;
        let now = Utc::now();
        let created = Todo {
            todo_id: tables.last_todo_id,
            user_id: todo.user_id,
            title: todo.title,
            content: todo.content,
            created_at: now,
            updated_at: now,
        };
        tables.todos.insert(created.todo_id, created.clone());
        Ok(created)
    }

    async fn list_todos(&self, user_id: i32) -> Result<Vec<Todo>, AppError> {
        let tables = self.inner.read().await;
        Ok(tables
            .todos
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get_todo(&self, user_id: i32, todo_id: i32) -> Result<Todo, AppError> {
        let tables = self.inner.read().await;
        tables
            .todos
            .get(&todo_id)
            .filter(|t| t.user_id == user_id)
            .cloned()
            .ok_or_else(todo_not_found)
    }

    async fn update_todo(&self, update: TodoUpdate) -> Result<Todo, AppError> {
        let mut tables = self.inner.write().await;
        let todo = tables
            .todos
            .get_mut(&update.todo_id)
            .ok_or_else(todo_not_found)?;
        todo.title = update.title;
        todo.content = update.content;
        todo.updated_at = Utc::now();
        Ok(todo.clone())
    }

    async fn delete_todo(&self, todo_id: i32) -> Result<Todo, AppError> {
        let mut tables = self.inner.write().await;
        tables.todos.remove(&todo_id).ok_or_else(todo_not_found)
    }
}
