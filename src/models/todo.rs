use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::auth::SubjectClaim;

/// A to-do item as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Todo {
    pub todo_id: i32,
    /// Owner of the item.
    pub user_id: i32,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Wrapper for listing responses: `{"todos": [...]}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct TodoList {
    pub todos: Vec<Todo>,
}

#[derive(Debug, Clone)]
pub struct NewTodo {
    pub user_id: i32,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct TodoUpdate {
    pub todo_id: i32,
    pub title: String,
    pub content: String,
}

/// Body of `POST /todo`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTodoRequest {
    /// The user the item is created for; must be the caller.
    pub user_id: i32,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub content: String,
}

/// Body of `PATCH /todo`. Replaces both title and content.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTodoRequest {
    pub user_id: i32,
    pub todo_id: i32,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub content: String,
}

/// Body of `DELETE /todo`.
#[derive(Debug, Deserialize)]
pub struct DeleteTodoRequest {
    pub user_id: i32,
    pub todo_id: i32,
}

/// Query string of the read endpoints: `?user_id=`.
#[derive(Debug, Deserialize)]
pub struct TodoQuery {
    pub user_id: i32,
}

impl SubjectClaim for CreateTodoRequest {
    fn claimed_user_id(&self) -> i32 {
        self.user_id
    }
}

impl SubjectClaim for UpdateTodoRequest {
    fn claimed_user_id(&self) -> i32 {
        self.user_id
    }
}

impl SubjectClaim for DeleteTodoRequest {
    fn claimed_user_id(&self) -> i32 {
        self.user_id
    }
}

impl SubjectClaim for TodoQuery {
    fn claimed_user_id(&self) -> i32 {
        self.user_id
    }
}

impl From<CreateTodoRequest> for NewTodo {
    fn from(request: CreateTodoRequest) -> Self {
        Self {
            user_id: request.user_id,
            title: request.title,
            content: request.content,
        }
    }
}

impl From<UpdateTodoRequest> for TodoUpdate {
    fn from(request: UpdateTodoRequest) -> Self {
        Self {
            todo_id: request.todo_id,
            title: request.title,
            content: request.content,
        }
    }
}
