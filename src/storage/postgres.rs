use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::{email_taken, todo_not_found, TodoStore, UserStore};
use crate::error::AppError;
use crate::models::{Credential, NewTodo, NewUser, Todo, TodoUpdate, User};

const TODO_COLUMNS: &str = "todo_id, user_id, title, content, created_at, updated_at";

/// Postgres-backed storage over a shared connection pool.
#[derive(Clone)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool against `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Applies the bundled schema migrations.
    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!().run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStorage {
    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (username, email, hashed_password)
             VALUES ($1, $2, $3)
             RETURNING user_id, username, email, created_at",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => email_taken(),
            other => other.into(),
        })
    }

    async fn find_credential_by_email(&self, email: &str) -> Result<Option<Credential>, AppError> {
        let credential = sqlx::query_as::<_, Credential>(
            "SELECT user_id, username, email, hashed_password AS password_hash
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(credential)
    }
}

#[async_trait]
impl TodoStore for PgStorage {
    async fn create_todo(&self, todo: NewTodo) -> Result<Todo, AppError> {
        let sql = format!(
            "INSERT INTO todos (user_id, title, content) VALUES ($1, $2, $3) RETURNING {}",
            TODO_COLUMNS
        );
        sqlx::query_as::<_, Todo>(&sql)
            .bind(todo.user_id)
            .bind(&todo.title)
            .bind(&todo.content)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                // The token outlived its account.
                sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                    AppError::NotFound("User not found".into())
                }
                other => other.into(),
            })
    }

    async fn list_todos(&self, user_id: i32) -> Result<Vec<Todo>, AppError> {
        let sql = format!(
            "SELECT {} FROM todos WHERE user_id = $1 ORDER BY todo_id",
            TODO_COLUMNS
        );
        let todos = sqlx::query_as::<_, Todo>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(todos)
    }

    async fn get_todo(&self, user_id: i32, todo_id: i32) -> Result<Todo, AppError> {
        let sql = format!(
            "SELECT {} FROM todos WHERE user_id = $1 AND todo_id = $2",
            TODO_COLUMNS
        );
        sqlx::query_as::<_, Todo>(&sql)
            .bind(user_id)
            .bind(todo_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(todo_not_found)
    }

    async fn update_todo(&self, update: TodoUpdate) -> Result<Todo, AppError> {
        let sql = format!(
            "UPDATE todos SET title = $1, content = $2, updated_at = now()
             WHERE todo_id = $3 RETURNING {}",
            TODO_COLUMNS
        );
        sqlx::query_as::<_, Todo>(&sql)
            .bind(&update.title)
            .bind(&update.content)
            .bind(update.todo_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(todo_not_found)
    }

    async fn delete_todo(&self, todo_id: i32) -> Result<Todo, AppError> {
        let sql = format!("DELETE FROM todos WHERE todo_id = $1 RETURNING {}", TODO_COLUMNS);
        sqlx::query_as::<_, Todo>(&sql)
            .bind(todo_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(todo_not_found)
    }
}
