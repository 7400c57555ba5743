//! To-do endpoints. Every route here sits behind `AuthMiddleware`.
//!
//! Each handler checks the `user_id` the caller claims against the verified
//! identity before it touches storage. Update and delete address an item by
//! `todo_id` alone, so the guard is the only ownership check they get.

use crate::{
    app::AppState,
    auth::{ensure_owner, VerifiedIdentity},
    error::AppError,
    models::{CreateTodoRequest, DeleteTodoRequest, TodoList, TodoQuery, UpdateTodoRequest},
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use validator::Validate;

/// Lists the caller's to-do items.
///
/// ## Query Parameters:
/// - `user_id`: must equal the authenticated user.
///
/// ## Responses:
/// - `200 OK`: `{"todos": [...]}`.
/// - `400 Bad Request`: `user_id` missing or not a number.
/// - `401 Unauthorized`: bad token, or `user_id` names someone else.
#[get("")]
pub async fn list_todos(
    state: web::Data<AppState>,
    identity: VerifiedIdentity,
    query: web::Query<TodoQuery>,
) -> Result<impl Responder, AppError> {
    let query = query.into_inner();
    ensure_owner(&identity, &query)?;

    let todos = state.todos.list_todos(query.user_id).await?;
    Ok(HttpResponse::Ok().json(TodoList { todos }))
}

/// Fetches one item belonging to `user_id`.
///
/// ## Responses:
/// - `200 OK`: the `Todo`.
/// - `401 Unauthorized`: bad token, or `user_id` names someone else.
/// - `404 Not Found`: no such item for that user.
#[get("/{todo_id}")]
pub async fn get_todo(
    state: web::Data<AppState>,
    identity: VerifiedIdentity,
    todo_id: web::Path<i32>,
    query: web::Query<TodoQuery>,
) -> Result<impl Responder, AppError> {
    let query = query.into_inner();
    ensure_owner(&identity, &query)?;

    let todo = state
        .todos
        .get_todo(query.user_id, todo_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(todo))
}

/// Creates an item.
///
/// ## Request Body:
/// `{user_id, title, content}`; `content` may be omitted.
///
/// ## Responses:
/// - `201 Created`: the new `Todo`.
/// - `401 Unauthorized`: bad token, or `user_id` names someone else.
/// - `422 Unprocessable Entity`: title empty or too long, content too long.
#[post("")]
pub async fn create_todo(
    state: web::Data<AppState>,
    identity: VerifiedIdentity,
    todo_data: web::Json<CreateTodoRequest>,
) -> Result<impl Responder, AppError> {
    let request = todo_data.into_inner();
    ensure_owner(&identity, &request)?;
    request.validate()?;

    let todo = state.todos.create_todo(request.into()).await?;
    Ok(HttpResponse::Created().json(todo))
}

/// Replaces the title and content of an item.
///
/// ## Request Body:
/// `{user_id, todo_id, title, content}`.
///
/// ## Responses:
/// - `200 OK`: the updated `Todo`.
/// - `401 Unauthorized`: bad token, or `user_id` names someone else.
/// - `404 Not Found`: no item with that `todo_id`.
/// - `422 Unprocessable Entity`: validation failed.
#[patch("")]
pub async fn update_todo(
    state: web::Data<AppState>,
    identity: VerifiedIdentity,
    todo_data: web::Json<UpdateTodoRequest>,
) -> Result<impl Responder, AppError> {
    let request = todo_data.into_inner();
    ensure_owner(&identity, &request)?;
    request.validate()?;

    let todo = state.todos.update_todo(request.into()).await?;
    Ok(HttpResponse::Ok().json(todo))
}

/// Deletes an item and returns it.
///
/// ## Request Body:
/// `{user_id, todo_id}`.
///
/// ## Responses:
/// - `200 OK`: the deleted `Todo`.
/// - `401 Unauthorized`: bad token, or `user_id` names someone else.
/// - `404 Not Found`: no item with that `todo_id`.
#[delete("")]
pub async fn delete_todo(
    state: web::Data<AppState>,
    identity: VerifiedIdentity,
    todo_data: web::Json<DeleteTodoRequest>,
) -> Result<impl Responder, AppError> {
    let request = todo_data.into_inner();
    ensure_owner(&identity, &request)?;

    let todo = state.todos.delete_todo(request.todo_id).await?;
    Ok(HttpResponse::Ok().json(todo))
}
