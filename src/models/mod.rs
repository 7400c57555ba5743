pub mod todo;
pub mod user;

pub use todo::{
    CreateTodoRequest, DeleteTodoRequest, NewTodo, Todo, TodoList, TodoQuery, TodoUpdate,
    UpdateTodoRequest,
};
pub use user::{Credential, NewUser, User};
