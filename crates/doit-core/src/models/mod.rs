//! Data models for todos.
//!
//! - `Todo`, `TodoResponse`, `FetchTodosApiResponse`: wire types
//! - `TodoFormData`, `TodoUpdate`: input of the add/edit forms
//! - `SearchFilter`, `TodoListQuery`, `TodoPage`: list view contracts

pub mod filter;
pub mod todo;

pub use filter::{SearchFilter, TodoListQuery, TodoPage, TodoStatusFilter};
pub use todo::{FetchTodosApiResponse, Todo, TodoFormData, TodoResponse, TodoUpdate};
