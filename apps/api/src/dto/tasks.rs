mod conversions;
mod types;

pub use types::{CreateTaskRequest, TaskResponse, UpdateTaskStatusRequest};
