//! Remote service boundary.
//!
//! Everything the rest of the crate knows about the server goes through the
//! [`TaskService`] trait; the HTTP transport lives in [`http`], the paging
//! loop in [`pager`].

pub mod http;
pub mod pager;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::task::{Priority, Status, Task};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service reported failure: {0}")]
    Service(String),

    #[error("unexpected response payload: {0}")]
    Payload(String),
}

/// Parameters of a single task-listing call
#[derive(Debug, Clone, Copy, Default)]
pub struct ListTasksParams {
    pub all_projects: bool,
    pub limit: u32,
    pub offset: u32,
}

/// One page of the task listing, in whichever shape the server chose.
///
/// Text pages participate in the paging loop; a structured page carries the
/// complete result and ends it.
#[derive(Debug, Clone)]
pub enum ListingPayload {
    Text(String),
    Structured(Vec<Task>),
}

/// The full remote surface the client depends on.
#[async_trait]
pub trait TaskService: Send + Sync {
    async fn list_tasks(&self, params: ListTasksParams) -> Result<ListingPayload, ApiError>;

    async fn list_projects(&self) -> Result<String, ApiError>;

    async fn task_detail(&self, id: &str) -> Result<String, ApiError>;

    async fn summary(&self) -> Result<String, ApiError>;

    async fn update_status(&self, id: &str, status: Status) -> Result<(), ApiError>;

    async fn update_priority(&self, id: &str, priority: Priority) -> Result<(), ApiError>;

    /// `project` of `None` moves the task back to the active project
    async fn move_to_project(&self, id: &str, project: Option<&str>) -> Result<(), ApiError>;

    /// `parent` of `None` detaches the task to the root level
    async fn change_parent(&self, id: &str, parent: Option<&str>) -> Result<(), ApiError>;

    async fn add_dependency(&self, id: &str, depends_on: &str) -> Result<(), ApiError>;
}
