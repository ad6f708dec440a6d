use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use crate::api::{ApiError, ListTasksParams, ListingPayload, TaskService};
use crate::model::task::{Priority, Status, Task};

/// HTTP transport for the remote service.
///
/// Every operation is a POST to `{base}/call` carrying a tool name and a
/// params object; responses carry either a text block, a structured task
/// array, or an error string.
pub struct HttpService {
    http: reqwest::Client,
    base_url: String,
    structured: bool,
}

#[derive(Serialize)]
struct CallRequest<'a> {
    tool: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct CallResponse {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    tasks: Option<Vec<Task>>,
    #[serde(default)]
    error: Option<String>,
}

impl HttpService {
    pub fn new(base_url: impl Into<String>, structured: bool) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            structured,
        }
    }

    async fn call(&self, tool: &str, params: Value) -> Result<CallResponse, ApiError> {
        let url = format!("{}/call", self.base_url);
        debug!(tool, %url, "service call");
        let response = self
            .http
            .post(&url)
            .json(&CallRequest { tool, params })
            .send()
            .await?
            .error_for_status()?;
        let body: CallResponse = response.json().await?;
        if let Some(message) = body.error {
            return Err(ApiError::Service(message));
        }
        Ok(body)
    }

    async fn call_text(&self, tool: &str, params: Value) -> Result<String, ApiError> {
        let body = self.call(tool, params).await?;
        body.text
            .ok_or_else(|| ApiError::Payload(format!("{tool}: response carried no text block")))
    }

    async fn call_unit(&self, tool: &str, params: Value) -> Result<(), ApiError> {
        self.call(tool, params).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl TaskService for HttpService {
    async fn list_tasks(&self, params: ListTasksParams) -> Result<ListingPayload, ApiError> {
        let body = self
            .call(
                "task_list",
                json!({
                    "all_projects": params.all_projects,
                    "limit": params.limit,
                    "offset": params.offset,
                    "structured": self.structured,
                }),
            )
            .await?;

        if let Some(tasks) = body.tasks {
            return Ok(ListingPayload::Structured(tasks));
        }
        match body.text {
            Some(text) => Ok(ListingPayload::Text(text)),
            None => Err(ApiError::Payload(
                "task_list: response carried neither tasks nor text".into(),
            )),
        }
    }

    async fn list_projects(&self) -> Result<String, ApiError> {
        self.call_text("project_list", json!({})).await
    }

    async fn task_detail(&self, id: &str) -> Result<String, ApiError> {
        self.call_text("task_detail", json!({ "id": id })).await
    }

    async fn summary(&self) -> Result<String, ApiError> {
        self.call_text("summary", json!({})).await
    }

    async fn update_status(&self, id: &str, status: Status) -> Result<(), ApiError> {
        self.call_unit("task_update", json!({ "id": id, "status": status.key() }))
            .await
    }

    async fn update_priority(&self, id: &str, priority: Priority) -> Result<(), ApiError> {
        self.call_unit(
            "task_update",
            json!({ "id": id, "priority": priority.key() }),
        )
        .await
    }

    async fn move_to_project(&self, id: &str, project: Option<&str>) -> Result<(), ApiError> {
        self.call_unit("task_move", json!({ "id": id, "project_id": project }))
            .await
    }

    async fn change_parent(&self, id: &str, parent: Option<&str>) -> Result<(), ApiError> {
        self.call_unit("task_set_parent", json!({ "id": id, "parent_id": parent }))
            .await
    }

    async fn add_dependency(&self, id: &str, depends_on: &str) -> Result<(), ApiError> {
        self.call_unit(
            "task_add_dependency",
            json!({ "id": id, "depends_on": depends_on }),
        )
        .await
    }
}
