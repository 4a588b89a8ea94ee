use crate::error::CoreError;
use crate::models::{TaskRecord, TaskSelector, TaskUpdate};
use crate::service::TaskService;
use async_trait::async_trait;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::{SpanBackendWithUrl, TracingMiddleware};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "https://app.asana.com/api/1.0";

/// Asana caps `limit` at 100 per page.
pub const MAX_PAGE_SIZE: u32 = 100;

const TASK_FIELDS: &str = "name,due_on,due_at";

#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct TaskPage {
    data: Vec<TaskRecord>,
    #[serde(default)]
    next_page: Option<NextPage>,
}

#[derive(Deserialize)]
struct NextPage {
    offset: String,
}

#[derive(Serialize)]
struct UpdateEnvelope<'a> {
    data: &'a TaskUpdate,
}

/// `TaskService` backed by the Asana REST API.
pub struct AsanaClient {
    http: ClientWithMiddleware,
    base_url: Url,
    token: String,
    page_size: u32,
}

impl AsanaClient {
    pub fn new(token: impl Into<String>, base_url: Url) -> Self {
        let http = ClientBuilder::new(reqwest::Client::new())
            .with(TracingMiddleware::<SpanBackendWithUrl>::new())
            .build();

        Self {
            http,
            base_url,
            token: token.into(),
            page_size: MAX_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, CoreError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                CoreError::InvalidInput(format!("API base URL cannot be a base: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn read<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, CoreError> {
        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(CoreError::Service {
                status: status.as_u16(),
                body: response.text().await?,
            });
        }
        Ok(response.json::<T>().await?)
    }
}

impl fmt::Debug for AsanaClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsanaClient")
            .field("base_url", &self.base_url.as_str())
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TaskService for AsanaClient {
    async fn fetch_tasks(&self, selector: &TaskSelector) -> Result<Vec<TaskRecord>, CoreError> {
        let url = self.endpoint(&["tasks"])?;

        let mut query = vec![
            ("completed_since", "now".to_string()),
            ("opt_fields", TASK_FIELDS.to_string()),
            ("limit", self.page_size.to_string()),
        ];
        match selector {
            TaskSelector::Project(project) => query.push(("project", project.clone())),
            TaskSelector::WorkspaceAssignee { workspace, assignee } => {
                query.push(("workspace", workspace.clone()));
                query.push(("assignee", assignee.clone()));
            }
        }

        let mut tasks = Vec::new();
        let mut offset: Option<String> = None;
        loop {
            let mut request = self
                .http
                .get(url.clone())
                .bearer_auth(&self.token)
                .query(&query);
            if let Some(ref offset) = offset {
                request = request.query(&[("offset", offset)]);
            }

            let page: TaskPage = Self::read(request.send().await?).await?;
            debug!(
                selector = %selector,
                page.tasks = page.data.len(),
                page.has_next = page.next_page.is_some(),
                "Fetched page of incomplete tasks."
            );
            tasks.extend(page.data);

            match page.next_page {
                Some(next) => offset = Some(next.offset),
                None => break,
            }
        }

        Ok(tasks)
    }

    async fn update_task(&self, id: &str, update: &TaskUpdate) -> Result<TaskRecord, CoreError> {
        let url = self.endpoint(&["tasks", id])?;
        let response = self
            .http
            .put(url)
            .bearer_auth(&self.token)
            .query(&[("opt_fields", TASK_FIELDS)])
            .json(&UpdateEnvelope { data: update })
            .send()
            .await?;

        let envelope: DataEnvelope<TaskRecord> = Self::read(response).await?;
        Ok(envelope.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> AsanaClient {
        AsanaClient::new("token", Url::parse(base).unwrap())
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = client(DEFAULT_API_BASE_URL);
        assert_eq!(
            client.endpoint(&["tasks"]).unwrap().as_str(),
            "https://app.asana.com/api/1.0/tasks"
        );
        assert_eq!(
            client.endpoint(&["tasks", "1201"]).unwrap().as_str(),
            "https://app.asana.com/api/1.0/tasks/1201"
        );
    }

    #[test]
    fn test_endpoint_with_trailing_slash() {
        let client = client("http://127.0.0.1:9000/");
        assert_eq!(
            client.endpoint(&["tasks"]).unwrap().as_str(),
            "http://127.0.0.1:9000/tasks"
        );
    }

    #[test]
    fn test_page_size_is_clamped() {
        assert_eq!(client(DEFAULT_API_BASE_URL).with_page_size(0).page_size, 1);
        assert_eq!(client(DEFAULT_API_BASE_URL).with_page_size(500).page_size, 100);
        assert_eq!(client(DEFAULT_API_BASE_URL).with_page_size(25).page_size, 25);
    }

    #[test]
    fn test_debug_hides_token() {
        let rendered = format!("{:?}", AsanaClient::new("secret-token", Url::parse(DEFAULT_API_BASE_URL).unwrap()));
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("app.asana.com"));
    }
}
