use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;

use crate::models::{NewTask, Task, TaskId, TaskUpdate};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3333";

/// The remote todo collection. Bodies returned by create and update are not
/// used; callers refetch the list instead.
#[async_trait]
pub trait TodoApi: Send + Sync {
    async fn list(&self, status: Option<bool>) -> Result<Vec<Task>>;
    async fn create(&self, task: &NewTask) -> Result<()>;
    async fn update(&self, update: &TaskUpdate) -> Result<()>;
    async fn delete(&self, id: &TaskId) -> Result<()>;
}

#[async_trait]
impl<T: TodoApi + ?Sized> TodoApi for Arc<T> {
    async fn list(&self, status: Option<bool>) -> Result<Vec<Task>> {
        (**self).list(status).await
    }

    async fn create(&self, task: &NewTask) -> Result<()> {
        (**self).create(task).await
    }

    async fn update(&self, update: &TaskUpdate) -> Result<()> {
        (**self).update(update).await
    }

    async fn delete(&self, id: &TaskId) -> Result<()> {
        (**self).delete(id).await
    }
}

pub struct HttpTodoApi {
    client: Client,
    base_url: String,
}

impl HttpTodoApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn todos_url(&self) -> String {
        format!("{}/todos", self.base_url)
    }
}

#[async_trait]
impl TodoApi for HttpTodoApi {
    async fn list(&self, status: Option<bool>) -> Result<Vec<Task>> {
        let mut request = self.client.get(self.todos_url());
        if let Some(status) = status {
            request = request.query(&[("status", status)]);
        }

        let response = request
            .send()
            .await
            .context("Failed to request task list")?
            .error_for_status()
            .context("Task list request was rejected")?;

        response
            .json::<Vec<Task>>()
            .await
            .context("Failed to parse task list")
    }

    async fn create(&self, task: &NewTask) -> Result<()> {
        self.client
            .post(self.todos_url())
            .json(task)
            .send()
            .await
            .context("Failed to send create request")?
            .error_for_status()
            .context("Create request was rejected")?;
        Ok(())
    }

    async fn update(&self, update: &TaskUpdate) -> Result<()> {
        self.client
            .put(self.todos_url())
            .json(update)
            .send()
            .await
            .with_context(|| format!("Failed to send update for task {}", update.id))?
            .error_for_status()
            .with_context(|| format!("Update for task {} was rejected", update.id))?;
        Ok(())
    }

    async fn delete(&self, id: &TaskId) -> Result<()> {
        self.client
            .delete(format!("{}/{}", self.todos_url(), id))
            .send()
            .await
            .with_context(|| format!("Failed to send delete for task {id}"))?
            .error_for_status()
            .with_context(|| format!("Delete for task {id} was rejected"))?;
        Ok(())
    }
}
