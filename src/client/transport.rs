use anyhow::anyhow;
use reqwest::StatusCode;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use thiserror::Error;
use uuid::Uuid;

use crate::dto::{DeleteTodoResponse, NewTodoRequest, TodoResponse, UpdateTodoRequest};

/// Client-side view of the server's error taxonomy, plus a variant for
/// failures that never reached the server
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("the submitted todo data was rejected")]
    Validation,
    #[error("the referenced todo does not exist")]
    NotFound,
    #[error("the session token is missing, invalid, or expired")]
    Unauthorized,
    #[error("the server could not complete the request")]
    Internal,
    #[error("could not reach the server: {0}")]
    Transport(#[from] anyhow::Error),
}

/// The wire boundary the [TodoClient][super::api_client::TodoClient] drives its
/// mutations through. Production uses [HttpTodoTransport]; tests swap in an
/// in-memory implementation.
pub trait TodoTransport {
    async fn fetch_todos(&self) -> Result<Vec<TodoResponse>, ApiError>;
    async fn create_todo(&self, new_todo: &NewTodoRequest) -> Result<TodoResponse, ApiError>;
    async fn update_todo(
        &self,
        todo_id: Uuid,
        patch: &UpdateTodoRequest,
    ) -> Result<TodoResponse, ApiError>;
    async fn delete_todo(&self, todo_id: Uuid) -> Result<DeleteTodoResponse, ApiError>;
}

/// Talks to the todo API over HTTP, presenting the session token on every request
pub struct HttpTodoTransport {
    base_url: String,
    session_token: String,
    http: ClientWithMiddleware,
}

impl HttpTodoTransport {
    /// Accepts the server's base URL (no trailing slash) and the session token
    /// obtained from the identity provider
    pub fn new(base_url: String, session_token: String) -> HttpTodoTransport {
        let base_client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .expect("the HTTP client config is static and must construct");
        let http = ClientBuilder::new(base_client)
            .with(TracingMiddleware::default())
            .build();

        HttpTodoTransport {
            base_url,
            session_token,
            http,
        }
    }

    fn reject_for_status(status: StatusCode) -> Result<(), ApiError> {
        if status.is_success() {
            return Ok(());
        }

        Err(match status {
            StatusCode::BAD_REQUEST => ApiError::Validation,
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
            StatusCode::NOT_FOUND => ApiError::NotFound,
            _ => ApiError::Internal,
        })
    }
}

impl TodoTransport for HttpTodoTransport {
    async fn fetch_todos(&self) -> Result<Vec<TodoResponse>, ApiError> {
        let response = self
            .http
            .get(format!("{}/todos", self.base_url))
            .bearer_auth(&self.session_token)
            .send()
            .await
            .map_err(|err| anyhow!(err))?;
        Self::reject_for_status(response.status())?;

        Ok(response.json().await.map_err(|err| anyhow!(err))?)
    }

    async fn create_todo(&self, new_todo: &NewTodoRequest) -> Result<TodoResponse, ApiError> {
        let response = self
            .http
            .post(format!("{}/todos", self.base_url))
            .bearer_auth(&self.session_token)
            .json(new_todo)
            .send()
            .await
            .map_err(|err| anyhow!(err))?;
        Self::reject_for_status(response.status())?;

        Ok(response.json().await.map_err(|err| anyhow!(err))?)
    }

    async fn update_todo(
        &self,
        todo_id: Uuid,
        patch: &UpdateTodoRequest,
    ) -> Result<TodoResponse, ApiError> {
        let response = self
            .http
            .patch(format!("{}/todos/{}", self.base_url, todo_id))
            .bearer_auth(&self.session_token)
            .json(patch)
            .send()
            .await
            .map_err(|err| anyhow!(err))?;
        Self::reject_for_status(response.status())?;

        Ok(response.json().await.map_err(|err| anyhow!(err))?)
    }

    async fn delete_todo(&self, todo_id: Uuid) -> Result<DeleteTodoResponse, ApiError> {
        let response = self
            .http
            .delete(format!("{}/todos/{}", self.base_url, todo_id))
            .bearer_auth(&self.session_token)
            .send()
            .await
            .map_err(|err| anyhow!(err))?;
        Self::reject_for_status(response.status())?;

        Ok(response.json().await.map_err(|err| anyhow!(err))?)
    }
}
