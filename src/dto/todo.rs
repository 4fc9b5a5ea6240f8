use chrono::Utc;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::domain;

/// DTO for creating a new todo via the API. Serialized by
/// [HttpTodoTransport][crate::client::transport::HttpTodoTransport] as well as
/// deserialized by the server.
#[derive(Serialize, Deserialize, Display, Validate, ToSchema)]
#[display("{title}")]
pub struct NewTodoRequest {
    #[validate(length(min = 1))]
    #[schema(example = "buy milk")]
    pub title: String,
}

impl From<NewTodoRequest> for domain::todo::NewTodo {
    fn from(value: NewTodoRequest) -> Self {
        domain::todo::NewTodo { title: value.title }
    }
}

/// DTO for partially updating a todo via the API. Fields left out of the request
/// keep their current value.
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateTodoRequest {
    #[validate(length(min = 1))]
    #[schema(example = "buy oat milk")]
    pub title: Option<String>,
    pub completed: Option<bool>,
}

impl From<UpdateTodoRequest> for domain::todo::TodoPatch {
    fn from(value: UpdateTodoRequest) -> Self {
        domain::todo::TodoPatch {
            title: value.title,
            completed: value.completed,
        }
    }
}

/// Wire representation of a todo. `created_at` is normalized to an RFC 3339
/// timestamp string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TodoResponse {
    pub id: Uuid,
    #[schema(example = "buy milk")]
    pub title: String,
    pub completed: bool,
    #[schema(example = "2024-01-01T00:00:00+00:00")]
    pub created_at: String,
    pub owner_user_id: Uuid,
}

impl From<domain::todo::Todo> for TodoResponse {
    fn from(value: domain::todo::Todo) -> Self {
        TodoResponse {
            id: value.id,
            title: value.title,
            completed: value.completed,
            created_at: value.created_at.to_rfc3339(),
            owner_user_id: value.owner_user_id,
        }
    }
}

impl TodoResponse {
    /// Builds the record a client predicts locally before the server has confirmed
    /// a create. The temporary ID is replaced on reconciliation.
    pub fn predicted(temp_id: Uuid, title: &str, owner_user_id: Uuid) -> TodoResponse {
        TodoResponse {
            id: temp_id,
            title: title.to_owned(),
            completed: false,
            created_at: Utc::now().to_rfc3339(),
            owner_user_id,
        }
    }
}

/// Acknowledgment returned by the delete operation
#[derive(Serialize, Deserialize, ToSchema)]
pub struct DeleteTodoResponse {
    #[schema(example = true)]
    pub success: bool,
}
