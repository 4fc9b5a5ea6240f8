use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::ErrorResponse;
use axum::routing::{delete, get, patch, post};
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;
use uuid::Uuid;
use validator::Validate;

use crate::auth::Session;
use crate::domain::todo::driven_ports::{TodoReader, TodoWriter};
use crate::domain::todo::driving_ports::TodoPort;
use crate::dto::{DeleteTodoResponse, NewTodoRequest, TodoResponse, UpdateTodoRequest};
use crate::external_connections::ExternalConnectivity;
use crate::routing_utils::{Json, TodoErrorResponse, ValidationErrorResponse};
use crate::{AppState, SharedData, domain, dto, persistence};

#[derive(OpenApi)]
#[openapi(
    paths(list_todos, create_todo, update_todo, delete_todo),
    components(responses(crate::routing_utils::BasicErrorResponse))
)]
/// Defines the OpenAPI documentation for the todo API
pub struct TodosApi;
/// Constant used to group todo endpoints in OpenAPI documentation
pub const TODO_API_GROUP: &str = "Todos";

/// Adds routes under "/todos" to the application router. Every route requires a
/// valid session and operates only on records owned by the session's user.
pub fn todo_routes() -> Router<Arc<SharedData>> {
    Router::new()
        .route(
            "/todos",
            get(|session: Session, State(app_state): AppState| async move {
                let mut ext_cxn = app_state.ext_cxn.clone();
                let todo_service = domain::todo::TodoService {};
                let todo_reader = persistence::db_todo_driven_ports::DbTodoReader;

                list_todos(session.user_id, &mut ext_cxn, &todo_service, &todo_reader).await
            }),
        )
        .route(
            "/todos",
            post(
                |session: Session,
                 State(app_state): AppState,
                 Json(new_todo): Json<NewTodoRequest>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoService {};
                    let todo_writer = persistence::db_todo_driven_ports::DbTodoWriter;

                    create_todo(
                        session.user_id,
                        new_todo,
                        &mut ext_cxn,
                        &todo_service,
                        &todo_writer,
                    )
                    .await
                },
            ),
        )
        .route(
            "/todos/:todo_id",
            patch(
                |session: Session,
                 State(app_state): AppState,
                 Path(todo_id): Path<Uuid>,
                 Json(update): Json<UpdateTodoRequest>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoService {};
                    let todo_writer = persistence::db_todo_driven_ports::DbTodoWriter;

                    update_todo(
                        session.user_id,
                        todo_id,
                        update,
                        &mut ext_cxn,
                        &todo_service,
                        &todo_writer,
                    )
                    .await
                },
            ),
        )
        .route(
            "/todos/:todo_id",
            delete(
                |session: Session, State(app_state): AppState, Path(todo_id): Path<Uuid>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoService {};
                    let todo_writer = persistence::db_todo_driven_ports::DbTodoWriter;

                    delete_todo(
                        session.user_id,
                        todo_id,
                        &mut ext_cxn,
                        &todo_service,
                        &todo_writer,
                    )
                    .await
                },
            ),
        )
}

#[utoipa::path(
    get,
    path = "/todos",
    tag = TODO_API_GROUP,
    responses(
        (status = 200, description = "The authenticated user's todos, newest first", body = Vec<TodoResponse>),
        (status = 401, response = dto::err_resps::BasicError401),
        (status = 500, response = dto::err_resps::BasicError500),
    ),
    security(("session_token" = []))
)]
/// Lists the authenticated user's todos, newest first
async fn list_todos(
    user_id: Uuid,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
    todo_read: &impl TodoReader,
) -> Result<Json<Vec<TodoResponse>>, ErrorResponse> {
    info!("Listing todos for user {user_id}");
    let todos = todo_service
        .todos_for_user(user_id, &mut *ext_cxn, todo_read)
        .await
        .map_err(TodoErrorResponse::from)?;

    Ok(Json(todos.into_iter().map(TodoResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/todos",
    tag = TODO_API_GROUP,
    request_body = NewTodoRequest,
    responses(
        (status = 201, description = "The created todo", body = TodoResponse),
        (status = 400, response = dto::err_resps::BasicError400),
        (status = 401, response = dto::err_resps::BasicError401),
        (status = 500, response = dto::err_resps::BasicError500),
    ),
    security(("session_token" = []))
)]
/// Creates a todo owned by the authenticated user
async fn create_todo(
    user_id: Uuid,
    new_todo: NewTodoRequest,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
    todo_write: &impl TodoWriter,
) -> Result<(StatusCode, Json<TodoResponse>), ErrorResponse> {
    info!("Creating todo \"{new_todo}\" for user {user_id}");
    new_todo.validate().map_err(ValidationErrorResponse::from)?;

    let domain_new_todo = domain::todo::NewTodo::from(new_todo);
    let created = todo_service
        .create_todo(user_id, &domain_new_todo, &mut *ext_cxn, todo_write)
        .await
        .map_err(TodoErrorResponse::from)?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

#[utoipa::path(
    patch,
    path = "/todos/{todo_id}",
    tag = TODO_API_GROUP,
    params(
        ("todo_id" = Uuid, Path, description = "ID of the todo to update"),
    ),
    request_body = UpdateTodoRequest,
    responses(
        (status = 200, description = "The todo after the patch was applied", body = TodoResponse),
        (status = 400, response = dto::err_resps::BasicError400),
        (status = 401, response = dto::err_resps::BasicError401),
        (status = 404, response = dto::err_resps::BasicError404),
        (status = 500, response = dto::err_resps::BasicError500),
    ),
    security(("session_token" = []))
)]
/// Applies a partial update to one of the authenticated user's todos
async fn update_todo(
    user_id: Uuid,
    todo_id: Uuid,
    update: UpdateTodoRequest,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
    todo_write: &impl TodoWriter,
) -> Result<Json<TodoResponse>, ErrorResponse> {
    info!("Updating todo {todo_id} for user {user_id}");
    update.validate().map_err(ValidationErrorResponse::from)?;

    let domain_patch = domain::todo::TodoPatch::from(update);
    let updated = todo_service
        .update_todo(user_id, todo_id, &domain_patch, &mut *ext_cxn, todo_write)
        .await
        .map_err(TodoErrorResponse::from)?;

    Ok(Json(updated.into()))
}

#[utoipa::path(
    delete,
    path = "/todos/{todo_id}",
    tag = TODO_API_GROUP,
    params(
        ("todo_id" = Uuid, Path, description = "ID of the todo to remove"),
    ),
    responses(
        (status = 200, description = "The todo was removed", body = DeleteTodoResponse),
        (status = 401, response = dto::err_resps::BasicError401),
        (status = 404, response = dto::err_resps::BasicError404),
        (status = 500, response = dto::err_resps::BasicError500),
    ),
    security(("session_token" = []))
)]
/// Permanently removes one of the authenticated user's todos
async fn delete_todo(
    user_id: Uuid,
    todo_id: Uuid,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
    todo_write: &impl TodoWriter,
) -> Result<Json<DeleteTodoResponse>, ErrorResponse> {
    info!("Deleting todo {todo_id} for user {user_id}");
    todo_service
        .delete_todo(user_id, todo_id, &mut *ext_cxn, todo_write)
        .await
        .map_err(TodoErrorResponse::from)?;

    Ok(Json(DeleteTodoResponse { success: true }))
}
