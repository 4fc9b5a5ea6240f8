pub mod err_resps;
mod todo;

pub use todo::*;

use utoipa::OpenApi;

/// Collects the OpenAPI schemas of the DTOs in this module so they can be merged
/// into the top-level API documentation
#[derive(OpenApi)]
#[openapi(components(schemas(
    NewTodoRequest,
    UpdateTodoRequest,
    TodoResponse,
    DeleteTodoResponse,
)))]
pub struct OpenApiSchemas;
