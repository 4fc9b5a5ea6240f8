//! OpenAPI response definitions for the error envelope at each status code
//! the API can produce. The live response body is
//! [BasicErrorResponse][crate::routing_utils::BasicErrorResponse].

use serde::Serialize;
use utoipa::ToResponse;

#[derive(Serialize, ToResponse)]
#[response(
    description = "Submitted data was invalid",
    example = json!({
        "error_code": "invalid_input",
        "error_description": "Submitted data was invalid.",
        "extra_info": null
    })
)]
pub struct BasicError400 {
    error_code: String,
    error_description: String,
}

#[derive(Serialize, ToResponse)]
#[response(
    description = "No valid session token was presented",
    example = json!({
        "error_code": "unauthorized",
        "error_description": "A valid session token is required to access this resource.",
        "extra_info": null
    })
)]
pub struct BasicError401 {
    error_code: String,
    error_description: String,
}

#[derive(Serialize, ToResponse)]
#[response(
    description = "The requested entity could not be found",
    example = json!({
        "error_code": "not_found",
        "error_description": "The requested entity could not be found.",
        "extra_info": null
    })
)]
pub struct BasicError404 {
    error_code: String,
    error_description: String,
}

#[derive(Serialize, ToResponse)]
#[response(
    description = "Something unexpected went wrong inside the server",
    example = json!({
        "error_code": "internal_error",
        "error_description": "Could not access data to complete your request",
        "extra_info": null
    })
)]
pub struct BasicError500 {
    error_code: String,
    error_description: String,
}
