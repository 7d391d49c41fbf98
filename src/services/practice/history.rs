use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::PracticeService;
use crate::middlewares::RequireJWT;
use crate::models::practice::requests::PracticeHistoryParams;
use crate::models::{ApiResponse, ErrorCode, PaginationQuery};

pub async fn list_attempts(
    service: &PracticeService,
    request: &HttpRequest,
    query: PracticeHistoryParams,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let storage = service.get_storage(request);
    let pagination = PaginationQuery::new(query.page, query.size);

    match storage.list_practice_attempts(user_id, pagination).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Attempts retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to list attempts: {e}"),
            )),
        ),
    }
}
