use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{QuestionService, reveals_answers};
use crate::models::questions::requests::{QuestionListParams, QuestionListQuery};
use crate::models::questions::responses::QuestionView;
use crate::models::{ApiResponse, ErrorCode, PaginatedResponse};

pub async fn list_questions(
    service: &QuestionService,
    request: &HttpRequest,
    query: QuestionListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage
        .list_questions_with_pagination(QuestionListQuery::from(query))
        .await
    {
        Ok(response) if reveals_answers(request) => Ok(HttpResponse::Ok().json(
            ApiResponse::success(response, "Questions retrieved successfully"),
        )),
        Ok(response) => {
            let views = PaginatedResponse {
                items: response.items.iter().map(QuestionView::from).collect(),
                pagination: response.pagination,
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                views,
                "Questions retrieved successfully",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to list questions: {e}"),
            )),
        ),
    }
}
