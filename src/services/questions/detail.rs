use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{QuestionService, reveals_answers};
use crate::models::questions::responses::QuestionView;
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_question(
    service: &QuestionService,
    request: &HttpRequest,
    question_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_question_by_id(question_id).await {
        Ok(Some(question)) if reveals_answers(request) => Ok(HttpResponse::Ok().json(
            ApiResponse::success(question, "Question retrieved successfully"),
        )),
        Ok(Some(question)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            QuestionView::from(&question),
            "Question retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::QuestionNotFound,
            "Question not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to get question: {e}"),
            )),
        ),
    }
}
