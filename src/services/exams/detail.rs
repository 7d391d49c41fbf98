use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ExamService;
use crate::middlewares::RequireJWT;
use crate::models::exams::responses::{ExamQuestionView, ExamResponse};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_exam(
    service: &ExamService,
    request: &HttpRequest,
    exam_id: i64,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let storage = service.get_storage(request);

    let exam = match storage.get_exam_by_id(exam_id).await {
        Ok(Some(exam)) => exam,
        Ok(None) => return Ok(exam_not_found()),
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get exam: {e}"),
                )),
            );
        }
    };

    // 只有本人和管理员可见；对其他人表现为不存在
    if exam.user_id != user.id && user.role != UserRole::Admin {
        return Ok(exam_not_found());
    }

    match storage.get_questions_by_ids(&exam.question_ids).await {
        Ok(questions) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ExamResponse {
                exam,
                questions: questions.iter().map(ExamQuestionView::from).collect(),
            },
            "Exam retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to load exam questions: {e}"),
            )),
        ),
    }
}

pub(super) fn exam_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::ExamNotFound,
        "Exam not found",
    ))
}
