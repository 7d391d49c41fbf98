use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ExamService;
use super::detail::exam_not_found;
use super::scoring::score_exam;
use crate::middlewares::RequireJWT;
use crate::models::exams::{
    entities::ExamStatus, requests::SubmitExamRequest, responses::ExamResultResponse,
};
use crate::models::{ApiResponse, ErrorCode};

pub async fn submit_exam(
    service: &ExamService,
    request: &HttpRequest,
    body: SubmitExamRequest,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let storage = service.get_storage(request);

    let exam = match storage.get_exam_by_id(body.exam_id).await {
        Ok(Some(exam)) if exam.user_id == user_id => exam,
        Ok(_) => return Ok(exam_not_found()),
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get exam: {e}"),
                )),
            );
        }
    };

    if exam.status != ExamStatus::InProgress {
        return Ok(already_submitted());
    }

    let questions = match storage.get_questions_by_ids(&exam.question_ids).await {
        Ok(questions) => questions,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to load exam questions: {e}"),
                )),
            );
        }
    };

    let (score, review) = match score_exam(&questions, &body.answers) {
        Ok(result) => result,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::ExamAnswerInvalid,
                e.message(),
            )));
        }
    };

    // 并发提交时只有第一次写入成功
    match storage.submit_exam(exam.id, score.clone()).await {
        Ok(Some(_)) => {
            info!(
                "User {} submitted exam {}: {}/{} ({}%, {})",
                user_id,
                exam.id,
                score.correct_count,
                score.total_questions,
                score.score_percent,
                score.performance_level
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                ExamResultResponse {
                    exam_id: exam.id,
                    total_questions: score.total_questions,
                    correct_count: score.correct_count,
                    score_percent: score.score_percent,
                    performance_level: score.performance_level,
                    review,
                },
                "Exam submitted",
            )))
        }
        Ok(None) => Ok(already_submitted()),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to submit exam: {e}"),
            )),
        ),
    }
}

fn already_submitted() -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::ExamAlreadySubmitted,
        "Exam has already been submitted",
    ))
}
