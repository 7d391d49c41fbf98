use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::PracticeService;
use crate::middlewares::RequireJWT;
use crate::models::practice::{
    requests::{NewPracticeAttempt, PracticeAttemptRequest},
    responses::PracticeAttemptResponse,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::questions::generator::normalize_answer_letter;

pub async fn submit_attempt(
    service: &PracticeService,
    request: &HttpRequest,
    body: PracticeAttemptRequest,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let Some(selected_answer) = normalize_answer_letter(&body.selected_answer) else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::PracticeAttemptInvalid,
            "selected_answer must be one of A, B, C, D",
        )));
    };

    if let Some(seconds) = body.time_spent_seconds
        && seconds < 0
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::PracticeAttemptInvalid,
            "time_spent_seconds cannot be negative",
        )));
    }

    let storage = service.get_storage(request);

    let question = match storage.get_question_by_id(body.question_id).await {
        Ok(Some(question)) => question,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::QuestionNotFound,
                "Question not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to load question: {e}"),
                )),
            );
        }
    };

    let is_correct = question.is_correct(&selected_answer);
    let attempt = NewPracticeAttempt {
        user_id,
        question_id: question.id,
        selected_answer,
        is_correct,
        time_spent_seconds: body.time_spent_seconds,
    };

    match storage.create_practice_attempt(attempt).await {
        Ok(saved) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            PracticeAttemptResponse {
                attempt_id: saved.id,
                is_correct,
                correct_answer: question.correct_answer,
                explanation: question.explanation,
            },
            if is_correct { "Correct!" } else { "Not quite" },
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to record attempt: {e}"),
            )),
        ),
    }
}
