use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ClassroomService;
use super::detail::internal_error;
use crate::middlewares::RequireJWT;
use crate::models::classrooms::requests::JoinClassroomRequest;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};

pub async fn join_classroom(
    service: &ClassroomService,
    request: &HttpRequest,
    body: JoinClassroomRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    if user.role != UserRole::Student {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::ClassroomPermissionDenied,
            "Only students can join a classroom",
        )));
    }

    let invite_code = body.invite_code.trim().to_uppercase();
    let storage = service.get_storage(request);

    let classroom = match storage.get_classroom_by_invite_code(&invite_code).await {
        Ok(Some(classroom)) => classroom,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ClassroomInviteCodeInvalid,
                "Invite code is invalid",
            )));
        }
        Err(e) => return Ok(internal_error(e)),
    };

    match storage.get_classroom_student(classroom.id, user.id).await {
        Ok(Some(_)) => return Ok(already_joined()),
        Ok(None) => {}
        Err(e) => return Ok(internal_error(e)),
    }

    match storage.add_classroom_student(classroom.id, user.id).await {
        Ok(_) => {
            info!("Student {} joined classroom {}", user.id, classroom.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(classroom, "Joined classroom")))
        }
        // 并发加入时由唯一索引拦下
        Err(e) => match storage.get_classroom_student(classroom.id, user.id).await {
            Ok(Some(_)) => Ok(already_joined()),
            _ => Ok(internal_error(e)),
        },
    }
}

fn already_joined() -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::ClassroomAlreadyJoined,
        "You have already joined this classroom",
    ))
}
