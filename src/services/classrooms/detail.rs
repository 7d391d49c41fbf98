use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ClassroomService, can_manage};
use crate::middlewares::RequireJWT;
use crate::models::classrooms::responses::ClassroomDetailResponse;
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_classroom(
    service: &ClassroomService,
    request: &HttpRequest,
    classroom_id: i64,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let storage = service.get_storage(request);

    let classroom = match storage.get_classroom_by_id(classroom_id).await {
        Ok(Some(classroom)) => classroom,
        Ok(None) => return Ok(classroom_not_found()),
        Err(e) => return Ok(internal_error(e)),
    };

    // 创建者、管理员或班级成员可见
    if !can_manage(&user, &classroom) {
        match storage.get_classroom_student(classroom.id, user.id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                    ErrorCode::ClassroomPermissionDenied,
                    "You are not a member of this classroom",
                )));
            }
            Err(e) => return Ok(internal_error(e)),
        }
    }

    match storage.count_classroom_students(classroom.id).await {
        Ok(student_count) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ClassroomDetailResponse {
                classroom,
                student_count,
            },
            "Classroom retrieved successfully",
        ))),
        Err(e) => Ok(internal_error(e)),
    }
}

pub(super) fn classroom_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::ClassroomNotFound,
        "Classroom not found",
    ))
}

pub(super) fn internal_error(e: crate::errors::StaarError) -> HttpResponse {
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::InternalServerError,
        format!("Classroom operation failed: {e}"),
    ))
}
