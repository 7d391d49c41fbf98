use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::detail::{classroom_not_found, internal_error};
use super::{ClassroomService, can_manage};
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode};

pub async fn list_students(
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

    if !can_manage(&user, &classroom) {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::ClassroomPermissionDenied,
            "Only the classroom teacher can view the roster",
        )));
    }

    match storage.list_classroom_student_summaries(classroom.id).await {
        Ok(students) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            students,
            "Classroom students retrieved successfully",
        ))),
        Err(e) => Ok(internal_error(e)),
    }
}
