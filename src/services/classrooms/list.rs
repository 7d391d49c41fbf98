use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassroomService;
use crate::middlewares::RequireJWT;
use crate::models::classrooms::responses::ClassroomListResponse;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};

pub async fn list_classrooms(
    service: &ClassroomService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let storage = service.get_storage(request);

    // 管理员看全部，教师看自己的，学生看已加入的
    let result = match user.role {
        UserRole::Admin => storage.list_classrooms(None).await,
        UserRole::Teacher => storage.list_classrooms(Some(user.id)).await,
        UserRole::Student => storage.list_student_classrooms(user.id).await,
    };

    match result {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ClassroomListResponse { items },
            "Classrooms retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to list classrooms: {e}"),
            )),
        ),
    }
}
