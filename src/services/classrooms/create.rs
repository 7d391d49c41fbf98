use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::ClassroomService;
use crate::middlewares::RequireJWT;
use crate::models::classrooms::requests::{CreateClassroomRequest, NewClassroom};
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::random_code::generate_invite_code;
use crate::utils::validate::validate_grade_level;

/// 邀请码冲突时的重试次数
const INVITE_CODE_ATTEMPTS: usize = 5;

pub async fn create_classroom(
    service: &ClassroomService,
    request: &HttpRequest,
    body: CreateClassroomRequest,
) -> ActixResult<HttpResponse> {
    let Some(teacher_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let name = body.name.trim().to_string();
    if name.is_empty() || name.chars().count() > 100 {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Classroom name must be 1 to 100 characters",
        )));
    }
    if let Err(msg) = validate_grade_level(body.grade_level) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }

    let storage = service.get_storage(request);

    if let Some(organization_id) = body.organization_id {
        match storage.get_organization_by_id(organization_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::OrganizationNotFound,
                    "Organization not found",
                )));
            }
            Err(e) => {
                return Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::ClassroomCreationFailed,
                        format!("Failed to check organization: {e}"),
                    )),
                );
            }
        }
    }

    // 生成未被占用的邀请码
    let mut invite_code = None;
    for _ in 0..INVITE_CODE_ATTEMPTS {
        let candidate = generate_invite_code();
        match storage.get_classroom_by_invite_code(&candidate).await {
            Ok(None) => {
                invite_code = Some(candidate);
                break;
            }
            Ok(Some(_)) => warn!("Invite code collision on {}, retrying", candidate),
            Err(e) => {
                return Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::ClassroomCreationFailed,
                        format!("Failed to create classroom: {e}"),
                    )),
                );
            }
        }
    }
    let Some(invite_code) = invite_code else {
        return Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::ClassroomCreationFailed,
                "Could not allocate a unique invite code",
            )),
        );
    };

    let new_classroom = NewClassroom {
        organization_id: body.organization_id,
        teacher_id,
        name,
        grade_level: body.grade_level,
        subject: body.subject,
        invite_code,
    };

    match storage.create_classroom(new_classroom).await {
        Ok(classroom) => {
            info!(
                "Teacher {} created classroom {} ({})",
                teacher_id, classroom.id, classroom.name
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(classroom, "Classroom created")))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::ClassroomCreationFailed,
                format!("Failed to create classroom: {e}"),
            )),
        ),
    }
}
