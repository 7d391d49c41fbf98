use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::OrganizationService;
use crate::middlewares::RequireJWT;
use crate::models::organizations::requests::CreateOrganizationRequest;
use crate::models::{ApiResponse, ErrorCode};

pub async fn create_organization(
    service: &OrganizationService,
    request: &HttpRequest,
    body: CreateOrganizationRequest,
) -> ActixResult<HttpResponse> {
    let Some(admin_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let name = body.name.trim();
    if name.is_empty() || name.chars().count() > 200 {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Organization name must be 1 to 200 characters",
        )));
    }
    let description = body
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    let storage = service.get_storage(request);

    match storage.get_organization_by_name(name).await {
        Ok(Some(_)) => return Ok(already_exists()),
        Ok(None) => {}
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to check organization: {e}"),
                )),
            );
        }
    }

    match storage.create_organization(name, description, admin_id).await {
        Ok(organization) => {
            info!("Organization {} created by {}", organization.name, admin_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                organization,
                "Organization created",
            )))
        }
        // 名称唯一索引兜底
        Err(e) => match storage.get_organization_by_name(name).await {
            Ok(Some(_)) => Ok(already_exists()),
            _ => Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to create organization: {e}"),
                )),
            ),
        },
    }
}

fn already_exists() -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::OrganizationAlreadyExists,
        "Organization name already exists",
    ))
}
