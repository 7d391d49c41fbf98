use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::OrganizationService;
use crate::models::organizations::responses::OrganizationListResponse;
use crate::models::{ApiResponse, ErrorCode};

pub async fn list_organizations(
    service: &OrganizationService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_organizations().await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            OrganizationListResponse { items },
            "Organizations retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to list organizations: {e}"),
            )),
        ),
    }
}
