use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::organizations::requests::CreateOrganizationRequest;
use crate::models::users::entities::UserRole;
use crate::services::OrganizationService;

// 懒加载的全局 OrganizationService 实例
static ORGANIZATION_SERVICE: Lazy<OrganizationService> =
    Lazy::new(OrganizationService::new_lazy);

pub async fn create_organization(
    req: HttpRequest,
    body: web::Json<CreateOrganizationRequest>,
) -> ActixResult<HttpResponse> {
    ORGANIZATION_SERVICE
        .create_organization(&req, body.into_inner())
        .await
}

pub async fn list_organizations(req: HttpRequest) -> ActixResult<HttpResponse> {
    ORGANIZATION_SERVICE.list_organizations(&req).await
}

// 配置路由
pub fn configure_organizations_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/organizations")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("").route(web::get().to(list_organizations)).route(
                    web::post()
                        .to(create_organization)
                        // 仅管理员可创建组织
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            ),
    );
}
