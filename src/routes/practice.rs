use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::practice::requests::{PracticeAttemptRequest, PracticeHistoryParams};
use crate::services::PracticeService;

// 懒加载的全局 PracticeService 实例
static PRACTICE_SERVICE: Lazy<PracticeService> = Lazy::new(PracticeService::new_lazy);

pub async fn submit_attempt(
    req: HttpRequest,
    body: web::Json<PracticeAttemptRequest>,
) -> ActixResult<HttpResponse> {
    PRACTICE_SERVICE
        .submit_attempt(&req, body.into_inner())
        .await
}

pub async fn list_attempts(
    req: HttpRequest,
    query: web::Query<PracticeHistoryParams>,
) -> ActixResult<HttpResponse> {
    PRACTICE_SERVICE
        .list_attempts(&req, query.into_inner())
        .await
}

pub async fn get_stats(req: HttpRequest) -> ActixResult<HttpResponse> {
    PRACTICE_SERVICE.get_stats(&req).await
}

// 配置路由
pub fn configure_practice_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/practice")
            .wrap(middlewares::RequireJWT)
            .route("/attempt", web::post().to(submit_attempt))
            .route("/attempts", web::get().to(list_attempts))
            .route("/stats", web::get().to(get_stats)),
    );
}
