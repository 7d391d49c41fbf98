use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::tutor::requests::TutorChatRequest;
use crate::services::TutorService;

// 懒加载的全局 TutorService 实例
static TUTOR_SERVICE: Lazy<TutorService> = Lazy::new(TutorService::new_lazy);

pub async fn chat(
    req: HttpRequest,
    body: web::Json<TutorChatRequest>,
) -> ActixResult<HttpResponse> {
    TUTOR_SERVICE.chat(&req, body.into_inner()).await
}

// 配置路由
pub fn configure_tutor_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/tutor")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/chat")
                    .wrap(middlewares::RateLimit::tutor())
                    .route(web::post().to(chat)),
            ),
    );
}
