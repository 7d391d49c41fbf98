use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::exams::requests::{CreateExamRequest, ExamListParams, SubmitExamRequest};
use crate::services::ExamService;

// 懒加载的全局 ExamService 实例
static EXAM_SERVICE: Lazy<ExamService> = Lazy::new(ExamService::new_lazy);

pub async fn create_exam(
    req: HttpRequest,
    body: web::Json<CreateExamRequest>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.create_exam(&req, body.into_inner()).await
}

pub async fn list_exams(
    req: HttpRequest,
    query: web::Query<ExamListParams>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.list_exams(&req, query.into_inner()).await
}

pub async fn get_exam(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.get_exam(&req, path.into_inner()).await
}

pub async fn submit_exam(
    req: HttpRequest,
    body: web::Json<SubmitExamRequest>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.submit_exam(&req, body.into_inner()).await
}

// 配置路由
pub fn configure_exams_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/exams")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_exams))
                    .route(web::post().to(create_exam)),
            )
            // 固定路径须在 /{exam_id} 之前注册
            .route("/submit", web::post().to(submit_exam))
            .route("/{exam_id}", web::get().to(get_exam)),
    );
}
