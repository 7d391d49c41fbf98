use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::questions::requests::{GenerateQuestionsRequest, QuestionListParams};
use crate::models::users::entities::UserRole;
use crate::services::QuestionService;

// 懒加载的全局 QuestionService 实例
static QUESTION_SERVICE: Lazy<QuestionService> = Lazy::new(QuestionService::new_lazy);

pub async fn generate_questions(
    req: HttpRequest,
    body: web::Json<GenerateQuestionsRequest>,
) -> ActixResult<HttpResponse> {
    QUESTION_SERVICE.generate(&req, body.into_inner()).await
}

pub async fn list_questions(
    req: HttpRequest,
    query: web::Query<QuestionListParams>,
) -> ActixResult<HttpResponse> {
    QUESTION_SERVICE
        .list_questions(&req, query.into_inner())
        .await
}

pub async fn get_question(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    QUESTION_SERVICE.get_question(&req, path.into_inner()).await
}

pub async fn delete_question(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    QUESTION_SERVICE
        .delete_question(&req, path.into_inner())
        .await
}

// 配置路由
pub fn configure_questions_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/questions")
            .wrap(middlewares::RequireJWT)
            .service(
                // 生成会调用 LLM，按用户限流
                web::resource("/generate")
                    .wrap(middlewares::RateLimit::generate())
                    .route(web::post().to(generate_questions)),
            )
            .service(web::resource("").route(web::get().to(list_questions)))
            .service(
                web::resource("/{question_id}")
                    .route(web::get().to(get_question))
                    .route(
                        web::delete()
                            .to(delete_question)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::questions::entities::Subject;
    use crate::storage::sea_orm_storage::test_support::{seed_question, seed_user};
    use crate::storage::{SeaOrmStorage, Storage};
    use crate::utils::jwt::JwtUtils;
    use actix_web::{App, test};
    use serde_json::Value;
    use std::sync::Arc;

    fn bearer(user_id: i64, role: &str) -> (&'static str, String) {
        let token = JwtUtils::generate_access_token(user_id, role).unwrap();
        ("Authorization", format!("Bearer {token}"))
    }

    #[actix_web::test]
    async fn test_students_never_see_answer_keys() {
        let storage = SeaOrmStorage::in_memory().await;
        let student = seed_user(&storage, "maya.s", UserRole::Student).await;
        let teacher = seed_user(&storage, "mr.ortiz", UserRole::Teacher).await;
        let question = seed_question(&storage, 3, Subject::Math, "3.4A").await;
        let storage: Arc<dyn Storage> = Arc::new(storage);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage))
                .configure(configure_questions_routes),
        )
        .await;

        let detail_uri = format!("/api/questions/{}", question.id);

        let req = test::TestRequest::get()
            .uri(&detail_uri)
            .insert_header(bearer(student.id, "student"))
            .to_request();
        let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(body["data"]["id"], question.id);
        assert!(body["data"].get("correct_answer").is_none());
        assert!(body["data"].get("explanation").is_none());

        let req = test::TestRequest::get()
            .uri("/api/questions")
            .insert_header(bearer(student.id, "student"))
            .to_request();
        let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
        let items = body["data"]["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert!(items[0].get("correct_answer").is_none());

        // 教师仍能看到完整题目
        let req = test::TestRequest::get()
            .uri(&detail_uri)
            .insert_header(bearer(teacher.id, "teacher"))
            .to_request();
        let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(body["data"]["correct_answer"], "B");

        let req = test::TestRequest::get()
            .uri("/api/questions")
            .insert_header(bearer(teacher.id, "teacher"))
            .to_request();
        let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(body["data"]["items"][0]["correct_answer"], "B");
    }
}
