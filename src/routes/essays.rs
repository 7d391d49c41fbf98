use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::essays::requests::EssayFeedbackRequest;
use crate::services::EssayService;

// 懒加载的全局 EssayService 实例
static ESSAY_SERVICE: Lazy<EssayService> = Lazy::new(EssayService::new_lazy);

pub async fn feedback(
    req: HttpRequest,
    body: web::Json<EssayFeedbackRequest>,
) -> ActixResult<HttpResponse> {
    ESSAY_SERVICE.feedback(&req, body.into_inner()).await
}

// 配置路由
pub fn configure_essays_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/essays")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/feedback")
                    .wrap(middlewares::RateLimit::essay())
                    .route(web::post().to(feedback)),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{Result, StaarError};
    use crate::llm::{CompletionRequest, CompletionResponse, LlmProvider};
    use crate::models::ErrorCode;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::test_support::seed_user;
    use crate::storage::{SeaOrmStorage, Storage};
    use crate::utils::jwt::JwtUtils;
    use actix_web::{App, http::StatusCode, test};
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::sync::Arc;

    struct FixedProvider(Option<&'static str>);

    #[async_trait]
    impl LlmProvider for FixedProvider {
        fn name(&self) -> &str {
            "fixed"
        }
        fn model(&self) -> &str {
            "fixed-1"
        }
        async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
            assert_eq!(request.messages.len(), 1);
            match self.0 {
                Some(text) => Ok(CompletionResponse {
                    text: text.to_string(),
                    provider: "fixed".into(),
                    model: "fixed-1".into(),
                }),
                None => Err(StaarError::llm_status(503, "overloaded")),
            }
        }
    }

    fn bearer(user_id: i64, role: &str) -> (&'static str, String) {
        let token = JwtUtils::generate_access_token(user_id, role).unwrap();
        ("Authorization", format!("Bearer {token}"))
    }

    async fn post_essay(reply: Option<&'static str>, username: &str) -> (StatusCode, Value) {
        let storage = SeaOrmStorage::in_memory().await;
        let student = seed_user(&storage, username, UserRole::Student).await;
        let storage: Arc<dyn Storage> = Arc::new(storage);
        let provider: Arc<dyn LlmProvider> = Arc::new(FixedProvider(reply));

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage))
                .app_data(web::Data::new(provider))
                .configure(configure_essays_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/essays/feedback")
            .insert_header(bearer(student.id, "student"))
            .set_json(json!({
                "grade_level": 4,
                "prompt": "Write about a time you helped someone.",
                "essay": "Last fall I helped my neighbor rake leaves. It took all day."
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        (status, test::read_body_json(resp).await)
    }

    #[actix_web::test]
    async fn test_essay_feedback_returns_coach_reply() {
        let (status, body) =
            post_essay(Some("  Development and Organization: 2/3. Nice details!  "), "ava.w").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["data"]["feedback"],
            "Development and Organization: 2/3. Nice details!"
        );
        assert_eq!(body["data"]["word_count"], 12);
        assert_eq!(body["data"]["provider"], "fixed");
    }

    #[actix_web::test]
    async fn test_essay_feedback_reports_provider_outage() {
        let (status, body) = post_essay(None, "leo.k").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["code"], ErrorCode::EssayFeedbackUnavailable as i32);
    }
}
