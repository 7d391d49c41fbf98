pub mod delete;
pub mod detail;
pub mod fallback;
pub mod generate;
pub mod generator;
pub mod list;
pub mod prompt;
pub mod validate;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::llm::LlmProvider;
use crate::middlewares::RequireJWT;
use crate::models::questions::requests::{GenerateQuestionsRequest, QuestionListParams};
use crate::models::users::entities::UserRole;
use crate::storage::Storage;

pub use generate::{ProducedBatch, produce_questions};
pub use generator::generate_question;
pub use validate::validate_question;

/// 只有教师与管理员能看到正确答案与解析
pub(crate) fn reveals_answers(request: &HttpRequest) -> bool {
    RequireJWT::extract_user_claims(request)
        .is_some_and(|user| matches!(user.role, UserRole::Teacher | UserRole::Admin))
}

pub struct QuestionService {
    storage: Option<Arc<dyn Storage>>,
    provider: Option<Arc<dyn LlmProvider>>,
}

impl QuestionService {
    pub fn new_lazy() -> Self {
        Self {
            storage: None,
            provider: None,
        }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn get_provider(&self, request: &HttpRequest) -> Arc<dyn LlmProvider> {
        if let Some(provider) = &self.provider {
            provider.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn LlmProvider>>>()
                .expect("LLM provider not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    // 生成并保存题目
    pub async fn generate(
        &self,
        request: &HttpRequest,
        body: GenerateQuestionsRequest,
    ) -> ActixResult<HttpResponse> {
        generate::generate_questions(self, request, body).await
    }

    // 分页列出题目
    pub async fn list_questions(
        &self,
        request: &HttpRequest,
        query: QuestionListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_questions(self, request, query).await
    }

    pub async fn get_question(
        &self,
        request: &HttpRequest,
        question_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_question(self, request, question_id).await
    }

    pub async fn delete_question(
        &self,
        request: &HttpRequest,
        question_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_question(self, request, question_id).await
    }
}
