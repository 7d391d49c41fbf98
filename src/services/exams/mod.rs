pub mod create;
pub mod detail;
pub mod list;
pub mod scoring;
pub mod submit;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::llm::LlmProvider;
use crate::models::exams::requests::{CreateExamRequest, ExamListParams, SubmitExamRequest};
use crate::storage::Storage;

pub use scoring::score_exam;

pub struct ExamService {
    storage: Option<Arc<dyn Storage>>,
    provider: Option<Arc<dyn LlmProvider>>,
}

impl ExamService {
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

    // 创建模拟考试
    pub async fn create_exam(
        &self,
        request: &HttpRequest,
        body: CreateExamRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_exam(self, request, body).await
    }

    pub async fn list_exams(
        &self,
        request: &HttpRequest,
        query: ExamListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_exams(self, request, query).await
    }

    pub async fn get_exam(&self, request: &HttpRequest, exam_id: i64) -> ActixResult<HttpResponse> {
        detail::get_exam(self, request, exam_id).await
    }

    // 交卷评分
    pub async fn submit_exam(
        &self,
        request: &HttpRequest,
        body: SubmitExamRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit_exam(self, request, body).await
    }
}
