pub mod feedback;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::llm::LlmProvider;
use crate::models::essays::requests::EssayFeedbackRequest;

pub use feedback::build_essay_request;

pub struct EssayService {
    provider: Option<Arc<dyn LlmProvider>>,
}

impl EssayService {
    pub fn new_lazy() -> Self {
        Self { provider: None }
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

    pub async fn feedback(
        &self,
        request: &HttpRequest,
        body: EssayFeedbackRequest,
    ) -> ActixResult<HttpResponse> {
        feedback::feedback(self, request, body).await
    }
}
