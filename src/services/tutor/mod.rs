pub mod chat;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::llm::LlmProvider;
use crate::models::tutor::requests::TutorChatRequest;

pub use chat::build_tutor_request;

pub struct TutorService {
    provider: Option<Arc<dyn LlmProvider>>,
}

impl TutorService {
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

    pub async fn chat(
        &self,
        request: &HttpRequest,
        body: TutorChatRequest,
    ) -> ActixResult<HttpResponse> {
        chat::chat(self, request, body).await
    }
}
