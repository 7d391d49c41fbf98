pub mod attempt;
pub mod history;
pub mod stats;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::practice::requests::{PracticeAttemptRequest, PracticeHistoryParams};
use crate::storage::Storage;

pub use stats::summarize_outcomes;

pub struct PracticeService {
    storage: Option<Arc<dyn Storage>>,
}

impl PracticeService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
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

    // 提交作答并判分
    pub async fn submit_attempt(
        &self,
        request: &HttpRequest,
        body: PracticeAttemptRequest,
    ) -> ActixResult<HttpResponse> {
        attempt::submit_attempt(self, request, body).await
    }

    pub async fn list_attempts(
        &self,
        request: &HttpRequest,
        query: PracticeHistoryParams,
    ) -> ActixResult<HttpResponse> {
        history::list_attempts(self, request, query).await
    }

    pub async fn get_stats(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        stats::get_stats(self, request).await
    }
}
