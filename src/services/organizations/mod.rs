pub mod create;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::organizations::requests::CreateOrganizationRequest;
use crate::storage::Storage;

pub struct OrganizationService {
    storage: Option<Arc<dyn Storage>>,
}

impl OrganizationService {
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

    pub async fn create_organization(
        &self,
        request: &HttpRequest,
        body: CreateOrganizationRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_organization(self, request, body).await
    }

    pub async fn list_organizations(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_organizations(self, request).await
    }
}
