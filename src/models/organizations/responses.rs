use crate::models::organizations::entities::Organization;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/organization.ts")]
pub struct OrganizationListResponse {
    pub items: Vec<Organization>,
}
