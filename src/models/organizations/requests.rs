use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/organization.ts")]
pub struct CreateOrganizationRequest {
    pub name: String,
    pub description: Option<String>,
}
