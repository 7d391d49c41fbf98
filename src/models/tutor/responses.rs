use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/tutor.ts")]
pub struct TutorChatResponse {
    pub reply: String,
    pub provider: String,
    pub model: String,
}
