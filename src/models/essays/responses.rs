use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/essay.ts")]
pub struct EssayFeedbackResponse {
    pub feedback: String,
    pub word_count: usize,
    pub provider: String,
    pub model: String,
}
