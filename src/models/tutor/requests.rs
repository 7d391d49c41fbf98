use crate::models::questions::entities::Subject;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 对话消息（role: user / assistant）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/tutor.ts")]
pub struct TutorMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/tutor.ts")]
pub struct TutorChatRequest {
    pub grade_level: i32,
    pub subject: Option<Subject>,
    pub messages: Vec<TutorMessage>,
}
