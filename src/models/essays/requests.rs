use serde::Deserialize;
use ts_rs::TS;

/// 作文反馈请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/essay.ts")]
pub struct EssayFeedbackRequest {
    pub grade_level: i32,
    /// 写作题目
    pub prompt: String,
    pub essay: String,
}
