use crate::models::common::pagination::{default_page, default_size, deserialize_string_to_i64};
use serde::Deserialize;
use ts_rs::TS;

/// 提交练习作答
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/practice.ts")]
pub struct PracticeAttemptRequest {
    pub question_id: i64,
    /// A-D，允许 "b"、"B)" 之类写法
    pub selected_answer: String,
    pub time_spent_seconds: Option<i32>,
}

/// 作答历史查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/practice.ts")]
pub struct PracticeHistoryParams {
    #[serde(default = "default_page", deserialize_with = "deserialize_string_to_i64")]
    pub page: i64,
    #[serde(default = "default_size", deserialize_with = "deserialize_string_to_i64")]
    pub size: i64,
}

// 存储层写入参数
#[derive(Debug, Clone)]
pub struct NewPracticeAttempt {
    pub user_id: i64,
    pub question_id: i64,
    pub selected_answer: String,
    pub is_correct: bool,
    pub time_spent_seconds: Option<i32>,
}
