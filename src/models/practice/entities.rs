use crate::models::questions::entities::Subject;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 练习作答记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/practice.ts")]
pub struct PracticeAttempt {
    pub id: i64,
    pub user_id: i64,
    pub question_id: i64,
    pub selected_answer: String,
    pub is_correct: bool,
    pub time_spent_seconds: Option<i32>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 单条作答及其题目的科目与 TEKS，用于统计
#[derive(Debug, Clone)]
pub struct AttemptOutcome {
    pub subject: Subject,
    pub teks_standard: String,
    pub is_correct: bool,
}

/// 某一维度（科目 / TEKS）的正确率
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/practice.ts")]
pub struct AccuracyBreakdown {
    pub key: String,
    pub attempts: i64,
    pub correct: i64,
    pub accuracy: f64,
}

/// 正确率百分比，保留一位小数；无作答时为 0
pub fn accuracy_percent(correct: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    (correct as f64 / total as f64 * 1000.0).round() / 10.0
}
