use crate::models::practice::entities::AccuracyBreakdown;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/practice.ts")]
pub struct PracticeAttemptResponse {
    pub attempt_id: i64,
    pub is_correct: bool,
    pub correct_answer: String,
    pub explanation: String,
}

/// 练习统计：总体与按科目、按 TEKS 的正确率（最弱在前）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/practice.ts")]
pub struct PracticeStats {
    pub total_attempts: i64,
    pub correct_attempts: i64,
    pub accuracy: f64,
    pub by_subject: Vec<AccuracyBreakdown>,
    pub by_teks: Vec<AccuracyBreakdown>,
}
