use crate::models::common::pagination::{default_page, default_size, deserialize_string_to_i64};
use crate::models::questions::entities::Subject;
use serde::Deserialize;
use ts_rs::TS;

/// 创建模拟考试
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct CreateExamRequest {
    pub grade_level: i32,
    pub subject: Subject,
    /// 默认 exam.default_questions
    pub question_count: Option<usize>,
}

/// 单题作答
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct ExamAnswer {
    pub question_id: i64,
    pub selected_answer: String,
}

/// 提交考试
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct SubmitExamRequest {
    pub exam_id: i64,
    #[serde(default)]
    pub answers: Vec<ExamAnswer>,
}

/// 考试列表查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct ExamListParams {
    #[serde(default = "default_page", deserialize_with = "deserialize_string_to_i64")]
    pub page: i64,
    #[serde(default = "default_size", deserialize_with = "deserialize_string_to_i64")]
    pub size: i64,
}

// 存储层写入参数
#[derive(Debug, Clone)]
pub struct NewExam {
    pub user_id: i64,
    pub grade_level: i32,
    pub subject: Subject,
    pub question_ids: Vec<i64>,
}

/// 评分结果，写回考试记录
#[derive(Debug, Clone, PartialEq)]
pub struct ExamScore {
    pub correct_count: i32,
    pub total_questions: i32,
    pub score_percent: f64,
    pub performance_level: crate::models::exams::entities::PerformanceLevel,
}
