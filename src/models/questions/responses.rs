use crate::models::questions::entities::{Question, QuestionSource, Subject};
use serde::Serialize;
use ts_rs::TS;

/// 学生可见的题目（不含正确答案与解析）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct QuestionView {
    pub id: i64,
    pub grade_level: i32,
    pub subject: Subject,
    pub teks_standard: String,
    pub category: Option<String>,
    pub question_text: String,
    pub answer_choices: Vec<String>,
    pub has_image: bool,
    pub image_description: Option<String>,
    pub source: QuestionSource,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<&Question> for QuestionView {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id,
            grade_level: q.grade_level,
            subject: q.subject,
            teks_standard: q.teks_standard.clone(),
            category: q.category.clone(),
            question_text: q.question_text.clone(),
            answer_choices: q.answer_choices.clone(),
            has_image: q.has_image,
            image_description: q.image_description.clone(),
            source: q.source,
            created_at: q.created_at,
        }
    }
}

/// 生成结果；学生拿到 `QuestionView`，教师与管理员拿到完整题目
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct GenerateQuestionsResponse<T: TS> {
    pub questions: Vec<T>,
    /// 请求的数量
    pub requested: usize,
    /// 其中来自内置题库的数量
    pub fallback_count: usize,
}
