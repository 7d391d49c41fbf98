use crate::models::exams::entities::{Exam, PerformanceLevel};
use crate::models::questions::entities::Question;
use serde::Serialize;
use ts_rs::TS;

/// 考试中展示给学生的题目（不含答案与解析）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct ExamQuestionView {
    pub id: i64,
    pub teks_standard: String,
    pub question_text: String,
    pub answer_choices: Vec<String>,
    pub has_image: bool,
    pub image_description: Option<String>,
}

impl From<&Question> for ExamQuestionView {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id,
            teks_standard: q.teks_standard.clone(),
            question_text: q.question_text.clone(),
            answer_choices: q.answer_choices.clone(),
            has_image: q.has_image,
            image_description: q.image_description.clone(),
        }
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct ExamResponse {
    pub exam: Exam,
    pub questions: Vec<ExamQuestionView>,
}

/// 单题回顾
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct QuestionReview {
    pub question_id: i64,
    pub selected_answer: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
    pub explanation: String,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct ExamResultResponse {
    pub exam_id: i64,
    pub total_questions: i32,
    pub correct_count: i32,
    pub score_percent: f64,
    pub performance_level: PerformanceLevel,
    pub review: Vec<QuestionReview>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::questions::entities::{QuestionSource, Subject};

    #[test]
    fn test_exam_question_view_has_no_answer_key() {
        let question = Question {
            id: 12,
            grade_level: 4,
            subject: Subject::Reading,
            teks_standard: "4.6F".into(),
            category: Some("inference".into()),
            question_text: "Why did Maya close the window?".into(),
            answer_choices: vec![
                "She was cold".into(),
                "It was raining".into(),
                "The dog barked".into(),
                "She was sleepy".into(),
            ],
            correct_answer: "B".into(),
            explanation: "The story says rain was coming in.".into(),
            has_image: true,
            image_description: Some("A rainy street".into()),
            source: QuestionSource::Generated,
            provider: Some("ollama".into()),
            created_by: Some(3),
            created_at: chrono::Utc::now(),
        };
        let json = serde_json::to_value(ExamQuestionView::from(&question)).unwrap();
        assert_eq!(json["id"], 12);
        assert_eq!(json["teks_standard"], "4.6F");
        assert_eq!(json["image_description"], "A rainy street");
        assert!(json.get("correct_answer").is_none());
        assert!(json.get("explanation").is_none());
    }
}
