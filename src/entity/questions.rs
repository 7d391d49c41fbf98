//! 题目实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "questions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub grade_level: i32,
    pub subject: String,
    pub teks_standard: String,
    pub category: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub question_text: String,
    /// JSON 数组，4 个选项
    #[sea_orm(column_type = "Text")]
    pub answer_choices: String,
    pub correct_answer: String,
    #[sea_orm(column_type = "Text")]
    pub explanation: String,
    pub has_image: bool,
    #[sea_orm(column_type = "Text", nullable)]
    pub image_description: Option<String>,
    pub source: String,
    pub provider: Option<String>,
    pub created_by: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::practice_attempts::Entity")]
    PracticeAttempts,
}

impl Related<super::practice_attempts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PracticeAttempts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_question(self) -> crate::models::questions::entities::Question {
        use crate::models::questions::entities::{Question, QuestionSource, Subject};

        Question {
            id: self.id,
            grade_level: self.grade_level,
            subject: self.subject.parse::<Subject>().unwrap_or(Subject::Math),
            teks_standard: self.teks_standard,
            category: self.category,
            question_text: self.question_text,
            answer_choices: serde_json::from_str(&self.answer_choices).unwrap_or_default(),
            correct_answer: self.correct_answer,
            explanation: self.explanation,
            has_image: self.has_image,
            image_description: self.image_description,
            source: self
                .source
                .parse::<QuestionSource>()
                .unwrap_or(QuestionSource::Generated),
            provider: self.provider,
            created_by: self.created_by,
            created_at: super::ts_to_datetime(self.created_at),
        }
    }
}
