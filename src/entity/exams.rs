//! 模拟考试实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "exams")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub grade_level: i32,
    pub subject: String,
    /// JSON 数组，题目 ID 按出题顺序
    #[sea_orm(column_type = "Text")]
    pub question_ids: String,
    pub status: String,
    pub total_questions: i32,
    pub correct_count: Option<i32>,
    #[sea_orm(column_type = "Double", nullable)]
    pub score_percent: Option<f64>,
    pub performance_level: Option<String>,
    pub created_at: i64,
    pub submitted_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_exam(self) -> crate::models::exams::entities::Exam {
        use crate::models::exams::entities::{Exam, ExamStatus, PerformanceLevel};
        use crate::models::questions::entities::Subject;

        Exam {
            id: self.id,
            user_id: self.user_id,
            grade_level: self.grade_level,
            subject: self.subject.parse::<Subject>().unwrap_or(Subject::Math),
            question_ids: serde_json::from_str(&self.question_ids).unwrap_or_default(),
            status: self
                .status
                .parse::<ExamStatus>()
                .unwrap_or(ExamStatus::InProgress),
            total_questions: self.total_questions,
            correct_count: self.correct_count,
            score_percent: self.score_percent,
            performance_level: self
                .performance_level
                .and_then(|level| level.parse::<PerformanceLevel>().ok()),
            created_at: super::ts_to_datetime(self.created_at),
            submitted_at: self.submitted_at.map(super::ts_to_datetime),
        }
    }
}
