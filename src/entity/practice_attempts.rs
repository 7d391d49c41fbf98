//! 练习作答实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "practice_attempts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub question_id: i64,
    pub selected_answer: String,
    pub is_correct: bool,
    pub time_spent_seconds: Option<i32>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::questions::Entity",
        from = "Column::QuestionId",
        to = "super::questions::Column::Id"
    )]
    Question,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::questions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Question.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_practice_attempt(self) -> crate::models::practice::entities::PracticeAttempt {
        crate::models::practice::entities::PracticeAttempt {
            id: self.id,
            user_id: self.user_id,
            question_id: self.question_id,
            selected_answer: self.selected_answer,
            is_correct: self.is_correct,
            time_spent_seconds: self.time_spent_seconds,
            created_at: super::ts_to_datetime(self.created_at),
        }
    }
}
