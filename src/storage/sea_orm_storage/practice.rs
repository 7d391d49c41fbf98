//! 练习作答存储操作

use super::SeaOrmStorage;
use crate::entity::practice_attempts::{ActiveModel, Column, Entity as PracticeAttempts, Relation};
use crate::entity::questions::Column as QuestionColumn;
use crate::errors::{Result, StaarError};
use crate::models::{
    PaginatedResponse, PaginationInfo, PaginationQuery,
    practice::{
        entities::{AttemptOutcome, PracticeAttempt},
        requests::NewPracticeAttempt,
    },
    questions::entities::Subject,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set,
};

impl SeaOrmStorage {
    /// 记录一次作答
    pub async fn create_practice_attempt_impl(
        &self,
        req: NewPracticeAttempt,
    ) -> Result<PracticeAttempt> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            user_id: Set(req.user_id),
            question_id: Set(req.question_id),
            selected_answer: Set(req.selected_answer),
            is_correct: Set(req.is_correct),
            time_spent_seconds: Set(req.time_spent_seconds),
            created_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| StaarError::database_operation(format!("记录作答失败: {e}")))?;

        Ok(result.into_practice_attempt())
    }

    /// 分页列出用户作答历史，最新的在前
    pub async fn list_practice_attempts_impl(
        &self,
        user_id: i64,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<PracticeAttempt>> {
        let (page, size) = pagination.normalized();

        let paginator = PracticeAttempts::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| StaarError::database_operation(format!("查询作答总数失败: {e}")))?;

        let attempts = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| StaarError::database_operation(format!("查询作答历史失败: {e}")))?;

        Ok(PaginatedResponse {
            items: attempts
                .into_iter()
                .map(|m| m.into_practice_attempt())
                .collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 用户全部作答结果及对应题目的科目、TEKS
    pub async fn list_attempt_outcomes_impl(&self, user_id: i64) -> Result<Vec<AttemptOutcome>> {
        let rows = PracticeAttempts::find()
            .select_only()
            .column(QuestionColumn::Subject)
            .column(QuestionColumn::TeksStandard)
            .column(Column::IsCorrect)
            .join(JoinType::InnerJoin, Relation::Question.def())
            .filter(Column::UserId.eq(user_id))
            .into_tuple::<(String, String, bool)>()
            .all(&self.db)
            .await
            .map_err(|e| StaarError::database_operation(format!("查询作答统计失败: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|(subject, teks_standard, is_correct)| {
                let subject = subject.parse::<Subject>().ok()?;
                Some(AttemptOutcome {
                    subject,
                    teks_standard,
                    is_correct,
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::test_support::{seed_question, seed_user};

    fn attempt(user_id: i64, question_id: i64, is_correct: bool) -> NewPracticeAttempt {
        NewPracticeAttempt {
            user_id,
            question_id,
            selected_answer: if is_correct { "B" } else { "C" }.to_string(),
            is_correct,
            time_spent_seconds: Some(30),
        }
    }

    #[tokio::test]
    async fn test_history_is_scoped_to_user_and_paginated() {
        let storage = SeaOrmStorage::in_memory().await;
        let student = seed_user(&storage, "student", UserRole::Student).await;
        let other = seed_user(&storage, "other", UserRole::Student).await;
        let q = seed_question(&storage, 3, Subject::Math, "3.4A").await;

        let mut last_id = 0;
        for i in 0..5 {
            last_id = storage
                .create_practice_attempt(attempt(student.id, q.id, i % 2 == 0))
                .await
                .unwrap()
                .id;
        }
        storage
            .create_practice_attempt(attempt(other.id, q.id, true))
            .await
            .unwrap();

        let first_page = storage
            .list_practice_attempts(student.id, PaginationQuery::new(1, 2))
            .await
            .unwrap();
        assert_eq!(first_page.pagination.total, 5);
        assert_eq!(first_page.pagination.total_pages, 3);
        assert_eq!(first_page.items.len(), 2);
        assert_eq!(first_page.items[0].id, last_id);
        assert!(first_page.items.iter().all(|a| a.user_id == student.id));
    }

    #[tokio::test]
    async fn test_outcomes_carry_question_subject_and_teks() {
        let storage = SeaOrmStorage::in_memory().await;
        let student = seed_user(&storage, "student", UserRole::Student).await;
        let math = seed_question(&storage, 3, Subject::Math, "3.4A").await;
        let reading = seed_question(&storage, 3, Subject::Reading, "3.6G").await;

        storage
            .create_practice_attempt(attempt(student.id, math.id, true))
            .await
            .unwrap();
        storage
            .create_practice_attempt(attempt(student.id, reading.id, false))
            .await
            .unwrap();

        let mut outcomes = storage.list_attempt_outcomes(student.id).await.unwrap();
        outcomes.sort_by(|a, b| a.teks_standard.cmp(&b.teks_standard));
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].subject, Subject::Math);
        assert!(outcomes[0].is_correct);
        assert_eq!(outcomes[1].teks_standard, "3.6G");
        assert!(!outcomes[1].is_correct);
    }
}
