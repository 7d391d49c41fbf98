//! 模拟考试存储操作

use super::SeaOrmStorage;
use crate::entity::exams::{ActiveModel, Column, Entity as Exams};
use crate::errors::{Result, StaarError};
use crate::models::{
    PaginatedResponse, PaginationInfo, PaginationQuery,
    exams::{
        entities::{Exam, ExamStatus},
        requests::{ExamScore, NewExam},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};

impl SeaOrmStorage {
    /// 创建考试，题目 ID 以 JSON 数组保存
    pub async fn create_exam_impl(&self, req: NewExam) -> Result<Exam> {
        let now = chrono::Utc::now().timestamp();
        let total_questions = req.question_ids.len() as i32;
        let question_ids = serde_json::to_string(&req.question_ids)?;

        let model = ActiveModel {
            user_id: Set(req.user_id),
            grade_level: Set(req.grade_level),
            subject: Set(req.subject.to_string()),
            question_ids: Set(question_ids),
            status: Set(ExamStatus::InProgress.to_string()),
            total_questions: Set(total_questions),
            correct_count: Set(None),
            score_percent: Set(None),
            performance_level: Set(None),
            created_at: Set(now),
            submitted_at: Set(None),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| StaarError::database_operation(format!("创建考试失败: {e}")))?;

        Ok(result.into_exam())
    }

    pub async fn get_exam_by_id_impl(&self, id: i64) -> Result<Option<Exam>> {
        let result = Exams::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| StaarError::database_operation(format!("查询考试失败: {e}")))?;

        Ok(result.map(|m| m.into_exam()))
    }

    /// 分页列出用户的考试，最新的在前
    pub async fn list_exams_impl(
        &self,
        user_id: i64,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<Exam>> {
        let (page, size) = pagination.normalized();

        let paginator = Exams::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| StaarError::database_operation(format!("查询考试总数失败: {e}")))?;

        let exams = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| StaarError::database_operation(format!("查询考试列表失败: {e}")))?;

        Ok(PaginatedResponse {
            items: exams.into_iter().map(|m| m.into_exam()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 写入成绩。只有进行中的考试会被更新，已提交的返回 None
    pub async fn submit_exam_impl(&self, id: i64, score: ExamScore) -> Result<Option<Exam>> {
        let now = chrono::Utc::now().timestamp();

        let result = Exams::update_many()
            .col_expr(Column::Status, Expr::value(ExamStatus::Submitted.to_string()))
            .col_expr(Column::CorrectCount, Expr::value(score.correct_count))
            .col_expr(Column::TotalQuestions, Expr::value(score.total_questions))
            .col_expr(Column::ScorePercent, Expr::value(score.score_percent))
            .col_expr(
                Column::PerformanceLevel,
                Expr::value(score.performance_level.to_string()),
            )
            .col_expr(Column::SubmittedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(ExamStatus::InProgress.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| StaarError::database_operation(format!("提交考试失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.get_exam_by_id_impl(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::exams::entities::PerformanceLevel;
    use crate::models::questions::entities::Subject;
    use crate::models::users::entities::UserRole;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::test_support::seed_user;

    fn new_exam(user_id: i64) -> NewExam {
        NewExam {
            user_id,
            grade_level: 5,
            subject: Subject::Reading,
            question_ids: vec![7, 3, 11],
        }
    }

    #[tokio::test]
    async fn test_exam_create_and_submit_once() {
        let storage = SeaOrmStorage::in_memory().await;
        let student = seed_user(&storage, "student", UserRole::Student).await;

        let exam = storage.create_exam(new_exam(student.id)).await.unwrap();
        assert_eq!(exam.status, ExamStatus::InProgress);
        assert_eq!(exam.question_ids, vec![7, 3, 11]);
        assert_eq!(exam.total_questions, 3);
        assert!(exam.score_percent.is_none());

        let score = ExamScore {
            correct_count: 2,
            total_questions: 3,
            score_percent: 66.7,
            performance_level: PerformanceLevel::Approaches,
        };
        let submitted = storage
            .submit_exam(exam.id, score.clone())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(submitted.status, ExamStatus::Submitted);
        assert_eq!(submitted.correct_count, Some(2));
        assert_eq!(submitted.score_percent, Some(66.7));
        assert_eq!(
            submitted.performance_level,
            Some(PerformanceLevel::Approaches)
        );
        assert!(submitted.submitted_at.is_some());

        // 第二次提交不会覆盖成绩
        assert!(storage.submit_exam(exam.id, score).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_exams_only_returns_owner() {
        let storage = SeaOrmStorage::in_memory().await;
        let ana = seed_user(&storage, "ana", UserRole::Student).await;
        let ben = seed_user(&storage, "ben", UserRole::Student).await;
        storage.create_exam(new_exam(ana.id)).await.unwrap();
        storage.create_exam(new_exam(ana.id)).await.unwrap();
        storage.create_exam(new_exam(ben.id)).await.unwrap();

        let page = storage
            .list_exams(ana.id, PaginationQuery::default())
            .await
            .unwrap();
        assert_eq!(page.pagination.total, 2);
        assert!(page.items.iter().all(|e| e.user_id == ana.id));
    }
}
