use super::SeaOrmStorage;
use crate::entity::questions::{ActiveModel, Column, Entity as Questions};
use crate::errors::{Result, StaarError};
use crate::models::{
    PaginatedResponse, PaginationInfo,
    questions::{
        entities::{Question, Subject},
        requests::{NewQuestion, QuestionListQuery},
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use std::collections::HashMap;

impl SeaOrmStorage {
    /// 创建题目
    pub async fn create_question_impl(&self, req: NewQuestion) -> Result<Question> {
        let now = chrono::Utc::now().timestamp();
        let answer_choices = serde_json::to_string(&req.answer_choices)?;

        let model = ActiveModel {
            grade_level: Set(req.grade_level),
            subject: Set(req.subject.to_string()),
            teks_standard: Set(req.teks_standard),
            category: Set(req.category),
            question_text: Set(req.question_text),
            answer_choices: Set(answer_choices),
            correct_answer: Set(req.correct_answer),
            explanation: Set(req.explanation),
            has_image: Set(req.has_image),
            image_description: Set(req.image_description),
            source: Set(req.source.to_string()),
            provider: Set(req.provider),
            created_by: Set(req.created_by),
            created_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| StaarError::database_operation(format!("创建题目失败: {e}")))?;

        Ok(result.into_question())
    }

    /// 通过 ID 获取题目
    pub async fn get_question_by_id_impl(&self, id: i64) -> Result<Option<Question>> {
        let result = Questions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| StaarError::database_operation(format!("查询题目失败: {e}")))?;

        Ok(result.map(|m| m.into_question()))
    }

    /// 批量获取题目，按传入 ID 的顺序返回
    pub async fn get_questions_by_ids_impl(&self, ids: &[i64]) -> Result<Vec<Question>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = Questions::find()
            .filter(Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(|e| StaarError::database_operation(format!("批量查询题目失败: {e}")))?;

        let mut by_id: HashMap<i64, Question> = models
            .into_iter()
            .map(|m| (m.id, m.into_question()))
            .collect();

        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    /// 分页列出题目
    pub async fn list_questions_with_pagination_impl(
        &self,
        query: QuestionListQuery,
    ) -> Result<PaginatedResponse<Question>> {
        let (page, size) = query.pagination.normalized();

        let mut select = Questions::find();

        if let Some(grade_level) = query.grade_level {
            select = select.filter(Column::GradeLevel.eq(grade_level));
        }

        if let Some(subject) = query.subject {
            select = select.filter(Column::Subject.eq(subject.to_string()));
        }

        if let Some(ref teks) = query.teks_standard
            && !teks.trim().is_empty()
        {
            select = select.filter(Column::TeksStandard.eq(teks.trim().to_uppercase()));
        }

        if let Some(source) = query.source {
            select = select.filter(Column::Source.eq(source.to_string()));
        }

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::QuestionText.contains(&escaped))
                    .add(Column::Category.contains(&escaped)),
            );
        }

        select = select.order_by_desc(Column::CreatedAt).order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| StaarError::database_operation(format!("查询题目总数失败: {e}")))?;

        let questions = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| StaarError::database_operation(format!("查询题目列表失败: {e}")))?;

        Ok(PaginatedResponse {
            items: questions.into_iter().map(|m| m.into_question()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 某年级某科目的全部题目 ID
    pub async fn list_question_ids_impl(
        &self,
        grade_level: i32,
        subject: Subject,
    ) -> Result<Vec<i64>> {
        Questions::find()
            .select_only()
            .column(Column::Id)
            .filter(Column::GradeLevel.eq(grade_level))
            .filter(Column::Subject.eq(subject.to_string()))
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| StaarError::database_operation(format!("查询题目 ID 失败: {e}")))
    }

    /// 删除题目
    pub async fn delete_question_impl(&self, id: i64) -> Result<bool> {
        let result = Questions::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| StaarError::database_operation(format!("删除题目失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaginationQuery;
    use crate::models::questions::entities::QuestionSource;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::test_support::{new_question, seed_question};

    #[tokio::test]
    async fn test_question_round_trip_preserves_choices() {
        let storage = SeaOrmStorage::in_memory().await;
        let created = seed_question(&storage, 3, Subject::Math, "3.4A").await;
        let loaded = storage
            .get_question_by_id(created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.answer_choices, vec!["3", "4", "5", "6"]);
        assert_eq!(loaded.subject, Subject::Math);
        assert_eq!(loaded.source, QuestionSource::Manual);
        assert_eq!(loaded.correct_answer, "B");
    }

    #[tokio::test]
    async fn test_get_by_ids_keeps_requested_order() {
        let storage = SeaOrmStorage::in_memory().await;
        let a = seed_question(&storage, 3, Subject::Math, "3.4A").await;
        let b = seed_question(&storage, 3, Subject::Math, "3.4B").await;
        let c = seed_question(&storage, 3, Subject::Math, "3.4C").await;

        let ids = vec![c.id, a.id, 9999, b.id];
        let loaded: Vec<i64> = storage
            .get_questions_by_ids(&ids)
            .await
            .unwrap()
            .into_iter()
            .map(|q| q.id)
            .collect();
        assert_eq!(loaded, vec![c.id, a.id, b.id]);
    }

    #[tokio::test]
    async fn test_list_filters_and_paginates() {
        let storage = SeaOrmStorage::in_memory().await;
        for _ in 0..3 {
            seed_question(&storage, 4, Subject::Math, "4.4H").await;
        }
        seed_question(&storage, 4, Subject::Reading, "4.6G").await;
        let mut generated = new_question(5, Subject::Math, "5.3E");
        generated.source = QuestionSource::Generated;
        generated.question_text = "How many apples are in 3 baskets?".into();
        storage.create_question(generated).await.unwrap();

        let math_four = storage
            .list_questions_with_pagination(QuestionListQuery {
                pagination: PaginationQuery::new(1, 2),
                grade_level: Some(4),
                subject: Some(Subject::Math),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(math_four.items.len(), 2);
        assert_eq!(math_four.pagination.total, 3);
        assert_eq!(math_four.pagination.total_pages, 2);

        let by_source = storage
            .list_questions_with_pagination(QuestionListQuery {
                source: Some(QuestionSource::Generated),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_source.pagination.total, 1);

        let by_search = storage
            .list_questions_with_pagination(QuestionListQuery {
                search: Some("baskets".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_search.items.len(), 1);

        let by_teks = storage
            .list_questions_with_pagination(QuestionListQuery {
                teks_standard: Some("4.6g".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_teks.items.len(), 1);

        let ids = storage.list_question_ids(4, Subject::Math).await.unwrap();
        assert_eq!(ids.len(), 3);
    }

    #[tokio::test]
    async fn test_delete_question() {
        let storage = SeaOrmStorage::in_memory().await;
        let q = seed_question(&storage, 2, Subject::Reading, "2.6G").await;
        assert!(storage.delete_question(q.id).await.unwrap());
        assert!(!storage.delete_question(q.id).await.unwrap());
        assert!(storage.get_question_by_id(q.id).await.unwrap().is_none());
    }
}
