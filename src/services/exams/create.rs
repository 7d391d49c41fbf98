use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use rand::seq::IndexedRandom;
use std::sync::Arc;
use tracing::{info, warn};

use super::ExamService;
use crate::config::LlmConfig;
use crate::errors::Result;
use crate::llm::LlmProvider;
use crate::middlewares::RequireJWT;
use crate::models::exams::{
    requests::{CreateExamRequest, NewExam},
    responses::{ExamQuestionView, ExamResponse},
};
use crate::models::questions::requests::QuestionSpec;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::questions::produce_questions;
use crate::storage::Storage;

pub async fn create_exam(
    service: &ExamService,
    request: &HttpRequest,
    body: CreateExamRequest,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let config = service.get_config();
    let spec = QuestionSpec::new(body.grade_level, body.subject);
    if !spec.grade_in_range() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::QuestionSpecInvalid,
            "grade_level must be between 0 (K) and 5",
        )));
    }

    let wanted = body.question_count.unwrap_or(config.exam.default_questions);
    if wanted == 0 || wanted > config.exam.max_questions {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::QuestionSpecInvalid,
            format!(
                "question_count must be between 1 and {}",
                config.exam.max_questions
            ),
        )));
    }

    let storage = service.get_storage(request);

    // 1. 抽题，题库不够时现场生成补足
    let provider = service.get_provider(request);
    let question_ids =
        match pick_exam_questions(&storage, &provider, &config.llm, &spec, wanted, user_id).await {
            Ok(ids) => ids,
            Err(e) => {
                return Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::ExamCreationFailed,
                        format!("Failed to load question bank: {e}"),
                    )),
                );
            }
        };

    if question_ids.is_empty() {
        return Ok(HttpResponse::BadGateway().json(ApiResponse::error_empty(
            ErrorCode::ExamCreationFailed,
            "No questions are available for this grade and subject",
        )));
    }
    if question_ids.len() < wanted {
        warn!(
            "Exam for user {} created with {} of {} requested questions",
            user_id,
            question_ids.len(),
            wanted
        );
    }

    // 2. 保存考试并返回不含答案的题目
    let questions = match storage.get_questions_by_ids(&question_ids).await {
        Ok(questions) => questions,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::ExamCreationFailed,
                    format!("Failed to load exam questions: {e}"),
                )),
            );
        }
    };

    let new_exam = NewExam {
        user_id,
        grade_level: spec.grade_level,
        subject: spec.subject,
        question_ids: questions.iter().map(|q| q.id).collect(),
    };

    match storage.create_exam(new_exam).await {
        Ok(exam) => {
            info!(
                "User {} started exam {} ({} questions)",
                user_id, exam.id, exam.total_questions
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                ExamResponse {
                    exam,
                    questions: questions.iter().map(ExamQuestionView::from).collect(),
                },
                "Exam created",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::ExamCreationFailed,
                format!("Failed to create exam: {e}"),
            )),
        ),
    }
}

/// 从题库随机抽取 `wanted` 道题，不足的部分现场生成。
///
/// 生成失败只记警告，返回的 id 可能少于 `wanted`；只有读题库出错时返回 Err。
pub async fn pick_exam_questions(
    storage: &Arc<dyn Storage>,
    provider: &Arc<dyn LlmProvider>,
    llm: &LlmConfig,
    spec: &QuestionSpec,
    wanted: usize,
    user_id: i64,
) -> Result<Vec<i64>> {
    let bank = storage
        .list_question_ids(spec.grade_level, spec.subject)
        .await?;
    let mut question_ids: Vec<i64> = bank
        .choose_multiple(&mut rand::rng(), wanted)
        .copied()
        .collect();

    if question_ids.len() < wanted {
        let missing = wanted - question_ids.len();
        info!(
            "Question bank for grade {} {} has {} question(s), generating {} more",
            spec.grade_level,
            spec.subject,
            bank.len(),
            missing
        );
        match produce_questions(storage, provider, llm, spec, missing, Some(user_id)).await {
            Ok(batch) => question_ids.extend(batch.questions.iter().map(|q| q.id)),
            Err(e) => warn!("Exam top-up generation failed: {}", e),
        }
    }

    Ok(question_ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::StaarError;
    use crate::llm::{CompletionRequest, CompletionResponse};
    use crate::models::questions::entities::Subject;
    use crate::models::users::entities::UserRole;
    use crate::storage::SeaOrmStorage;
    use crate::storage::sea_orm_storage::test_support::{seed_question, seed_user};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 固定回复的模型，记录调用次数
    struct FixedProvider {
        reply: Option<String>,
        calls: AtomicUsize,
    }

    impl FixedProvider {
        fn new(reply: Option<&str>) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.map(str::to_string),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl LlmProvider for FixedProvider {
        fn name(&self) -> &str {
            "fixed"
        }
        fn model(&self) -> &str {
            "fixed-1"
        }
        async fn complete(&self, _request: &CompletionRequest) -> Result<CompletionResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Some(text) => Ok(CompletionResponse {
                    text: text.clone(),
                    provider: "fixed".into(),
                    model: "fixed-1".into(),
                }),
                None => Err(StaarError::llm_status(401, "bad key")),
            }
        }
    }

    const REPLY: &str = r#"{"questionText":"Lena has 8 stickers and gets 5 more. How many now?",
        "answerChoices":["12","13","14","3"],"correctAnswer":"B",
        "explanation":"8 + 5 = 13","teksStandard":"2.4B","hasImage":false}"#;

    fn llm_config(fallback_enabled: bool) -> LlmConfig {
        LlmConfig {
            provider: "openai".into(),
            model: "m".into(),
            api_key: String::new(),
            base_url: String::new(),
            max_tokens: 500,
            temperature: 0.2,
            timeout_secs: 5,
            max_retries: 0,
            retry_base_delay_ms: 1,
            max_batch_size: 10,
            max_concurrency: 2,
            fallback_enabled,
        }
    }

    #[tokio::test]
    async fn test_full_bank_skips_generation() {
        let db = SeaOrmStorage::in_memory().await;
        let student = seed_user(&db, "sam", UserRole::Student).await;
        for _ in 0..4 {
            seed_question(&db, 2, Subject::Math, "2.4B").await;
        }
        let storage: Arc<dyn Storage> = Arc::new(db);
        let fixed = FixedProvider::new(None);
        let provider: Arc<dyn LlmProvider> = fixed.clone();
        let spec = QuestionSpec::new(2, Subject::Math);

        let ids = pick_exam_questions(&storage, &provider, &llm_config(false), &spec, 3, student.id)
            .await
            .unwrap();

        assert_eq!(ids.len(), 3);
        let mut unique = ids.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), 3);
        assert_eq!(fixed.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_short_bank_is_topped_up_by_generation() {
        let db = SeaOrmStorage::in_memory().await;
        let student = seed_user(&db, "sam", UserRole::Student).await;
        let seeded = seed_question(&db, 2, Subject::Math, "2.4B").await;
        let storage: Arc<dyn Storage> = Arc::new(db);
        let fixed = FixedProvider::new(Some(REPLY));
        let provider: Arc<dyn LlmProvider> = fixed.clone();
        let spec = QuestionSpec::new(2, Subject::Math);

        let ids = pick_exam_questions(&storage, &provider, &llm_config(false), &spec, 3, student.id)
            .await
            .unwrap();

        assert_eq!(ids.len(), 3);
        assert!(ids.contains(&seeded.id));
        assert_eq!(fixed.calls.load(Ordering::SeqCst), 2);

        let generated = storage.get_questions_by_ids(&ids).await.unwrap();
        let topped_up: Vec<_> = generated.iter().filter(|q| q.id != seeded.id).collect();
        assert_eq!(topped_up.len(), 2);
        assert!(topped_up.iter().all(|q| q.created_by == Some(student.id)));
        assert!(topped_up.iter().all(|q| q.correct_answer == "B"));
    }

    #[tokio::test]
    async fn test_failed_generation_uses_fallback_bank() {
        let db = SeaOrmStorage::in_memory().await;
        let student = seed_user(&db, "sam", UserRole::Student).await;
        let storage: Arc<dyn Storage> = Arc::new(db);
        let provider: Arc<dyn LlmProvider> = FixedProvider::new(None);
        let spec = QuestionSpec::new(2, Subject::Math);

        let ids = pick_exam_questions(&storage, &provider, &llm_config(true), &spec, 2, student.id)
            .await
            .unwrap();

        assert_eq!(ids.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_generation_without_fallback_comes_up_short() {
        let db = SeaOrmStorage::in_memory().await;
        let student = seed_user(&db, "sam", UserRole::Student).await;
        let seeded = seed_question(&db, 2, Subject::Math, "2.4B").await;
        let storage: Arc<dyn Storage> = Arc::new(db);
        let provider: Arc<dyn LlmProvider> = FixedProvider::new(None);
        let spec = QuestionSpec::new(2, Subject::Math);

        let ids = pick_exam_questions(&storage, &provider, &llm_config(false), &spec, 3, student.id)
            .await
            .unwrap();
        assert_eq!(ids, vec![seeded.id]);

        // 换一个没有题的科目：一题都拿不到
        let reading = QuestionSpec::new(2, Subject::Reading);
        let ids = pick_exam_questions(&storage, &provider, &llm_config(false), &reading, 3, student.id)
            .await
            .unwrap();
        assert!(ids.is_empty());
    }
}
