use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::{StreamExt, stream};
use rand::Rng;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::{QuestionService, reveals_answers};
use super::fallback::fallback_question;
use super::generator::generate_question;
use crate::config::LlmConfig;
use crate::errors::{Result, StaarError};
use crate::llm::LlmProvider;
use crate::middlewares::RequireJWT;
use crate::models::questions::{
    entities::{GeneratedQuestion, Question, QuestionSource},
    requests::{GenerateQuestionsRequest, NewQuestion, QuestionSpec},
    responses::{GenerateQuestionsResponse, QuestionView},
};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 一批生成结果
#[derive(Debug)]
pub struct ProducedBatch {
    pub questions: Vec<Question>,
    pub fallback_count: usize,
}

/// 并发生成 `count` 道题并入库。
///
/// 失败的位置在 `llm.fallback_enabled` 时由内置题库补上，否则丢弃；
/// 一道都没有得到时返回最后一个生成错误。
pub async fn produce_questions(
    storage: &Arc<dyn Storage>,
    provider: &Arc<dyn LlmProvider>,
    llm: &LlmConfig,
    spec: &QuestionSpec,
    count: usize,
    created_by: Option<i64>,
) -> Result<ProducedBatch> {
    let mut results = stream::iter(0..count)
        .map(|slot| async move { (slot, generate_question(provider.as_ref(), spec, llm).await) })
        .buffer_unordered(llm.max_concurrency.max(1))
        .collect::<Vec<_>>()
        .await;
    results.sort_by_key(|(slot, _)| *slot);

    let seed_base: usize = rand::rng().random_range(0..1024);
    let mut questions = Vec::with_capacity(count);
    let mut fallback_count = 0;
    let mut last_error = None;

    for (slot, result) in results {
        let new_question = match result {
            Ok(outcome) => new_question(
                spec,
                outcome.question,
                spec.category.clone(),
                QuestionSource::Generated,
                Some(outcome.provider),
                created_by,
            ),
            Err(e) => {
                warn!(
                    "Question generation failed for grade {} {} (slot {}): {}",
                    spec.grade_level, spec.subject, slot, e
                );
                last_error = Some(e);
                if !llm.fallback_enabled {
                    continue;
                }
                let (canned, category) = fallback_question(spec, seed_base + slot);
                fallback_count += 1;
                new_question(
                    spec,
                    canned,
                    Some(category.to_string()),
                    QuestionSource::Fallback,
                    None,
                    created_by,
                )
            }
        };
        questions.push(storage.create_question(new_question).await?);
    }

    if questions.is_empty()
        && let Some(err) = last_error
    {
        return Err(err);
    }

    Ok(ProducedBatch {
        questions,
        fallback_count,
    })
}

fn new_question(
    spec: &QuestionSpec,
    generated: GeneratedQuestion,
    category: Option<String>,
    source: QuestionSource,
    provider: Option<String>,
    created_by: Option<i64>,
) -> NewQuestion {
    NewQuestion {
        grade_level: spec.grade_level,
        subject: spec.subject,
        teks_standard: generated.teks_standard,
        category,
        question_text: generated.question_text,
        answer_choices: generated.answer_choices,
        correct_answer: generated.correct_answer,
        explanation: generated.explanation,
        has_image: generated.has_image,
        image_description: generated.image_description,
        source,
        provider,
        created_by,
    }
}

pub async fn generate_questions(
    service: &QuestionService,
    request: &HttpRequest,
    body: GenerateQuestionsRequest,
) -> ActixResult<HttpResponse> {
    let llm = &service.get_config().llm;
    let spec = body.spec();

    if !spec.grade_in_range() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::QuestionSpecInvalid,
            "grade_level must be between 0 (K) and 5",
        )));
    }

    let count = body.count.unwrap_or(1);
    if count == 0 || count > llm.max_batch_size {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::QuestionSpecInvalid,
            format!("count must be between 1 and {}", llm.max_batch_size),
        )));
    }

    let created_by = RequireJWT::extract_user_id(request);
    let storage = service.get_storage(request);
    let provider = service.get_provider(request);

    match produce_questions(&storage, &provider, llm, &spec, count, created_by).await {
        Ok(batch) => {
            info!(
                "Generated {} question(s) for grade {} {} ({} from fallback bank)",
                batch.questions.len(),
                spec.grade_level,
                spec.subject,
                batch.fallback_count
            );
            if reveals_answers(request) {
                return Ok(HttpResponse::Ok().json(ApiResponse::success(
                    GenerateQuestionsResponse {
                        questions: batch.questions,
                        requested: count,
                        fallback_count: batch.fallback_count,
                    },
                    "Questions generated",
                )));
            }
            // 学生作答后才能在练习结果中看到答案
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                GenerateQuestionsResponse {
                    questions: batch.questions.iter().map(QuestionView::from).collect(),
                    requested: count,
                    fallback_count: batch.fallback_count,
                },
                "Questions generated",
            )))
        }
        Err(e) => Ok(generation_error_response(e)),
    }
}

fn generation_error_response(err: StaarError) -> HttpResponse {
    match err {
        StaarError::DatabaseOperation(_) => {
            error!("Failed to persist generated questions: {}", err);
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                "Failed to save generated questions",
            ))
        }
        _ => HttpResponse::BadGateway().json(ApiResponse::error_empty(
            ErrorCode::QuestionGenerationFailed,
            format!("Question generation failed: {}", err.message()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{CompletionRequest, CompletionResponse};
    use crate::models::questions::entities::Subject;
    use crate::services::questions::validate_question;
    use crate::storage::SeaOrmStorage;
    use async_trait::async_trait;

    struct FixedProvider(Option<String>);

    #[async_trait]
    impl LlmProvider for FixedProvider {
        fn name(&self) -> &str {
            "fixed"
        }
        fn model(&self) -> &str {
            "fixed-1"
        }
        async fn complete(&self, _request: &CompletionRequest) -> Result<CompletionResponse> {
            match &self.0 {
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

    async fn storage() -> Arc<dyn Storage> {
        Arc::new(SeaOrmStorage::in_memory().await)
    }

    #[tokio::test]
    async fn test_generated_questions_are_persisted() {
        let storage = storage().await;
        let provider: Arc<dyn LlmProvider> = Arc::new(FixedProvider(Some(REPLY.into())));
        let spec = QuestionSpec::new(2, Subject::Math);

        let batch = produce_questions(&storage, &provider, &llm_config(true), &spec, 3, None)
            .await
            .unwrap();
        assert_eq!(batch.questions.len(), 3);
        assert_eq!(batch.fallback_count, 0);
        assert!(batch.questions.iter().all(|q| q.source == QuestionSource::Generated));
        assert_eq!(batch.questions[0].provider.as_deref(), Some("fixed"));
        assert_eq!(storage.list_question_ids(2, Subject::Math).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_failures_fall_back_to_bank() {
        let storage = storage().await;
        let provider: Arc<dyn LlmProvider> = Arc::new(FixedProvider(None));
        let spec = QuestionSpec::new(4, Subject::Reading);

        let batch = produce_questions(&storage, &provider, &llm_config(true), &spec, 2, None)
            .await
            .unwrap();
        assert_eq!(batch.fallback_count, 2);
        for q in &batch.questions {
            assert_eq!(q.source, QuestionSource::Fallback);
            assert_eq!(q.subject, Subject::Reading);
            let canned = GeneratedQuestion {
                question_text: q.question_text.clone(),
                answer_choices: q.answer_choices.clone(),
                correct_answer: q.correct_answer.clone(),
                explanation: q.explanation.clone(),
                teks_standard: q.teks_standard.clone(),
                has_image: q.has_image,
                image_description: q.image_description.clone(),
            };
            assert!(validate_question(&canned).is_valid);
        }
    }

    #[tokio::test]
    async fn test_failures_without_fallback_return_error() {
        let storage = storage().await;
        let provider: Arc<dyn LlmProvider> = Arc::new(FixedProvider(None));
        let spec = QuestionSpec::new(5, Subject::Math);

        let err = produce_questions(&storage, &provider, &llm_config(false), &spec, 2, None)
            .await
            .unwrap_err();
        assert!(matches!(err, StaarError::LlmRequest(_)));
        assert!(storage.list_question_ids(5, Subject::Math).await.unwrap().is_empty());
    }
}
