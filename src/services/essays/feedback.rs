use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{debug, warn};

use super::EssayService;
use crate::config::EssayConfig;
use crate::llm::{ChatMessage, CompletionRequest};
use crate::middlewares::RequireJWT;
use crate::models::essays::requests::EssayFeedbackRequest;
use crate::models::essays::responses::EssayFeedbackResponse;
use crate::models::questions::entities::grade_label;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::validate_grade_level;

const ESSAY_PROMPT: &str = "You are a kind writing coach for a Texas elementary school \
student practicing the STAAR extended constructed response. Score the essay with the \
STAAR rubric: Development and Organization of Ideas (0-3 points) and Conventions (0-2 \
points). Give each score with one short reason, then list two things the student did \
well and two concrete ways to improve, quoting the essay where it helps. Use words a \
child at this grade level knows. Do not rewrite the essay for the student.";

// K-2 没有正式评分，只给鼓励式反馈
const EARLY_GRADE_NOTE: &str = "This student is in the early grades, so skip the \
numeric scores and focus on one strength and one next step.";

/// 统计词数（按空白切分）
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// 组装作文反馈请求：题目和作文都不能为空，作文不超过 max_words 词
pub fn build_essay_request(
    body: &EssayFeedbackRequest,
    config: &EssayConfig,
) -> Result<CompletionRequest, String> {
    validate_grade_level(body.grade_level)?;

    let prompt = body.prompt.trim();
    if prompt.is_empty() {
        return Err("Writing prompt cannot be empty".to_string());
    }
    let essay = body.essay.trim();
    if essay.is_empty() {
        return Err("Essay cannot be empty".to_string());
    }
    let words = count_words(essay);
    if words > config.max_words {
        return Err(format!(
            "Essay is too long ({words} words, at most {})",
            config.max_words
        ));
    }

    let mut system_prompt = format!(
        "{ESSAY_PROMPT}\n\nThe student is in {}.",
        grade_label(body.grade_level)
    );
    if body.grade_level < 3 {
        system_prompt.push(' ');
        system_prompt.push_str(EARLY_GRADE_NOTE);
    }

    Ok(CompletionRequest {
        system_prompt: Some(system_prompt),
        messages: vec![ChatMessage::user(format!(
            "Writing prompt:\n{prompt}\n\nStudent essay:\n{essay}"
        ))],
        max_tokens: config.max_tokens,
        temperature: config.temperature,
    })
}

pub async fn feedback(
    service: &EssayService,
    request: &HttpRequest,
    body: EssayFeedbackRequest,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let completion = match build_essay_request(&body, &service.get_config().essay) {
        Ok(completion) => completion,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
        }
    };
    let word_count = count_words(&body.essay);

    debug!("Essay feedback for user {} ({} words)", user_id, word_count);

    let provider = service.get_provider(request);
    match provider.complete(&completion).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            EssayFeedbackResponse {
                feedback: response.text.trim().to_string(),
                word_count,
                provider: response.provider,
                model: response.model,
            },
            "Essay feedback ready",
        ))),
        Err(e) => {
            warn!("Essay feedback failed for user {}: {}", user_id, e);
            Ok(HttpResponse::BadGateway().json(ApiResponse::error_empty(
                ErrorCode::EssayFeedbackUnavailable,
                "Essay feedback is unavailable right now, please try again later",
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(max_words: usize) -> EssayConfig {
        EssayConfig {
            max_words,
            max_tokens: 600,
            temperature: 0.3,
        }
    }

    fn body(grade_level: i32, prompt: &str, essay: &str) -> EssayFeedbackRequest {
        EssayFeedbackRequest {
            grade_level,
            prompt: prompt.into(),
            essay: essay.into(),
        }
    }

    #[test]
    fn test_request_carries_rubric_prompt_and_essay() {
        let req = build_essay_request(
            &body(4, " Write about a time you helped someone. ", "  I helped my neighbor rake leaves.  "),
            &config(100),
        )
        .unwrap();

        let system = req.system_prompt.unwrap();
        assert!(system.contains("Development and Organization"));
        assert!(system.contains("Conventions"));
        assert!(system.contains("Grade 4"));
        assert!(!system.contains("early grades"));
        assert_eq!(
            req.messages,
            vec![ChatMessage::user(
                "Writing prompt:\nWrite about a time you helped someone.\n\nStudent essay:\nI helped my neighbor rake leaves."
            )]
        );
        assert_eq!(req.max_tokens, 600);
    }

    #[test]
    fn test_early_grades_skip_scores() {
        let req = build_essay_request(&body(1, "My pet", "My cat is soft."), &config(100)).unwrap();
        let system = req.system_prompt.unwrap();
        assert!(system.contains("Grade 1"));
        assert!(system.contains("skip the numeric scores"));
    }

    #[test]
    fn test_invalid_essays_are_rejected() {
        assert!(build_essay_request(&body(3, "   ", "An essay."), &config(100)).is_err());
        assert!(build_essay_request(&body(3, "My day", " \n "), &config(100)).is_err());
        assert!(build_essay_request(&body(7, "My day", "An essay."), &config(100)).is_err());

        let err = build_essay_request(&body(3, "My day", "one two three four"), &config(3))
            .unwrap_err();
        assert!(err.contains("4 words"));
        assert!(build_essay_request(&body(3, "My day", "one two three"), &config(3)).is_ok());
    }
}
