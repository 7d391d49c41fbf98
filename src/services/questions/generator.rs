//! LLM 出题：提示词 → 调用 → 提取 JSON → 归一化 → 校验

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::prompt::{SYSTEM_PROMPT, build_user_prompt};
use super::validate::validate_question;
use crate::config::LlmConfig;
use crate::errors::{Result, StaarError};
use crate::llm::{CompletionRequest, LlmProvider};
use crate::models::questions::entities::{ANSWER_LETTERS, GeneratedQuestion};
use crate::models::questions::requests::QuestionSpec;

// 选项前缀：A) / A. / A: / (A)
static CHOICE_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\(?[A-Da-d][).:]\s*").expect("Invalid choice label regex"));

// 代码围栏标记：``` 或 ```json
static CODE_FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```[A-Za-z0-9_-]*").expect("Invalid code fence regex"));

/// 通过校验的题目及生成它的提供商
#[derive(Debug, Clone)]
pub struct GeneratedOutcome {
    pub question: GeneratedQuestion,
    pub provider: String,
}

pub async fn generate_question(
    provider: &dyn LlmProvider,
    spec: &QuestionSpec,
    llm: &LlmConfig,
) -> Result<GeneratedOutcome> {
    let request = CompletionRequest::single_turn(
        SYSTEM_PROMPT,
        build_user_prompt(spec),
        llm.max_tokens,
        llm.temperature,
    );
    let response = provider.complete(&request).await?;
    debug!(
        "LLM reply from {} ({} chars)",
        response.provider,
        response.text.len()
    );

    let question = normalize_question(parse_generated(&response.text)?, spec);
    let validation = validate_question(&question);
    if !validation.is_valid {
        return Err(StaarError::question_validation(validation.error_message()));
    }

    Ok(GeneratedOutcome {
        question,
        provider: response.provider,
    })
}

/// 从回复文本中解析题目负载
pub fn parse_generated(text: &str) -> Result<GeneratedQuestion> {
    let stripped = strip_code_fences(text);
    let json = extract_json_object(&stripped)
        .ok_or_else(|| StaarError::llm_response("reply contains no JSON object"))?;
    serde_json::from_str::<GeneratedQuestion>(json)
        .map_err(|e| StaarError::llm_response(format!("reply JSON does not match schema: {e}")))
}

/// 去掉 Markdown 代码围栏标记，保留同一行上的内容
pub fn strip_code_fences(text: &str) -> String {
    CODE_FENCE_RE.replace_all(text, "").into_owned()
}

/// 第一个括号配平的 `{...}`，忽略字符串内的括号
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

pub fn normalize_question(
    mut question: GeneratedQuestion,
    spec: &QuestionSpec,
) -> GeneratedQuestion {
    question.question_text = question.question_text.trim().to_string();
    question.explanation = question.explanation.trim().to_string();
    question.answer_choices = question
        .answer_choices
        .iter()
        .map(String::as_str)
        .map(strip_choice_label)
        .collect();
    question.correct_answer =
        resolve_correct_answer(&question.correct_answer, &question.answer_choices);

    let teks = normalize_teks(&question.teks_standard);
    question.teks_standard = if teks.is_empty() {
        spec.teks_standard
            .as_deref()
            .map(normalize_teks)
            .unwrap_or_default()
    } else {
        teks
    };

    question.image_description = question
        .image_description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());
    question
}

pub fn strip_choice_label(choice: &str) -> String {
    CHOICE_LABEL_RE.replace(choice, "").trim().to_string()
}

/// 归一化答案字母："b" / "B)" / "B. 12" → "B"
pub fn normalize_answer_letter(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_start_matches('(');
    let mut chars = trimmed.chars();
    let first = chars.next()?.to_ascii_uppercase();
    let letter_alone = chars.next().is_none_or(|c| !c.is_alphanumeric());
    if letter_alone && ANSWER_LETTERS.iter().any(|l| l.starts_with(first)) {
        Some(first.to_string())
    } else {
        None
    }
}

/// 先按选项文本匹配（"A barking dog" 是选项而不是字母 A），再按字母解析
fn resolve_correct_answer(raw: &str, choices: &[String]) -> String {
    let wanted = strip_choice_label(raw).to_lowercase();
    let by_text = choices
        .iter()
        .position(|c| c.to_lowercase() == wanted)
        .and_then(|idx| ANSWER_LETTERS.get(idx));
    if let Some(letter) = by_text {
        return letter.to_string();
    }
    normalize_answer_letter(raw).unwrap_or_else(|| raw.trim().to_uppercase())
}

fn normalize_teks(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_prefix = trimmed
        .strip_prefix("TEKS")
        .or_else(|| trimmed.strip_prefix("teks"))
        .unwrap_or(trimmed);
    without_prefix
        .trim_start_matches([' ', ':'])
        .trim()
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::CompletionResponse;
    use crate::models::questions::entities::Subject;
    use async_trait::async_trait;

    struct CannedProvider(String);

    #[async_trait]
    impl LlmProvider for CannedProvider {
        fn name(&self) -> &str {
            "canned"
        }
        fn model(&self) -> &str {
            "canned-1"
        }
        async fn complete(&self, _request: &CompletionRequest) -> Result<CompletionResponse> {
            Ok(CompletionResponse {
                text: self.0.clone(),
                provider: "canned".into(),
                model: "canned-1".into(),
            })
        }
    }

    fn llm_config() -> LlmConfig {
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
            max_batch_size: 5,
            max_concurrency: 2,
            fallback_enabled: true,
        }
    }

    const GOOD_REPLY: &str = r#"Sure! Here is your question:
```json
{
  "questionText": "A box holds 6 rows of 4 eggs. How many eggs are in the box? {hint}",
  "answerChoices": ["A) 10", "B) 24", "C) 20", "D) 28"],
  "correctAnswer": "b",
  "explanation": "Multiply rows by eggs in each row: 6 × 4 = 24.",
  "teksStandard": "3.4k",
  "hasImage": false,
  "imageDescription": null
}
```
Good luck!"#;

    #[test]
    fn test_extract_json_handles_prose_nesting_and_strings() {
        let text = r#"Here you go: {"a": {"b": "}{"}, "c": "quote \" }"} trailing {"x":1}"#;
        assert_eq!(
            extract_json_object(text),
            Some(r#"{"a": {"b": "}{"}, "c": "quote \" }"}"#)
        );
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object("{\"open\": true"), None);
    }

    #[test]
    fn test_parse_generated_from_fenced_reply() {
        let q = parse_generated(GOOD_REPLY).unwrap();
        assert_eq!(q.answer_choices.len(), 4);
        assert_eq!(q.correct_answer, "b");
        assert!(q.question_text.contains("{hint}"));

        let one_line = r#"```json {"questionText": "What is 5 + 4?", "answerChoices": ["8", "9", "10", "11"], "correctAnswer": "B"} ```"#;
        let q = parse_generated(one_line).unwrap();
        assert_eq!(q.question_text, "What is 5 + 4?");
        assert_eq!(q.correct_answer, "B");
    }

    #[test]
    fn test_parse_generated_rejects_wrong_shape() {
        let err = parse_generated(r#"{"question": "x"}"#).unwrap_err();
        assert_eq!(err.code(), "E015");
    }

    #[test]
    fn test_normalize_labels_letters_and_teks() {
        let spec = QuestionSpec::new(3, Subject::Math);
        let q = normalize_question(parse_generated(GOOD_REPLY).unwrap(), &spec);
        assert_eq!(q.answer_choices, vec!["10", "24", "20", "28"]);
        assert_eq!(q.correct_answer, "B");
        assert_eq!(q.teks_standard, "3.4K");
        assert!(q.image_description.is_none());
    }

    #[test]
    fn test_normalize_answer_letter_variants() {
        assert_eq!(normalize_answer_letter("b").as_deref(), Some("B"));
        assert_eq!(normalize_answer_letter("B)").as_deref(), Some("B"));
        assert_eq!(normalize_answer_letter("(C)").as_deref(), Some("C"));
        assert_eq!(normalize_answer_letter("D. 12").as_deref(), Some("D"));
        assert_eq!(normalize_answer_letter("E"), None);
        assert_eq!(normalize_answer_letter("Apple"), None);
        assert_eq!(normalize_answer_letter(""), None);
    }

    #[test]
    fn test_correct_answer_given_as_choice_text() {
        let spec = QuestionSpec::new(3, Subject::Math);
        let q = GeneratedQuestion {
            question_text: "Pick the even number.".into(),
            answer_choices: vec!["3".into(), "5".into(), "8".into(), "9".into()],
            correct_answer: "8".into(),
            explanation: "8 can be split into two equal groups.".into(),
            teks_standard: String::new(),
            has_image: false,
            image_description: Some("   ".into()),
        };
        let mut spec_with_teks = spec.clone();
        spec_with_teks.teks_standard = Some("3.4i".into());
        let q = normalize_question(q, &spec_with_teks);
        assert_eq!(q.correct_answer, "C");
        assert_eq!(q.teks_standard, "3.4I");
        assert!(q.image_description.is_none());
    }

    #[test]
    fn test_choice_text_starting_with_article_is_not_a_letter() {
        let spec = QuestionSpec::new(2, Subject::Reading);
        let q = GeneratedQuestion {
            question_text: "What woke Sam up?".into(),
            answer_choices: vec![
                "The alarm".into(),
                "His mom".into(),
                "The sun".into(),
                "A barking dog".into(),
            ],
            correct_answer: "A barking dog".into(),
            explanation: "The story says a dog barked outside.".into(),
            teks_standard: "2.6G".into(),
            has_image: false,
            image_description: None,
        };
        let q = normalize_question(q, &spec);
        assert_eq!(q.correct_answer, "D");

        // 带标签的选项文本同样按文本匹配
        let mut labeled = q.clone();
        labeled.correct_answer = "D) A barking dog".into();
        assert_eq!(normalize_question(labeled, &spec).correct_answer, "D");
    }

    #[tokio::test]
    async fn test_generate_question_end_to_end() {
        let provider = CannedProvider(GOOD_REPLY.to_string());
        let spec = QuestionSpec::new(3, Subject::Math);
        let outcome = generate_question(&provider, &spec, &llm_config()).await.unwrap();
        assert_eq!(outcome.provider, "canned");
        assert_eq!(outcome.question.correct_answer, "B");
    }

    #[tokio::test]
    async fn test_generate_question_rejects_bad_arithmetic() {
        let reply = GOOD_REPLY.replace("6 × 4 = 24", "6 × 4 = 26");
        let provider = CannedProvider(reply);
        let spec = QuestionSpec::new(3, Subject::Math);
        let err = generate_question(&provider, &spec, &llm_config())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E016");
        assert!(err.message().contains("6 × 4 = 26"));
    }
}
