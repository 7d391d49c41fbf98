//! 题目结构与算术校验
//!
//! 收集全部违规项而不是遇到第一个就返回，便于日志排查 LLM 输出问题。

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashSet;

use crate::models::questions::entities::{ANSWER_LETTERS, GeneratedQuestion};

/// 算术比较容差
const ARITHMETIC_TOLERANCE: f64 = 1e-6;

const OPERATORS: &[char] = &['+', '-', '×', 'x', '*', '÷', '/'];

static TEKS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\d+[A-Z]?$").expect("Invalid TEKS regex"));

// 数字允许千分位与小数：1,200 / 3.5 / 42
static ARITHMETIC_RE: Lazy<Regex> = Lazy::new(|| {
    const NUM: &str = r"\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?";
    Regex::new(&format!(
        r"(?P<a>{NUM})\s*(?P<op>[+\-×x*÷/])\s*(?P<b>{NUM})\s*=\s*(?P<c>{NUM})"
    ))
    .expect("Invalid arithmetic regex")
});

/// 校验结果
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl QuestionValidationResult {
    pub fn error_message(&self) -> String {
        self.errors.join("; ")
    }
}

pub fn is_valid_teks(code: &str) -> bool {
    TEKS_RE.is_match(code)
}

pub fn validate_question(question: &GeneratedQuestion) -> QuestionValidationResult {
    let mut errors = Vec::new();

    if question.question_text.trim().is_empty() {
        errors.push("questionText is empty".to_string());
    }
    if question.explanation.trim().is_empty() {
        errors.push("explanation is empty".to_string());
    }

    if question.answer_choices.len() != ANSWER_LETTERS.len() {
        errors.push(format!(
            "expected exactly 4 answer choices, got {}",
            question.answer_choices.len()
        ));
    }
    let mut seen = HashSet::new();
    for (idx, choice) in question.answer_choices.iter().enumerate() {
        let normalized = choice.trim().to_lowercase();
        if normalized.is_empty() {
            errors.push(format!("answer choice {} is empty", idx + 1));
        } else if !seen.insert(normalized) {
            errors.push(format!("answer choice {} duplicates another choice", idx + 1));
        }
    }

    if !ANSWER_LETTERS.contains(&question.correct_answer.as_str()) {
        errors.push(format!(
            "correctAnswer '{}' is not one of A, B, C, D",
            question.correct_answer
        ));
    }

    if !is_valid_teks(&question.teks_standard) {
        errors.push(format!(
            "teksStandard '{}' does not look like a TEKS code (e.g. 4.2A)",
            question.teks_standard
        ));
    }

    if question.has_image
        && question
            .image_description
            .as_deref()
            .is_none_or(|d| d.trim().is_empty())
    {
        errors.push("hasImage is true but imageDescription is missing".to_string());
    }

    errors.extend(check_arithmetic(&question.question_text));
    errors.extend(check_arithmetic(&question.explanation));

    QuestionValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// 检查文本中每个 `a op b = c` 是否成立，返回错误描述
pub fn check_arithmetic(text: &str) -> Vec<String> {
    let mut errors = Vec::new();
    for caps in ARITHMETIC_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        // 连写表达式（2 + 3 + 4 = 9、1/2 = 2/4）不是单步等式，跳过
        let rest = &text[whole.end()..];
        if is_chained_before(&text[..whole.start()])
            || continues_expression(rest)
            || has_remainder(rest)
        {
            continue;
        }
        if let Some(message) = evaluate_statement(&caps) {
            errors.push(message);
        }
    }
    errors
}

fn evaluate_statement(caps: &Captures<'_>) -> Option<String> {
    let (a, op, b, c) = (
        parse_number(&caps["a"])?,
        caps["op"].chars().next()?,
        parse_number(&caps["b"])?,
        parse_number(&caps["c"])?,
    );
    let statement = caps.get(0).map(|m| m.as_str()).unwrap_or_default();

    let expected = match op {
        '+' => a + b,
        '-' => a - b,
        '×' | 'x' | '*' => a * b,
        '÷' | '/' => {
            if b == 0.0 {
                return Some(format!("'{statement}' divides by zero"));
            }
            a / b
        }
        _ => return None,
    };

    if (expected - c).abs() > ARITHMETIC_TOLERANCE {
        Some(format!(
            "'{statement}' is incorrect (expected {})",
            format_number(expected)
        ))
    } else {
        None
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.replace(',', "").parse::<f64>().ok()
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

/// 前文以 "数字 运算符" 结尾，或紧贴数字
fn is_chained_before(prefix: &str) -> bool {
    let mut raw = prefix.chars().rev();
    match (raw.next(), raw.next()) {
        (Some(c), _) if c.is_ascii_digit() => return true,
        (Some(',' | '.'), Some(d)) if d.is_ascii_digit() => return true,
        _ => {}
    }

    let trimmed = prefix.trim_end();
    match trimmed.chars().next_back() {
        Some(op) if OPERATORS.contains(&op) => trimmed[..trimmed.len() - op.len_utf8()]
            .trim_end()
            .ends_with(|c: char| c.is_ascii_digit()),
        _ => false,
    }
}

/// 结果后面紧跟 "运算符 数字"
fn continues_expression(rest: &str) -> bool {
    let mut chars = rest.trim_start().chars();
    match chars.next() {
        Some(op) if OPERATORS.contains(&op) => chars
            .as_str()
            .trim_start()
            .starts_with(|c: char| c.is_ascii_digit()),
        _ => false,
    }
}

/// 带余数的除法结果：17 ÷ 5 = 3 R 2 / 3 r2 / 3 remainder 2
fn has_remainder(rest: &str) -> bool {
    let rest = rest.trim_start();
    if rest
        .get(..9)
        .is_some_and(|word| word.eq_ignore_ascii_case("remainder"))
    {
        return true;
    }
    let mut chars = rest.chars();
    matches!(chars.next(), Some('R' | 'r'))
        && chars
            .next()
            .is_some_and(|c| c.is_whitespace() || c.is_ascii_digit())
}
