//! 题目生成提示词

use crate::models::questions::entities::{Difficulty, Subject, grade_label};
use crate::models::questions::requests::QuestionSpec;

pub const SYSTEM_PROMPT: &str = "You write STAAR-style practice questions for Texas students \
in kindergarten through grade 5. Every question is multiple choice with exactly four answer \
choices and one correct answer, aligned to a single TEKS standard, and written at the \
student's reading level. Check every calculation before answering. Reply with one JSON \
object and nothing else.";

const RESPONSE_SHAPE: &str = r#"{
  "questionText": "the full question, including any short passage",
  "answerChoices": ["first choice", "second choice", "third choice", "fourth choice"],
  "correctAnswer": "A, B, C or D",
  "explanation": "why the correct answer is right, written for the student",
  "teksStandard": "TEKS code such as 4.2A",
  "hasImage": false,
  "imageDescription": "describe the picture if hasImage is true, otherwise null"
}"#;

pub(crate) fn subject_label(subject: Subject) -> &'static str {
    match subject {
        Subject::Math => "Mathematics",
        Subject::Reading => "Reading Language Arts",
    }
}

/// 用户提示词：年级、科目、TEKS、类别、难度以及返回的 JSON 结构
pub fn build_user_prompt(spec: &QuestionSpec) -> String {
    let teks = spec
        .teks_standard
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| format!("TEKS standard {t}"))
        .unwrap_or_else(|| "a grade-appropriate TEKS standard".to_string());
    let difficulty = spec.difficulty.unwrap_or(Difficulty::Medium);

    let mut prompt = format!(
        "Write one {difficulty} {subject} question for {grade} aligned to {teks}.",
        subject = subject_label(spec.subject),
        grade = grade_label(spec.grade_level),
    );
    if let Some(category) = spec.category.as_deref().filter(|c| !c.trim().is_empty()) {
        prompt.push_str(&format!(" Focus on {}.", category.trim()));
    }
    if spec.subject == Subject::Reading {
        prompt.push_str(" Include a short passage in questionText before the question.");
    }
    prompt.push_str(
        " Do not label the answer choices with letters. \
         Return exactly this JSON shape:\n",
    );
    prompt.push_str(RESPONSE_SHAPE);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_names_grade_subject_and_teks() {
        let mut spec = QuestionSpec::new(4, Subject::Math);
        spec.teks_standard = Some("4.4H".into());
        spec.category = Some("division".into());
        let prompt = build_user_prompt(&spec);
        assert!(prompt.contains("Grade 4"));
        assert!(prompt.contains("Mathematics"));
        assert!(prompt.contains("TEKS standard 4.4H"));
        assert!(prompt.contains("Focus on division."));
        assert!(prompt.contains("\"correctAnswer\""));
        assert!(prompt.contains("medium"));
    }

    #[test]
    fn test_prompt_for_kindergarten_reading_without_teks() {
        let spec = QuestionSpec::new(0, Subject::Reading);
        let prompt = build_user_prompt(&spec);
        assert!(prompt.contains("Kindergarten"));
        assert!(prompt.contains("a grade-appropriate TEKS standard"));
        assert!(prompt.contains("short passage"));
    }
}
