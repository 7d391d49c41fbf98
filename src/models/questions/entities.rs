use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 答案选项字母，按顺序对应 answer_choices 下标
pub const ANSWER_LETTERS: [&str; 4] = ["A", "B", "C", "D"];

// 科目
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub enum Subject {
    Math,
    Reading,
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Subject::Math => write!(f, "math"),
            Subject::Reading => write!(f, "reading"),
        }
    }
}

impl std::str::FromStr for Subject {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "math" | "mathematics" => Ok(Subject::Math),
            "reading" | "ela" | "rla" => Ok(Subject::Reading),
            _ => Err(format!("Invalid subject: {s}")),
        }
    }
}

// 题目来源
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub enum QuestionSource {
    Generated, // LLM 生成
    Fallback,  // 内置题库
    Manual,    // 人工录入
}

impl std::fmt::Display for QuestionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuestionSource::Generated => write!(f, "generated"),
            QuestionSource::Fallback => write!(f, "fallback"),
            QuestionSource::Manual => write!(f, "manual"),
        }
    }
}

impl std::str::FromStr for QuestionSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "generated" => Ok(QuestionSource::Generated),
            "fallback" => Ok(QuestionSource::Fallback),
            "manual" => Ok(QuestionSource::Manual),
            _ => Err(format!("Invalid question source: {s}")),
        }
    }
}

// 难度
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

/// 年级显示名，0 为幼儿园
pub fn grade_label(grade_level: i32) -> String {
    if grade_level == 0 {
        "Kindergarten".to_string()
    } else {
        format!("Grade {grade_level}")
    }
}

// 题目实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct Question {
    pub id: i64,
    pub grade_level: i32,
    pub subject: Subject,
    pub teks_standard: String,
    pub category: Option<String>,
    pub question_text: String,
    pub answer_choices: Vec<String>,
    pub correct_answer: String,
    pub explanation: String,
    pub has_image: bool,
    pub image_description: Option<String>,
    pub source: QuestionSource,
    pub provider: Option<String>,
    pub created_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Question {
    pub fn is_correct(&self, selected: &str) -> bool {
        self.correct_answer == selected
    }
}

/// LLM 返回的题目负载（camelCase），经归一化与校验后入库
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuestion {
    pub question_text: String,
    pub answer_choices: Vec<String>,
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub teks_standard: String,
    #[serde(default)]
    pub has_image: bool,
    #[serde(default)]
    pub image_description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_parse_aliases() {
        assert_eq!("Math".parse::<Subject>().unwrap(), Subject::Math);
        assert_eq!("ela".parse::<Subject>().unwrap(), Subject::Reading);
        assert!("science".parse::<Subject>().is_err());
    }

    #[test]
    fn test_generated_question_defaults_optional_fields() {
        let json = r#"{
            "questionText": "What is 2 + 3?",
            "answerChoices": ["4", "5", "6", "7"],
            "correctAnswer": "B"
        }"#;
        let q: GeneratedQuestion = serde_json::from_str(json).unwrap();
        assert_eq!(q.answer_choices.len(), 4);
        assert!(q.teks_standard.is_empty());
        assert!(!q.has_image);
        assert!(q.image_description.is_none());
    }

    #[test]
    fn test_grade_label() {
        assert_eq!(grade_label(0), "Kindergarten");
        assert_eq!(grade_label(4), "Grade 4");
    }
}
