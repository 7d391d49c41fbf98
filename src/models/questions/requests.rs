use crate::models::common::pagination::{
    DEFAULT_PAGE_SIZE, PaginationQuery, default_page, default_size, deserialize_string_to_i64,
};
use crate::models::questions::entities::{Difficulty, QuestionSource, Subject};
use serde::Deserialize;
use ts_rs::TS;

/// 最低 / 最高年级（0 = K）
pub const MIN_GRADE: i32 = 0;
pub const MAX_GRADE: i32 = 5;

/// 单题生成规格
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct QuestionSpec {
    pub grade_level: i32,
    pub subject: Subject,
    pub teks_standard: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
}

impl QuestionSpec {
    pub fn new(grade_level: i32, subject: Subject) -> Self {
        Self {
            grade_level,
            subject,
            teks_standard: None,
            category: None,
            difficulty: None,
        }
    }

    pub fn grade_in_range(&self) -> bool {
        (MIN_GRADE..=MAX_GRADE).contains(&self.grade_level)
    }
}

/// 生成题目请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct GenerateQuestionsRequest {
    pub grade_level: i32,
    pub subject: Subject,
    pub teks_standard: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    /// 生成数量，默认 1
    pub count: Option<usize>,
}

impl GenerateQuestionsRequest {
    pub fn spec(&self) -> QuestionSpec {
        QuestionSpec {
            grade_level: self.grade_level,
            subject: self.subject,
            teks_standard: self.teks_standard.clone(),
            category: self.category.clone(),
            difficulty: self.difficulty,
        }
    }
}

/// 题目列表查询参数（HTTP 请求）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct QuestionListParams {
    #[serde(default = "default_page", deserialize_with = "deserialize_string_to_i64")]
    pub page: i64,
    #[serde(default = "default_size", deserialize_with = "deserialize_string_to_i64")]
    pub size: i64,
    pub grade_level: Option<i32>,
    pub subject: Option<Subject>,
    pub teks_standard: Option<String>,
    pub source: Option<QuestionSource>,
    pub search: Option<String>,
}

impl Default for QuestionListParams {
    fn default() -> Self {
        Self {
            page: 1,
            size: DEFAULT_PAGE_SIZE,
            grade_level: None,
            subject: None,
            teks_standard: None,
            source: None,
            search: None,
        }
    }
}

// 用于存储层的内部查询参数
#[derive(Debug, Clone, Default)]
pub struct QuestionListQuery {
    pub pagination: PaginationQuery,
    pub grade_level: Option<i32>,
    pub subject: Option<Subject>,
    pub teks_standard: Option<String>,
    pub source: Option<QuestionSource>,
    pub search: Option<String>,
}

impl From<QuestionListParams> for QuestionListQuery {
    fn from(params: QuestionListParams) -> Self {
        Self {
            pagination: PaginationQuery::new(params.page, params.size),
            grade_level: params.grade_level,
            subject: params.subject,
            teks_standard: params.teks_standard,
            source: params.source,
            search: params.search,
        }
    }
}

/// 入库前的题目（已校验）
#[derive(Debug, Clone)]
pub struct NewQuestion {
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
}
