//! 数据模型定义
//!
//! 业务实体、HTTP 请求与响应结构。通过 ts-rs 导出 TypeScript 类型给前端。

pub mod auth;
pub mod classrooms;
pub mod common;
pub mod essays;
pub mod exams;
pub mod organizations;
pub mod practice;
pub mod questions;
pub mod tutor;
pub mod users;

pub use common::pagination::{PaginatedResponse, PaginationInfo, PaginationQuery};
pub use common::response::ApiResponse;

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 业务错误码
///
/// 1xxx 通用，2xxx 认证/用户，3xxx 班级/组织，4xxx 题目/LLM，5xxx 练习/考试
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1002,
    NotFound = 1003,
    InternalServerError = 1004,
    RateLimitExceeded = 1005,

    AuthFailed = 2000,
    RegisterFailed = 2001,
    UserNotFound = 2002,
    UserNameInvalid = 2003,
    UserEmailInvalid = 2004,
    UserPasswordInvalid = 2005,
    UserNameAlreadyExists = 2006,
    UserEmailAlreadyExists = 2007,
    UserRoleInvalid = 2008,

    ClassroomNotFound = 3000,
    ClassroomPermissionDenied = 3001,
    ClassroomInviteCodeInvalid = 3002,
    ClassroomAlreadyJoined = 3003,
    ClassroomCreationFailed = 3004,
    OrganizationNotFound = 3100,
    OrganizationAlreadyExists = 3101,

    QuestionNotFound = 4000,
    QuestionGenerationFailed = 4001,
    QuestionSpecInvalid = 4002,
    TutorUnavailable = 4003,
    EssayFeedbackUnavailable = 4004,

    PracticeAttemptInvalid = 5000,
    ExamNotFound = 5100,
    ExamAlreadySubmitted = 5101,
    ExamAnswerInvalid = 5102,
    ExamCreationFailed = 5103,
}
