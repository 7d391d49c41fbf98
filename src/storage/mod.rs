use crate::models::{
    PaginatedResponse, PaginationQuery,
    classrooms::{
        entities::{Classroom, ClassroomStudent},
        requests::NewClassroom,
        responses::ClassroomStudentSummary,
    },
    exams::{
        entities::Exam,
        requests::{ExamScore, NewExam},
    },
    organizations::entities::Organization,
    practice::{
        entities::{AttemptOutcome, PracticeAttempt},
        requests::NewPracticeAttempt,
    },
    questions::{
        entities::{Question, Subject},
        requests::{NewQuestion, QuestionListQuery},
    },
    users::{entities::User, requests::CreateUserRequest},
};

use crate::errors::Result;
use std::sync::Arc;

pub mod sea_orm_storage;

pub use sea_orm_storage::SeaOrmStorage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 用户总数
    async fn count_users(&self) -> Result<u64>;

    /// 组织管理方法
    async fn create_organization(
        &self,
        name: &str,
        description: Option<String>,
        created_by: i64,
    ) -> Result<Organization>;
    async fn get_organization_by_id(&self, id: i64) -> Result<Option<Organization>>;
    async fn get_organization_by_name(&self, name: &str) -> Result<Option<Organization>>;
    async fn list_organizations(&self) -> Result<Vec<Organization>>;

    /// 班级管理方法
    // 创建班级
    async fn create_classroom(&self, classroom: NewClassroom) -> Result<Classroom>;
    // 通过ID获取班级
    async fn get_classroom_by_id(&self, id: i64) -> Result<Option<Classroom>>;
    // 通过邀请码获取班级
    async fn get_classroom_by_invite_code(&self, invite_code: &str) -> Result<Option<Classroom>>;
    // 列出班级（teacher_id 为空时列出全部）
    async fn list_classrooms(&self, teacher_id: Option<i64>) -> Result<Vec<Classroom>>;
    // 列出学生加入的班级
    async fn list_student_classrooms(&self, student_id: i64) -> Result<Vec<Classroom>>;
    // 学生加入班级
    async fn add_classroom_student(
        &self,
        classroom_id: i64,
        student_id: i64,
    ) -> Result<ClassroomStudent>;
    // 查询成员关系
    async fn get_classroom_student(
        &self,
        classroom_id: i64,
        student_id: i64,
    ) -> Result<Option<ClassroomStudent>>;
    // 班级学生数
    async fn count_classroom_students(&self, classroom_id: i64) -> Result<i64>;
    // 班级学生名单及练习正确率
    async fn list_classroom_student_summaries(
        &self,
        classroom_id: i64,
    ) -> Result<Vec<ClassroomStudentSummary>>;

    /// 题目管理方法
    async fn create_question(&self, question: NewQuestion) -> Result<Question>;
    async fn get_question_by_id(&self, id: i64) -> Result<Option<Question>>;
    // 按 ID 批量获取，保持传入顺序，缺失的跳过
    async fn get_questions_by_ids(&self, ids: &[i64]) -> Result<Vec<Question>>;
    async fn list_questions_with_pagination(
        &self,
        query: QuestionListQuery,
    ) -> Result<PaginatedResponse<Question>>;
    // 某年级某科目的全部题目 ID
    async fn list_question_ids(&self, grade_level: i32, subject: Subject) -> Result<Vec<i64>>;
    async fn delete_question(&self, id: i64) -> Result<bool>;

    /// 练习方法
    async fn create_practice_attempt(&self, attempt: NewPracticeAttempt)
    -> Result<PracticeAttempt>;
    async fn list_practice_attempts(
        &self,
        user_id: i64,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<PracticeAttempt>>;
    // 用户全部作答结果（附题目科目与 TEKS），用于统计
    async fn list_attempt_outcomes(&self, user_id: i64) -> Result<Vec<AttemptOutcome>>;

    /// 模拟考试方法
    async fn create_exam(&self, exam: NewExam) -> Result<Exam>;
    async fn get_exam_by_id(&self, id: i64) -> Result<Option<Exam>>;
    async fn list_exams(
        &self,
        user_id: i64,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<Exam>>;
    // 仅当考试仍为 in_progress 时写入成绩；已提交则返回 None
    async fn submit_exam(&self, id: i64, score: ExamScore) -> Result<Option<Exam>>;
}

/// 创建存储实例
pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
