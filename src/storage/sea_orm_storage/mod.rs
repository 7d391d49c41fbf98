//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod classrooms;
mod exams;
mod organizations;
mod practice;
mod questions;
mod users;

#[cfg(test)]
pub(crate) mod test_support;

use crate::config::AppConfig;
use crate::errors::{Result, StaarError};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect(
            &config.database.url,
            config.database.pool_size,
            config.database.timeout,
        )
        .await
    }

    /// 连接数据库并运行迁移
    pub async fn connect(url: &str, pool_size: u32, timeout_secs: u64) -> Result<Self> {
        let db_url = Self::build_database_url(url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, pool_size, timeout_secs).await?
        } else {
            Self::connect_generic(&db_url, pool_size, timeout_secs).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| StaarError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(
        url: &str,
        pool_size: u32,
        timeout_secs: u64,
    ) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        // 内存库每个连接各自独立，只能用单连接
        let in_memory = url.contains(":memory:");

        let mut opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| StaarError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");
        if !in_memory {
            opt = opt.journal_mode(SqliteJournalMode::Wal);
        }

        let max_connections = if in_memory { 1 } else { pool_size.max(1) };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(timeout_secs))
            .idle_timeout(if in_memory {
                None
            } else {
                Some(Duration::from_secs(300))
            })
            .max_lifetime(if in_memory {
                None
            } else {
                Some(Duration::from_secs(1800))
            })
            .connect_with(opt)
            .await
            .map_err(|e| StaarError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(
        url: &str,
        pool_size: u32,
        timeout_secs: u64,
    ) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(timeout_secs))
            .acquire_timeout(Duration::from_secs(timeout_secs))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| StaarError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(StaarError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }

    /// 测试用内存库
    #[cfg(test)]
    pub(crate) async fn in_memory() -> Self {
        Self::connect("sqlite::memory:", 1, 5)
            .await
            .expect("in-memory SQLite should connect")
    }
}

// Storage trait 实现
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
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 组织模块
    async fn create_organization(
        &self,
        name: &str,
        description: Option<String>,
        created_by: i64,
    ) -> Result<Organization> {
        self.create_organization_impl(name, description, created_by)
            .await
    }

    async fn get_organization_by_id(&self, id: i64) -> Result<Option<Organization>> {
        self.get_organization_by_id_impl(id).await
    }

    async fn get_organization_by_name(&self, name: &str) -> Result<Option<Organization>> {
        self.get_organization_by_name_impl(name).await
    }

    async fn list_organizations(&self) -> Result<Vec<Organization>> {
        self.list_organizations_impl().await
    }

    // 班级模块
    async fn create_classroom(&self, classroom: NewClassroom) -> Result<Classroom> {
        self.create_classroom_impl(classroom).await
    }

    async fn get_classroom_by_id(&self, id: i64) -> Result<Option<Classroom>> {
        self.get_classroom_by_id_impl(id).await
    }

    async fn get_classroom_by_invite_code(&self, invite_code: &str) -> Result<Option<Classroom>> {
        self.get_classroom_by_invite_code_impl(invite_code).await
    }

    async fn list_classrooms(&self, teacher_id: Option<i64>) -> Result<Vec<Classroom>> {
        self.list_classrooms_impl(teacher_id).await
    }

    async fn list_student_classrooms(&self, student_id: i64) -> Result<Vec<Classroom>> {
        self.list_student_classrooms_impl(student_id).await
    }

    async fn add_classroom_student(
        &self,
        classroom_id: i64,
        student_id: i64,
    ) -> Result<ClassroomStudent> {
        self.add_classroom_student_impl(classroom_id, student_id)
            .await
    }

    async fn get_classroom_student(
        &self,
        classroom_id: i64,
        student_id: i64,
    ) -> Result<Option<ClassroomStudent>> {
        self.get_classroom_student_impl(classroom_id, student_id)
            .await
    }

    async fn count_classroom_students(&self, classroom_id: i64) -> Result<i64> {
        self.count_classroom_students_impl(classroom_id).await
    }

    async fn list_classroom_student_summaries(
        &self,
        classroom_id: i64,
    ) -> Result<Vec<ClassroomStudentSummary>> {
        self.list_classroom_student_summaries_impl(classroom_id)
            .await
    }

    // 题目模块
    async fn create_question(&self, question: NewQuestion) -> Result<Question> {
        self.create_question_impl(question).await
    }

    async fn get_question_by_id(&self, id: i64) -> Result<Option<Question>> {
        self.get_question_by_id_impl(id).await
    }

    async fn get_questions_by_ids(&self, ids: &[i64]) -> Result<Vec<Question>> {
        self.get_questions_by_ids_impl(ids).await
    }

    async fn list_questions_with_pagination(
        &self,
        query: QuestionListQuery,
    ) -> Result<PaginatedResponse<Question>> {
        self.list_questions_with_pagination_impl(query).await
    }

    async fn list_question_ids(&self, grade_level: i32, subject: Subject) -> Result<Vec<i64>> {
        self.list_question_ids_impl(grade_level, subject).await
    }

    async fn delete_question(&self, id: i64) -> Result<bool> {
        self.delete_question_impl(id).await
    }

    // 练习模块
    async fn create_practice_attempt(
        &self,
        attempt: NewPracticeAttempt,
    ) -> Result<PracticeAttempt> {
        self.create_practice_attempt_impl(attempt).await
    }

    async fn list_practice_attempts(
        &self,
        user_id: i64,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<PracticeAttempt>> {
        self.list_practice_attempts_impl(user_id, pagination).await
    }

    async fn list_attempt_outcomes(&self, user_id: i64) -> Result<Vec<AttemptOutcome>> {
        self.list_attempt_outcomes_impl(user_id).await
    }

    // 考试模块
    async fn create_exam(&self, exam: NewExam) -> Result<Exam> {
        self.create_exam_impl(exam).await
    }

    async fn get_exam_by_id(&self, id: i64) -> Result<Option<Exam>> {
        self.get_exam_by_id_impl(id).await
    }

    async fn list_exams(
        &self,
        user_id: i64,
        pagination: PaginationQuery,
    ) -> Result<PaginatedResponse<Exam>> {
        self.list_exams_impl(user_id, pagination).await
    }

    async fn submit_exam(&self, id: i64, score: ExamScore) -> Result<Option<Exam>> {
        self.submit_exam_impl(id, score).await
    }
}
