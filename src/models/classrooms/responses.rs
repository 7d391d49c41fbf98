use crate::models::classrooms::entities::Classroom;
use serde::Serialize;
use ts_rs::TS;

/// 班级学生及其练习正确率
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/classroom.ts")]
pub struct ClassroomStudentSummary {
    pub user_id: i64,
    pub username: String,
    pub display_name: Option<String>,
    pub joined_at: chrono::DateTime<chrono::Utc>,
    pub total_attempts: i64,
    pub correct_attempts: i64,
    pub accuracy: f64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/classroom.ts")]
pub struct ClassroomDetailResponse {
    pub classroom: Classroom,
    pub student_count: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/classroom.ts")]
pub struct ClassroomListResponse {
    pub items: Vec<Classroom>,
}
