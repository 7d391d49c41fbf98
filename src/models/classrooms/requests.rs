use crate::models::questions::entities::Subject;
use serde::Deserialize;
use ts_rs::TS;

/// 创建班级请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/classroom.ts")]
pub struct CreateClassroomRequest {
    pub name: String,
    pub grade_level: i32,
    pub subject: Subject,
    pub organization_id: Option<i64>,
}

/// 通过邀请码加入班级
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/classroom.ts")]
pub struct JoinClassroomRequest {
    pub invite_code: String,
}

// 存储层写入参数
#[derive(Debug, Clone)]
pub struct NewClassroom {
    pub organization_id: Option<i64>,
    pub teacher_id: i64,
    pub name: String,
    pub grade_level: i32,
    pub subject: Subject,
    pub invite_code: String,
}
