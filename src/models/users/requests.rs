use crate::models::users::entities::UserRole;

// 存储层使用的创建用户请求（密码已哈希）
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub display_name: Option<String>,
    pub grade_level: Option<i32>,
}
