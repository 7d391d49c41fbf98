pub mod create;
pub mod detail;
pub mod join;
pub mod list;
pub mod students;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::classrooms::entities::Classroom;
use crate::models::classrooms::requests::{CreateClassroomRequest, JoinClassroomRequest};
use crate::models::users::entities::{User, UserRole};
use crate::storage::Storage;

pub struct ClassroomService {
    storage: Option<Arc<dyn Storage>>,
}

impl ClassroomService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn create_classroom(
        &self,
        request: &HttpRequest,
        body: CreateClassroomRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_classroom(self, request, body).await
    }

    pub async fn list_classrooms(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_classrooms(self, request).await
    }

    pub async fn get_classroom(
        &self,
        request: &HttpRequest,
        classroom_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_classroom(self, request, classroom_id).await
    }

    // 学生通过邀请码加入
    pub async fn join_classroom(
        &self,
        request: &HttpRequest,
        body: JoinClassroomRequest,
    ) -> ActixResult<HttpResponse> {
        join::join_classroom(self, request, body).await
    }

    // 班级学生及练习正确率
    pub async fn list_students(
        &self,
        request: &HttpRequest,
        classroom_id: i64,
    ) -> ActixResult<HttpResponse> {
        students::list_students(self, request, classroom_id).await
    }
}

/// 班级创建者或管理员
pub(crate) fn can_manage(user: &User, classroom: &Classroom) -> bool {
    user.role == UserRole::Admin || classroom.teacher_id == user.id
}
