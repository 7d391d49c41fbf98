use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::classrooms::requests::{CreateClassroomRequest, JoinClassroomRequest};
use crate::models::users::entities::UserRole;
use crate::services::ClassroomService;

// 懒加载的全局 ClassroomService 实例
static CLASSROOM_SERVICE: Lazy<ClassroomService> = Lazy::new(ClassroomService::new_lazy);

pub async fn create_classroom(
    req: HttpRequest,
    body: web::Json<CreateClassroomRequest>,
) -> ActixResult<HttpResponse> {
    CLASSROOM_SERVICE
        .create_classroom(&req, body.into_inner())
        .await
}

pub async fn list_classrooms(req: HttpRequest) -> ActixResult<HttpResponse> {
    CLASSROOM_SERVICE.list_classrooms(&req).await
}

pub async fn get_classroom(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    CLASSROOM_SERVICE
        .get_classroom(&req, path.into_inner())
        .await
}

pub async fn join_classroom(
    req: HttpRequest,
    body: web::Json<JoinClassroomRequest>,
) -> ActixResult<HttpResponse> {
    CLASSROOM_SERVICE
        .join_classroom(&req, body.into_inner())
        .await
}

pub async fn list_students(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    CLASSROOM_SERVICE
        .list_students(&req, path.into_inner())
        .await
}

// 配置路由
pub fn configure_classrooms_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/classrooms")
            .wrap(middlewares::RequireJWT)
            .service(
                // 教师查看自己的班级，学生查看已加入的班级，管理员查看全部
                web::resource("").route(web::get().to(list_classrooms)).route(
                    web::post()
                        .to(create_classroom)
                        .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                ),
            )
            // 仅学生可加入，由服务层校验角色
            .route("/join", web::post().to(join_classroom))
            .route("/{classroom_id}", web::get().to(get_classroom))
            .service(
                web::resource("/{classroom_id}/students").route(
                    web::get()
                        .to(list_students)
                        .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                ),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ErrorCode;
    use crate::storage::sea_orm_storage::test_support::seed_user;
    use crate::storage::{SeaOrmStorage, Storage};
    use crate::utils::jwt::JwtUtils;
    use actix_web::{App, test};
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn bearer(user_id: i64, role: &str) -> (&'static str, String) {
        let token = JwtUtils::generate_access_token(user_id, role).unwrap();
        ("Authorization", format!("Bearer {token}"))
    }

    #[actix_web::test]
    async fn test_classroom_lifecycle() {
        let storage = SeaOrmStorage::in_memory().await;
        let teacher = seed_user(&storage, "ms.rivera", UserRole::Teacher).await;
        let student = seed_user(&storage, "leo.k", UserRole::Student).await;
        let outsider = seed_user(&storage, "mr.chen", UserRole::Teacher).await;
        let storage: Arc<dyn Storage> = Arc::new(storage);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage))
                .configure(configure_classrooms_routes),
        )
        .await;

        // 教师创建班级
        let req = test::TestRequest::post()
            .uri("/api/classrooms")
            .insert_header(bearer(teacher.id, "teacher"))
            .set_json(json!({"name": "Room 12", "grade_level": 3, "subject": "math"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);
        let body: Value = test::read_body_json(resp).await;
        let classroom_id = body["data"]["id"].as_i64().unwrap();
        let invite_code = body["data"]["invite_code"].as_str().unwrap().to_string();
        assert_eq!(invite_code.len(), 8);

        // 学生不能创建班级
        let req = test::TestRequest::post()
            .uri("/api/classrooms")
            .insert_header(bearer(student.id, "student"))
            .set_json(json!({"name": "Mine", "grade_level": 3, "subject": "math"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 403);

        // 邀请码大小写不敏感
        let req = test::TestRequest::post()
            .uri("/api/classrooms/join")
            .insert_header(bearer(student.id, "student"))
            .set_json(json!({"invite_code": invite_code.to_lowercase()}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 200);

        let req = test::TestRequest::post()
            .uri("/api/classrooms/join")
            .insert_header(bearer(student.id, "student"))
            .set_json(json!({"invite_code": invite_code}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 409);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], ErrorCode::ClassroomAlreadyJoined as i32);

        let req = test::TestRequest::post()
            .uri("/api/classrooms/join")
            .insert_header(bearer(student.id, "student"))
            .set_json(json!({"invite_code": "ZZZZZZZZ"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 404);

        // 成员可以查看详情
        let req = test::TestRequest::get()
            .uri(&format!("/api/classrooms/{classroom_id}"))
            .insert_header(bearer(student.id, "student"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["student_count"], 1);

        // 其他教师看不到名单
        let req = test::TestRequest::get()
            .uri(&format!("/api/classrooms/{classroom_id}/students"))
            .insert_header(bearer(outsider.id, "teacher"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 403);

        let req = test::TestRequest::get()
            .uri(&format!("/api/classrooms/{classroom_id}/students"))
            .insert_header(bearer(teacher.id, "teacher"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"][0]["username"], "leo.k");
        assert_eq!(body["data"][0]["total_attempts"], 0);

        // 学生列表只含已加入的班级
        let req = test::TestRequest::get()
            .uri("/api/classrooms")
            .insert_header(bearer(student.id, "student"))
            .to_request();
        let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);
    }
}
