use actix_web::web;

pub mod auth;

pub mod questions;

pub mod practice;

pub mod exams;

pub mod organizations;

pub mod classrooms;

pub mod tutor;

pub mod essays;

pub use auth::configure_auth_routes;
pub use classrooms::configure_classrooms_routes;
pub use essays::configure_essays_routes;
pub use exams::configure_exams_routes;
pub use organizations::configure_organizations_routes;
pub use practice::configure_practice_routes;
pub use questions::configure_questions_routes;
pub use tutor::configure_tutor_routes;

// 注册全部 API 路由
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_auth_routes)
        .configure(configure_questions_routes)
        .configure(configure_practice_routes)
        .configure(configure_exams_routes)
        .configure(configure_organizations_routes)
        .configure(configure_classrooms_routes)
        .configure(configure_tutor_routes)
        .configure(configure_essays_routes);
}
