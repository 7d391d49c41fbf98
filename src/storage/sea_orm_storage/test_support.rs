//! 存储层测试夹具

use super::SeaOrmStorage;
use crate::models::questions::entities::{Question, QuestionSource, Subject};
use crate::models::questions::requests::NewQuestion;
use crate::models::users::entities::{User, UserRole};
use crate::models::users::requests::CreateUserRequest;
use crate::storage::Storage;

pub(crate) fn new_user(username: &str, role: UserRole) -> CreateUserRequest {
    CreateUserRequest {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password: "hashed".to_string(),
        role,
        display_name: None,
        grade_level: Some(4),
    }
}

pub(crate) async fn seed_user(storage: &SeaOrmStorage, username: &str, role: UserRole) -> User {
    storage
        .create_user(new_user(username, role))
        .await
        .expect("seed user")
}

pub(crate) fn new_question(grade_level: i32, subject: Subject, teks: &str) -> NewQuestion {
    NewQuestion {
        grade_level,
        subject,
        teks_standard: teks.to_string(),
        category: Some("addition".to_string()),
        question_text: "What is 2 + 2?".to_string(),
        answer_choices: vec!["3".into(), "4".into(), "5".into(), "6".into()],
        correct_answer: "B".to_string(),
        explanation: "Two and two more: 2 + 2 = 4.".to_string(),
        has_image: false,
        image_description: None,
        source: QuestionSource::Manual,
        provider: None,
        created_by: None,
    }
}

pub(crate) async fn seed_question(
    storage: &SeaOrmStorage,
    grade_level: i32,
    subject: Subject,
    teks: &str,
) -> Question {
    storage
        .create_question(new_question(grade_level, subject, teks))
        .await
        .expect("seed question")
}
