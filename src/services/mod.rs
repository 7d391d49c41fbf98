pub mod auth;
pub mod classrooms;
pub mod essays;
pub mod exams;
pub mod organizations;
pub mod practice;
pub mod questions;
pub mod tutor;

pub use auth::AuthService;
pub use classrooms::ClassroomService;
pub use essays::EssayService;
pub use exams::ExamService;
pub use organizations::OrganizationService;
pub use practice::PracticeService;
pub use questions::QuestionService;
pub use tutor::TutorService;
