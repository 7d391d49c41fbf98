//! 预导入模块，方便使用

pub use super::classroom_students::{
    ActiveModel as ClassroomStudentActiveModel, Entity as ClassroomStudents,
    Model as ClassroomStudentModel,
};
pub use super::classrooms::{
    ActiveModel as ClassroomActiveModel, Entity as Classrooms, Model as ClassroomModel,
};
pub use super::exams::{ActiveModel as ExamActiveModel, Entity as Exams, Model as ExamModel};
pub use super::organizations::{
    ActiveModel as OrganizationActiveModel, Entity as Organizations, Model as OrganizationModel,
};
pub use super::practice_attempts::{
    ActiveModel as PracticeAttemptActiveModel, Entity as PracticeAttempts,
    Model as PracticeAttemptModel,
};
pub use super::questions::{
    ActiveModel as QuestionActiveModel, Entity as Questions, Model as QuestionModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
