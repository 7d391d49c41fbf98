//! 班级及班级学生存储操作

use super::SeaOrmStorage;
use crate::entity::classroom_students::{
    ActiveModel as ClassroomStudentActiveModel, Column as StudentColumn,
    Entity as ClassroomStudents,
};
use crate::entity::classrooms::{ActiveModel, Column, Entity as Classrooms, Relation};
use crate::entity::practice_attempts::{Column as AttemptColumn, Entity as PracticeAttempts};
use crate::entity::users::Entity as Users;
use crate::errors::{Result, StaarError};
use crate::models::classrooms::{
    entities::{Classroom, ClassroomStudent},
    requests::NewClassroom,
    responses::ClassroomStudentSummary,
};
use crate::models::practice::entities::accuracy_percent;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set,
};
use std::collections::HashMap;

impl SeaOrmStorage {
    /// 创建班级
    pub async fn create_classroom_impl(&self, req: NewClassroom) -> Result<Classroom> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            organization_id: Set(req.organization_id),
            teacher_id: Set(req.teacher_id),
            name: Set(req.name),
            grade_level: Set(req.grade_level),
            subject: Set(req.subject.to_string()),
            invite_code: Set(req.invite_code),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| StaarError::database_operation(format!("创建班级失败: {e}")))?;

        Ok(result.into_classroom())
    }

    pub async fn get_classroom_by_id_impl(&self, id: i64) -> Result<Option<Classroom>> {
        let result = Classrooms::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| StaarError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_classroom()))
    }

    /// 通过邀请码获取班级
    pub async fn get_classroom_by_invite_code_impl(
        &self,
        invite_code: &str,
    ) -> Result<Option<Classroom>> {
        let result = Classrooms::find()
            .filter(Column::InviteCode.eq(invite_code))
            .one(&self.db)
            .await
            .map_err(|e| StaarError::database_operation(format!("通过邀请码查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_classroom()))
    }

    /// 列出班级，指定教师时只返回其创建的班级
    pub async fn list_classrooms_impl(&self, teacher_id: Option<i64>) -> Result<Vec<Classroom>> {
        let mut select = Classrooms::find();

        if let Some(teacher_id) = teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }

        let models = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| StaarError::database_operation(format!("查询班级列表失败: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_classroom()).collect())
    }

    /// 学生已加入的班级
    pub async fn list_student_classrooms_impl(&self, student_id: i64) -> Result<Vec<Classroom>> {
        let models = Classrooms::find()
            .join(JoinType::InnerJoin, Relation::ClassroomStudents.def())
            .filter(StudentColumn::StudentId.eq(student_id))
            .order_by_desc(StudentColumn::JoinedAt)
            .all(&self.db)
            .await
            .map_err(|e| StaarError::database_operation(format!("查询学生班级失败: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_classroom()).collect())
    }

    /// 学生加入班级
    pub async fn add_classroom_student_impl(
        &self,
        classroom_id: i64,
        student_id: i64,
    ) -> Result<ClassroomStudent> {
        let now = chrono::Utc::now().timestamp();

        let model = ClassroomStudentActiveModel {
            classroom_id: Set(classroom_id),
            student_id: Set(student_id),
            joined_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| StaarError::database_operation(format!("加入班级失败: {e}")))?;

        Ok(result.into_classroom_student())
    }

    pub async fn get_classroom_student_impl(
        &self,
        classroom_id: i64,
        student_id: i64,
    ) -> Result<Option<ClassroomStudent>> {
        let result = ClassroomStudents::find()
            .filter(StudentColumn::ClassroomId.eq(classroom_id))
            .filter(StudentColumn::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| StaarError::database_operation(format!("查询班级学生失败: {e}")))?;

        Ok(result.map(|m| m.into_classroom_student()))
    }

    /// 班级学生数量
    pub async fn count_classroom_students_impl(&self, classroom_id: i64) -> Result<i64> {
        let count = ClassroomStudents::find()
            .filter(StudentColumn::ClassroomId.eq(classroom_id))
            .count(&self.db)
            .await
            .map_err(|e| StaarError::database_operation(format!("查询班级学生数量失败: {e}")))?;

        Ok(count as i64)
    }

    /// 班级学生及各自的练习正确率
    pub async fn list_classroom_student_summaries_impl(
        &self,
        classroom_id: i64,
    ) -> Result<Vec<ClassroomStudentSummary>> {
        let members = ClassroomStudents::find()
            .filter(StudentColumn::ClassroomId.eq(classroom_id))
            .order_by_asc(StudentColumn::JoinedAt)
            .order_by_asc(StudentColumn::Id)
            .find_also_related(Users)
            .all(&self.db)
            .await
            .map_err(|e| StaarError::database_operation(format!("查询班级学生失败: {e}")))?;

        if members.is_empty() {
            return Ok(Vec::new());
        }

        let student_ids: Vec<i64> = members.iter().map(|(m, _)| m.student_id).collect();

        // (user_id, is_correct)
        let outcomes = PracticeAttempts::find()
            .select_only()
            .column(AttemptColumn::UserId)
            .column(AttemptColumn::IsCorrect)
            .filter(AttemptColumn::UserId.is_in(student_ids))
            .into_tuple::<(i64, bool)>()
            .all(&self.db)
            .await
            .map_err(|e| StaarError::database_operation(format!("查询学生练习记录失败: {e}")))?;

        let mut tallies: HashMap<i64, (i64, i64)> = HashMap::new();
        for (user_id, is_correct) in outcomes {
            let entry = tallies.entry(user_id).or_default();
            entry.0 += 1;
            if is_correct {
                entry.1 += 1;
            }
        }

        Ok(members
            .into_iter()
            .filter_map(|(member, user)| {
                let user = user?;
                let (total, correct) = tallies.get(&member.student_id).copied().unwrap_or_default();
                Some(ClassroomStudentSummary {
                    user_id: user.id,
                    username: user.username,
                    display_name: user.display_name,
                    joined_at: crate::entity::ts_to_datetime(member.joined_at),
                    total_attempts: total,
                    correct_attempts: correct,
                    accuracy: accuracy_percent(correct, total),
                })
            })
            .collect())
    }
}
