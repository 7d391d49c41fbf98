use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_tables::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ==================== 模拟考试表 ====================
        manager
            .create_table(
                Table::create()
                    .table(Exams::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Exams::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Exams::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Exams::GradeLevel).integer().not_null())
                    .col(ColumnDef::new(Exams::Subject).string().not_null())
                    .col(ColumnDef::new(Exams::QuestionIds).text().not_null())
                    .col(ColumnDef::new(Exams::Status).string().not_null())
                    .col(ColumnDef::new(Exams::TotalQuestions).integer().not_null())
                    .col(ColumnDef::new(Exams::CorrectCount).integer().null())
                    .col(ColumnDef::new(Exams::ScorePercent).double().null())
                    .col(ColumnDef::new(Exams::PerformanceLevel).string().null())
                    .col(ColumnDef::new(Exams::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Exams::SubmittedAt).big_integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Exams::Table, Exams::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_exams_user")
                    .table(Exams::Table)
                    .col(Exams::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Exams::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Exams {
    #[sea_orm(iden = "exams")]
    Table,
    Id,
    UserId,
    GradeLevel,
    Subject,
    QuestionIds,
    Status,
    TotalQuestions,
    CorrectCount,
    ScorePercent,
    PerformanceLevel,
    CreatedAt,
    SubmittedAt,
}
