use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MakeupAttendance::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MakeupAttendance::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MakeupAttendance::StudentId).uuid().not_null())
                    .col(
                        ColumnDef::new(MakeupAttendance::MakeupClassId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MakeupAttendance::RemedialCodeId).uuid())
                    .col(
                        ColumnDef::new(MakeupAttendance::MarkedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MakeupAttendance::IsPresent)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(MakeupAttendance::Table, MakeupAttendance::StudentId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(MakeupAttendance::Table, MakeupAttendance::MakeupClassId)
                            .to(MakeupClasses::Table, MakeupClasses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(MakeupAttendance::Table, MakeupAttendance::RemedialCodeId)
                            .to(RemedialCodes::Table, RemedialCodes::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(MakeupAttendance::Table)
                    .col(MakeupAttendance::StudentId)
                    .col(MakeupAttendance::MakeupClassId)
                    .name("uq_makeup_attendance_student_id_makeup_class_id")
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(MakeupAttendance::Table)
                    .col(MakeupAttendance::MakeupClassId)
                    .name("idx_makeup_attendance_makeup_class_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MakeupAttendance::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum MakeupAttendance {
    Table,
    Id,
    StudentId,
    MakeupClassId,
    RemedialCodeId,
    MarkedAt,
    IsPresent,
}

#[derive(Iden)]
enum MakeupClasses {
    Table,
    Id,
}

#[derive(Iden)]
enum RemedialCodes {
    Table,
    Id,
}

#[derive(Iden)]
enum Accounts {
    Table,
    Id,
}
