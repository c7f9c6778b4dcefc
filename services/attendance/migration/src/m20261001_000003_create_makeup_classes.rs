use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MakeupClasses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MakeupClasses::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MakeupClasses::FacultyId).uuid().not_null())
                    .col(
                        ColumnDef::new(MakeupClasses::Subject)
                            .string_len(150)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MakeupClasses::Topic)
                            .string_len(200)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(MakeupClasses::Date).date().not_null())
                    .col(ColumnDef::new(MakeupClasses::StartTime).time().not_null())
                    .col(ColumnDef::new(MakeupClasses::EndTime).time().not_null())
                    .col(ColumnDef::new(MakeupClasses::Venue).string_len(100).not_null())
                    .col(
                        ColumnDef::new(MakeupClasses::Status)
                            .string_len(10)
                            .not_null()
                            .default("upcoming"),
                    )
                    .col(
                        ColumnDef::new(MakeupClasses::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(MakeupClasses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(MakeupClasses::Table, MakeupClasses::FacultyId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(MakeupClasses::Table)
                    .col(MakeupClasses::FacultyId)
                    .col(MakeupClasses::Date)
                    .name("idx_makeup_classes_faculty_id_date")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MakeupClasses::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum MakeupClasses {
    Table,
    Id,
    FacultyId,
    Subject,
    Topic,
    Date,
    StartTime,
    EndTime,
    Venue,
    Status,
    Description,
    CreatedAt,
}

#[derive(Iden)]
enum Accounts {
    Table,
    Id,
}
