use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RemedialCodes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RemedialCodes::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RemedialCodes::MakeupClassId).uuid().not_null())
                    .col(
                        ColumnDef::new(RemedialCodes::Code)
                            .string_len(10)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(RemedialCodes::CreatedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(RemedialCodes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RemedialCodes::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RemedialCodes::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(RemedialCodes::Table, RemedialCodes::MakeupClassId)
                            .to(MakeupClasses::Table, MakeupClasses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(RemedialCodes::Table, RemedialCodes::CreatedBy)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(RemedialCodes::Table)
                    .col(RemedialCodes::MakeupClassId)
                    .col(RemedialCodes::IsActive)
                    .name("idx_remedial_codes_makeup_class_id_is_active")
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(RemedialCodes::Table)
                    .col(RemedialCodes::CreatedBy)
                    .name("idx_remedial_codes_created_by")
                    .to_owned(),
            )
            .await?;

        // At most one active code per class.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS uq_remedial_codes_one_active \
                 ON remedial_codes (makeup_class_id) WHERE is_active",
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RemedialCodes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum RemedialCodes {
    Table,
    Id,
    MakeupClassId,
    Code,
    CreatedBy,
    CreatedAt,
    ExpiresAt,
    IsActive,
}

#[derive(Iden)]
enum MakeupClasses {
    Table,
    Id,
}

#[derive(Iden)]
enum Accounts {
    Table,
    Id,
}
