use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EventPublication::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EventPublication::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EventPublication::ListenerId)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EventPublication::EventType)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(ColumnDef::new(EventPublication::Payload).text().not_null())
                    .col(
                        ColumnDef::new(EventPublication::PublicationDate)
                            .date_time()
                            .not_null(),
                    )
                    .col(ColumnDef::new(EventPublication::CompletionDate).date_time())
                    .to_owned(),
            )
            .await?;

        // The relay scans for incomplete publications oldest-first
        manager
            .create_index(
                Index::create()
                    .name("idx_event_publication_incomplete")
                    .table(EventPublication::Table)
                    .col(EventPublication::CompletionDate)
                    .col(EventPublication::PublicationDate)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EventPublication::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum EventPublication {
    Table,
    Id,
    ListenerId,
    EventType,
    Payload,
    PublicationDate,
    CompletionDate,
}
