use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(InventoryBatch::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InventoryBatch::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(InventoryBatch::ProductId)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(ColumnDef::new(InventoryBatch::Quantity).integer().not_null())
                    .col(ColumnDef::new(InventoryBatch::ExpiresAt).date_time().not_null())
                    .col(ColumnDef::new(InventoryBatch::CreatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        // Reservation loads batches by product ordered by expiry
        manager
            .create_index(
                Index::create()
                    .name("idx_inventory_batch_product_expiry")
                    .table(InventoryBatch::Table)
                    .col(InventoryBatch::ProductId)
                    .col(InventoryBatch::ExpiresAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InventoryProcessedOrder::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InventoryProcessedOrder::OrderId)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(InventoryProcessedOrder::ProcessedAt)
                            .date_time()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InventoryProcessedOrder::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(InventoryBatch::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum InventoryBatch {
    Table,
    Id,
    ProductId,
    Quantity,
    ExpiresAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum InventoryProcessedOrder {
    Table,
    OrderId,
    ProcessedAt,
}
