use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AlarmEvents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AlarmEvents::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    // Device-supplied and unbounded
                    .col(ColumnDef::new(AlarmEvents::EventType).text().not_null())
                    .col(ColumnDef::new(AlarmEvents::Description).text())
                    .col(ColumnDef::new(AlarmEvents::Timestamp).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        // The event log is read newest-first
        manager
            .create_index(
                Index::create()
                    .name("idx_alarm_events_timestamp")
                    .table(AlarmEvents::Table)
                    .col(AlarmEvents::Timestamp)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AlarmEvents::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AlarmEvents {
    Table,
    Id,
    EventType,
    Description,
    Timestamp,
}
