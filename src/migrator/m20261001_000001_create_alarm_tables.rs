use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Singleton tables: the id is fixed by the application, not generated.
        manager
            .create_table(
                Table::create()
                    .table(AlarmState::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AlarmState::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AlarmState::Armed)
                            .boolean()
                            .default(false)
                            .not_null(),
                    )
                    .col(ColumnDef::new(AlarmState::UpdatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        // emergency_contact_id is deliberately left without a foreign key;
        // readers resolve it by lookup and tolerate a deleted contact.
        manager
            .create_table(
                Table::create()
                    .table(AlarmConfig::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AlarmConfig::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AlarmConfig::CustomMessage)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AlarmConfig::NotificationMethod)
                            .string_len(50)
                            .default("SMS")
                            .not_null(),
                    )
                    .col(ColumnDef::new(AlarmConfig::EmergencyContactId).integer())
                    .col(ColumnDef::new(AlarmConfig::UpdatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AlarmConfig::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AlarmState::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AlarmState {
    Table,
    Id,
    Armed,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AlarmConfig {
    Table,
    Id,
    CustomMessage,
    NotificationMethod,
    EmergencyContactId,
    UpdatedAt,
}
