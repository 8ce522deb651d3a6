use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Users::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Users::UserId)
              .big_integer()
              .not_null()
              .primary_key(),
          )
          .col(
            ColumnDef::new(Users::TotalPoint)
              .big_integer()
              .not_null()
              .default(0),
          )
          .col(ColumnDef::new(Users::OpenWeek).string().null())
          .col(ColumnDef::new(Users::WeeklyLogins).json().null())
          .col(ColumnDef::new(Users::WeekHistory).json().null())
          .col(ColumnDef::new(Users::CreatedAt).date_time().not_null())
          .col(ColumnDef::new(Users::UpdatedAt).date_time().not_null())
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(Users::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Users {
  Table,
  UserId,
  TotalPoint,
  OpenWeek,
  WeeklyLogins,
  WeekHistory,
  CreatedAt,
  UpdatedAt,
}
