//! Migration: Create service request and attachment tables.
//!
//! Service order numbers come from a dedicated Postgres sequence so that
//! concurrent inserts never observe a duplicate or out-of-order value.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("CREATE SEQUENCE IF NOT EXISTS service_order_seq START WITH 1")
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ServiceRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ServiceRequests::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ServiceRequests::OrderNumber)
                            .integer()
                            .not_null()
                            .unique_key()
                            .default(Expr::cust("nextval('service_order_seq')")),
                    )
                    .col(ColumnDef::new(ServiceRequests::LocationId).uuid().not_null())
                    .col(ColumnDef::new(ServiceRequests::Subject).string().not_null())
                    .col(
                        ColumnDef::new(ServiceRequests::RequesterName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ServiceRequests::RequesterEmail)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ServiceRequests::RequesterPhone)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ServiceRequests::Description)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ServiceRequests::UnitName).string().not_null())
                    .col(ColumnDef::new(ServiceRequests::Priority).string().not_null())
                    .col(ColumnDef::new(ServiceRequests::Status).string().not_null())
                    .col(ColumnDef::new(ServiceRequests::AdditionalInfo).text().null())
                    .col(
                        ColumnDef::new(ServiceRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_requests_location")
                            .from(ServiceRequests::Table, ServiceRequests::LocationId)
                            .to(Locations::Table, Locations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_service_requests_location_id")
                    .table(ServiceRequests::Table)
                    .col(ServiceRequests::LocationId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_service_requests_status")
                    .table(ServiceRequests::Table)
                    .col(ServiceRequests::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_service_requests_created_at")
                    .table(ServiceRequests::Table)
                    .col(ServiceRequests::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Attachments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Attachments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Attachments::Title).string().not_null())
                    .col(ColumnDef::new(Attachments::StoragePath).string().not_null())
                    .col(ColumnDef::new(Attachments::Origin).string().not_null())
                    .col(ColumnDef::new(Attachments::RequestId).uuid().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attachments_request")
                            .from(Attachments::Table, Attachments::RequestId)
                            .to(ServiceRequests::Table, ServiceRequests::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_attachments_request_id")
                    .table(Attachments::Table)
                    .col(Attachments::RequestId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Attachments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ServiceRequests::Table).to_owned())
            .await?;

        manager
            .get_connection()
            .execute_unprepared("DROP SEQUENCE IF EXISTS service_order_seq")
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Locations {
    Table,
    Id,
}

#[derive(Iden)]
enum ServiceRequests {
    Table,
    Id,
    OrderNumber,
    LocationId,
    Subject,
    RequesterName,
    RequesterEmail,
    RequesterPhone,
    Description,
    UnitName,
    Priority,
    Status,
    AdditionalInfo,
    CreatedAt,
}

#[derive(Iden)]
enum Attachments {
    Table,
    Id,
    Title,
    StoragePath,
    Origin,
    RequestId,
}
