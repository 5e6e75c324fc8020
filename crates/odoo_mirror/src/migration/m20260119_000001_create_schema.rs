//! Initial migration creating the `contacts` and `invoices` tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        self.create_contacts(manager).await?;
        self.create_invoices(manager).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Invoices::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Contacts::Table).to_owned())
            .await?;
        Ok(())
    }
}

impl Migration {
    async fn create_contacts(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Contacts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Contacts::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Contacts::OdooId)
                            .big_integer()
                            .not_null(),
                    )
                    // Partner data
                    .col(ColumnDef::new(Contacts::Name).string().not_null())
                    .col(ColumnDef::new(Contacts::Email).string().null())
                    .col(ColumnDef::new(Contacts::Phone).string().null())
                    .col(ColumnDef::new(Contacts::Street).string().null())
                    .col(ColumnDef::new(Contacts::City).string().null())
                    .col(ColumnDef::new(Contacts::Country).string().null())
                    // Tracking
                    .col(
                        ColumnDef::new(Contacts::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Contacts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Contacts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_contacts_odoo_id")
                    .table(Contacts::Table)
                    .col(Contacts::OdooId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_contacts_is_deleted")
                    .table(Contacts::Table)
                    .col(Contacts::IsDeleted)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_invoices(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Invoices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Invoices::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Invoices::OdooId)
                            .big_integer()
                            .not_null(),
                    )
                    // Invoice data
                    .col(
                        ColumnDef::new(Invoices::InvoiceNumber)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Invoices::PartnerId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Invoices::PartnerName).string().null())
                    .col(ColumnDef::new(Invoices::InvoiceDate).date().null())
                    .col(ColumnDef::new(Invoices::DueDate).date().null())
                    .col(
                        ColumnDef::new(Invoices::AmountTotal)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Invoices::State)
                            .string()
                            .not_null()
                            .default("draft"),
                    )
                    // Tracking
                    .col(
                        ColumnDef::new(Invoices::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Invoices::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Invoices::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_invoices_odoo_id")
                    .table(Invoices::Table)
                    .col(Invoices::OdooId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Lookups of a customer's invoices
        manager
            .create_index(
                Index::create()
                    .name("idx_invoices_partner_id")
                    .table(Invoices::Table)
                    .col(Invoices::PartnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_invoices_is_deleted")
                    .table(Invoices::Table)
                    .col(Invoices::IsDeleted)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Contacts {
    Table,
    Id,
    OdooId,
    Name,
    Email,
    Phone,
    Street,
    City,
    Country,
    IsDeleted,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Invoices {
    Table,
    Id,
    OdooId,
    InvoiceNumber,
    PartnerId,
    PartnerName,
    InvoiceDate,
    DueDate,
    AmountTotal,
    State,
    IsDeleted,
    CreatedAt,
    UpdatedAt,
}
