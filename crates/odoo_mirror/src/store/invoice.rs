use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select,
};
use uuid::Uuid;

use super::errors::Result;
use super::query::{PaginatedResult, Pagination};
use super::EntityStore;
use crate::entity::invoice::{Column, Entity as Invoice, InvoiceFields, Model};

/// Invoices table access.
#[derive(Clone)]
pub struct InvoiceStore {
    db: Arc<DatabaseConnection>,
}

impl InvoiceStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn scoped(include_deleted: bool) -> Select<Invoice> {
        let query = Invoice::find();
        if include_deleted {
            query
        } else {
            query.filter(Column::IsDeleted.eq(false))
        }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Model>> {
        Ok(Invoice::find_by_id(id).one(self.db.as_ref()).await?)
    }

    /// Page through invoices, newest Odoo record first.
    pub async fn list(
        &self,
        include_deleted: bool,
        pagination: Pagination,
    ) -> Result<PaginatedResult<Model>> {
        let paginator = Self::scoped(include_deleted)
            .order_by_desc(Column::OdooId)
            .paginate(self.db.as_ref(), pagination.per_page);

        let total = paginator.num_items().await?;
        let total_pages = paginator.num_pages().await?;
        let items = paginator.fetch_page(pagination.page).await?;

        Ok(PaginatedResult {
            items,
            total,
            page: pagination.page,
            per_page: pagination.per_page,
            total_pages,
        })
    }

    /// Live invoices of one customer, ordered by invoice date.
    pub async fn find_by_partner(&self, partner_id: i64) -> Result<Vec<Model>> {
        Ok(Self::scoped(false)
            .filter(Column::PartnerId.eq(partner_id))
            .order_by_asc(Column::InvoiceDate)
            .order_by_asc(Column::OdooId)
            .all(self.db.as_ref())
            .await?)
    }

    pub async fn count(&self, include_deleted: bool) -> Result<u64> {
        Ok(Self::scoped(include_deleted).count(self.db.as_ref()).await?)
    }

    /// Physically remove an invoice. Sync never calls this.
    pub async fn delete(&self, id: Uuid) -> Result<u64> {
        let result = Invoice::delete_by_id(id).exec(self.db.as_ref()).await?;
        Ok(result.rows_affected)
    }
}

#[async_trait]
impl EntityStore for InvoiceStore {
    type Record = Model;
    type Fields = InvoiceFields;

    async fn get_by_external_id(&self, odoo_id: i64) -> Result<Option<Model>> {
        Ok(Invoice::find()
            .filter(Column::OdooId.eq(odoo_id))
            .one(self.db.as_ref())
            .await?)
    }

    async fn all_external_ids(&self) -> Result<HashSet<i64>> {
        let ids: Vec<i64> = Invoice::find()
            .select_only()
            .column(Column::OdooId)
            .filter(Column::IsDeleted.eq(false))
            .into_tuple()
            .all(self.db.as_ref())
            .await?;
        Ok(ids.into_iter().collect())
    }

    async fn create(&self, fields: InvoiceFields) -> Result<Model> {
        Ok(fields.into_active_model().insert(self.db.as_ref()).await?)
    }

    async fn update(&self, record: &Model, fields: InvoiceFields) -> Result<Model> {
        let mut model = fields.into_active_model();
        model.id = ActiveValue::Unchanged(record.id);
        model.odoo_id = ActiveValue::NotSet;
        Ok(model.update(self.db.as_ref()).await?)
    }

    async fn soft_delete(&self, record: &Model) -> Result<Model> {
        let mut model = record.clone().into_active_model();
        model.is_deleted = ActiveValue::Set(true);
        Ok(model.update(self.db.as_ref()).await?)
    }
}
