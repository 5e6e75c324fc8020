//! Invoice entity - the local mirror of Odoo `account.move` customer invoices.

use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::NotSet, ConnectionTrait, IntoActiveModel, Set};
use serde::{Deserialize, Serialize};

use super::MirrorRecord;

/// Invoice model.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    /// Internal UUID primary key, assigned on insert.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Odoo move ID. Unique and never reassigned.
    #[sea_orm(unique, indexed)]
    pub odoo_id: i64,

    // ─── Invoice Data ────────────────────────────────────────────────────────
    /// Invoice number, or a `DRAFT-<odoo_id>` placeholder for unnumbered drafts.
    pub invoice_number: String,
    /// Odoo partner ID of the customer.
    pub partner_id: i64,
    pub partner_name: Option<String>,
    pub invoice_date: Option<Date>,
    pub due_date: Option<Date>,
    #[sea_orm(column_type = "Double")]
    pub amount_total: f64,
    /// Odoo move state (`draft`, `posted`, `cancel`).
    pub state: String,

    // ─── Tracking ────────────────────────────────────────────────────────────
    #[sea_orm(default_value = false)]
    pub is_deleted: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = Utc::now().fixed_offset();
        if insert {
            if self.id.is_not_set() {
                self.id = Set(Uuid::new_v4());
            }
            self.created_at = Set(now);
        }
        self.updated_at = Set(now);
        Ok(self)
    }
}

impl MirrorRecord for Model {
    fn odoo_id(&self) -> i64 {
        self.odoo_id
    }

    fn is_deleted(&self) -> bool {
        self.is_deleted
    }
}

impl Model {
    /// Whether the invoice number is a generated placeholder rather than Odoo's.
    pub fn has_placeholder_number(&self) -> bool {
        self.invoice_number == format!("DRAFT-{}", self.odoo_id)
    }
}

/// Invoice columns produced by the mapper. See [`super::contact::ContactFields`].
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceFields {
    pub odoo_id: i64,
    pub invoice_number: String,
    pub partner_id: i64,
    pub partner_name: Option<String>,
    pub invoice_date: Option<Date>,
    pub due_date: Option<Date>,
    pub amount_total: f64,
    pub state: String,
}

impl IntoActiveModel<ActiveModel> for InvoiceFields {
    fn into_active_model(self) -> ActiveModel {
        ActiveModel {
            id: NotSet,
            odoo_id: Set(self.odoo_id),
            invoice_number: Set(self.invoice_number),
            partner_id: Set(self.partner_id),
            partner_name: Set(self.partner_name),
            invoice_date: Set(self.invoice_date),
            due_date: Set(self.due_date),
            amount_total: Set(self.amount_total),
            state: Set(self.state),
            is_deleted: Set(false),
            created_at: NotSet,
            updated_at: NotSet,
        }
    }
}
