//! Contact entity - the local mirror of Odoo `res.partner` records.

use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::NotSet, ConnectionTrait, IntoActiveModel, Set};
use serde::{Deserialize, Serialize};

use super::MirrorRecord;

/// Contact model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contacts")]
pub struct Model {
    /// Internal UUID primary key, assigned on insert.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Odoo partner ID. Unique and never reassigned.
    #[sea_orm(unique, indexed)]
    pub odoo_id: i64,

    // ─── Partner Data ────────────────────────────────────────────────────────
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    /// Country display name (second half of Odoo's `country_id` pair).
    pub country: Option<String>,

    // ─── Tracking ────────────────────────────────────────────────────────────
    /// Set when the partner disappeared from Odoo. Rows are never removed by sync.
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

/// Contact columns produced by the mapper.
///
/// Converting into an [`ActiveModel`] sets exactly these columns (plus a live
/// `is_deleted` flag); the surrogate id and timestamps stay `NotSet`, so an
/// update through this type leaves them untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactFields {
    pub odoo_id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

impl IntoActiveModel<ActiveModel> for ContactFields {
    fn into_active_model(self) -> ActiveModel {
        ActiveModel {
            id: NotSet,
            odoo_id: Set(self.odoo_id),
            name: Set(self.name),
            email: Set(self.email),
            phone: Set(self.phone),
            street: Set(self.street),
            city: Set(self.city),
            country: Set(self.country),
            is_deleted: Set(false),
            created_at: NotSet,
            updated_at: NotSet,
        }
    }
}
