//! In-memory [`EntityStore`] for engine tests.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use sea_orm::DbErr;

use super::{EntityStore, Result, StoreError};
use crate::entity::MirrorRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryRecord {
    pub odoo_id: i64,
    pub name: String,
    pub is_deleted: bool,
    /// Bumped on every write.
    pub revision: u32,
}

impl MirrorRecord for MemoryRecord {
    fn odoo_id(&self) -> i64 {
        self.odoo_id
    }

    fn is_deleted(&self) -> bool {
        self.is_deleted
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryFields {
    pub odoo_id: i64,
    pub name: String,
}

#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<BTreeMap<i64, MemoryRecord>>,
    /// Odoo ids whose writes fail.
    poisoned: Mutex<HashSet<i64>>,
    /// Make `all_external_ids` fail, simulating a broken connection.
    unavailable: Mutex<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a row directly, bypassing the engine.
    pub fn seed(&self, odoo_id: i64, name: &str, is_deleted: bool) {
        self.rows.lock().unwrap().insert(
            odoo_id,
            MemoryRecord {
                odoo_id,
                name: name.to_string(),
                is_deleted,
                revision: 0,
            },
        );
    }

    pub fn poison(&self, odoo_id: i64) {
        self.poisoned.lock().unwrap().insert(odoo_id);
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.lock().unwrap() = unavailable;
    }

    pub fn get(&self, odoo_id: i64) -> Option<MemoryRecord> {
        self.rows.lock().unwrap().get(&odoo_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn check(&self, odoo_id: i64) -> Result<()> {
        if self.poisoned.lock().unwrap().contains(&odoo_id) {
            return Err(DbErr::Custom(format!("write rejected for {odoo_id}")).into());
        }
        Ok(())
    }

    fn write(&self, odoo_id: i64, apply: impl FnOnce(&mut MemoryRecord)) -> Result<MemoryRecord> {
        self.check(odoo_id)?;
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .get_mut(&odoo_id)
            .ok_or_else(|| StoreError::not_found_by_odoo_id("memory", odoo_id))?;
        apply(row);
        row.revision += 1;
        Ok(row.clone())
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    type Record = MemoryRecord;
    type Fields = MemoryFields;

    async fn get_by_external_id(&self, odoo_id: i64) -> Result<Option<MemoryRecord>> {
        if *self.unavailable.lock().unwrap() {
            return Err(DbErr::Custom("connection closed".to_string()).into());
        }
        Ok(self.get(odoo_id))
    }

    async fn all_external_ids(&self) -> Result<HashSet<i64>> {
        if *self.unavailable.lock().unwrap() {
            return Err(DbErr::Custom("connection closed".to_string()).into());
        }
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|r| !r.is_deleted)
            .map(|r| r.odoo_id)
            .collect())
    }

    async fn create(&self, fields: MemoryFields) -> Result<MemoryRecord> {
        self.check(fields.odoo_id)?;
        let record = MemoryRecord {
            odoo_id: fields.odoo_id,
            name: fields.name,
            is_deleted: false,
            revision: 1,
        };
        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(&record.odoo_id) {
            return Err(StoreError::invalid_input(format!(
                "duplicate odoo_id {}",
                record.odoo_id
            )));
        }
        rows.insert(record.odoo_id, record.clone());
        Ok(record)
    }

    async fn update(&self, record: &MemoryRecord, fields: MemoryFields) -> Result<MemoryRecord> {
        self.write(record.odoo_id, |row| {
            row.name = fields.name;
            row.is_deleted = false;
        })
    }

    async fn soft_delete(&self, record: &MemoryRecord) -> Result<MemoryRecord> {
        self.write(record.odoo_id, |row| row.is_deleted = true)
    }
}
