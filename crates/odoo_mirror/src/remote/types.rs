use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Domain, RemoteError, Result};

pub const CONTACT_MODEL: &str = "res.partner";
pub const INVOICE_MODEL: &str = "account.move";

pub const CONTACT_FIELDS: &[&str] = &[
    "id",
    "name",
    "email",
    "phone",
    "street",
    "city",
    "country_id",
    "write_date",
];

pub const INVOICE_FIELDS: &[&str] = &[
    "id",
    "name",
    "partner_id",
    "invoice_date",
    "invoice_date_due",
    "amount_total",
    "state",
    "write_date",
];

/// One loosely-typed record as returned by the remote system.
///
/// Odoo encodes "no value" as `false` for every field type, so accessors
/// treat `false` and `null` alike.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteRecord(Map<String, Value>);

impl RemoteRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// External identifier, if present and integral.
    pub fn id(&self) -> Option<i64> {
        self.0.get("id").and_then(Value::as_i64)
    }

    /// Raw field value, with Odoo's `false` sentinel and `null` mapped to `None`.
    pub fn get(&self, field: &str) -> Option<&Value> {
        match self.0.get(field) {
            None | Some(Value::Null) | Some(Value::Bool(false)) => None,
            Some(value) => Some(value),
        }
    }

    /// Raw field value without sentinel handling.
    pub fn raw(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for RemoteRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

impl TryFrom<Value> for RemoteRecord {
    type Error = RemoteError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(RemoteError::invalid_response(format!(
                "expected a record object, got {other}"
            ))),
        }
    }
}

/// Pagination window for `search_read`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    /// `None` fetches everything after `offset`.
    pub limit: Option<u32>,
    pub offset: u32,
}

impl Page {
    /// The whole result set.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn new(limit: u32, offset: u32) -> Self {
        Self {
            limit: Some(limit),
            offset,
        }
    }
}

/// Read access to the remote system.
///
/// Implementors supply the three primitive calls; the entity helpers are
/// provided on top of them and normally need no override.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Authenticate and return the remote user id.
    async fn authenticate(&self) -> Result<i64>;

    /// Read `fields` of every `model` record matching `domain`.
    async fn search_read(
        &self,
        model: &str,
        domain: &Domain,
        fields: &[&str],
        page: Page,
    ) -> Result<Vec<RemoteRecord>>;

    /// Ids of every `model` record matching `domain`.
    async fn search(&self, model: &str, domain: &Domain) -> Result<Vec<i64>>;

    async fn fetch_contacts(&self, filter: Option<&Domain>) -> Result<Vec<RemoteRecord>> {
        let domain = filter.cloned().unwrap_or_default();
        let records = self
            .search_read(CONTACT_MODEL, &domain, CONTACT_FIELDS, Page::all())
            .await?;
        tracing::info!(count = records.len(), "Fetched contacts from Odoo");
        Ok(records)
    }

    async fn fetch_invoices(&self, filter: Option<&Domain>) -> Result<Vec<RemoteRecord>> {
        let domain = filter.cloned().unwrap_or_default();
        let records = self
            .search_read(INVOICE_MODEL, &domain, INVOICE_FIELDS, Page::all())
            .await?;
        tracing::info!(count = records.len(), "Fetched invoices from Odoo");
        Ok(records)
    }

    async fn fetch_contact_by_id(&self, odoo_id: i64) -> Result<Option<RemoteRecord>> {
        let records = self
            .search_read(
                CONTACT_MODEL,
                &Domain::new().eq("id", odoo_id),
                CONTACT_FIELDS,
                Page::new(1, 0),
            )
            .await?;
        Ok(records.into_iter().next())
    }

    async fn fetch_invoice_by_id(&self, odoo_id: i64) -> Result<Option<RemoteRecord>> {
        let records = self
            .search_read(
                INVOICE_MODEL,
                &Domain::new().eq("id", odoo_id),
                INVOICE_FIELDS,
                Page::new(1, 0),
            )
            .await?;
        Ok(records.into_iter().next())
    }

    async fn all_contact_ids(&self) -> Result<Vec<i64>> {
        self.search(CONTACT_MODEL, &Domain::new()).await
    }

    async fn all_invoice_ids(&self) -> Result<Vec<i64>> {
        self.search(INVOICE_MODEL, &Domain::new()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    fn record(value: Value) -> RemoteRecord {
        RemoteRecord::try_from(value).expect("object")
    }

    #[test]
    fn get_treats_false_and_null_as_missing() {
        let rec = record(json!({"id": 4, "email": false, "phone": null, "city": "Ghent", "active": true}));

        assert_eq!(rec.id(), Some(4));
        assert_eq!(rec.get("email"), None);
        assert_eq!(rec.get("phone"), None);
        assert_eq!(rec.get("missing"), None);
        assert_eq!(rec.get("city"), Some(&json!("Ghent")));
        assert_eq!(rec.get("active"), Some(&json!(true)));
        assert_eq!(rec.raw("email"), Some(&json!(false)));
    }

    #[test]
    fn id_requires_an_integer() {
        assert_eq!(record(json!({"id": "4"})).id(), None);
        assert_eq!(record(json!({"name": "x"})).id(), None);
    }

    #[test]
    fn non_object_values_are_rejected() {
        let err = RemoteRecord::try_from(json!([1, 2])).expect_err("array is not a record");
        assert!(matches!(err, RemoteError::InvalidResponse { .. }));
    }

    /// Records every primitive call and replays canned rows.
    #[derive(Default)]
    struct RecordingSource {
        calls: Mutex<Vec<(String, Value, Option<u32>)>>,
        rows: Vec<RemoteRecord>,
    }

    #[async_trait]
    impl RemoteSource for RecordingSource {
        async fn authenticate(&self) -> Result<i64> {
            Ok(2)
        }

        async fn search_read(
            &self,
            model: &str,
            domain: &Domain,
            _fields: &[&str],
            page: Page,
        ) -> Result<Vec<RemoteRecord>> {
            self.calls.lock().unwrap().push((
                model.to_string(),
                serde_json::to_value(domain).unwrap(),
                page.limit,
            ));
            Ok(self.rows.clone())
        }

        async fn search(&self, model: &str, domain: &Domain) -> Result<Vec<i64>> {
            self.calls.lock().unwrap().push((
                model.to_string(),
                serde_json::to_value(domain).unwrap(),
                None,
            ));
            Ok(self.rows.iter().filter_map(RemoteRecord::id).collect())
        }
    }

    #[tokio::test]
    async fn entity_helpers_target_the_right_models() {
        let source = RecordingSource {
            rows: vec![record(json!({"id": 1})), record(json!({"id": 2}))],
            ..Default::default()
        };

        source.fetch_contacts(None).await.unwrap();
        source
            .fetch_invoices(Some(&Domain::customer_invoices()))
            .await
            .unwrap();
        let ids = source.all_invoice_ids().await.unwrap();

        assert_eq!(ids, vec![1, 2]);
        let calls = source.calls.lock().unwrap();
        assert_eq!(calls[0], (CONTACT_MODEL.to_string(), json!([]), None));
        assert_eq!(
            calls[1],
            (
                INVOICE_MODEL.to_string(),
                json!([["move_type", "=", "out_invoice"]]),
                None
            )
        );
        assert_eq!(calls[2].0, INVOICE_MODEL);
    }

    #[tokio::test]
    async fn fetch_by_id_returns_first_row_or_none() {
        let found = RecordingSource {
            rows: vec![record(json!({"id": 9}))],
            ..Default::default()
        };
        let rec = found.fetch_contact_by_id(9).await.unwrap();
        assert_eq!(rec.and_then(|r| r.id()), Some(9));
        assert_eq!(
            found.calls.lock().unwrap()[0],
            (CONTACT_MODEL.to_string(), json!([["id", "=", 9]]), Some(1))
        );

        let missing = RecordingSource::default();
        assert!(missing.fetch_invoice_by_id(9).await.unwrap().is_none());
    }
}
