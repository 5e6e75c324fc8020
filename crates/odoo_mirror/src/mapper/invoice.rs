use super::value::{many2one, number_or, optional_date, optional_string, require_id};
use super::{EntityMapper, MapError, Result};
use crate::entity::invoice::InvoiceFields;
use crate::remote::RemoteRecord;

const DEFAULT_STATE: &str = "draft";

/// Invoice number used while Odoo has not assigned one (typically drafts).
pub fn placeholder_invoice_number(odoo_id: i64) -> String {
    format!("DRAFT-{odoo_id}")
}

/// Maps `account.move` customer invoices onto the `invoices` table.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvoiceMapper;

impl EntityMapper for InvoiceMapper {
    type Fields = InvoiceFields;

    fn map(&self, record: &RemoteRecord) -> Result<InvoiceFields> {
        let odoo_id = require_id(record)?;

        // Odoo reports "/" for moves that have not been numbered yet.
        let invoice_number = match optional_string(record, "name")? {
            Some(number) if number != "/" => number,
            _ => {
                let placeholder = placeholder_invoice_number(odoo_id);
                tracing::warn!(
                    odoo_id,
                    placeholder = %placeholder,
                    "Invoice has no number, using placeholder"
                );
                placeholder
            }
        };

        let (partner_id, partner_name) =
            many2one(record, "partner_id")?.ok_or_else(|| MapError::missing("partner_id"))?;

        let invoice_date = optional_date(record, "invoice_date")?;
        if invoice_date.is_none() {
            tracing::debug!(odoo_id, "Invoice has no invoice_date");
        }

        Ok(InvoiceFields {
            odoo_id,
            invoice_number,
            partner_id,
            partner_name,
            invoice_date,
            due_date: optional_date(record, "invoice_date_due")?,
            amount_total: number_or(record, "amount_total", 0.0)?,
            state: optional_string(record, "state")?.unwrap_or_else(|| DEFAULT_STATE.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::{Value, json};

    fn map(value: Value) -> Result<InvoiceFields> {
        InvoiceMapper.map(&RemoteRecord::try_from(value).unwrap())
    }

    #[test]
    fn maps_a_posted_invoice() {
        let fields = map(json!({
            "id": 42,
            "name": "INV/2026/00042",
            "partner_id": [3, "Deco Addict"],
            "invoice_date": "2026-01-05",
            "invoice_date_due": "2026-02-04",
            "amount_total": 1250.5,
            "state": "posted"
        }))
        .unwrap();

        assert_eq!(
            fields,
            InvoiceFields {
                odoo_id: 42,
                invoice_number: "INV/2026/00042".to_string(),
                partner_id: 3,
                partner_name: Some("Deco Addict".to_string()),
                invoice_date: NaiveDate::from_ymd_opt(2026, 1, 5),
                due_date: NaiveDate::from_ymd_opt(2026, 2, 4),
                amount_total: 1250.5,
                state: "posted".to_string(),
            }
        );
    }

    #[test]
    fn missing_number_gets_placeholder() {
        let fields = map(json!({"id": 7, "name": false, "partner_id": [3, "Deco Addict"]})).unwrap();
        assert_eq!(fields.invoice_number, "DRAFT-7");

        let fields = map(json!({"id": 8, "name": "/", "partner_id": [3, "Deco Addict"]})).unwrap();
        assert_eq!(fields.invoice_number, "DRAFT-8");
    }

    #[test]
    fn draft_defaults_apply() {
        let fields = map(json!({
            "id": 9,
            "name": false,
            "partner_id": [3, "Deco Addict"],
            "invoice_date": false,
            "invoice_date_due": false
        }))
        .unwrap();

        assert_eq!(fields.invoice_date, None);
        assert_eq!(fields.due_date, None);
        assert_eq!(fields.amount_total, 0.0);
        assert_eq!(fields.state, "draft");
    }

    #[test]
    fn missing_partner_is_an_error() {
        let err = map(json!({"id": 9, "name": "INV/1", "partner_id": false})).unwrap_err();
        assert_eq!(err, MapError::missing("partner_id"));
    }

    #[test]
    fn malformed_date_is_an_error() {
        let err = map(json!({
            "id": 9,
            "partner_id": [3, "Deco Addict"],
            "invoice_date": "05/01/2026"
        }))
        .unwrap_err();
        assert!(matches!(err, MapError::InvalidField { ref field, .. } if field == "invoice_date"));
    }

    #[test]
    fn placeholder_format() {
        assert_eq!(placeholder_invoice_number(123), "DRAFT-123");
    }
}
