use super::value::{many2one, optional_string, require_id};
use super::{EntityMapper, Result};
use crate::entity::contact::ContactFields;
use crate::remote::RemoteRecord;

/// Maps `res.partner` records onto the `contacts` table.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContactMapper;

impl EntityMapper for ContactMapper {
    type Fields = ContactFields;

    fn map(&self, record: &RemoteRecord) -> Result<ContactFields> {
        let odoo_id = require_id(record)?;

        let name = optional_string(record, "name")?.unwrap_or_default();
        let country = many2one(record, "country_id")?.and_then(|(_, name)| name);

        Ok(ContactFields {
            odoo_id,
            name,
            email: optional_string(record, "email")?,
            phone: optional_string(record, "phone")?,
            street: optional_string(record, "street")?,
            city: optional_string(record, "city")?,
            country,
        })
    }
}
