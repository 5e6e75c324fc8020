//! Remote record to local column mapping.
//!
//! Mappers are pure and deterministic. Odoo's `false` sentinel is treated as
//! "missing": optional columns become null, and required columns either get a
//! default or fail with a [`MapError`] that the sync engine counts against the
//! single record.

mod contact;
mod errors;
mod invoice;
mod value;

pub use contact::ContactMapper;
pub use errors::{MapError, Result};
pub use invoice::{InvoiceMapper, placeholder_invoice_number};

use crate::remote::RemoteRecord;

/// Converts one remote record into the column set of a local entity.
pub trait EntityMapper: Send + Sync {
    type Fields: Send;

    fn map(&self, record: &RemoteRecord) -> Result<Self::Fields>;
}
