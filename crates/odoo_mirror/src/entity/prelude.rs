//! Common re-exports for convenient entity usage.

pub use super::MirrorRecord;
pub use super::contact::{
    ActiveModel as ContactActiveModel, Column as ContactColumn, ContactFields,
    Entity as Contact, Model as ContactModel,
};
pub use super::invoice::{
    ActiveModel as InvoiceActiveModel, Column as InvoiceColumn, Entity as Invoice,
    InvoiceFields, Model as InvoiceModel,
};
