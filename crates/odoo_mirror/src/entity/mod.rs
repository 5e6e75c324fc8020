//! SeaORM entity definitions for the mirror schema.

pub mod contact;
pub mod invoice;
pub mod prelude;

/// Accessors shared by every mirrored record, regardless of entity kind.
pub trait MirrorRecord {
    /// The Odoo identifier this row mirrors.
    fn odoo_id(&self) -> i64;

    /// Whether the row has been soft-deleted by a previous sync.
    fn is_deleted(&self) -> bool;
}
