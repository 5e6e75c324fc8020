use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Record not found: {context}")]
    NotFound { context: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}

impl StoreError {
    pub fn not_found_by_id(id: Uuid) -> Self {
        Self::NotFound {
            context: format!("id={id}"),
        }
    }

    pub fn not_found_by_odoo_id(entity: &str, odoo_id: i64) -> Self {
        Self::NotFound {
            context: format!("{entity} odoo_id={odoo_id}"),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
