//! Typed Odoo search domains.
//!
//! A domain is an implicitly AND-ed list of `(field, operator, value)` terms,
//! serialized the way Odoo expects: `[["field", "op", value], ...]`.

use serde::ser::{Serialize, SerializeTuple, Serializer};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Operator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "not in")]
    NotIn,
    #[serde(rename = "ilike")]
    Ilike,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    pub field: String,
    pub operator: Operator,
    pub value: Value,
}

impl Serialize for Term {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(3)?;
        tuple.serialize_element(&self.field)?;
        tuple.serialize_element(&self.operator)?;
        tuple.serialize_element(&self.value)?;
        tuple.end()
    }
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct Domain(Vec<Term>);

impl Domain {
    /// The empty domain, matching every record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records whose `id` is one of `ids`.
    #[must_use]
    pub fn ids(ids: &[i64]) -> Self {
        Self::new().term("id", Operator::In, ids.to_vec())
    }

    /// Customer invoices only (`move_type = out_invoice`).
    #[must_use]
    pub fn customer_invoices() -> Self {
        Self::new().eq("move_type", "out_invoice")
    }

    #[must_use]
    pub fn term(mut self, field: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        self.0.push(Term {
            field: field.into(),
            operator,
            value: value.into(),
        });
        self
    }

    #[must_use]
    pub fn eq(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.term(field, Operator::Eq, value)
    }

    /// Append every term of `other`.
    #[must_use]
    pub fn and(mut self, other: &Domain) -> Self {
        self.0.extend(other.0.iter().cloned());
        self
    }

    pub fn terms(&self) -> &[Term] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
